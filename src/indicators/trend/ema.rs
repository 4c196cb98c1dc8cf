//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::models::indicators::EmaIndicator;
use crate::models::series::Series;

/// Streaming EMA state.
///
/// The first value is the simple average of the first `period` prices;
/// afterwards `ema_t = price_t·α + ema_{t-1}·(1-α)` with α = 2/(period+1).
/// Feeding the same prices always reproduces the same bits.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    seed: Vec<f64>,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: u32) -> Self {
        Self {
            period: period as usize,
            seed: Vec::with_capacity(period as usize),
            value: None,
        }
    }

    /// Push the newest price and return the EMA, if defined yet.
    pub fn update(&mut self, price: f64) -> Option<f64> {
        if self.period == 0 {
            return None;
        }
        match self.value {
            Some(previous) => {
                self.value = Some(math::ema_from_previous(price, previous, self.period));
            }
            None => {
                self.seed.push(price);
                if self.seed.len() == self.period {
                    self.value = math::mean(&self.seed);
                    self.seed = Vec::new();
                }
            }
        }
        self.value
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn period(&self) -> u32 {
        self.period as u32
    }
}

/// Final EMA over a raw value slice.
pub fn ema_of(values: &[f64], period: u32) -> Option<f64> {
    let mut ema = Ema::new(period);
    values.iter().fold(None, |_, &v| ema.update(v))
}

/// EMA aligned with the input: `None` until the seed window is filled.
pub fn ema_series(values: &[f64], period: u32) -> Vec<Option<f64>> {
    let mut ema = Ema::new(period);
    values.iter().map(|&v| ema.update(v)).collect()
}

/// Calculate EMA for a specific period
pub fn calculate_ema(series: &Series, period: u32) -> Option<EmaIndicator> {
    let value = ema_of(&series.closes(), period)?;
    Some(EmaIndicator { value, period })
}
