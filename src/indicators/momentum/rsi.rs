//! RSI (Relative Strength Index) indicator

use crate::models::indicators::RsiIndicator;
use crate::models::series::Series;

pub const DEFAULT_PERIOD: u32 = 14;

/// Streaming RSI with Wilder smoothing.
///
/// The first `period` price changes are averaged plainly; after that
/// `avg = (avg_prev·(period-1) + current)/period`.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    previous_price: Option<f64>,
    changes_seen: usize,
    gain_sum: f64,
    loss_sum: f64,
    averages: Option<(f64, f64)>,
}

impl Rsi {
    pub fn new(period: u32) -> Self {
        Self {
            period: period as usize,
            previous_price: None,
            changes_seen: 0,
            gain_sum: 0.0,
            loss_sum: 0.0,
            averages: None,
        }
    }

    /// Push the newest price and return RSI once `period + 1` prices are in.
    pub fn update(&mut self, price: f64) -> Option<f64> {
        if self.period == 0 {
            return None;
        }
        let Some(previous) = self.previous_price.replace(price) else {
            return None;
        };

        let change = price - previous;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        let period = self.period as f64;

        match self.averages {
            Some((avg_gain, avg_loss)) => {
                self.averages = Some((
                    (avg_gain * (period - 1.0) + gain) / period,
                    (avg_loss * (period - 1.0) + loss) / period,
                ));
            }
            None => {
                self.gain_sum += gain;
                self.loss_sum += loss;
                self.changes_seen += 1;
                if self.changes_seen == self.period {
                    self.averages = Some((self.gain_sum / period, self.loss_sum / period));
                }
            }
        }

        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        let (avg_gain, avg_loss) = self.averages?;
        Some(rsi_from_averages(avg_gain, avg_loss))
    }
}

/// RSI = 100 - 100 / (1 + avg_gain / avg_loss).
///
/// No losses with gains is 100; no movement at all is a neutral 50.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { 100.0 } else { 50.0 };
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// Calculate RSI indicator
pub fn calculate_rsi(series: &Series, period: u32) -> Option<RsiIndicator> {
    let mut rsi = Rsi::new(period);
    let value = series
        .points()
        .iter()
        .fold(None, |_, point| rsi.update(point.price))?;
    Some(RsiIndicator { value, period })
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(series: &Series) -> Option<RsiIndicator> {
    calculate_rsi(series, DEFAULT_PERIOD)
}
