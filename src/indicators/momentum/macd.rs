//! MACD (Moving Average Convergence Divergence) indicator

use crate::indicators::trend::Ema;
use crate::models::indicators::MacdIndicator;
use crate::models::series::Series;

/// One MACD reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Streaming MACD.
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
///
/// The first full reading appears after `slow + signal - 1` prices.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
    periods: (u32, u32, u32),
}

impl Macd {
    pub fn new(fast_period: u32, slow_period: u32, signal_period: u32) -> Self {
        Self {
            fast: Ema::new(fast_period),
            slow: Ema::new(slow_period),
            signal: Ema::new(signal_period),
            periods: (fast_period, slow_period, signal_period),
        }
    }

    pub fn update(&mut self, price: f64) -> Option<MacdValue> {
        let fast = self.fast.update(price);
        let slow = self.slow.update(price);
        let macd = fast? - slow?;
        let signal = self.signal.update(macd)?;
        Some(MacdValue {
            macd,
            signal,
            histogram: macd - signal,
        })
    }

    pub fn periods(&self) -> (u32, u32, u32) {
        self.periods
    }
}

/// Calculate MACD indicator, including the previous histogram value so
/// callers can detect zero-line crossings.
pub fn calculate_macd(
    series: &Series,
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Option<MacdIndicator> {
    let mut macd = Macd::new(fast_period, slow_period, signal_period);
    let mut previous: Option<MacdValue> = None;
    let mut latest: Option<MacdValue> = None;

    for point in series.points() {
        if let Some(value) = macd.update(point.price) {
            previous = latest.replace(value);
        }
    }

    let latest = latest?;
    Some(MacdIndicator {
        macd: latest.macd,
        signal: latest.signal,
        histogram: latest.histogram,
        previous_histogram: previous.map(|v| v.histogram),
        period: macd.periods(),
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(series: &Series) -> Option<MacdIndicator> {
    calculate_macd(series, 12, 26, 9)
}
