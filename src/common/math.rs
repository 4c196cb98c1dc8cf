//! Moving-window arithmetic used by the indicator library.
//!
//! All window helpers operate on the trailing `period` values of the slice
//! and return `None` when fewer values are available.

/// Smoothing factor for an exponential moving average: 2 / (period + 1).
pub fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Arithmetic mean of all values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Simple moving average of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    mean(&values[values.len() - period..])
}

/// Population standard deviation of the last `period` values.
pub fn standard_deviation(values: &[f64], period: usize) -> Option<f64> {
    let average = sma(values, period)?;
    let window = &values[values.len() - period..];
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - average;
            diff * diff
        })
        .sum::<f64>()
        / period as f64;
    Some(variance.sqrt())
}

/// One EMA recurrence step: `value·α + previous·(1-α)`.
pub fn ema_from_previous(value: f64, previous: f64, period: usize) -> f64 {
    let alpha = smoothing_factor(period);
    value * alpha + previous * (1.0 - alpha)
}
