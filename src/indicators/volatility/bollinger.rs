//! Bollinger Bands indicator

use crate::common::math;
use crate::models::indicators::BollingerBandsIndicator;
use crate::models::series::Series;

pub const DEFAULT_PERIOD: u32 = 20;
pub const DEFAULT_STD_DEV: f64 = 2.0;

/// Calculate Bollinger Bands over the last `period` closes
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * population standard deviation)
/// Lower Band = Middle - (std_dev * population standard deviation)
pub fn calculate_bollinger_bands(
    series: &Series,
    period: u32,
    std_dev: f64,
) -> Option<BollingerBandsIndicator> {
    bands_of(&series.closes(), period, std_dev)
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(series: &Series) -> Option<BollingerBandsIndicator> {
    calculate_bollinger_bands(series, DEFAULT_PERIOD, DEFAULT_STD_DEV)
}

fn bands_of(closes: &[f64], period: u32, std_dev: f64) -> Option<BollingerBandsIndicator> {
    let middle = math::sma(closes, period as usize)?;
    let std = math::standard_deviation(closes, period as usize)?;

    Some(BollingerBandsIndicator {
        upper: middle + std_dev * std,
        middle,
        lower: middle - std_dev * std,
        period,
        std_dev,
    })
}
