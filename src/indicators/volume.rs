//! Volume surge detection.

use crate::common::math;
use crate::models::indicators::VolumeTrend;
use crate::models::series::Series;

/// Compare the mean volume of the last `window` points with the `window`
/// points before them, alongside the price change across the recent window.
///
/// Needs `2 * window` points that all carry volume.
pub fn calculate_volume_trend(series: &Series, window: u32) -> Option<VolumeTrend> {
    let window = window as usize;
    if window == 0 || series.len() < window * 2 {
        return None;
    }
    let volumes = series.volumes()?;
    let len = volumes.len();

    let recent_average = math::mean(&volumes[len - window..])?;
    let prior_average = math::mean(&volumes[len - 2 * window..len - window])?;
    if prior_average <= 0.0 {
        return None;
    }

    let closes = series.closes();
    let reference = closes[len - window];
    let price_change = (closes[len - 1] - reference) / reference;

    Some(VolumeTrend {
        recent_average,
        prior_average,
        ratio: recent_average / prior_average,
        price_change,
    })
}
