use serde::Serialize;

use super::indicators::IndicatorSet;
use super::series::Series;

/// One resampled resolution with its indicators. Built fresh each cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeframeView {
    pub label: String,
    pub minutes: u32,
    pub series: Series,
    pub indicators: IndicatorSet,
}
