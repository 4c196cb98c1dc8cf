//! Timeframe aggregation: coarser series derived from the native
//! one-minute feed, and the per-timeframe views the scorer consumes.

pub mod resample;

pub use resample::resample;

use crate::config::{IndicatorParams, TimeframeConfig};
use crate::error::EngineError;
use crate::indicators::compute_indicator_set;
use crate::models::series::Series;
use crate::models::timeframe::TimeframeView;

pub struct TimeframeAggregator;

impl TimeframeAggregator {
    /// Resample `series` into every configured timeframe and compute its
    /// indicators. Views keep the configured order.
    pub fn build_views(
        series: &Series,
        timeframes: &[TimeframeConfig],
        params: &IndicatorParams,
    ) -> Result<Vec<TimeframeView>, EngineError> {
        timeframes
            .iter()
            .map(|tf| {
                let resampled = resample(series, tf.minutes)?;
                let indicators = compute_indicator_set(&resampled, params);
                Ok(TimeframeView {
                    label: tf.label.clone(),
                    minutes: tf.minutes,
                    series: resampled,
                    indicators,
                })
            })
            .collect()
    }
}
