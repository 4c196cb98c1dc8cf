//! Main signal evaluation engine: aggregate, compute indicators, score.

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::models::sentiment::SentimentReading;
use crate::models::series::{PricePoint, Series};
use crate::models::signal::SignalResult;
use crate::models::timeframe::TimeframeView;
use crate::signals::scoring::SignalScorer;
use crate::timeframes::TimeframeAggregator;

/// Stateless between calls: every evaluation takes a fresh series and
/// returns a fresh result.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    scorer: SignalScorer,
}

impl SignalEngine {
    /// Validates `config` once; a rejected configuration is fatal.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            scorer: SignalScorer::new(config)?,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        self.scorer.config()
    }

    /// Resample `series` into the configured timeframes with indicators.
    pub fn build_views(&self, series: &Series) -> Result<Vec<TimeframeView>, EngineError> {
        let config = self.config();
        TimeframeAggregator::build_views(series, &config.timeframes, &config.indicators)
    }

    pub fn evaluate(
        &self,
        series: &Series,
        sentiment: Option<&SentimentReading>,
    ) -> Result<SignalResult, EngineError> {
        let views = self.build_views(series)?;
        let result = self.scorer.score(&views, sentiment);

        debug!(
            points = series.len(),
            timeframes = views.len(),
            composite_score = result.composite_score,
            direction = ?result.direction,
            "signal cycle evaluated"
        );

        Ok(result)
    }

    /// Validate raw one-minute points and evaluate them.
    pub fn evaluate_points(
        &self,
        points: Vec<PricePoint>,
        sentiment: Option<&SentimentReading>,
    ) -> Result<SignalResult, EngineError> {
        let series = Series::one_minute(points)?;
        self.evaluate(&series, sentiment)
    }
}
