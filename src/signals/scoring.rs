//! Composite scoring and confidence

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::models::sentiment::SentimentReading;
use crate::models::signal::SignalResult;
use crate::models::timeframe::TimeframeView;
use crate::signals::aggregation::Aggregator;
use crate::signals::decision::{decide_direction, decide_label};
use crate::signals::rules::RuleBook;
use crate::signals::sentiment::sentiment_contribution;

/// Clip to `[-bound, bound]`. A NaN sum (opposing infinities) is treated as
/// no signal.
pub fn clip_score(score: f64, bound: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(-bound, bound)
}

/// Linear in |score|, capped at 100. Distance from neutral, not a probability.
pub fn calculate_confidence(score: f64, scale: f64) -> f64 {
    (score.abs() * scale).min(100.0)
}

/// Combines per-timeframe indicator sets and sentiment into one call.
#[derive(Debug, Clone)]
pub struct SignalScorer {
    config: EngineConfig,
    rules: RuleBook,
}

impl SignalScorer {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = RuleBook::from_config(&config);
        Ok(Self { config, rules })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Views whose label is not in the configured timeframe table are
    /// scored with a multiplier of 1.
    pub fn score(
        &self,
        views: &[TimeframeView],
        sentiment: Option<&SentimentReading>,
    ) -> SignalResult {
        let timeframes: Vec<_> = views
            .iter()
            .map(|view| {
                let multiplier = self.config.multiplier_for(&view.label).unwrap_or(1.0);
                Aggregator::score_timeframe(view, multiplier, &self.rules)
            })
            .collect();

        if views.iter().all(|view| view.indicators.is_undefined()) {
            return SignalResult::insufficient_data(timeframes);
        }

        let sentiment = sentiment_contribution(sentiment, &self.config.sentiment);
        let raw = Aggregator::calculate_global_score(&timeframes, sentiment.as_ref());
        let composite_score = clip_score(raw, self.config.score_bound);

        SignalResult {
            direction: decide_direction(composite_score, self.config.entry_threshold),
            label: decide_label(
                composite_score,
                self.config.entry_threshold,
                self.config.strong_threshold,
            ),
            confidence: calculate_confidence(composite_score, self.config.confidence_scale),
            composite_score,
            reasons: Aggregator::generate_reasons(&timeframes, sentiment.as_ref()),
            timeframes,
        }
    }
}
