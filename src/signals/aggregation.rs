//! Per-timeframe rule scoring and cross-timeframe combination

use crate::models::signal::{SignalReason, TimeframeBreakdown};
use crate::models::timeframe::TimeframeView;
use crate::signals::rules::RuleBook;

pub struct Aggregator;

impl Aggregator {
    /// Evaluate the rule table on one timeframe. Fired reasons carry the
    /// multiplied weight; `sub_score` is the unmultiplied sum.
    pub fn score_timeframe(
        view: &TimeframeView,
        multiplier: f64,
        rules: &RuleBook,
    ) -> TimeframeBreakdown {
        let mut fired = rules.evaluate(&view.indicators, &view.label);
        let sub_score: f64 = fired.iter().map(|r| r.weight).sum();
        for reason in &mut fired {
            reason.weight *= multiplier;
        }

        TimeframeBreakdown {
            label: view.label.clone(),
            indicators: view.indicators.clone(),
            sub_score,
            multiplier,
            weighted_score: sub_score * multiplier,
            fired,
        }
    }

    /// Unclipped sum of all weighted timeframe scores plus the sentiment term.
    pub fn calculate_global_score(
        timeframes: &[TimeframeBreakdown],
        sentiment: Option<&SignalReason>,
    ) -> f64 {
        let technical: f64 = timeframes.iter().map(|tf| tf.weighted_score).sum();
        technical + sentiment.map_or(0.0, |s| s.weight)
    }

    /// Fired reasons ordered by absolute weighted contribution, heaviest
    /// first. Ties keep timeframe order, then table order, sentiment last.
    pub fn generate_reasons(
        timeframes: &[TimeframeBreakdown],
        sentiment: Option<&SignalReason>,
    ) -> Vec<String> {
        let mut reasons: Vec<&SignalReason> = timeframes
            .iter()
            .flat_map(|tf| tf.fired.iter())
            .chain(sentiment)
            .collect();
        reasons.sort_by(|a, b| b.weight.abs().total_cmp(&a.weight.abs()));
        reasons.into_iter().map(|r| r.description.clone()).collect()
    }
}
