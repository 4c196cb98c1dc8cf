//! Fear & Greed contribution.

use crate::config::SentimentPolicy;
use crate::models::sentiment::SentimentReading;
use crate::models::signal::SignalReason;

/// Contrarian nudge: extreme fear is bullish, extreme greed bearish.
/// Returns `None` when there is no reading or it sits between the bands.
pub fn sentiment_contribution(
    reading: Option<&SentimentReading>,
    policy: &SentimentPolicy,
) -> Option<SignalReason> {
    let reading = reading?;
    if policy.weight == 0.0 {
        return None;
    }

    if reading.value < policy.extreme_fear_below {
        Some(SignalReason {
            description: format!("Extreme Fear ({})", reading.value),
            weight: policy.weight,
            rule: None,
        })
    } else if reading.value > policy.extreme_greed_above {
        Some(SignalReason {
            description: format!("Extreme Greed ({})", reading.value),
            weight: -policy.weight,
            rule: None,
        })
    } else {
        None
    }
}
