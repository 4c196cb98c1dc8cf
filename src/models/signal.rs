//! Engine output: the composite signal and its per-timeframe breakdown.

use serde::{Deserialize, Serialize};

use super::indicators::IndicatorSet;
use crate::signals::rules::RuleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    Long,
    Short,
    Neutral,
}

/// Five-level display label derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalLabel {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl SignalLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalLabel::StrongBuy => "STRONG BUY",
            SignalLabel::Buy => "BUY",
            SignalLabel::Neutral => "NEUTRAL",
            SignalLabel::Sell => "SELL",
            SignalLabel::StrongSell => "STRONG SELL",
        }
    }
}

/// A fired rule (or the sentiment term) with its signed, multiplied weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReason {
    pub description: String,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeframeBreakdown {
    pub label: String,
    pub indicators: IndicatorSet,
    /// Sum of fired rule weights before the timeframe multiplier.
    pub sub_score: f64,
    pub multiplier: f64,
    pub weighted_score: f64,
    pub fired: Vec<SignalReason>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalResult {
    pub direction: SignalDirection,
    pub label: SignalLabel,
    pub confidence: f64,
    pub composite_score: f64,
    pub reasons: Vec<String>,
    pub timeframes: Vec<TimeframeBreakdown>,
}

impl SignalResult {
    pub const INSUFFICIENT_DATA: &'static str = "insufficient data";

    /// Cold-start answer when no timeframe has any defined indicator.
    pub fn insufficient_data(timeframes: Vec<TimeframeBreakdown>) -> Self {
        Self {
            direction: SignalDirection::Neutral,
            label: SignalLabel::Neutral,
            confidence: 0.0,
            composite_score: 0.0,
            reasons: vec![Self::INSUFFICIENT_DATA.to_string()],
            timeframes,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.direction != SignalDirection::Neutral
    }
}
