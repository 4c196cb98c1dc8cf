//! Signal engine configuration: indicator periods, the rule weight table,
//! timeframe multipliers, sentiment policy and decision thresholds.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::env_parse;
use crate::error::ConfigError;
use crate::signals::rules::RuleId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub ema_fast: u32,
    pub ema_slow: u32,
    pub bollinger_period: u32,
    pub bollinger_std_dev: f64,
    pub rsi_period: u32,
    pub macd_fast: u32,
    pub macd_slow: u32,
    pub macd_signal: u32,
    pub volume_window: u32,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_fast: 12,
            ema_slow: 26,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            volume_window: 10,
        }
    }
}

impl IndicatorParams {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, period) in [
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("bollinger", self.bollinger_period),
            ("rsi", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("volume_window", self.volume_window),
        ] {
            if period == 0 {
                return Err(ConfigError::InvalidPeriod { name });
            }
        }
        if self.ema_fast >= self.ema_slow {
            return Err(ConfigError::FastNotBelowSlow {
                name: "ema",
                fast: self.ema_fast,
                slow: self.ema_slow,
            });
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::FastNotBelowSlow {
                name: "macd",
                fast: self.macd_fast,
                slow: self.macd_slow,
            });
        }
        positive("bollinger_std_dev", self.bollinger_std_dev)
    }
}

/// Trigger levels used by the rule conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    pub rsi_extreme_oversold: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    /// RSI below this on the higher timeframe reads as a bullish structure.
    pub rsi_bullish_structure: f64,
    /// Recent/prior volume ratio that counts as a surge.
    pub volume_surge_ratio: f64,
    /// Fractional price move over the volume window that gives a surge a direction.
    pub volume_price_move: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            rsi_extreme_oversold: 25.0,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            rsi_bullish_structure: 40.0,
            volume_surge_ratio: 1.8,
            volume_price_move: 0.01,
        }
    }
}

impl RuleThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        let ordered = 0.0 <= self.rsi_extreme_oversold
            && self.rsi_extreme_oversold <= self.rsi_oversold
            && self.rsi_oversold < self.rsi_overbought
            && self.rsi_overbought <= 100.0;
        if !ordered {
            return Err(ConfigError::OutOfRange {
                name: "rsi thresholds",
                reason: format!(
                    "need 0 <= extreme ({}) <= oversold ({}) < overbought ({}) <= 100",
                    self.rsi_extreme_oversold, self.rsi_oversold, self.rsi_overbought
                ),
            });
        }
        if !(0.0..=100.0).contains(&self.rsi_bullish_structure) {
            return Err(ConfigError::OutOfRange {
                name: "rsi_bullish_structure",
                reason: format!("{} is outside 0..=100", self.rsi_bullish_structure),
            });
        }
        positive("volume_surge_ratio", self.volume_surge_ratio)?;
        positive("volume_price_move", self.volume_price_move)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeConfig {
    pub label: String,
    pub minutes: u32,
    pub multiplier: f64,
}

impl TimeframeConfig {
    pub fn new(label: impl Into<String>, minutes: u32, multiplier: f64) -> Self {
        Self {
            label: label.into(),
            minutes,
            multiplier,
        }
    }
}

/// Contrarian Fear & Greed nudge: extreme fear adds `weight`, extreme greed
/// subtracts it, anything in between contributes nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentPolicy {
    pub extreme_fear_below: u8,
    pub extreme_greed_above: u8,
    pub weight: f64,
}

impl Default for SentimentPolicy {
    fn default() -> Self {
        Self {
            extreme_fear_below: 20,
            extreme_greed_above: 80,
            weight: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub indicators: IndicatorParams,
    pub thresholds: RuleThresholds,
    /// Signed weight per rule; ids left out use their default weight.
    pub rule_weights: BTreeMap<RuleId, f64>,
    /// Timeframe labels per rule; ids left out use their default scope and
    /// an empty list means every timeframe.
    pub rule_scopes: BTreeMap<RuleId, Vec<String>>,
    pub timeframes: Vec<TimeframeConfig>,
    pub sentiment: SentimentPolicy,
    /// Composite score is clipped to `[-score_bound, score_bound]`.
    pub score_bound: f64,
    /// |score| at or above this is a long/short call.
    pub entry_threshold: f64,
    /// |score| at or above this is labelled strong.
    pub strong_threshold: f64,
    /// Confidence = min(100, |score| · confidence_scale).
    pub confidence_scale: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorParams::default(),
            thresholds: RuleThresholds::default(),
            rule_weights: RuleId::ALL
                .iter()
                .map(|id| (*id, id.default_weight()))
                .collect(),
            rule_scopes: BTreeMap::new(),
            timeframes: vec![
                TimeframeConfig::new("1m", 1, 0.5),
                TimeframeConfig::new("5m", 5, 0.75),
                TimeframeConfig::new("15m", 15, 1.0),
                TimeframeConfig::new("1h", 60, 1.5),
            ],
            sentiment: SentimentPolicy::default(),
            score_bound: 100.0,
            entry_threshold: 30.0,
            strong_threshold: 60.0,
            confidence_scale: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Load from `ENGINE_CONFIG_PATH` when set, then apply the
    /// `SIGNAL_ENTRY_THRESHOLD` / `SIGNAL_STRONG_THRESHOLD` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("ENGINE_CONFIG_PATH") {
            Ok(path) if !path.trim().is_empty() => Self::from_json_file(path.trim())?,
            _ => Self::default(),
        };
        config.entry_threshold = env_parse("SIGNAL_ENTRY_THRESHOLD", config.entry_threshold)?;
        config.strong_threshold = env_parse("SIGNAL_STRONG_THRESHOLD", config.strong_threshold)?;
        Ok(config)
    }

    pub fn weight_for(&self, rule: RuleId) -> f64 {
        self.rule_weights
            .get(&rule)
            .copied()
            .unwrap_or_else(|| rule.default_weight())
    }

    pub fn scope_for(&self, rule: RuleId) -> Option<Vec<String>> {
        match self.rule_scopes.get(&rule) {
            Some(labels) if labels.is_empty() => None,
            Some(labels) => Some(labels.clone()),
            None => rule
                .default_scope()
                .map(|labels| labels.iter().map(|l| l.to_string()).collect()),
        }
    }

    pub fn multiplier_for(&self, label: &str) -> Option<f64> {
        self.timeframes
            .iter()
            .find(|tf| tf.label == label)
            .map(|tf| tf.multiplier)
    }

    /// Heaviest rule weight at the lightest timeframe multiplier. The
    /// sentiment weight must stay strictly below this.
    fn smallest_timeframe_contribution(&self) -> f64 {
        let heaviest_rule = RuleId::ALL
            .iter()
            .map(|id| self.weight_for(*id).abs())
            .fold(0.0, f64::max);
        let lightest_multiplier = self
            .timeframes
            .iter()
            .map(|tf| tf.multiplier)
            .fold(f64::INFINITY, f64::min);
        heaviest_rule * lightest_multiplier
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate()?;
        self.thresholds.validate()?;

        for (rule, weight) in &self.rule_weights {
            if !weight.is_finite() {
                return Err(ConfigError::InvalidRuleWeight {
                    rule: rule.as_str().to_string(),
                    weight: *weight,
                });
            }
        }

        if self.timeframes.is_empty() {
            return Err(ConfigError::NoTimeframes);
        }
        let mut labels = HashSet::new();
        for tf in &self.timeframes {
            let invalid = |reason: &str| ConfigError::InvalidTimeframe {
                label: tf.label.clone(),
                reason: reason.to_string(),
            };
            if tf.label.trim().is_empty() {
                return Err(invalid("label is empty"));
            }
            if tf.minutes == 0 {
                return Err(invalid("minutes must be greater than zero"));
            }
            if !tf.multiplier.is_finite() || tf.multiplier <= 0.0 {
                return Err(invalid("multiplier must be positive and finite"));
            }
            if !labels.insert(tf.label.as_str()) {
                return Err(invalid("label is duplicated"));
            }
        }

        positive("score_bound", self.score_bound)?;
        positive("entry_threshold", self.entry_threshold)?;
        positive("confidence_scale", self.confidence_scale)?;
        if !(self.entry_threshold <= self.strong_threshold
            && self.strong_threshold <= self.score_bound)
        {
            return Err(ConfigError::OutOfRange {
                name: "decision thresholds",
                reason: format!(
                    "need 0 < entry ({}) <= strong ({}) <= score_bound ({})",
                    self.entry_threshold, self.strong_threshold, self.score_bound
                ),
            });
        }

        let sentiment = &self.sentiment;
        if !(sentiment.extreme_fear_below < sentiment.extreme_greed_above
            && sentiment.extreme_greed_above <= 100)
        {
            return Err(ConfigError::OutOfRange {
                name: "sentiment bands",
                reason: format!(
                    "need extreme_fear_below ({}) < extreme_greed_above ({}) <= 100",
                    sentiment.extreme_fear_below, sentiment.extreme_greed_above
                ),
            });
        }
        if !sentiment.weight.is_finite() || sentiment.weight < 0.0 {
            return Err(ConfigError::NotPositive {
                name: "sentiment.weight",
                value: sentiment.weight,
            });
        }
        let limit = self.smallest_timeframe_contribution();
        if sentiment.weight > 0.0 && sentiment.weight >= limit {
            return Err(ConfigError::SentimentTooHeavy {
                weight: sentiment.weight,
                limit,
            });
        }

        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}
