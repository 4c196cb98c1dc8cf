//! Tagged rule table evaluated uniformly against every timeframe.
//!
//! Each rule pairs a condition over an [`IndicatorSet`] with a signed weight
//! and a reason template. Conditions return the observed value that goes
//! into the template, or `None` when the rule does not fire; an undefined
//! indicator never fires a rule.
//!
//! A rule may be scoped to a set of timeframe labels, and trend rules yield
//! to an opposing Bollinger breakout on the same view: a close outside the
//! band is read as an overextension, and the EMA/MACD lag that follows the
//! same move must not cancel it.

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, RuleThresholds};
use crate::models::indicators::IndicatorSet;
use crate::models::signal::SignalReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    RsiExtremeOversold,
    RsiOversold,
    RsiOverbought,
    RsiBullishStructure,
    BollingerBelowLower,
    BollingerAboveUpper,
    MacdBullishCross,
    MacdBearishCross,
    EmaBullish,
    EmaBearish,
    VolumeSurgeUp,
    VolumeDistribution,
}

impl RuleId {
    pub const ALL: [RuleId; 12] = [
        RuleId::RsiExtremeOversold,
        RuleId::RsiOversold,
        RuleId::RsiOverbought,
        RuleId::RsiBullishStructure,
        RuleId::BollingerBelowLower,
        RuleId::BollingerAboveUpper,
        RuleId::MacdBullishCross,
        RuleId::MacdBearishCross,
        RuleId::EmaBullish,
        RuleId::EmaBearish,
        RuleId::VolumeSurgeUp,
        RuleId::VolumeDistribution,
    ];

    /// Positive is bullish, negative bearish.
    pub fn default_weight(self) -> f64 {
        match self {
            RuleId::RsiExtremeOversold => 25.0,
            RuleId::RsiOversold => 18.0,
            RuleId::RsiOverbought => -22.0,
            RuleId::RsiBullishStructure => 15.0,
            RuleId::BollingerBelowLower => 20.0,
            RuleId::BollingerAboveUpper => -20.0,
            RuleId::MacdBullishCross => 15.0,
            RuleId::MacdBearishCross => -15.0,
            RuleId::EmaBullish => 20.0,
            RuleId::EmaBearish => -20.0,
            RuleId::VolumeSurgeUp => 18.0,
            RuleId::VolumeDistribution => -20.0,
        }
    }

    /// Timeframe labels the rule is limited to by default; `None` means
    /// every timeframe.
    pub fn default_scope(self) -> Option<&'static [&'static str]> {
        match self {
            RuleId::RsiBullishStructure => Some(&["1h"]),
            _ => None,
        }
    }

    /// Rules that mute this one when they fire on the same view.
    pub fn yields_to(self) -> &'static [RuleId] {
        match self {
            RuleId::EmaBearish | RuleId::MacdBearishCross => &[RuleId::BollingerBelowLower],
            RuleId::EmaBullish | RuleId::MacdBullishCross => &[RuleId::BollingerAboveUpper],
            _ => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::RsiExtremeOversold => "rsi_extreme_oversold",
            RuleId::RsiOversold => "rsi_oversold",
            RuleId::RsiOverbought => "rsi_overbought",
            RuleId::RsiBullishStructure => "rsi_bullish_structure",
            RuleId::BollingerBelowLower => "bollinger_below_lower",
            RuleId::BollingerAboveUpper => "bollinger_above_upper",
            RuleId::MacdBullishCross => "macd_bullish_cross",
            RuleId::MacdBearishCross => "macd_bearish_cross",
            RuleId::EmaBullish => "ema_bullish",
            RuleId::EmaBearish => "ema_bearish",
            RuleId::VolumeSurgeUp => "volume_surge_up",
            RuleId::VolumeDistribution => "volume_distribution",
        }
    }

    fn condition(self) -> Condition {
        match self {
            RuleId::RsiExtremeOversold => rsi_extreme_oversold,
            RuleId::RsiOversold => rsi_oversold,
            RuleId::RsiOverbought => rsi_overbought,
            RuleId::RsiBullishStructure => rsi_bullish_structure,
            RuleId::BollingerBelowLower => below_lower_band,
            RuleId::BollingerAboveUpper => above_upper_band,
            RuleId::MacdBullishCross => macd_turned_positive,
            RuleId::MacdBearishCross => macd_turned_negative,
            RuleId::EmaBullish => fast_above_slow,
            RuleId::EmaBearish => fast_below_slow,
            RuleId::VolumeSurgeUp => volume_surge_up,
            RuleId::VolumeDistribution => volume_distribution,
        }
    }

    fn reason_template(self) -> (&'static str, ValueFormat) {
        match self {
            RuleId::RsiExtremeOversold => (
                "RSI extreme oversold ({value}) on {timeframe}",
                ValueFormat::OneDecimal,
            ),
            RuleId::RsiOversold => (
                "RSI oversold ({value}) on {timeframe}",
                ValueFormat::OneDecimal,
            ),
            RuleId::RsiOverbought => (
                "RSI overbought ({value}) on {timeframe}",
                ValueFormat::OneDecimal,
            ),
            RuleId::RsiBullishStructure => (
                "RSI bullish structure ({value}) on {timeframe}",
                ValueFormat::OneDecimal,
            ),
            RuleId::BollingerBelowLower => (
                "Price below lower Bollinger band ({value}) on {timeframe}",
                ValueFormat::Price,
            ),
            RuleId::BollingerAboveUpper => (
                "Price above upper Bollinger band ({value}) on {timeframe}",
                ValueFormat::Price,
            ),
            RuleId::MacdBullishCross => (
                "MACD histogram turned positive ({value}) on {timeframe}",
                ValueFormat::Price,
            ),
            RuleId::MacdBearishCross => (
                "MACD histogram turned negative ({value}) on {timeframe}",
                ValueFormat::Price,
            ),
            RuleId::EmaBullish => (
                "Fast EMA above slow EMA ({value}) on {timeframe}",
                ValueFormat::Percent,
            ),
            RuleId::EmaBearish => (
                "Fast EMA below slow EMA ({value}) on {timeframe}",
                ValueFormat::Percent,
            ),
            RuleId::VolumeSurgeUp => (
                "Volume surge with price up ({value}) on {timeframe}",
                ValueFormat::Percent,
            ),
            RuleId::VolumeDistribution => (
                "Volume surge with price down, distribution risk ({value}) on {timeframe}",
                ValueFormat::Percent,
            ),
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the value shown in the reason when the rule fires.
pub type Condition = fn(&IndicatorSet, &RuleThresholds) -> Option<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    OneDecimal,
    /// Two decimals above 1, six below, so sub-dollar assets stay readable.
    Price,
    /// Fraction rendered as a signed percentage.
    Percent,
}

impl ValueFormat {
    pub fn render(self, value: f64) -> String {
        match self {
            ValueFormat::OneDecimal => format!("{:.1}", value),
            ValueFormat::Price if value.abs() >= 1.0 => format!("{:.2}", value),
            ValueFormat::Price => format!("{:.6}", value),
            ValueFormat::Percent => format!("{:+.2}%", value * 100.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleDefinition {
    pub id: RuleId,
    pub weight: f64,
    pub condition: Condition,
    pub reason_template: &'static str,
    pub value_format: ValueFormat,
    /// Timeframe labels the rule fires on; `None` for all of them.
    pub timeframes: Option<Vec<String>>,
}

impl RuleDefinition {
    pub fn new(id: RuleId, weight: f64) -> Self {
        let (reason_template, value_format) = id.reason_template();
        Self {
            id,
            weight,
            condition: id.condition(),
            reason_template,
            value_format,
            timeframes: id
                .default_scope()
                .map(|labels| labels.iter().map(|l| l.to_string()).collect()),
        }
    }

    pub fn with_timeframes(mut self, timeframes: Option<Vec<String>>) -> Self {
        self.timeframes = timeframes;
        self
    }

    pub fn applies_to(&self, timeframe: &str) -> bool {
        self.timeframes
            .as_ref()
            .map_or(true, |labels| labels.iter().any(|l| l == timeframe))
    }

    /// Fire the rule against one timeframe. The reason carries the raw
    /// (unmultiplied) weight.
    pub fn evaluate(
        &self,
        set: &IndicatorSet,
        thresholds: &RuleThresholds,
        timeframe: &str,
    ) -> Option<SignalReason> {
        if self.weight == 0.0 || !self.applies_to(timeframe) {
            return None;
        }
        let value = (self.condition)(set, thresholds)?;
        Some(SignalReason {
            description: self.describe(value, timeframe),
            weight: self.weight,
            rule: Some(self.id),
        })
    }

    pub fn describe(&self, value: f64, timeframe: &str) -> String {
        self.reason_template
            .replace("{value}", &self.value_format.render(value))
            .replace("{timeframe}", timeframe)
    }
}

/// The full rule table with its trigger thresholds.
#[derive(Debug, Clone)]
pub struct RuleBook {
    rules: Vec<RuleDefinition>,
    thresholds: RuleThresholds,
}

impl RuleBook {
    pub fn new(rules: Vec<RuleDefinition>, thresholds: RuleThresholds) -> Self {
        Self { rules, thresholds }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let rules = RuleId::ALL
            .iter()
            .map(|id| {
                RuleDefinition::new(*id, config.weight_for(*id))
                    .with_timeframes(config.scope_for(*id))
            })
            .collect();
        Self::new(rules, config.thresholds.clone())
    }

    pub fn rules(&self) -> &[RuleDefinition] {
        &self.rules
    }

    /// Every rule that fires for `set`, in table order, minus the ones
    /// muted by an opposing breakout on the same view.
    pub fn evaluate(&self, set: &IndicatorSet, timeframe: &str) -> Vec<SignalReason> {
        let fired: Vec<SignalReason> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(set, &self.thresholds, timeframe))
            .collect();
        let ids: Vec<RuleId> = fired.iter().filter_map(|r| r.rule).collect();

        fired
            .into_iter()
            .filter(|reason| {
                reason
                    .rule
                    .map_or(true, |id| !id.yields_to().iter().any(|m| ids.contains(m)))
            })
            .collect()
    }
}

fn rsi_extreme_oversold(set: &IndicatorSet, t: &RuleThresholds) -> Option<f64> {
    set.rsi.filter(|rsi| *rsi < t.rsi_extreme_oversold)
}

fn rsi_oversold(set: &IndicatorSet, t: &RuleThresholds) -> Option<f64> {
    set.rsi
        .filter(|rsi| *rsi >= t.rsi_extreme_oversold && *rsi < t.rsi_oversold)
}

fn rsi_overbought(set: &IndicatorSet, t: &RuleThresholds) -> Option<f64> {
    set.rsi.filter(|rsi| *rsi > t.rsi_overbought)
}

fn rsi_bullish_structure(set: &IndicatorSet, t: &RuleThresholds) -> Option<f64> {
    set.rsi.filter(|rsi| *rsi < t.rsi_bullish_structure)
}

/// Bands collapsed to a point (flat prices) carry no breakout information.
fn has_band_width(set: &IndicatorSet) -> Option<(f64, f64)> {
    let upper = set.bollinger_upper?;
    let lower = set.bollinger_lower?;
    let mid = set.bollinger_mid?;
    (upper - lower > mid.abs() * 1e-9).then_some((lower, upper))
}

fn below_lower_band(set: &IndicatorSet, _: &RuleThresholds) -> Option<f64> {
    let (lower, _) = has_band_width(set)?;
    set.price.filter(|price| *price < lower)
}

fn above_upper_band(set: &IndicatorSet, _: &RuleThresholds) -> Option<f64> {
    let (_, upper) = has_band_width(set)?;
    set.price.filter(|price| *price > upper)
}

fn macd_turned_positive(set: &IndicatorSet, _: &RuleThresholds) -> Option<f64> {
    let current = set.macd_histogram?;
    let previous = set.macd_histogram_prev?;
    (previous < 0.0 && current > 0.0).then_some(current)
}

fn macd_turned_negative(set: &IndicatorSet, _: &RuleThresholds) -> Option<f64> {
    let current = set.macd_histogram?;
    let previous = set.macd_histogram_prev?;
    (previous > 0.0 && current < 0.0).then_some(current)
}

/// Reports the fast/slow spread as a fraction of the slow EMA.
fn fast_above_slow(set: &IndicatorSet, _: &RuleThresholds) -> Option<f64> {
    let fast = set.ema_fast?;
    let slow = set.ema_slow?;
    (fast > slow).then_some(fast / slow - 1.0)
}

fn fast_below_slow(set: &IndicatorSet, _: &RuleThresholds) -> Option<f64> {
    let fast = set.ema_fast?;
    let slow = set.ema_slow?;
    (fast < slow).then_some(fast / slow - 1.0)
}

fn volume_surge_up(set: &IndicatorSet, t: &RuleThresholds) -> Option<f64> {
    let trend = set.volume_trend?;
    (trend.ratio > t.volume_surge_ratio && trend.price_change > t.volume_price_move)
        .then_some(trend.price_change)
}

fn volume_distribution(set: &IndicatorSet, t: &RuleThresholds) -> Option<f64> {
    let trend = set.volume_trend?;
    (trend.ratio > t.volume_surge_ratio && trend.price_change < -t.volume_price_move)
        .then_some(trend.price_change)
}
