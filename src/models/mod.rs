//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod sentiment;
pub mod series;
pub mod signal;
pub mod timeframe;

pub use indicators::{
    BollingerBandsIndicator, EmaIndicator, IndicatorSet, MacdIndicator, RsiIndicator,
    VolumeTrend,
};
pub use sentiment::SentimentReading;
pub use series::{PricePoint, Series};
pub use signal::{SignalDirection, SignalLabel, SignalReason, SignalResult, TimeframeBreakdown};
pub use timeframe::TimeframeView;
