//! Direction and display label from the composite score.

use crate::models::signal::{SignalDirection, SignalLabel};

/// Long at or above `entry_threshold`, short at or below its negation.
pub fn decide_direction(score: f64, entry_threshold: f64) -> SignalDirection {
    if score >= entry_threshold {
        SignalDirection::Long
    } else if score <= -entry_threshold {
        SignalDirection::Short
    } else {
        SignalDirection::Neutral
    }
}

pub fn decide_label(score: f64, entry_threshold: f64, strong_threshold: f64) -> SignalLabel {
    if score >= strong_threshold {
        SignalLabel::StrongBuy
    } else if score >= entry_threshold {
        SignalLabel::Buy
    } else if score <= -strong_threshold {
        SignalLabel::StrongSell
    } else if score <= -entry_threshold {
        SignalLabel::Sell
    } else {
        SignalLabel::Neutral
    }
}
