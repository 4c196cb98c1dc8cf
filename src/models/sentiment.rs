//! Fear & Greed index reading supplied by the sentiment adapter.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub value: u8,
    pub classification: String,
}

impl SentimentReading {
    /// Values above 100 are clamped.
    pub fn new(value: u8, classification: impl Into<String>) -> Self {
        Self {
            value: value.min(100),
            classification: classification.into(),
        }
    }

    /// Reading with the standard label for `value`.
    pub fn from_value(value: u8) -> Self {
        let value = value.min(100);
        Self::new(value, Self::classify(value))
    }

    pub fn classify(value: u8) -> &'static str {
        match value {
            0..=24 => "Extreme Fear",
            25..=46 => "Fear",
            47..=54 => "Neutral",
            55..=75 => "Greed",
            _ => "Extreme Greed",
        }
    }
}
