//! Price samples and validated series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A single price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self {
            timestamp,
            price,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// Time-ordered price samples for one asset at a fixed sampling interval.
///
/// Construction validates the sequence, so every `Series` in the engine has
/// strictly increasing timestamps and positive finite prices. An empty
/// series is valid; it simply yields no indicator values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    interval_minutes: u32,
    points: Vec<PricePoint>,
}

impl Series {
    pub const NATIVE_INTERVAL_MINUTES: u32 = 1;

    pub fn new(points: Vec<PricePoint>, interval_minutes: u32) -> Result<Self, EngineError> {
        if interval_minutes == 0 {
            return Err(EngineError::InvalidInterval(interval_minutes));
        }
        validate_points(&points)?;
        Ok(Self {
            interval_minutes,
            points,
        })
    }

    /// Series at the native one-minute resolution delivered by the price feed.
    pub fn one_minute(points: Vec<PricePoint>) -> Result<Self, EngineError> {
        Self::new(points, Self::NATIVE_INTERVAL_MINUTES)
    }

    /// Skips validation; callers must derive `points` from an already
    /// validated series without reordering them.
    pub(crate) fn from_validated(points: Vec<PricePoint>, interval_minutes: u32) -> Self {
        Self {
            interval_minutes,
            points,
        }
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Volumes, present only when every point carries one.
    pub fn volumes(&self) -> Option<Vec<f64>> {
        self.points.iter().map(|p| p.volume).collect()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }
}

fn validate_points(points: &[PricePoint]) -> Result<(), EngineError> {
    for (index, point) in points.iter().enumerate() {
        if !point.price.is_finite() || point.price <= 0.0 {
            return Err(EngineError::InvalidPrice {
                index,
                price: point.price,
            });
        }
        if let Some(volume) = point.volume {
            if !volume.is_finite() || volume < 0.0 {
                return Err(EngineError::InvalidVolume { index, volume });
            }
        }
        if index > 0 && point.timestamp <= points[index - 1].timestamp {
            return Err(EngineError::NonMonotonicTimestamp { index });
        }
    }
    Ok(())
}
