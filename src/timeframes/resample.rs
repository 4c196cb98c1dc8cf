//! Close-of-bucket resampling.

use crate::error::EngineError;
use crate::models::series::{PricePoint, Series};

/// Group `series` into wall-clock aligned buckets of `bucket_minutes` and
/// keep the last point of each bucket.
///
/// A bucket is kept only when every one of its `bucket / interval` sampling
/// slots holds at least one point, so the leading and trailing partial
/// buckets (and buckets with feed gaps) are dropped. Volumes are summed when
/// every point in the bucket carries one. Every kept bucket has the same
/// number of slots, so for rolling-total volumes (the live feed's 24h
/// snapshots) the ratio between two buckets is the ratio of their average
/// snapshots. Output points keep the timestamp
/// of the bucket's closing sample, which makes re-aggregation at the same
/// bucket size return the input unchanged.
pub fn resample(series: &Series, bucket_minutes: u32) -> Result<Series, EngineError> {
    let interval = series.interval_minutes();
    if bucket_minutes == 0 || bucket_minutes % interval != 0 {
        return Err(EngineError::IncompatibleInterval {
            series_minutes: interval,
            bucket_minutes,
        });
    }

    let slot_seconds = i64::from(interval) * 60;
    let bucket_seconds = i64::from(bucket_minutes) * 60;
    let slots_per_bucket = (bucket_minutes / interval) as usize;

    let mut output = Vec::with_capacity(series.len() / slots_per_bucket + 1);
    let mut start = 0;
    let points = series.points();

    while start < points.len() {
        let bucket = points[start].timestamp.timestamp().div_euclid(bucket_seconds);
        let mut end = start + 1;
        while end < points.len()
            && points[end].timestamp.timestamp().div_euclid(bucket_seconds) == bucket
        {
            end += 1;
        }

        let group = &points[start..end];
        if distinct_slots(group, slot_seconds) == slots_per_bucket {
            output.push(close_of(group));
        }
        start = end;
    }

    Ok(Series::from_validated(output, bucket_minutes))
}

/// Points are time-ordered, so equal slots are adjacent.
fn distinct_slots(group: &[PricePoint], slot_seconds: i64) -> usize {
    let mut count = 0;
    let mut previous = None;
    for point in group {
        let slot = point.timestamp.timestamp().div_euclid(slot_seconds);
        if previous != Some(slot) {
            count += 1;
            previous = Some(slot);
        }
    }
    count
}

fn close_of(group: &[PricePoint]) -> PricePoint {
    let last = group[group.len() - 1];
    let volume: Option<f64> = group.iter().map(|p| p.volume).sum();
    PricePoint {
        timestamp: last.timestamp,
        price: last.price,
        volume,
    }
}
