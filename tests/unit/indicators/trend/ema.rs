//! Unit tests for EMA indicator

use cryptobit::indicators::trend::{calculate_ema, ema_of, ema_series, Ema};

use crate::support::{linear, minute_series};

#[test]
fn test_ema_insufficient_data() {
    let series = minute_series(&linear(10, 100.0, 0.1));
    assert!(calculate_ema(&series, 20).is_none());
}

#[test]
fn test_ema_defined_at_exactly_period_points() {
    let series = minute_series(&linear(12, 100.0, 0.1));
    let ema = calculate_ema(&series, 12).expect("defined at period");
    assert_eq!(ema.period, 12);
    assert!(ema.value.is_finite());
}

#[test]
fn test_ema_seeded_with_simple_average() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    let series = ema_series(&values, 3);
    assert_eq!(series, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
}

#[test]
fn test_streaming_matches_batch_bit_for_bit() {
    let values: Vec<f64> = (0..200)
        .map(|i| 100.0 + (i as f64 * 0.37).sin() * 5.0)
        .collect();

    let mut ema = Ema::new(26);
    let streamed: Vec<Option<f64>> = values.iter().map(|v| ema.update(*v)).collect();

    assert_eq!(streamed, ema_series(&values, 26));
    assert_eq!(
        ema_of(&values, 26).map(f64::to_bits),
        streamed.last().copied().flatten().map(f64::to_bits)
    );
}

#[test]
fn test_zero_period_never_defined() {
    assert!(ema_of(&[1.0, 2.0, 3.0], 0).is_none());
}

#[test]
fn test_ema_lags_rising_prices() {
    let values = linear(50, 100.0, 1.0);
    let fast = ema_of(&values, 12).unwrap();
    let slow = ema_of(&values, 26).unwrap();
    assert!(fast > slow);
    assert!(fast < *values.last().unwrap());
}
