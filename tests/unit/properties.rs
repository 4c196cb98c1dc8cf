//! Property tests for indicator and scoring invariants.
//!
//! Uses proptest to verify:
//! 1. Indicators stay undefined below their minimum window
//! 2. RSI stays within [0, 100]
//! 3. Bollinger bands stay ordered
//! 4. EMA recomputation is bit-identical
//! 5. Resampling an aggregated series again changes nothing
//! 6. Composite score and confidence stay bounded for any weights

use proptest::prelude::*;

use cryptobit::config::EngineConfig;
use cryptobit::indicators::{
    calculate_bollinger_bands, calculate_ema, calculate_macd, calculate_rsi, ema_series,
};
use cryptobit::models::indicators::IndicatorSet;
use cryptobit::models::series::{PricePoint, Series};
use cryptobit::signals::rules::RuleId;
use cryptobit::signals::scoring::SignalScorer;
use cryptobit::timeframes::resample;

use crate::support::{minute, minute_series, view};

// ── Strategies ───────────────────────────────────────────────────────

fn arb_prices(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01..100_000.0_f64, 0..max_len)
}

/// One-minute series with random feed gaps.
fn arb_gappy_series() -> impl Strategy<Value = Series> {
    prop::collection::vec((1.0..1000.0_f64, prop::bool::weighted(0.9)), 0..400).prop_map(
        |rows| {
            let points = rows
                .into_iter()
                .enumerate()
                .filter(|(_, (_, present))| *present)
                .map(|(i, (price, _))| PricePoint::new(minute(i as i64), price))
                .collect();
            Series::one_minute(points).expect("generated points are ordered")
        },
    )
}

fn arb_indicator_set() -> impl Strategy<Value = IndicatorSet> {
    (
        0.0..100.0_f64,
        50.0..150.0_f64,
        50.0..150.0_f64,
        50.0..150.0_f64,
        -1.0..1.0_f64,
        -1.0..1.0_f64,
    )
        .prop_map(|(rsi, price, fast, slow, hist_prev, hist)| IndicatorSet {
            price: Some(price),
            ema_fast: Some(fast),
            ema_slow: Some(slow),
            bollinger_upper: Some(110.0),
            bollinger_mid: Some(100.0),
            bollinger_lower: Some(90.0),
            rsi: Some(rsi),
            macd_line: Some(hist),
            macd_signal: Some(0.0),
            macd_histogram: Some(hist),
            macd_histogram_prev: Some(hist_prev),
            volume_trend: None,
        })
}

// ── 1. Minimum windows ───────────────────────────────────────────────

proptest! {
    #[test]
    fn indicators_undefined_below_window(prices in arb_prices(60), period in 2u32..30) {
        let series = minute_series(&prices);
        let n = prices.len();
        let p = period as usize;

        prop_assert_eq!(calculate_ema(&series, period).is_some(), n >= p);
        prop_assert_eq!(calculate_bollinger_bands(&series, period, 2.0).is_some(), n >= p);
        prop_assert_eq!(calculate_rsi(&series, period).is_some(), n > p);
        prop_assert_eq!(calculate_macd(&series, 12, 26, 9).is_some(), n >= 34);
    }
}

// ── 2. RSI bounds ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_within_bounds(prices in arb_prices(200), period in 2u32..30) {
        if let Some(rsi) = calculate_rsi(&minute_series(&prices), period) {
            prop_assert!((0.0..=100.0).contains(&rsi.value));
        }
    }
}

// ── 3. Bollinger ordering ────────────────────────────────────────────

proptest! {
    #[test]
    fn bollinger_bands_ordered(prices in arb_prices(120), period in 2u32..40, k in 0.5..4.0_f64) {
        if let Some(bands) = calculate_bollinger_bands(&minute_series(&prices), period, k) {
            prop_assert!(bands.lower <= bands.middle);
            prop_assert!(bands.middle <= bands.upper);
        }
    }
}

// ── 4. EMA determinism ───────────────────────────────────────────────

proptest! {
    #[test]
    fn ema_recomputation_is_bit_identical(prices in arb_prices(200), period in 1u32..50) {
        let first: Vec<Option<u64>> = ema_series(&prices, period)
            .into_iter()
            .map(|v| v.map(f64::to_bits))
            .collect();
        let second: Vec<Option<u64>> = ema_series(&prices, period)
            .into_iter()
            .map(|v| v.map(f64::to_bits))
            .collect();
        prop_assert_eq!(first, second);
    }
}

// ── 5. Resampling idempotence ────────────────────────────────────────

proptest! {
    #[test]
    fn resample_idempotent(series in arb_gappy_series(), bucket in prop::sample::select(vec![1u32, 5, 15, 60])) {
        let once = resample(&series, bucket).unwrap();
        let twice = resample(&once, bucket).unwrap();
        prop_assert_eq!(once, twice);
    }
}

// ── 6. Bounded composite ─────────────────────────────────────────────

proptest! {
    #[test]
    fn composite_score_bounded(
        sets in prop::collection::vec(arb_indicator_set(), 4),
        weights in prop::collection::vec(-1e12..1e12_f64, RuleId::ALL.len()),
    ) {
        let mut config = EngineConfig::default();
        config.sentiment.weight = 0.0;
        for (id, weight) in RuleId::ALL.iter().zip(weights) {
            config.rule_weights.insert(*id, weight);
        }
        let scorer = SignalScorer::new(config).unwrap();

        let views: Vec<_> = ["1m", "5m", "15m", "1h"]
            .iter()
            .zip([1u32, 5, 15, 60])
            .zip(sets)
            .map(|((label, minutes), set)| view(label, minutes, set))
            .collect();

        let result = scorer.score(&views, None);
        prop_assert!(result.composite_score.abs() <= 100.0);
        prop_assert!((0.0..=100.0).contains(&result.confidence));
    }
}
