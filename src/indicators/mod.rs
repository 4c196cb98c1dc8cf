//! Indicator library: pure functions from a price series to indicator
//! values. Every function returns `None` when the series is too short.

pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use momentum::{calculate_macd, calculate_rsi, Macd, MacdValue, Rsi};
pub use trend::{calculate_ema, ema_series, Ema};
pub use volatility::calculate_bollinger_bands;
pub use volume::calculate_volume_trend;

use crate::config::IndicatorParams;
use crate::models::indicators::IndicatorSet;
use crate::models::series::Series;

/// Compute every indicator the scorer consumes for one timeframe.
pub fn compute_indicator_set(series: &Series, params: &IndicatorParams) -> IndicatorSet {
    let mut set = IndicatorSet::default();
    if let Some(price) = series.last_price() {
        set = set.with_price(price);
    }

    set = set.with_emas(
        calculate_ema(series, params.ema_fast),
        calculate_ema(series, params.ema_slow),
    );

    if let Some(bands) =
        calculate_bollinger_bands(series, params.bollinger_period, params.bollinger_std_dev)
    {
        set = set.with_bollinger(bands);
    }

    if let Some(rsi) = calculate_rsi(series, params.rsi_period) {
        set = set.with_rsi(rsi);
    }

    if let Some(macd) = calculate_macd(
        series,
        params.macd_fast,
        params.macd_slow,
        params.macd_signal,
    ) {
        set = set.with_macd(macd);
    }

    if let Some(trend) = calculate_volume_trend(series, params.volume_window) {
        set = set.with_volume_trend(trend);
    }

    set
}
