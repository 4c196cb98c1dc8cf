use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmaIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsIndicator {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub period: u32,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    /// Histogram one step earlier, when the signal line was already defined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_histogram: Option<f64>,
    pub period: (u32, u32, u32),
}

/// Recent volume against the preceding window, with the price move over
/// the recent window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeTrend {
    pub recent_average: f64,
    pub prior_average: f64,
    pub ratio: f64,
    pub price_change: f64,
}

/// Indicator values for one timeframe. `None` means the backing series is
/// too short for that indicator, which is distinct from a zero reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub price: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_mid: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub rsi: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub macd_histogram_prev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_trend: Option<VolumeTrend>,
}

impl IndicatorSet {
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_emas(mut self, fast: Option<EmaIndicator>, slow: Option<EmaIndicator>) -> Self {
        self.ema_fast = fast.map(|e| e.value);
        self.ema_slow = slow.map(|e| e.value);
        self
    }

    pub fn with_bollinger(mut self, bands: BollingerBandsIndicator) -> Self {
        self.bollinger_upper = Some(bands.upper);
        self.bollinger_mid = Some(bands.middle);
        self.bollinger_lower = Some(bands.lower);
        self
    }

    pub fn with_rsi(mut self, rsi: RsiIndicator) -> Self {
        self.rsi = Some(rsi.value);
        self
    }

    pub fn with_macd(mut self, macd: MacdIndicator) -> Self {
        self.macd_line = Some(macd.macd);
        self.macd_signal = Some(macd.signal);
        self.macd_histogram = Some(macd.histogram);
        self.macd_histogram_prev = macd.previous_histogram;
        self
    }

    pub fn with_volume_trend(mut self, trend: VolumeTrend) -> Self {
        self.volume_trend = Some(trend);
        self
    }

    /// True when no indicator is defined. The last price alone does not count.
    pub fn is_undefined(&self) -> bool {
        self.ema_fast.is_none()
            && self.ema_slow.is_none()
            && self.bollinger_mid.is_none()
            && self.rsi.is_none()
            && self.macd_line.is_none()
            && self.volume_trend.is_none()
    }
}
