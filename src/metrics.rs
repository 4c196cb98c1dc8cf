//! Prometheus metrics for the polling service and its HTTP surface.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub refresh_cycles_total: IntCounter,
    pub signals_evaluated_total: IntCounter,
    pub rejected_inputs_total: IntCounter,
    pub upstream_errors_total: IntCounter,
    pub engine_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let refresh_cycles_total =
            IntCounter::new("refresh_cycles_total", "Completed price refresh cycles")?;
        let signals_evaluated_total =
            IntCounter::new("signals_evaluated_total", "Engine passes that produced a signal")?;
        let rejected_inputs_total = IntCounter::new(
            "rejected_inputs_total",
            "Engine passes rejected because of malformed input",
        )?;
        let upstream_errors_total = IntCounter::new(
            "upstream_errors_total",
            "Failed price or sentiment fetches",
        )?;
        let engine_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("engine_duration_seconds", "Signal engine pass duration")
                .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]),
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(refresh_cycles_total.clone()))?;
        registry.register(Box::new(signals_evaluated_total.clone()))?;
        registry.register(Box::new(rejected_inputs_total.clone()))?;
        registry.register(Box::new(upstream_errors_total.clone()))?;
        registry.register(Box::new(engine_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            refresh_cycles_total,
            signals_evaluated_total,
            rejected_inputs_total,
            upstream_errors_total,
            engine_duration_seconds,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
