//! No-op observability stubs
//!
//! Zero-sized types that compile away when the `datadog` feature is disabled.
//! The recorder trait and its in-memory implementation are shared with the
//! Datadog build.

#[path = "observability/recorder.rs"]
pub mod recorder;

pub use recorder::{
    noop_metrics, simulated_metrics, MetricType, MetricsRecorder, NoopMetrics, RecordedMetric,
    SharedMetrics, SimulatedMetrics,
};

/// No-op metrics client - compiles to nothing
#[derive(Clone, Copy, Default)]
pub struct Metrics;

impl Metrics {
    #[inline(always)]
    pub fn new(_config: &DatadogConfig) -> Self {
        Metrics
    }
}

impl MetricsRecorder for Metrics {
    #[inline(always)]
    fn incr(&self, _name: &str, _tags: &[&str]) {}

    #[inline(always)]
    fn histogram(&self, _name: &str, _value: f64, _tags: &[&str]) {}

    #[inline(always)]
    fn gauge(&self, _name: &str, _value: f64, _tags: &[&str]) {}

    #[inline(always)]
    fn timing(&self, _name: &str, _duration_ms: f64, _tags: &[&str]) {}
}

/// No-op configuration
#[derive(Clone, Default)]
pub struct DatadogConfig;

impl DatadogConfig {
    #[inline(always)]
    pub fn from_env() -> Self {
        DatadogConfig
    }
}

/// Plain fmt subscriber on stderr, filtered by `RUST_LOG` or `default_filter`
pub fn init_tracing(
    _config: &DatadogConfig,
    default_filter: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| e.to_string().into())
}

/// No-op shutdown
#[inline(always)]
pub fn shutdown() {}

/// No-op span helpers
pub mod spans {
    use tracing::Span;

    #[inline(always)]
    pub fn cycle_span(_database: &str) -> Span {
        Span::none()
    }

    #[inline(always)]
    pub fn query_span(_url: &str, _database: &str) -> Span {
        Span::none()
    }

    #[inline(always)]
    pub fn sweep_span() -> Span {
        Span::none()
    }
}
