//! Datadog Observability Module
//!
//! Observability for the poller when built with the `datadog` feature:
//! - Metrics via DogStatsD (UDP)
//! - Distributed tracing via Datadog APM
//! - Structured logging with trace correlation
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DD_SERVICE` | `influxdb3-input` | Service name |
//! | `DD_ENV` | `development` | Environment tag |
//! | `DD_VERSION` | pkg version | Service version |
//! | `DD_DOGSTATSD_URL` | `127.0.0.1:8125` | DogStatsD address |
//! | `DD_TRACE_AGENT_URL` | `http://127.0.0.1:8126` | APM agent URL |
//! | `DD_TRACE_SAMPLE_RATE` | `1.0` | Trace sampling rate |
//! | `DD_METRIC_PREFIX` | `influxdb3_input` | Metric name prefix |
//! | `DD_TAGS` | `` | Global tags (k1:v1,k2:v2) |

pub mod config;
pub mod metrics;
pub mod recorder;
pub mod spans;
pub mod tracing_setup;

pub use config::DatadogConfig;
pub use metrics::Metrics;
pub use tracing_setup::{init as init_tracing, shutdown};

pub use recorder::{
    noop_metrics, simulated_metrics, MetricType, MetricsRecorder, NoopMetrics, RecordedMetric,
    SharedMetrics, SimulatedMetrics,
};
