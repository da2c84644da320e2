//! Polling input for InfluxDB 3 Core with new-metrics-only forwarding.
//!
//! Each cycle runs one SQL query against `/api/v3/query_sql`, converts the
//! returned rows into metrics and, when tracking is enabled, forwards only
//! those whose identity (name, tags, timestamp) has not been seen within
//! the retention window.

pub mod config;
pub mod dedup;
pub mod error;
pub mod input;
pub mod io;
pub mod metrics;
pub mod output;
pub mod query;

// Observability: feature-gated Datadog integration
#[cfg(feature = "datadog")]
pub mod observability;

#[cfg(not(feature = "datadog"))]
#[path = "observability_noop.rs"]
pub mod observability;

pub use config::{ConfigError, InputConfig, ResolvedConfig};
pub use dedup::{CycleStats, DedupGate, SeenSet};
pub use error::{InputError, Result};
pub use input::{InfluxDbInput, Poller};
pub use metrics::{FieldValue, MetricKeyEncoder, MetricRecord};
pub use output::{LineProtocolWriter, MetricSink};
pub use query::{QueryClient, QueryError};
