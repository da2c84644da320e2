//! Datadog Configuration
//!
//! Read from the standard `DD_*` environment variables.

use std::net::SocketAddr;

const DEFAULT_STATSD_ADDR: &str = "127.0.0.1:8125";

#[derive(Debug, Clone)]
pub struct DatadogConfig {
    pub service_name: String,
    pub env: String,
    pub version: String,
    pub statsd_addr: SocketAddr,
    pub trace_addr: String,
    pub trace_sample_rate: f64,
    pub metric_prefix: String,
    pub tags: Vec<(String, String)>,
}

impl Default for DatadogConfig {
    fn default() -> Self {
        DatadogConfig {
            service_name: "influxdb3-input".to_string(),
            env: "development".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            statsd_addr: default_statsd_addr(),
            trace_addr: "http://127.0.0.1:8126".to_string(),
            trace_sample_rate: 1.0,
            metric_prefix: "influxdb3_input".to_string(),
            tags: Vec::new(),
        }
    }
}

fn default_statsd_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8125))
}

impl DatadogConfig {
    pub fn from_env() -> Self {
        let defaults = DatadogConfig::default();
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let statsd_addr = var("DD_DOGSTATSD_URL")
            .unwrap_or_else(|| DEFAULT_STATSD_ADDR.to_string())
            .parse()
            .unwrap_or_else(|e| {
                tracing::warn!("Invalid DD_DOGSTATSD_URL ({}), using {}", e, DEFAULT_STATSD_ADDR);
                default_statsd_addr()
            });

        DatadogConfig {
            service_name: var("DD_SERVICE").unwrap_or(defaults.service_name),
            env: var("DD_ENV").unwrap_or(defaults.env),
            version: var("DD_VERSION").unwrap_or(defaults.version),
            statsd_addr,
            trace_addr: var("DD_TRACE_AGENT_URL").unwrap_or(defaults.trace_addr),
            trace_sample_rate: var("DD_TRACE_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.trace_sample_rate),
            metric_prefix: var("DD_METRIC_PREFIX").unwrap_or(defaults.metric_prefix),
            tags: var("DD_TAGS").map(|s| parse_tags(&s)).unwrap_or_default(),
        }
    }

    /// Global tags in DogStatsD `key:value` form
    pub fn formatted_tags(&self) -> Vec<String> {
        let mut tags = vec![
            format!("service:{}", self.service_name),
            format!("env:{}", self.env),
            format!("version:{}", self.version),
        ];
        tags.extend(self.tags.iter().map(|(k, v)| format!("{}:{}", k, v)));
        tags
    }
}

fn parse_tags(s: &str) -> Vec<(String, String)> {
    s.split(',')
        .filter_map(|pair| {
            let (k, v) = pair.trim().split_once(':')?;
            (!k.is_empty()).then(|| (k.to_string(), v.to_string()))
        })
        .collect()
}
