//! DogStatsD recorder for poller metrics.
//!
//! Every name is sent as `{prefix}.{name}` with the global `DD_TAGS`
//! prepended to the per-call tags. If the client cannot be created the
//! recorder stays silent instead of failing the input.

use dogstatsd::{Client, Options};
use std::sync::Arc;

use super::config::DatadogConfig;
use super::recorder::MetricsRecorder;

#[derive(Clone)]
pub struct Metrics {
    client: Option<Arc<Client>>,
    prefix: String,
    global_tags: Vec<String>,
}

impl Metrics {
    pub fn new(config: &DatadogConfig) -> Self {
        let options = Options {
            to_addr: config.statsd_addr.to_string(),
            ..Default::default()
        };
        let client = match Client::new(options) {
            Ok(client) => {
                tracing::info!(addr = %config.statsd_addr, "DogStatsD client ready");
                Some(Arc::new(client))
            }
            Err(e) => {
                tracing::warn!(error = %e, "DogStatsD client unavailable, poller metrics disabled");
                None
            }
        };

        Metrics {
            client,
            prefix: config.metric_prefix.clone(),
            global_tags: config.formatted_tags(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn send<F>(&self, name: &str, tags: &[&str], emit: F)
    where
        F: FnOnce(&Client, String, Vec<String>),
    {
        if let Some(client) = &self.client {
            let full_name = format!("{}.{}", self.prefix, name);
            let all_tags = self
                .global_tags
                .iter()
                .cloned()
                .chain(tags.iter().map(|t| t.to_string()))
                .collect();
            emit(client, full_name, all_tags);
        }
    }
}

// Send errors are dropped; a missing agent must not stall a collection cycle.
impl MetricsRecorder for Metrics {
    fn incr(&self, name: &str, tags: &[&str]) {
        self.send(name, tags, |client, name, tags| {
            let _ = client.incr(name, tags);
        });
    }

    fn histogram(&self, name: &str, value: f64, tags: &[&str]) {
        self.send(name, tags, |client, name, tags| {
            let _ = client.histogram(name, value.to_string(), tags);
        });
    }

    fn gauge(&self, name: &str, value: f64, tags: &[&str]) {
        self.send(name, tags, |client, name, tags| {
            let _ = client.gauge(name, value.to_string(), tags);
        });
    }

    fn timing(&self, name: &str, duration_ms: f64, tags: &[&str]) {
        self.send(name, tags, |client, name, tags| {
            let _ = client.timing(name, duration_ms as i64, tags);
        });
    }
}
