//! The polling input: one query per cycle, deduplicated forwarding.

mod poller;

pub use poller::Poller;

use crate::config::{InputConfig, ResolvedConfig, SAMPLE_CONFIG};
use crate::dedup::{CapacityEvictor, CycleStats, DedupGate, ExpirySweeper, SeenSet};
use crate::error::{InputError, Result};
use crate::io::{Clock, SystemClock};
use crate::observability::spans::cycle_span;
use crate::observability::{noop_metrics, SharedMetrics};
use crate::output::MetricSink;
use crate::query::QueryClient;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, Instrument};

pub const DESCRIPTION: &str = "Read metrics from InfluxDB3 Core instance";

/// InfluxDB 3 input with optional new-metrics-only forwarding.
pub struct InfluxDbInput {
    config: ResolvedConfig,
    client: QueryClient,
    gate: DedupGate,
    clock: Arc<dyn Clock>,
    metrics: SharedMetrics,
}

impl InfluxDbInput {
    pub fn new(config: &InputConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Builds the input against an explicit clock; the seen-set and the
    /// fallback record timestamps both read it.
    pub fn with_clock(config: &InputConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let config = config.resolve()?;
        let client = QueryClient::new(&config)?;

        let gate = match config.tracking {
            Some(tracking) => {
                let seen = SeenSet::new(clock.clone(), CapacityEvictor::new(tracking.max_entries));
                info!(
                    max_entries = tracking.max_entries,
                    window = ?tracking.window,
                    "Tracking new metrics only"
                );
                DedupGate::new(Arc::new(seen), ExpirySweeper::new(tracking.window))
            }
            None => DedupGate::passthrough(),
        };

        info!(url = %client.query_url(), database = %config.database, "InfluxDB3 input ready");

        Ok(InfluxDbInput {
            config,
            client,
            gate,
            clock,
            metrics: noop_metrics(),
        })
    }

    pub fn with_metrics(mut self, metrics: SharedMetrics) -> Self {
        self.gate = self.gate.with_metrics(metrics.clone());
        self.metrics = metrics;
        self
    }

    pub fn description() -> &'static str {
        DESCRIPTION
    }

    pub fn sample_config() -> &'static str {
        SAMPLE_CONFIG
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn gate(&self) -> &DedupGate {
        &self.gate
    }

    /// Runs one collection cycle.
    ///
    /// A failed query returns the error before the seen-set is swept or
    /// touched; nothing is forwarded for that cycle.
    pub async fn gather<S>(&self, sink: &mut S) -> Result<CycleStats>
    where
        S: MetricSink + ?Sized,
    {
        let span = cycle_span(&self.config.database);
        async {
            let started = Instant::now();
            let result = self.client.fetch_metrics(self.clock.as_ref()).await;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

            let records = match result {
                Ok(records) => {
                    self.metrics.record_query(elapsed_ms, true);
                    records
                }
                Err(e) => {
                    self.metrics.record_query(elapsed_ms, false);
                    error!(error = %e, kind = e.kind(), "Query against InfluxDB3 failed");
                    return Err(InputError::from(e));
                }
            };

            Ok(self.gate.run_cycle(records, sink))
        }
        .instrument(span)
        .await
    }
}
