use super::seen_set::SeenSet;
use super::sweeper::ExpirySweeper;
use crate::metrics::{MetricKeyEncoder, MetricRecord};
use crate::observability::{noop_metrics, SharedMetrics};
use crate::output::MetricSink;
use std::sync::Arc;
use tracing::debug;

/// Outcome of one pass of [`DedupGate::run_cycle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Records handed to the gate
    pub processed: usize,
    /// Records forwarded to the sink
    pub forwarded: usize,
    /// Entries removed by the sweeper at cycle start
    pub expired: usize,
    /// Entries removed by capacity eviction during the cycle
    pub evicted: usize,
}

impl CycleStats {
    pub fn suppressed(&self) -> usize {
        self.processed - self.forwarded
    }
}

struct Tracking {
    seen: Arc<SeenSet>,
    sweeper: ExpirySweeper,
}

/// Per-record forward/suppress decision.
///
/// A tracking gate consults its [`SeenSet`]; a passthrough gate forwards
/// everything and has no store at all.
///
/// [`should_forward`](Self::should_forward) followed by
/// [`mark_seen`](Self::mark_seen) is a check-then-act pair: two threads
/// handling the same key can both see it as new. Records within one cycle
/// are handled sequentially, and [`run_cycle`](Self::run_cycle) goes through
/// the atomic [`admit`](Self::admit) instead.
pub struct DedupGate {
    tracking: Option<Tracking>,
    encoder: MetricKeyEncoder,
    metrics: SharedMetrics,
}

impl DedupGate {
    pub fn new(seen: Arc<SeenSet>, sweeper: ExpirySweeper) -> Self {
        DedupGate {
            tracking: Some(Tracking { seen, sweeper }),
            encoder: MetricKeyEncoder::new(),
            metrics: noop_metrics(),
        }
    }

    /// Gate with tracking disabled: every record is forwarded.
    pub fn passthrough() -> Self {
        DedupGate {
            tracking: None,
            encoder: MetricKeyEncoder::new(),
            metrics: noop_metrics(),
        }
    }

    pub fn with_metrics(mut self, metrics: SharedMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.is_some()
    }

    pub fn seen_set(&self) -> Option<&Arc<SeenSet>> {
        self.tracking.as_ref().map(|t| &t.seen)
    }

    pub fn key(&self, record: &MetricRecord) -> String {
        self.encoder.encode(record)
    }

    /// `true` if the record has not been seen within the retention window.
    pub fn should_forward(&self, record: &MetricRecord) -> bool {
        match &self.tracking {
            Some(t) => !t.seen.contains(&self.key(record)),
            None => true,
        }
    }

    /// Records the record's identity as seen now.
    pub fn mark_seen(&self, record: &MetricRecord) {
        if let Some(t) = &self.tracking {
            t.seen.insert(self.key(record));
        }
    }

    /// Atomic check-and-mark; `true` means forward.
    pub fn admit(&self, record: &MetricRecord) -> bool {
        match &self.tracking {
            Some(t) => t.seen.admit_if_new(&self.key(record)),
            None => true,
        }
    }

    /// Sweeps expired identities; no-op for a passthrough gate.
    pub fn begin_cycle(&self) -> usize {
        match &self.tracking {
            Some(t) => {
                let expired = t.sweeper.sweep(&t.seen);
                self.metrics.record_expired(expired);
                expired
            }
            None => 0,
        }
    }

    /// Sweeps once, then forwards every record not seen before.
    pub fn run_cycle<S>(&self, records: Vec<MetricRecord>, sink: &mut S) -> CycleStats
    where
        S: MetricSink + ?Sized,
    {
        let expired = self.begin_cycle();
        let evicted_before = self.evicted_total();

        let processed = records.len();
        let mut forwarded = 0;
        for record in records {
            if self.admit(&record) {
                sink.push(record);
                forwarded += 1;
            }
        }

        let evicted = (self.evicted_total() - evicted_before) as usize;
        self.metrics.record_eviction(evicted);
        self.metrics.record_cycle(processed, forwarded);

        if let Some(t) = &self.tracking {
            self.metrics.set_tracked(t.seen.len());
            debug!(
                processed,
                forwarded,
                "Processed {} metrics, propagated {} new metrics",
                processed,
                forwarded
            );
        }

        CycleStats {
            processed,
            forwarded,
            expired,
            evicted,
        }
    }

    fn evicted_total(&self) -> u64 {
        self.tracking
            .as_ref()
            .map_or(0, |t| t.seen.evicted_total())
    }
}
