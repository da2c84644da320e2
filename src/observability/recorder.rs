//! Metrics Recorder Trait
//!
//! Defines a trait abstraction for metrics recording that supports:
//! - Production: DogStatsD client (`datadog` feature) or no-op
//! - Tests: In-memory recording for verification
//!
//! The dedup gate and the input only ever talk to [`MetricsRecorder`].

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Trait for recording metrics about the poller itself
pub trait MetricsRecorder: Send + Sync + 'static {
    /// Increment a counter by 1
    fn incr(&self, name: &str, tags: &[&str]);

    /// Record a histogram/distribution value
    fn histogram(&self, name: &str, value: f64, tags: &[&str]);

    /// Set a gauge value
    fn gauge(&self, name: &str, value: f64, tags: &[&str]);

    /// Record a timing in milliseconds
    fn timing(&self, name: &str, duration_ms: f64, tags: &[&str]);

    // Convenience methods with default implementations

    /// Record one collection cycle: rows converted vs metrics forwarded
    fn record_cycle(&self, processed: usize, forwarded: usize) {
        self.incr("cycle.count", &[]);
        self.histogram("cycle.processed", processed as f64, &[]);
        self.histogram("cycle.forwarded", forwarded as f64, &[]);
        self.histogram(
            "cycle.suppressed",
            processed.saturating_sub(forwarded) as f64,
            &[],
        );
    }

    /// Record entries removed by the expiry sweeper
    fn record_expired(&self, count: usize) {
        if count > 0 {
            self.incr("tracking.expirations", &[]);
            self.histogram("tracking.expirations.batch_size", count as f64, &[]);
        }
    }

    /// Record entries removed by the capacity evictor
    fn record_eviction(&self, count: usize) {
        if count > 0 {
            self.incr("tracking.evictions", &[]);
            self.histogram("tracking.evictions.batch_size", count as f64, &[]);
        }
    }

    /// Update the tracked-entries gauge
    fn set_tracked(&self, count: usize) {
        self.gauge("tracking.entries", count as f64, &[]);
    }

    /// Record a query round trip with timing and status
    fn record_query(&self, duration_ms: f64, success: bool) {
        let status_tag = if success { "status:success" } else { "status:error" };
        self.timing("query.duration", duration_ms, &[status_tag]);
        self.incr("query.count", &[status_tag]);
    }
}

/// No-op metrics recorder - zero overhead when metrics are disabled
#[derive(Clone, Default)]
pub struct NoopMetrics;

impl MetricsRecorder for NoopMetrics {
    #[inline]
    fn incr(&self, _name: &str, _tags: &[&str]) {}
    #[inline]
    fn histogram(&self, _name: &str, _value: f64, _tags: &[&str]) {}
    #[inline]
    fn gauge(&self, _name: &str, _value: f64, _tags: &[&str]) {}
    #[inline]
    fn timing(&self, _name: &str, _duration_ms: f64, _tags: &[&str]) {}
}

/// Recorded metric for test verification
#[derive(Debug, Clone)]
pub struct RecordedMetric {
    pub name: String,
    pub value: f64,
    pub tags: Vec<String>,
    pub metric_type: MetricType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
    Gauge,
    Timing,
}

/// In-memory recorder - keeps every metric for later assertions
#[derive(Default)]
pub struct SimulatedMetrics {
    recorded: Mutex<Vec<RecordedMetric>>,
    cycle_count: AtomicU64,
    forwarded_count: AtomicU64,
    expired_count: AtomicU64,
    eviction_count: AtomicU64,
    query_failures: AtomicU64,
}

impl SimulatedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded metrics
    pub fn get_recorded(&self) -> Vec<RecordedMetric> {
        self.recorded.lock().clone()
    }

    /// Get metrics by name
    pub fn get_by_name(&self, name: &str) -> Vec<RecordedMetric> {
        self.recorded
            .lock()
            .iter()
            .filter(|m| m.name == name)
            .cloned()
            .collect()
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count.load(Ordering::SeqCst)
    }

    pub fn forwarded_count(&self) -> u64 {
        self.forwarded_count.load(Ordering::SeqCst)
    }

    pub fn expired_count(&self) -> u64 {
        self.expired_count.load(Ordering::SeqCst)
    }

    pub fn eviction_count(&self) -> u64 {
        self.eviction_count.load(Ordering::SeqCst)
    }

    pub fn query_failures(&self) -> u64 {
        self.query_failures.load(Ordering::SeqCst)
    }

    /// Clear all recorded metrics
    pub fn clear(&self) {
        self.recorded.lock().clear();
        self.cycle_count.store(0, Ordering::SeqCst);
        self.forwarded_count.store(0, Ordering::SeqCst);
        self.expired_count.store(0, Ordering::SeqCst);
        self.eviction_count.store(0, Ordering::SeqCst);
        self.query_failures.store(0, Ordering::SeqCst);
    }

    /// Check a metric was recorded with the given type
    pub fn assert_metric(&self, name: &str, metric_type: MetricType) -> bool {
        self.recorded
            .lock()
            .iter()
            .any(|m| m.name == name && m.metric_type == metric_type)
    }

    fn push(&self, name: &str, value: f64, tags: &[&str], metric_type: MetricType) {
        self.recorded.lock().push(RecordedMetric {
            name: name.to_string(),
            value,
            tags: tags.iter().map(|s| s.to_string()).collect(),
            metric_type,
        });
    }
}

impl MetricsRecorder for SimulatedMetrics {
    fn incr(&self, name: &str, tags: &[&str]) {
        self.push(name, 1.0, tags, MetricType::Counter);
    }

    fn histogram(&self, name: &str, value: f64, tags: &[&str]) {
        self.push(name, value, tags, MetricType::Histogram);
    }

    fn gauge(&self, name: &str, value: f64, tags: &[&str]) {
        self.push(name, value, tags, MetricType::Gauge);
    }

    fn timing(&self, name: &str, duration_ms: f64, tags: &[&str]) {
        self.push(name, duration_ms, tags, MetricType::Timing);
    }

    fn record_cycle(&self, processed: usize, forwarded: usize) {
        self.cycle_count.fetch_add(1, Ordering::SeqCst);
        self.forwarded_count
            .fetch_add(forwarded as u64, Ordering::SeqCst);
        self.incr("cycle.count", &[]);
        self.histogram("cycle.processed", processed as f64, &[]);
        self.histogram("cycle.forwarded", forwarded as f64, &[]);
    }

    fn record_expired(&self, count: usize) {
        if count > 0 {
            self.expired_count.fetch_add(count as u64, Ordering::SeqCst);
            self.incr("tracking.expirations", &[]);
        }
    }

    fn record_eviction(&self, count: usize) {
        if count > 0 {
            self.eviction_count.fetch_add(count as u64, Ordering::SeqCst);
            self.incr("tracking.evictions", &[]);
        }
    }

    fn record_query(&self, duration_ms: f64, success: bool) {
        if !success {
            self.query_failures.fetch_add(1, Ordering::SeqCst);
        }
        let status_tag = if success { "status:success" } else { "status:error" };
        self.timing("query.duration", duration_ms, &[status_tag]);
    }
}

/// Arc wrapper for trait object usage
pub type SharedMetrics = Arc<dyn MetricsRecorder>;

/// Create a no-op metrics recorder
pub fn noop_metrics() -> SharedMetrics {
    Arc::new(NoopMetrics)
}

/// Create an in-memory metrics recorder for tests
pub fn simulated_metrics() -> Arc<SimulatedMetrics> {
    Arc::new(SimulatedMetrics::new())
}
