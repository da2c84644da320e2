use super::{Clock, Timestamp};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Manually driven clock for deterministic tests.
///
/// Clones share the same underlying instant, so a test can hand one clone to
/// a `SeenSet` and keep another to advance time.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    now_nanos: Arc<AtomicI64>,
}

impl SimulatedClock {
    pub fn new(start: Timestamp) -> Self {
        SimulatedClock {
            now_nanos: Arc::new(AtomicI64::new(start.as_nanos())),
        }
    }

    pub fn advance(&self, d: Duration) {
        let step = i64::try_from(d.as_nanos()).unwrap_or(i64::MAX);
        self.now_nanos.fetch_add(step, Ordering::SeqCst);
    }

    pub fn set(&self, t: Timestamp) {
        self.now_nanos.store(t.as_nanos(), Ordering::SeqCst);
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.now_nanos.load(Ordering::SeqCst))
    }
}
