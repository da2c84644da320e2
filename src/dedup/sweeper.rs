use super::seen_set::SeenSet;
use crate::io::Timestamp;
use crate::observability::spans::sweep_span;
use std::time::Duration;
use tracing::debug;

/// Default retention window for tracked metric identities.
pub const DEFAULT_RETENTION_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Age-based cleanup of the seen-set.
///
/// Driven by the collection cycle rather than a timer: the input calls
/// [`ExpirySweeper::sweep`] once before making any dedup decision, so an
/// identity that has just aged out is admitted again in that same cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirySweeper {
    window: Duration,
}

impl Default for ExpirySweeper {
    fn default() -> Self {
        ExpirySweeper::new(DEFAULT_RETENTION_WINDOW)
    }
}

impl ExpirySweeper {
    pub fn new(window: Duration) -> Self {
        ExpirySweeper { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn cutoff(&self, now: Timestamp) -> Timestamp {
        now - self.window
    }

    /// Removes entries last seen before `now - window`; returns how many.
    pub fn sweep(&self, seen: &SeenSet) -> usize {
        let _span = sweep_span().entered();
        let cutoff = self.cutoff(seen.now());
        let removed = seen.remove_older_than(cutoff);
        if removed > 0 {
            debug!(removed, "Cleaned up old metric entries from tracking");
        }
        removed
    }
}
