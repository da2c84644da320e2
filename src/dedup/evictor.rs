use crate::io::Timestamp;
use ahash::AHashMap;

/// Fraction of the store dropped per eviction pass, as a divisor.
pub const EVICTION_DIVISOR: usize = 10;

/// Size-triggered eviction of the oldest tracked entries.
///
/// Runs only when an insert leaves the store above `max_entries` and then
/// drops a whole batch (`max(1, size / 10)` entries), so the store may hold
/// `max_entries + 1` entries between the insert and the eviction.
/// `max_entries == 0` disables eviction entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityEvictor {
    max_entries: usize,
}

impl CapacityEvictor {
    pub fn new(max_entries: usize) -> Self {
        CapacityEvictor { max_entries }
    }

    pub fn unbounded() -> Self {
        CapacityEvictor { max_entries: 0 }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn is_enabled(&self) -> bool {
        self.max_entries > 0
    }

    pub fn is_over_limit(&self, size: usize) -> bool {
        self.is_enabled() && size > self.max_entries
    }

    /// Number of entries to drop for a store currently holding `size`.
    pub fn eviction_count(&self, size: usize) -> usize {
        if !self.is_over_limit(size) {
            return 0;
        }
        (size / EVICTION_DIVISOR).max(1)
    }

    /// Drops the oldest entries by last-seen time. Caller holds the write lock.
    pub(super) fn evict(&self, entries: &mut AHashMap<String, Timestamp>) -> usize {
        let count = self.eviction_count(entries.len());
        if count == 0 {
            return 0;
        }

        let victims: Vec<String> = {
            let mut by_age: Vec<(Timestamp, &String)> =
                entries.iter().map(|(key, seen)| (*seen, key)).collect();
            if count < by_age.len() {
                by_age.select_nth_unstable_by_key(count - 1, |(seen, _)| *seen);
            }
            by_age
                .into_iter()
                .take(count)
                .map(|(_, key)| key.clone())
                .collect()
        };

        for key in &victims {
            entries.remove(key);
        }
        victims.len()
    }
}
