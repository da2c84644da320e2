use super::evictor::CapacityEvictor;
use crate::io::{Clock, SystemClock, Timestamp};
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Snapshot of one tracked metric identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenEntry {
    pub key: String,
    /// Clock time of the insert or refresh, not the metric's own timestamp.
    pub last_seen_at: Timestamp,
}

/// Map from metric key to last-seen time.
///
/// **Locking:**
/// - `contains`, `len`, `entries` take the shared lock
/// - `insert`, `admit_if_new`, `remove*` and eviction take the exclusive lock
/// - capacity eviction runs inside the same exclusive section as the insert
///   that triggered it, so readers never see the store above `max + 1`
///
/// The map itself is never handed out; callers get owned snapshots.
pub struct SeenSet {
    entries: RwLock<AHashMap<String, Timestamp>>,
    clock: Arc<dyn Clock>,
    evictor: CapacityEvictor,
    evicted_total: AtomicU64,
}

impl SeenSet {
    pub fn new(clock: Arc<dyn Clock>, evictor: CapacityEvictor) -> Self {
        SeenSet {
            entries: RwLock::new(AHashMap::new()),
            clock,
            evictor,
            evicted_total: AtomicU64::new(0),
        }
    }

    /// Store bounded to `max_entries` (0 = unbounded) on the wall clock.
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self::new(Arc::new(SystemClock), CapacityEvictor::new(max_entries))
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn max_entries(&self) -> usize {
        self.evictor.max_entries()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn last_seen(&self, key: &str) -> Option<Timestamp> {
        self.entries.read().get(key).copied()
    }

    /// Inserts or refreshes `key` at the current clock time.
    pub fn insert(&self, key: impl Into<String>) {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        entries.insert(key.into(), now);
        self.evict_locked(&mut entries);
    }

    /// Check-and-insert under a single exclusive section.
    ///
    /// Returns `true` if `key` was absent and is now tracked. Two callers
    /// racing on the same key cannot both get `true`.
    pub fn admit_if_new(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        if entries.contains_key(key) {
            return false;
        }
        entries.insert(key.to_string(), now);
        self.evict_locked(&mut entries);
        true
    }

    /// Removes the given keys; absent keys are ignored.
    pub fn remove<I, K>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut entries = self.entries.write();
        keys.into_iter()
            .filter(|key| entries.remove(key.as_ref()).is_some())
            .count()
    }

    /// Drops every entry last seen strictly before `cutoff`.
    pub fn remove_older_than(&self, cutoff: Timestamp) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, seen| *seen >= cutoff);
        before - entries.len()
    }

    /// Runs the capacity evictor against the current contents.
    pub fn enforce_capacity(&self) -> usize {
        let mut entries = self.entries.write();
        self.evict_locked(&mut entries)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Owned snapshot of every entry, in no particular order.
    pub fn entries(&self) -> Vec<SeenEntry> {
        self.entries
            .read()
            .iter()
            .map(|(key, seen)| SeenEntry {
                key: key.clone(),
                last_seen_at: *seen,
            })
            .collect()
    }

    /// Total entries dropped by capacity eviction since creation.
    pub fn evicted_total(&self) -> u64 {
        self.evicted_total.load(Ordering::Relaxed)
    }

    fn evict_locked(&self, entries: &mut AHashMap<String, Timestamp>) -> usize {
        let evicted = self.evictor.evict(entries);
        if evicted > 0 {
            self.evicted_total
                .fetch_add(evicted as u64, Ordering::Relaxed);
            debug!(
                evicted,
                limit = self.evictor.max_entries(),
                "Evicted oldest metrics from tracking"
            );
        }
        evicted
    }
}

impl std::fmt::Debug for SeenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeenSet")
            .field("len", &self.len())
            .field("max_entries", &self.evictor.max_entries())
            .field("evicted_total", &self.evicted_total())
            .finish()
    }
}
