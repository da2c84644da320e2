//! Seen-metric deduplication.
//!
//! - [`SeenSet`]: key → last-seen time behind a reader-writer lock
//! - [`ExpirySweeper`]: age-based cleanup, once per collection cycle
//! - [`CapacityEvictor`]: drops the oldest 10% when the store overflows
//! - [`DedupGate`]: forward/suppress decision per record

mod evictor;
mod gate;
mod seen_set;
mod sweeper;

pub use evictor::{CapacityEvictor, EVICTION_DIVISOR};
pub use gate::{CycleStats, DedupGate};
pub use seen_set::{SeenEntry, SeenSet};
pub use sweeper::{ExpirySweeper, DEFAULT_RETENTION_WINDOW};
