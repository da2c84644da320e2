//! Time Abstraction Layer
//!
//! The seen-set and the expiry sweeper never read the system clock directly.
//! They go through [`Clock`], so the same dedup logic runs against the wall
//! clock in production and against a manually advanced clock in tests.

pub mod production;
pub mod simulation;

pub use production::SystemClock;
pub use simulation::SimulatedClock;

use std::fmt;
use std::time::Duration;

/// Absolute point in time, nanoseconds since the Unix epoch.
///
/// Signed so that pre-epoch instants and `now - window` near the epoch stay
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub const UNIX_EPOCH: Timestamp = Timestamp(0);

    pub fn from_nanos(ns: i64) -> Self {
        Timestamp(ns)
    }

    pub fn from_millis(ms: i64) -> Self {
        Timestamp(ms.saturating_mul(1_000_000))
    }

    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1_000_000_000))
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn as_millis(&self) -> i64 {
        self.0 / 1_000_000
    }

    /// `self - d`, clamped at `i64::MIN`.
    pub fn saturating_sub(self, d: Duration) -> Timestamp {
        Timestamp(self.0.saturating_sub(duration_nanos(d)))
    }
}

fn duration_nanos(d: Duration) -> i64 {
    i64::try_from(d.as_nanos()).unwrap_or(i64::MAX)
}

impl std::ops::Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        Timestamp(self.0.saturating_add(duration_nanos(rhs)))
    }
}

impl std::ops::Sub<Duration> for Timestamp {
    type Output = Timestamp;

    fn sub(self, rhs: Duration) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Clock abstraction for time operations
pub trait Clock: Send + Sync {
    /// Get current time
    fn now(&self) -> Timestamp;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_arithmetic() {
        let t = Timestamp::from_secs(10);

        assert_eq!(t + Duration::from_millis(1500), Timestamp::from_millis(11_500));
        assert_eq!(t - Duration::from_secs(3), Timestamp::from_secs(7));
        assert_eq!(t.as_millis(), 10_000);
    }

    #[test]
    fn test_timestamp_saturates() {
        let t = Timestamp::from_nanos(i64::MIN + 5);
        assert_eq!(t - Duration::from_secs(1), Timestamp::from_nanos(i64::MIN));

        let far = Timestamp::from_nanos(i64::MAX - 1);
        assert_eq!(far + Duration::from_secs(1), Timestamp::from_nanos(i64::MAX));
    }

    #[test]
    fn test_pre_epoch_ordering() {
        let before = Timestamp::from_secs(-1);
        assert!(before < Timestamp::UNIX_EPOCH);
    }
}
