//! Dedup Scenario Tests
//!
//! Drives the public dedup API end to end on a simulated clock:
//! 1. Key identity: tag order ignored, timestamp and tags significant
//! 2. Expiry boundary around the retention window
//! 3. Capacity bound with oldest-first eviction
//! 4. Concurrent admission of the same identity

use influxdb3_input::dedup::{CapacityEvictor, DedupGate, ExpirySweeper, SeenSet};
use influxdb3_input::io::{SimulatedClock, Timestamp};
use influxdb3_input::metrics::{FieldSet, FieldValue, MetricKeyEncoder, MetricRecord, TagSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// 2024-01-01T12:00:00Z
const NOON: i64 = 1_704_110_400;

fn metric(name: &str, tags: &[(&str, &str)], secs: i64) -> MetricRecord {
    let tags: TagSet = tags
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let mut fields = FieldSet::new();
    fields.insert("value".to_string(), FieldValue::Float(42.0));
    MetricRecord::new(name, tags, fields, Timestamp::from_secs(secs)).unwrap()
}

fn store(clock: &SimulatedClock, max: usize) -> Arc<SeenSet> {
    Arc::new(SeenSet::new(Arc::new(clock.clone()), CapacityEvictor::new(max)))
}

// ============================================================================
// Key identity
// ============================================================================

#[test]
fn test_key_layout() {
    let m = metric("test_metric", &[("host", "server1"), ("env", "prod")], NOON);
    assert_eq!(
        MetricKeyEncoder::new().encode(&m),
        "test_metric|1704110400000000000|env=prod,host=server1"
    );
}

#[test]
fn test_end_to_end_scenario() {
    let clock = SimulatedClock::new(Timestamp::from_secs(NOON));
    let gate = DedupGate::new(store(&clock, 10_000), ExpirySweeper::new(Duration::from_secs(3600)));

    let first = metric("test_metric", &[("host", "server1"), ("env", "prod")], NOON);
    let reordered = metric("test_metric", &[("env", "prod"), ("host", "server1")], NOON);
    let later = metric("test_metric", &[("host", "server1"), ("env", "prod")], NOON + 1);

    let mut forwarded: Vec<MetricRecord> = Vec::new();
    let stats = gate.run_cycle(vec![first.clone(), reordered, later.clone()], &mut forwarded);

    assert_eq!(stats.processed, 3);
    assert_eq!(stats.forwarded, 2);
    assert_eq!(forwarded, vec![first, later]);
}

// ============================================================================
// Expiry
// ============================================================================

#[test]
fn test_expiry_boundary() {
    let window = Duration::from_secs(3600);
    let epsilon = Duration::from_millis(1);

    for (advance, expect_present) in [(window - epsilon, true), (window + epsilon, false)] {
        let clock = SimulatedClock::new(Timestamp::from_secs(NOON));
        let seen = store(&clock, 10_000);
        let sweeper = ExpirySweeper::new(window);

        seen.insert("k");
        clock.advance(advance);
        sweeper.sweep(&seen);

        assert_eq!(seen.contains("k"), expect_present, "after {:?}", advance);
    }
}

#[test]
fn test_refresh_extends_lifetime() {
    let clock = SimulatedClock::new(Timestamp::from_secs(NOON));
    let seen = store(&clock, 10_000);
    let sweeper = ExpirySweeper::new(Duration::from_secs(60));

    seen.insert("k");
    clock.advance(Duration::from_secs(50));
    seen.insert("k");
    clock.advance(Duration::from_secs(50));

    assert_eq!(sweeper.sweep(&seen), 0);
    assert!(seen.contains("k"));
}

// ============================================================================
// Capacity
// ============================================================================

#[test]
fn test_capacity_drops_oldest_tenth() {
    let clock = SimulatedClock::new(Timestamp::from_secs(NOON));
    let seen = store(&clock, 100);

    for i in 0..101 {
        clock.advance(Duration::from_millis(1));
        seen.insert(format!("k{:03}", i));
    }

    // 101 entries over a limit of 100: max(1, 101 / 10) = 10 dropped
    assert_eq!(seen.len(), 91);
    assert_eq!(seen.evicted_total(), 10);
    for i in 0..10 {
        assert!(!seen.contains(&format!("k{:03}", i)));
    }
    assert!(seen.contains("k010"));
    assert!(seen.contains("k100"));
}

#[test]
fn test_store_never_exceeds_limit_after_insert() {
    let clock = SimulatedClock::new(Timestamp::from_secs(NOON));
    let seen = store(&clock, 25);

    for i in 0..500 {
        clock.advance(Duration::from_millis(1));
        seen.insert(format!("k{}", i));
        assert!(seen.len() <= 25);
    }
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_admit_single_winner() {
    let clock = SimulatedClock::new(Timestamp::from_secs(NOON));
    let gate = Arc::new(DedupGate::new(
        store(&clock, 10_000),
        ExpirySweeper::new(Duration::from_secs(3600)),
    ));
    let record = metric("cpu", &[("host", "a")], NOON);
    let winners = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let gate = Arc::clone(&gate);
            let record = record.clone();
            let winners = Arc::clone(&winners);
            thread::spawn(move || {
                if gate.admit(&record) {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(winners.load(Ordering::SeqCst), 1);
    assert_eq!(gate.seen_set().unwrap().len(), 1);
}
