//! Metric identity keys.
//!
//! Layout: `name|timestamp_ns|k1=v1,k2=v2`
//!
//! - the timestamp is the record's own time as decimal nanoseconds
//! - tag pairs are rendered `key=value` and sorted by the full pair string
//! - an empty tag set leaves the last segment empty (`name|ts|`)
//!
//! Fields never contribute to the key. A name or tag containing `|`, `,` or
//! `=` could in principle alias another record; such collisions are accepted.

use super::types::MetricRecord;
use crate::io::Timestamp;
use std::fmt::Write;

pub const SEGMENT_DELIMITER: char = '|';
pub const TAG_DELIMITER: char = ',';
pub const PAIR_DELIMITER: char = '=';

/// Derives the dedup key of a metric record.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricKeyEncoder;

impl MetricKeyEncoder {
    pub fn new() -> Self {
        MetricKeyEncoder
    }

    pub fn encode(&self, record: &MetricRecord) -> String {
        Self::encode_parts(
            record.name(),
            record.tags().iter().map(|(k, v)| (k.as_str(), v.as_str())),
            record.timestamp(),
        )
    }

    /// Builds a key from loose parts. Tag order of the iterator is irrelevant.
    pub fn encode_parts<'a, I>(name: &str, tags: I, timestamp: Timestamp) -> String
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut pairs: Vec<String> = tags
            .into_iter()
            .map(|(k, v)| format!("{}{}{}", k, PAIR_DELIMITER, v))
            .collect();
        pairs.sort_unstable();

        let tags_len: usize = pairs.iter().map(|p| p.len() + 1).sum();
        let mut key = String::with_capacity(name.len() + 24 + tags_len);
        key.push_str(name);
        key.push(SEGMENT_DELIMITER);
        let _ = write!(key, "{}", timestamp.as_nanos());
        key.push(SEGMENT_DELIMITER);
        for (i, pair) in pairs.iter().enumerate() {
            if i > 0 {
                key.push(TAG_DELIMITER);
            }
            key.push_str(pair);
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::types::{FieldSet, FieldValue, TagSet};

    // 2024-01-01T12:00:00Z
    const NOON: i64 = 1_704_110_400;

    fn record(name: &str, tags: &[(&str, &str)], secs: i64, value: f64) -> MetricRecord {
        let tags: TagSet = tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut fields = FieldSet::new();
        fields.insert("value".to_string(), FieldValue::Float(value));
        MetricRecord::new(name, tags, fields, Timestamp::from_secs(secs)).unwrap()
    }

    #[test]
    fn test_key_layout() {
        let r = record("cpu", &[("host", "a"), ("env", "prod")], 1, 0.0);
        assert_eq!(
            MetricKeyEncoder.encode(&r),
            "cpu|1000000000|env=prod,host=a"
        );
    }

    #[test]
    fn test_key_without_tags() {
        let r = record("cpu", &[], 0, 0.0);
        assert_eq!(MetricKeyEncoder.encode(&r), "cpu|0|");
    }

    #[test]
    fn test_key_stable_across_tag_order() {
        let a = MetricKeyEncoder::encode_parts(
            "test_metric",
            [("host", "server1"), ("env", "prod")],
            Timestamp::from_secs(NOON),
        );
        let b = MetricKeyEncoder::encode_parts(
            "test_metric",
            [("env", "prod"), ("host", "server1")],
            Timestamp::from_secs(NOON),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_sensitivity() {
        let base = record("test_metric", &[("host", "server1"), ("env", "prod")], NOON, 42.0);
        let key = MetricKeyEncoder.encode(&base);

        let renamed = record("different_metric", &[("host", "server1"), ("env", "prod")], NOON, 42.0);
        let shifted = record("test_metric", &[("host", "server1"), ("env", "prod")], NOON + 1, 42.0);
        let retagged = record("test_metric", &[("host", "server2"), ("env", "prod")], NOON, 42.0);
        let extra_tag = record(
            "test_metric",
            &[("host", "server1"), ("env", "prod"), ("dc", "eu")],
            NOON,
            42.0,
        );

        assert_ne!(key, MetricKeyEncoder.encode(&renamed));
        assert_ne!(key, MetricKeyEncoder.encode(&shifted));
        assert_ne!(key, MetricKeyEncoder.encode(&retagged));
        assert_ne!(key, MetricKeyEncoder.encode(&extra_tag));
    }

    #[test]
    fn test_key_ignores_fields() {
        let a = record("m", &[("host", "a")], NOON, 1.0);
        let b = record("m", &[("host", "a")], NOON, 99.0);
        assert_eq!(MetricKeyEncoder.encode(&a), MetricKeyEncoder.encode(&b));
    }

    #[test]
    fn test_key_nanosecond_precision() {
        let a = MetricKeyEncoder::encode_parts("m", [], Timestamp::from_nanos(1));
        let b = MetricKeyEncoder::encode_parts("m", [], Timestamp::from_nanos(2));
        assert_ne!(a, b);
    }

    #[test]
    fn test_sort_is_by_full_pair() {
        // "a=z" < "a0=b" because '=' (0x3d) sorts after '0' (0x30)
        let key = MetricKeyEncoder::encode_parts("m", [("a", "z"), ("a0", "b")], Timestamp(0));
        assert_eq!(key, "m|0|a0=b,a=z");
    }
}
