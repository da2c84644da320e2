use crate::io::Timestamp;
use std::collections::BTreeMap;

/// Typed scalar carried by a metric field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Anything the query layer could not map to a scalar (arrays, objects).
    Other(serde_json::Value),
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(ref n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Float(f)
                } else {
                    FieldValue::Other(v)
                }
            }
            other => FieldValue::Other(other),
        }
    }
}

/// Tag set; sorted map so iteration order never depends on insertion order.
pub type TagSet = BTreeMap<String, String>;

/// Field set, keyed by field name.
pub type FieldSet = BTreeMap<String, FieldValue>;

/// One data point ready for forwarding.
///
/// A record always has a non-empty name and at least one field; the
/// constructor refuses anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    name: String,
    tags: TagSet,
    fields: FieldSet,
    timestamp: Timestamp,
}

impl MetricRecord {
    pub fn new(
        name: impl Into<String>,
        tags: TagSet,
        fields: FieldSet,
        timestamp: Timestamp,
    ) -> Option<Self> {
        let name = name.into();
        if name.is_empty() || fields.is_empty() {
            return None;
        }
        Some(MetricRecord {
            name,
            tags,
            fields,
            timestamp,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn one_field() -> FieldSet {
        let mut fields = FieldSet::new();
        fields.insert("value".to_string(), FieldValue::Float(1.0));
        fields
    }

    #[test]
    fn test_record_requires_fields() {
        let r = MetricRecord::new("cpu", TagSet::new(), FieldSet::new(), Timestamp::UNIX_EPOCH);
        assert!(r.is_none());
    }

    #[test]
    fn test_record_requires_name() {
        let r = MetricRecord::new("", TagSet::new(), one_field(), Timestamp::UNIX_EPOCH);
        assert!(r.is_none());
    }

    #[test]
    fn test_record_accessors() {
        let mut tags = TagSet::new();
        tags.insert("host".to_string(), "a".to_string());
        let r = MetricRecord::new("cpu", tags, one_field(), Timestamp::from_secs(3)).unwrap();

        assert_eq!(r.name(), "cpu");
        assert_eq!(r.tags().get("host").map(String::as_str), Some("a"));
        assert_eq!(r.fields().get("value"), Some(&FieldValue::Float(1.0)));
        assert_eq!(r.timestamp(), Timestamp::from_secs(3));
    }

    #[test]
    fn test_field_value_from_json() {
        assert_eq!(FieldValue::from(json!(42)), FieldValue::Int(42));
        assert_eq!(FieldValue::from(json!(42.5)), FieldValue::Float(42.5));
        assert_eq!(FieldValue::from(json!(true)), FieldValue::Bool(true));
        assert_eq!(FieldValue::from(json!("x")), FieldValue::String("x".into()));
        assert_eq!(FieldValue::from(json!([1, 2])), FieldValue::Other(json!([1, 2])));
        // u64 beyond i64 range still lands as a float
        assert_eq!(
            FieldValue::from(json!(u64::MAX)),
            FieldValue::Float(u64::MAX as f64)
        );
    }
}
