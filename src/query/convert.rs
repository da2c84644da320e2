//! Query row → metric record.
//!
//! Column handling:
//! - `time`: RFC 3339 string, naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC),
//!   or a number of whole seconds since the epoch; anything else keeps `now`
//! - `_measurement`: string becomes the record name
//! - other `_`-prefixed columns: fields, whatever their type
//! - string values: tags
//! - numbers, booleans, arrays, objects: fields
//! - nulls: dropped
//!
//! A row left without fields produces no record.

use crate::io::Timestamp;
use crate::metrics::{FieldSet, FieldValue, MetricRecord, TagSet};
use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

pub const DEFAULT_MEASUREMENT: &str = "influxdb3_query_result";
pub const TIME_COLUMN: &str = "time";
pub const MEASUREMENT_COLUMN: &str = "_measurement";

/// One result row as returned by the JSON query API.
pub type Row = Map<String, Value>;

/// Converts a row, using `now` when the row has no usable time.
pub fn row_to_metric(mut row: Row, now: Timestamp) -> Option<MetricRecord> {
    let timestamp = row
        .remove(TIME_COLUMN)
        .and_then(|v| parse_time(&v))
        .unwrap_or(now);

    let name = match row.remove(MEASUREMENT_COLUMN) {
        Some(Value::String(s)) if !s.is_empty() => s,
        _ => DEFAULT_MEASUREMENT.to_string(),
    };

    let mut tags = TagSet::new();
    let mut fields = FieldSet::new();
    for (key, value) in row {
        match value {
            Value::Null => {}
            value if key.starts_with('_') => {
                fields.insert(key, FieldValue::from(value));
            }
            Value::String(s) => {
                tags.insert(key, s);
            }
            value => {
                fields.insert(key, FieldValue::from(value));
            }
        }
    }

    MetricRecord::new(name, tags, fields, timestamp)
}

fn parse_time(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => parse_time_str(s),
        Value::Number(n) => {
            let secs = n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?;
            Some(Timestamp::from_secs(secs))
        }
        _ => None,
    }
}

fn parse_time_str(s: &str) -> Option<Timestamp> {
    let utc = DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()?;
    utc.and_utc().timestamp_nanos_opt().map(Timestamp::from_nanos)
}
