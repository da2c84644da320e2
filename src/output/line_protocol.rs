//! InfluxDB line protocol rendering.
//!
//! `measurement[,tag=value...] field=value[,field=value...] timestamp_ns\n`
//!
//! Tags and fields come out sorted by key. Escaping:
//! - measurement: `,` and space
//! - tag keys, tag values, field keys: `,`, `=` and space
//! - string field values: `"` and `\`

use crate::metrics::{FieldValue, MetricRecord};
use std::fmt::Write;

/// Renders one record, newline terminated.
pub fn format_line(record: &MetricRecord) -> String {
    let mut out = String::with_capacity(64);
    write_line(&mut out, record);
    out
}

/// Appends one record to `out`, newline terminated.
pub fn write_line(out: &mut String, record: &MetricRecord) {
    escape_into(out, record.name(), &[',', ' ']);

    for (key, value) in record.tags() {
        out.push(',');
        escape_into(out, key, &[',', '=', ' ']);
        out.push('=');
        escape_into(out, value, &[',', '=', ' ']);
    }

    out.push(' ');
    for (i, (key, value)) in record.fields().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        escape_into(out, key, &[',', '=', ' ']);
        out.push('=');
        write_field_value(out, value);
    }

    let _ = writeln!(out, " {}", record.timestamp().as_nanos());
}

fn write_field_value(out: &mut String, value: &FieldValue) {
    match value {
        FieldValue::String(s) => write_quoted(out, s),
        FieldValue::Int(i) => {
            let _ = write!(out, "{}i", i);
        }
        FieldValue::Float(f) => {
            let _ = write!(out, "{}", f);
        }
        FieldValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        FieldValue::Other(raw) => write_quoted(out, &raw.to_string()),
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    escape_into(out, s, &['"', '\\']);
    out.push('"');
}

fn escape_into(out: &mut String, s: &str, special: &[char]) {
    for c in s.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Timestamp;
    use crate::metrics::{FieldSet, TagSet};
    use serde_json::json;

    fn record(name: &str, tags: &[(&str, &str)], fields: Vec<(&str, FieldValue)>) -> MetricRecord {
        let tags: TagSet = tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let fields: FieldSet = fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        MetricRecord::new(name, tags, fields, Timestamp::from_secs(1_704_110_400)).unwrap()
    }

    #[test]
    fn test_basic_line() {
        let r = record(
            "cpu",
            &[("host", "server1"), ("env", "prod")],
            vec![("value", FieldValue::Float(42.5))],
        );
        assert_eq!(
            format_line(&r),
            "cpu,env=prod,host=server1 value=42.5 1704110400000000000\n"
        );
    }

    #[test]
    fn test_field_types() {
        let r = record(
            "m",
            &[],
            vec![
                ("a", FieldValue::Int(-3)),
                ("b", FieldValue::Bool(true)),
                ("c", FieldValue::String("hi".into())),
                ("d", FieldValue::Float(1.0)),
                ("e", FieldValue::Other(json!([1, 2]))),
            ],
        );
        assert_eq!(
            format_line(&r),
            "m a=-3i,b=true,c=\"hi\",d=1,e=\"[1,2]\" 1704110400000000000\n"
        );
    }

    #[test]
    fn test_escaping() {
        let r = record(
            "my measurement,x",
            &[("tag key", "a=b,c")],
            vec![("f", FieldValue::String("say \"hi\" \\o/".into()))],
        );
        assert_eq!(
            format_line(&r),
            "my\\ measurement\\,x,tag\\ key=a\\=b\\,c f=\"say \\\"hi\\\" \\\\o/\" 1704110400000000000\n"
        );
    }
}
