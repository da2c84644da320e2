//! Duration parsing for configuration values.
//!
//! Durations use humantime syntax: `5s`, `500ms`, `1h`, `1h 30m`.

use std::time::Duration;
use tracing::warn;

/// Parse a duration string.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| format!("invalid duration '{}': {}", s, e))
}

/// Parses `value`, falling back to `default` when it is empty or invalid.
///
/// An invalid value is logged; an empty one is silently defaulted.
pub fn parse_or_default(setting: &str, value: &str, default: Duration) -> Duration {
    if value.trim().is_empty() {
        return default;
    }
    match parse_duration(value) {
        Ok(d) => d,
        Err(e) => {
            warn!(
                setting,
                default = %humantime::format_duration(default),
                "{}, using default",
                e
            );
            default
        }
    }
}
