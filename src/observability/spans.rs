//! Span Helpers for Collection Tracing
//!
//! Structured spans for the collection cycle with OpenTelemetry semantic
//! conventions.

use tracing::{span, Level, Span};

/// Create a span for one collection cycle
#[inline]
pub fn cycle_span(database: &str) -> Span {
    span!(
        Level::INFO,
        "influxdb3.gather",
        db.name = %database,
        otel.kind = "internal"
    )
}

/// Create a span for the SQL query round trip
#[inline]
pub fn query_span(url: &str, database: &str) -> Span {
    span!(
        Level::INFO,
        "influxdb3.query",
        http.url = %url,
        db.system = "influxdb",
        db.name = %database,
        otel.kind = "client"
    )
}

/// Create a span for the expiry sweep
#[inline]
pub fn sweep_span() -> Span {
    span!(Level::DEBUG, "influxdb3.sweep", otel.kind = "internal")
}
