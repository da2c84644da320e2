//! Forwarding side: metric sinks and line-protocol rendering.

pub mod line_protocol;
mod sink;

pub use line_protocol::format_line;
pub use sink::{LineProtocolWriter, MetricSink};
