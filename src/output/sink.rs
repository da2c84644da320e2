use super::line_protocol::write_line;
use crate::metrics::MetricRecord;
use std::io::{self, Write};

/// Destination for forwarded metrics.
pub trait MetricSink {
    fn push(&mut self, record: MetricRecord);

    /// Called once per collection cycle after the last push.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl MetricSink for Vec<MetricRecord> {
    fn push(&mut self, record: MetricRecord) {
        Vec::push(self, record)
    }
}

/// Sink that renders every forwarded record as one line-protocol line.
///
/// Pushes cannot fail; the first write error is held and returned by the
/// next [`flush`](MetricSink::flush), and later pushes are dropped until then.
#[derive(Debug)]
pub struct LineProtocolWriter<W: Write> {
    out: W,
    line: String,
    written: usize,
    error: Option<io::Error>,
}

impl<W: Write> LineProtocolWriter<W> {
    pub fn new(out: W) -> Self {
        LineProtocolWriter {
            out,
            line: String::with_capacity(128),
            written: 0,
            error: None,
        }
    }

    /// Lines written since creation.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MetricSink for LineProtocolWriter<W> {
    fn push(&mut self, record: MetricRecord) {
        if self.error.is_some() {
            return;
        }
        self.line.clear();
        write_line(&mut self.line, &record);
        match self.out.write_all(self.line.as_bytes()) {
            Ok(()) => self.written += 1,
            Err(e) => self.error = Some(e),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()
    }
}
