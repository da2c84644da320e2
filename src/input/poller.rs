use super::InfluxDbInput;
use crate::output::MetricSink;
use std::future::Future;
use std::io;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Drives [`InfluxDbInput::gather`] on a fixed interval.
pub struct Poller {
    input: InfluxDbInput,
    period: Duration,
}

impl Poller {
    pub fn new(input: InfluxDbInput, period: Duration) -> Self {
        Poller { input, period }
    }

    pub fn input(&self) -> &InfluxDbInput {
        &self.input
    }

    /// Gathers on every tick until `shutdown` resolves. The first tick fires
    /// immediately.
    ///
    /// A failed cycle is logged and the loop keeps going. A sink flush error
    /// ends the loop, since nothing downstream is reading anymore.
    pub async fn run<S, F>(self, sink: &mut S, shutdown: F) -> io::Result<()>
    where
        S: MetricSink + ?Sized,
        F: Future<Output = ()>,
    {
        let mut tick = interval(self.period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(period = ?self.period, "Polling started");

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    match self.input.gather(sink).await {
                        Ok(stats) => debug!(
                            processed = stats.processed,
                            forwarded = stats.forwarded,
                            expired = stats.expired,
                            evicted = stats.evicted,
                            "Cycle complete"
                        ),
                        Err(e) => warn!(error = %e, "Cycle failed, retrying on next tick"),
                    }
                    sink.flush()?;
                }
                _ = &mut shutdown => {
                    info!("Shutdown requested, polling stopped");
                    break;
                }
            }
        }

        sink.flush()
    }
}
