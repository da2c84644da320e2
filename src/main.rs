//! InfluxDB 3 polling input
//!
//! Queries an InfluxDB 3 Core instance and prints the resulting metrics as
//! line protocol on stdout. With tracking enabled, a metric is printed only
//! the first time its identity is seen within the tracking window. Logs go
//! to stderr.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod cli;

use clap::Parser;
use cli::Cli;
use influxdb3_input::observability::{self, DatadogConfig, Metrics, SharedMetrics};
use influxdb3_input::output::{LineProtocolWriter, MetricSink};
use influxdb3_input::{InfluxDbInput, InputConfig, Poller};
use std::io::{self, BufWriter};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.sample_config {
        print!("{}", InfluxDbInput::sample_config());
        return Ok(());
    }

    let dd_config = DatadogConfig::from_env();
    observability::init_tracing(&dd_config, cli.log_filter())
        .map_err(|e| e as Box<dyn std::error::Error>)?;

    let config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration");
            InputConfig::from_file(path)?
        }
        None => InputConfig::default(),
    }
    .apply_env();

    let metrics: SharedMetrics = Arc::new(Metrics::new(&dd_config));
    let input = InfluxDbInput::new(&config)?.with_metrics(metrics);

    let stdout = io::stdout();
    let mut sink = LineProtocolWriter::new(BufWriter::new(stdout.lock()));

    let outcome: Result<(), Box<dyn std::error::Error>> = match cli.interval {
        Some(period) => {
            let shutdown = async {
                if let Err(e) = signal::ctrl_c().await {
                    error!(error = %e, "Failed to listen for ctrl-c");
                }
            };
            Poller::new(input, period)
                .run(&mut sink, shutdown)
                .await
                .map_err(Into::into)
        }
        None => match input.gather(&mut sink).await {
            Ok(stats) => {
                info!(
                    processed = stats.processed,
                    forwarded = stats.forwarded,
                    "Gathered metrics"
                );
                sink.flush().map_err(Into::into)
            }
            Err(e) => Err(e.into()),
        },
    };

    observability::shutdown();
    outcome
}
