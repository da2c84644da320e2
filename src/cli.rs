//! Command-line arguments for the `influxdb3-input` binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use influxdb3_input::config::duration_format::parse_duration;

/// Query an InfluxDB 3 Core instance and print new metrics as line protocol.
///
/// Connection settings come from the config file (defaults when absent),
/// then `INFLUXDB_URL`, `INFLUXDB_TOKEN`, `INFLUXDB_DATABASE` and
/// `INFLUXDB_QUERY` override them.
#[derive(Parser, Debug)]
#[command(name = "influxdb3-input", version)]
pub struct Cli {
    /// TOML config file.
    #[arg(long, short = 'c', env = "INFLUXDB3_INPUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Poll continuously at this interval (e.g. "10s"). Gathers once when omitted.
    #[arg(long, value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// Enable debug logging.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Print the sample configuration and exit.
    #[arg(long)]
    pub sample_config: bool,
}

impl Cli {
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
