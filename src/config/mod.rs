//! Input configuration.
//!
//! Loaded from a TOML file whose keys mirror [`SAMPLE_CONFIG`], optionally
//! overridden by `INFLUXDB_*` environment variables, then resolved into
//! typed settings by [`InputConfig::resolve`].

pub mod duration_format;
mod error;

pub use error::ConfigError;

use crate::dedup::DEFAULT_RETENTION_WINDOW;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://localhost:8181";
pub const DEFAULT_DATABASE: &str = "control";
pub const DEFAULT_QUERY: &str = "SELECT * FROM metrics ORDER BY time DESC LIMIT 100";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_TRACKED_METRICS: usize = 10_000;

pub const SAMPLE_CONFIG: &str = r#"
  ## InfluxDB3 Core instance URL
  url = "http://localhost:8181"

  ## API Token for authentication
  token = ""

  ## Organization (for InfluxDB v2/v3 compatibility)
  organization = ""

  ## Database/Bucket to query
  database = "control"

  ## SQL query to execute on every collection cycle
  query = "SELECT * FROM metrics ORDER BY time DESC LIMIT 100"

  ## Timeout for HTTP requests
  timeout = "5s"

  ## Only propagate new metrics (deduplication)
  ## When enabled, tracks seen metrics and only forwards new ones
  track_new_metrics_only = true

  ## Maximum number of metrics to track in memory (default: 10000)
  ## The oldest 10% are dropped whenever the limit is exceeded
  max_tracked_metrics = 10000

  ## Time window for metric tracking (default: 1h)
  ## Entries seen longer ago than this are dropped at the start of a cycle
  metric_tracking_window = "1h"

  ## Optional TLS Config
  # tls_ca = "/etc/telegraf/ca.pem"
  # tls_cert = "/etc/telegraf/cert.pem"
  # tls_key = "/etc/telegraf/key.pem"
  # insecure_skip_verify = false
"#;

/// Raw configuration, as written in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub url: String,
    pub token: String,
    pub organization: String,
    pub database: String,
    pub query: String,
    pub timeout: String,
    pub tls_ca: Option<PathBuf>,
    pub tls_cert: Option<PathBuf>,
    pub tls_key: Option<PathBuf>,
    pub insecure_skip_verify: bool,
    pub track_new_metrics_only: bool,
    /// 0 selects the default
    pub max_tracked_metrics: i64,
    pub metric_tracking_window: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            url: DEFAULT_URL.to_string(),
            token: String::new(),
            organization: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            query: DEFAULT_QUERY.to_string(),
            timeout: "5s".to_string(),
            tls_ca: None,
            tls_cert: None,
            tls_key: None,
            insecure_skip_verify: false,
            track_new_metrics_only: true,
            max_tracked_metrics: DEFAULT_MAX_TRACKED_METRICS as i64,
            metric_tracking_window: "1h".to_string(),
        }
    }
}

/// Dedup settings; present only when tracking is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingSettings {
    pub max_entries: usize,
    pub window: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsSettings {
    pub ca: Option<PathBuf>,
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
    pub insecure_skip_verify: bool,
}

/// Validated, typed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Full SQL endpoint, `{url}/api/v3/query_sql`
    pub query_url: String,
    pub token: Option<String>,
    pub database: String,
    pub query: String,
    pub timeout: Duration,
    pub tls: TlsSettings,
    pub tracking: Option<TrackingSettings>,
}

impl InputConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Overrides connection settings from `INFLUXDB_URL`, `INFLUXDB_TOKEN`,
    /// `INFLUXDB_DATABASE` and `INFLUXDB_QUERY`.
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Same as [`apply_env`](Self::apply_env) with an injectable lookup.
    /// Empty values are ignored.
    pub fn apply_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        if let Some(url) = get("INFLUXDB_URL") {
            self.url = url;
        }
        if let Some(token) = get("INFLUXDB_TOKEN") {
            self.token = token;
        }
        if let Some(database) = get("INFLUXDB_DATABASE") {
            self.database = database;
        }
        if let Some(query) = get("INFLUXDB_QUERY") {
            self.query = query;
        }
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_tracking(mut self, enabled: bool) -> Self {
        self.track_new_metrics_only = enabled;
        self
    }

    pub fn with_max_tracked_metrics(mut self, max: i64) -> Self {
        self.max_tracked_metrics = max;
        self
    }

    pub fn with_tracking_window(mut self, window: impl Into<String>) -> Self {
        self.metric_tracking_window = window.into();
        self
    }

    /// Validates and types the configuration.
    ///
    /// Unparsable durations fall back to their defaults with a warning.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let query_url = build_query_url(&self.url)?;

        let timeout = duration_format::parse_or_default("timeout", &self.timeout, DEFAULT_TIMEOUT);

        let tracking = if self.track_new_metrics_only {
            let max_entries = match self.max_tracked_metrics {
                0 => DEFAULT_MAX_TRACKED_METRICS,
                n if n < 0 => return Err(ConfigError::InvalidMaxTracked { value: n }),
                n => usize::try_from(n).unwrap_or(usize::MAX),
            };
            let window = duration_format::parse_or_default(
                "metric_tracking_window",
                &self.metric_tracking_window,
                DEFAULT_RETENTION_WINDOW,
            );
            Some(TrackingSettings {
                max_entries,
                window,
            })
        } else {
            None
        };

        if self.tls_cert.is_some() != self.tls_key.is_some() {
            return Err(ConfigError::IncompleteClientIdentity);
        }

        Ok(ResolvedConfig {
            query_url,
            token: Some(self.token.clone()).filter(|t| !t.is_empty()),
            database: self.database.clone(),
            query: self.query.clone(),
            timeout,
            tls: TlsSettings {
                ca: self.tls_ca.clone(),
                cert: self.tls_cert.clone(),
                key: self.tls_key.clone(),
                insecure_skip_verify: self.insecure_skip_verify,
            },
            tracking,
        })
    }
}

fn build_query_url(base: &str) -> Result<String, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidUrl {
        url: base.to_string(),
        message,
    };

    let parsed = reqwest::Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }

    Ok(format!("{}/api/v3/query_sql", base.trim_end_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_sample_config_parses_to_defaults() {
        let config = InputConfig::parse(SAMPLE_CONFIG).unwrap();
        assert_eq!(config, InputConfig::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = InputConfig::parse("").unwrap();
        let resolved = config.resolve().unwrap();

        assert_eq!(resolved.query_url, "http://localhost:8181/api/v3/query_sql");
        assert_eq!(resolved.database, "control");
        assert_eq!(resolved.timeout, Duration::from_secs(5));
        assert_eq!(resolved.token, None);
        assert_eq!(
            resolved.tracking,
            Some(TrackingSettings {
                max_entries: 10_000,
                window: Duration::from_secs(3600),
            })
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(InputConfig::parse("bogus = 1").is_err());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let resolved = InputConfig::default()
            .with_url("https://influx.example.com:8181/")
            .resolve()
            .unwrap();
        assert_eq!(
            resolved.query_url,
            "https://influx.example.com:8181/api/v3/query_sql"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = InputConfig::default().with_url("not a url").resolve().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = InputConfig::default().with_url("ftp://host").resolve().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_bad_durations_fall_back() {
        let config = InputConfig {
            timeout: "whenever".to_string(),
            metric_tracking_window: "later".to_string(),
            ..InputConfig::default()
        };
        let resolved = config.resolve().unwrap();

        assert_eq!(resolved.timeout, DEFAULT_TIMEOUT);
        assert_eq!(resolved.tracking.unwrap().window, DEFAULT_RETENTION_WINDOW);
    }

    #[test]
    fn test_zero_max_uses_default() {
        let resolved = InputConfig::default()
            .with_max_tracked_metrics(0)
            .resolve()
            .unwrap();
        assert_eq!(resolved.tracking.unwrap().max_entries, DEFAULT_MAX_TRACKED_METRICS);
    }

    #[test]
    fn test_negative_max_rejected_only_when_tracking() {
        let err = InputConfig::default()
            .with_max_tracked_metrics(-5)
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMaxTracked { value: -5 }));

        let resolved = InputConfig::default()
            .with_tracking(false)
            .with_max_tracked_metrics(-5)
            .resolve()
            .unwrap();
        assert_eq!(resolved.tracking, None);
    }

    #[test]
    fn test_cert_without_key_rejected() {
        let config = InputConfig {
            tls_cert: Some(PathBuf::from("/tmp/cert.pem")),
            ..InputConfig::default()
        };
        assert!(matches!(
            config.resolve().unwrap_err(),
            ConfigError::IncompleteClientIdentity
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("INFLUXDB_URL", "http://db:8181"),
            ("INFLUXDB_TOKEN", "secret"),
            ("INFLUXDB_DATABASE", ""),
            ("INFLUXDB_QUERY", "SELECT 1"),
        ]
        .into_iter()
        .collect();

        let config = InputConfig::default()
            .apply_env_from(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.url, "http://db:8181");
        assert_eq!(config.token, "secret");
        // empty value leaves the file setting alone
        assert_eq!(config.database, DEFAULT_DATABASE);
        assert_eq!(config.query, "SELECT 1");
        assert_eq!(config.resolve().unwrap().token.as_deref(), Some("secret"));
    }
}
