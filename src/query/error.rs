use std::path::PathBuf;
use thiserror::Error;

/// Failures of one SQL query round trip. Any of these aborts the cycle.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("failed to read TLS material '{path}': {source}")]
    TlsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TLS material '{path}': {source}")]
    TlsMaterial {
        path: PathBuf,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to execute request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("unexpected status code {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to read response: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl QueryError {
    /// Short label for metric tags.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::ClientBuild(_) => "client_build",
            QueryError::TlsFile { .. } | QueryError::TlsMaterial { .. } => "tls",
            QueryError::Request(_) => "request",
            QueryError::Status { .. } => "status",
            QueryError::Body(_) => "body",
            QueryError::Decode(_) => "decode",
        }
    }
}
