use super::convert::{row_to_metric, Row};
use super::error::QueryError;
use crate::config::{ResolvedConfig, TlsSettings};
use crate::io::Clock;
use crate::metrics::MetricRecord;
use crate::observability::spans::query_span;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Certificate, Client, Identity, StatusCode};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, Instrument};

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    db: &'a str,
    q: &'a str,
    format: &'static str,
}

/// Thin client for the InfluxDB 3 SQL endpoint.
#[derive(Debug, Clone)]
pub struct QueryClient {
    client: Client,
    query_url: String,
    token: Option<String>,
    database: String,
    query: String,
}

impl QueryClient {
    pub fn new(config: &ResolvedConfig) -> Result<Self, QueryError> {
        let builder = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.tls.insecure_skip_verify);
        let client = apply_tls(builder, &config.tls)?
            .build()
            .map_err(QueryError::ClientBuild)?;

        Ok(QueryClient {
            client,
            query_url: config.query_url.clone(),
            token: config.token.clone(),
            database: config.database.clone(),
            query: config.query.clone(),
        })
    }

    pub fn query_url(&self) -> &str {
        &self.query_url
    }

    /// Runs the configured query and returns the raw rows.
    pub async fn fetch_rows(&self) -> Result<Vec<Row>, QueryError> {
        let span = query_span(&self.query_url, &self.database);
        async {
            let body = QueryRequest {
                db: &self.database,
                q: &self.query,
                format: "json",
            };

            let mut request = self
                .client
                .post(&self.query_url)
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json")
                .json(&body);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await.map_err(QueryError::Request)?;
            let status = response.status();
            let bytes = response.bytes().await.map_err(QueryError::Body)?;

            if status != StatusCode::OK {
                return Err(QueryError::Status {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }

            let rows: Vec<Row> = serde_json::from_slice(&bytes)?;
            debug!(rows = rows.len(), "Query returned rows");
            Ok(rows)
        }
        .instrument(span)
        .await
    }

    /// Runs the query and converts every row that carries at least one field.
    pub async fn fetch_metrics(&self, clock: &dyn Clock) -> Result<Vec<MetricRecord>, QueryError> {
        let rows = self.fetch_rows().await?;
        let now = clock.now();
        Ok(rows
            .into_iter()
            .filter_map(|row| row_to_metric(row, now))
            .collect())
    }
}

fn apply_tls(
    mut builder: reqwest::ClientBuilder,
    tls: &TlsSettings,
) -> Result<reqwest::ClientBuilder, QueryError> {
    if let Some(ca_path) = &tls.ca {
        let pem = read_pem(ca_path)?;
        let ca = Certificate::from_pem(&pem).map_err(|source| QueryError::TlsMaterial {
            path: ca_path.clone(),
            source,
        })?;
        builder = builder.add_root_certificate(ca);
    }

    if let (Some(cert_path), Some(key_path)) = (&tls.cert, &tls.key) {
        // rustls wants certificate chain and private key in one PEM buffer
        let mut pem = read_pem(cert_path)?;
        pem.push(b'\n');
        pem.extend_from_slice(&read_pem(key_path)?);
        let identity = Identity::from_pem(&pem).map_err(|source| QueryError::TlsMaterial {
            path: cert_path.clone(),
            source,
        })?;
        builder = builder.identity(identity);
    }

    Ok(builder)
}

fn read_pem(path: &Path) -> Result<Vec<u8>, QueryError> {
    std::fs::read(path).map_err(|source| QueryError::TlsFile {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InputConfig;
    use std::path::PathBuf;

    #[test]
    fn test_client_uses_resolved_endpoint() {
        let resolved = InputConfig::default()
            .with_url("http://localhost:9999/")
            .resolve()
            .unwrap();
        let client = QueryClient::new(&resolved).unwrap();
        assert_eq!(client.query_url(), "http://localhost:9999/api/v3/query_sql");
    }

    #[test]
    fn test_missing_ca_file() {
        let config = InputConfig {
            tls_ca: Some(PathBuf::from("/nonexistent/ca.pem")),
            ..InputConfig::default()
        };
        let err = QueryClient::new(&config.resolve().unwrap()).unwrap_err();
        assert!(matches!(err, QueryError::TlsFile { .. }));
        assert_eq!(err.kind(), "tls");
    }

    #[test]
    fn test_request_body_shape() {
        let body = QueryRequest {
            db: "control",
            q: "SELECT 1",
            format: "json",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"db": "control", "q": "SELECT 1", "format": "json"})
        );
    }
}
