//! InfluxDB 3 SQL query client and row conversion.

mod client;
pub mod convert;
mod error;

pub use client::QueryClient;
pub use convert::{row_to_metric, Row};
pub use error::QueryError;
