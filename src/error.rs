use crate::config::ConfigError;
use crate::query::QueryError;
use thiserror::Error;

/// Errors surfaced by the input lifecycle.
#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

pub type Result<T> = std::result::Result<T, InputError>;
