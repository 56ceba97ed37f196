use thiserror::Error;

use crate::schema::Domain;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("incompatible schemas: {0}")]
    SchemaIncompatible(String),

    #[error("arity mismatch: expected {expected} values, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("type mismatch in column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: Domain,
        found: Domain,
    },

    #[error("key lookup failed: {0}")]
    KeyLookupFailure(String),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
