//! Unified error types for fieldmark.
//!
//! Every variant renders with a stable code prefix so tool callers can match on it.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Boxed error returned by an external data source.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error types for the fieldmark crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown cache table, or a key field the table does not declare.
    #[error("INVALID_SCHEMA: {0}")]
    InvalidSchema(String),

    /// A stored payload does not have the shape its table declares.
    #[error("CORRUPT_PAYLOAD: table '{table}' expected {expected}, found {found}")]
    CorruptPayload { table: &'static str, expected: &'static str, found: String },

    /// A requested entity could not be resolved even after a live call.
    #[error("UNRESOLVED_ENTITY: {0}")]
    UnresolvedRequiredEntity(String),

    /// An external response lacks a field the caller depends on.
    #[error("MALFORMED_PAYLOAD: {0}")]
    MalformedSourcePayload(String),

    /// Failure reported by an external source, passed through untouched.
    #[error("SOURCE_ERROR: {0}")]
    Source(#[source] SourceError),

    /// Invalid input parameters (e.g., empty region description).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl Error {
    /// Wrap an error produced by an external source.
    pub fn upstream(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Source(Box::new(err))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::InvalidSchema(_) => -32603,
            Error::Database(_) | Error::MigrationFailed(_) | Error::CorruptPayload { .. } => -32002,
            Error::UnresolvedRequiredEntity(_) => -32020,
            Error::MalformedSourcePayload(_) => -32021,
            Error::Source(_) => -32022,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
