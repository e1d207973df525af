//! Error types for the trade direction engine.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors, reported to the caller before any partition is processed.
///
/// Malformed individual records are not errors: they are dropped and counted
/// in [`crate::Diagnostics`].
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Structurally invalid input table (e.g. a required column is missing).
    #[error("Schema error: {0}")]
    Schema(String),

    /// Worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a schema error.
    pub fn schema(msg: impl Into<String>) -> Self {
        Error::Schema(msg.into())
    }

    /// Create a thread pool error.
    pub fn thread_pool(msg: impl Into<String>) -> Self {
        Error::ThreadPool(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::schema("missing column `price` in row 3");
        assert_eq!(err.to_string(), "Schema error: missing column `price` in row 3");

        let err = Error::config("report_lag_ms must be non-negative");
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
