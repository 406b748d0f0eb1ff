//! services/api/src/error.rs
//!
//! Defines the primary error type for the API service, and how port errors map onto
//! HTTP status codes.

use crate::config::ConfigError;
use axum::http::StatusCode;
use findia_core::ports::PortError;
use tracing::error;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure while applying database migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Converts a port failure into the `(status, body)` pair handlers return.
///
/// Internal details are kept out of 500 responses.
pub fn port_error_response(err: PortError) -> (StatusCode, String) {
    match err {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::Invalid(msg) => (StatusCode::BAD_REQUEST, msg),
        PortError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Unexpected(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred".to_string(),
        ),
    }
}

/// Like [`port_error_response`], but logs unexpected failures first.
///
/// `action` completes the sentence "Failed to ...".
pub fn log_and_map(action: &str) -> impl Fn(PortError) -> (StatusCode, String) + '_ {
    move |e| {
        if matches!(e, PortError::Unexpected(_)) {
            error!("Failed to {}: {:?}", action, e);
        }
        port_error_response(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_port_errors_to_statuses() {
        assert_eq!(
            port_error_response(PortError::NotFound("Debt x not found".into())).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            port_error_response(PortError::Invalid("bad".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            port_error_response(PortError::Conflict("dup".into())).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            port_error_response(PortError::Unauthorized).0,
            StatusCode::UNAUTHORIZED
        );
        let (status, body) = port_error_response(PortError::Unexpected("pool timed out".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("pool"));
    }

    #[test]
    fn log_and_map_matches_the_plain_mapping() {
        let map = log_and_map("list debts");
        assert_eq!(
            map(PortError::NotFound("Debt x not found".into())),
            (StatusCode::NOT_FOUND, "Debt x not found".to_string())
        );
        assert_eq!(
            map(PortError::Unexpected("connection reset".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
