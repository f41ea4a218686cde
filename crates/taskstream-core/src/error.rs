use std::io;

use thiserror::Error;

/// Failure modes shared across the board and authentication services.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying serialization failure from a storage adapter.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    /// Underlying I/O failure from a storage adapter.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Rejected form input.
    #[error("validation error: {0}")]
    Validation(String),
    /// Lookup against an unknown task id or email.
    #[error("not found: {0}")]
    NotFound(String),
    /// Attempt to register an email that already exists.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Password verification failed.
    #[error("invalid credentials")]
    AuthFailed,
    /// An authentication operation is already running.
    #[error("another authentication operation is in progress")]
    OperationInFlight,
}

/// Result alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a validation error from any message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build a not-found error from any message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Build a conflict error from any message.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// True for the two login rejection causes that share one external message.
    ///
    /// Callers surface a generic "invalid email or password" for both; the
    /// distinct variants stay available for logging and tests.
    #[must_use]
    pub const fn is_credential_failure(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::AuthFailed)
    }
}
