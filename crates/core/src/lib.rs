//! Shared primitives for all Rust crates in Curator.

#![forbid(unsafe_code)]

/// Session primitives shared across controllers.
pub mod session;

use thiserror::Error;

pub use session::Session;

/// Result type used across Curator crates.
pub type AppResult<T> = Result<T, AppError>;

/// Message shown when an error carries no text of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "request failed";

/// Common application error categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// User is not authenticated or the session expired.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Remote API could not be reached.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the human-readable message without the category prefix.
    ///
    /// Remote API messages are carried verbatim, so this is the text surfaced
    /// in notifications.
    #[must_use]
    pub fn message(&self) -> &str {
        let message = match self {
            Self::Validation(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::Unavailable(message)
            | Self::Internal(message) => message.as_str(),
        };

        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE
        } else {
            message
        }
    }
}
