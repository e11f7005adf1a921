//! Unified error handling for the mock server.
//!
//! All handler and store failures flow through a single [`MockError`] type
//! that maps one-to-one onto the wire status taxonomy:
//!
//! | Variant        | Status |
//! |----------------|--------|
//! | `Validation`   | 400    |
//! | `Conflict`     | 400    |
//! | `Auth`         | 401    |
//! | `NotFound`     | 404    |
//! | `Internal`     | 500    |
//!
//! Conversion to a wire response happens once, at the router boundary, via
//! [`ApiResponse::from`]. Internal errors never leak their source chain to
//! the client; the chain is preserved for diagnostics only.

use miette::Diagnostic;
use thiserror::Error;

use crate::envelope::{ApiResponse, ResponseStatus};

/// Boxed error type for sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type for the mock server.
#[derive(Error, Diagnostic, Debug)]
pub enum MockError {
    /// A required field or parameter was missing or malformed.
    #[error("{message}")]
    #[diagnostic(
        code(forgemock::validation),
        help("Check that the request body carries the required fields")
    )]
    Validation {
        /// Human-readable error message.
        message: String,
    },

    /// No entity exists at the requested key.
    #[error("{entity} '{key}' not found")]
    #[diagnostic(code(forgemock::not_found))]
    NotFound {
        /// The kind of entity that was looked up.
        entity: &'static str,
        /// The key that failed to resolve.
        key: String,
    },

    /// The operation collides with existing state.
    #[error("{message}")]
    #[diagnostic(
        code(forgemock::conflict),
        help("Retry with overwrite enabled or choose a different id")
    )]
    Conflict {
        /// Human-readable error message.
        message: String,
    },

    /// The request lacked a recognizable credential.
    #[error("authorization required: {message}")]
    #[diagnostic(code(forgemock::auth))]
    Auth {
        /// Human-readable error message.
        message: String,
    },

    /// An unexpected failure inside a handler.
    #[error("internal error: {message}")]
    #[diagnostic(code(forgemock::internal), severity(error))]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<BoxError>,
    },
}

impl MockError {
    /// A validation error with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// A not-found error for the given entity kind and key.
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// A conflict error with the given message.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// An authorization error with the given message.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// An internal error with the given message and no source.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// The wire status this error maps to.
    #[must_use]
    pub const fn status(&self) -> ResponseStatus {
        match self {
            Self::Validation { .. } | Self::Conflict { .. } => ResponseStatus::BadRequest,
            Self::Auth { .. } => ResponseStatus::Unauthorized,
            Self::NotFound { .. } => ResponseStatus::NotFound,
            Self::Internal { .. } => ResponseStatus::InternalError,
        }
    }
}

impl From<MockError> for ApiResponse {
    fn from(err: MockError) -> Self {
        let message = match &err {
            // Generic body for internal failures; the real message goes to the log.
            MockError::Internal { .. } => "internal server error".to_string(),
            other => other.to_string(),
        };
        Self::new(err.status(), Some(serde_json::json!({ "message": message })))
    }
}
