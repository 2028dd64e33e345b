//! # API Error Type
//!
//! Unified error type for console commands, plus the fatal startup error.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Stockroom                              │
//! │                                                                         │
//! │  Console                     Commands                                   │
//! │  ───────                     ────────                                   │
//! │                                                                         │
//! │  sell                                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Login refused? ───── AUTHENTICATION_DENIED ───┐               │  │
//! │  │         │                                      │               │  │
//! │  │         ▼                                      ▼               │  │
//! │  │  Bad field? ───────── VALIDATION_ERROR ────── ApiError ───────►│  │
//! │  │         │                                      ▲               │  │
//! │  │         ▼                                      │               │  │
//! │  │  Database failed? ─── STORAGE_ERROR ───────────┘               │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  AUTHENTICATION_DENIED → ask for credentials again                     │
//! │  VALIDATION_ERROR      → keep the form, re-prompt `field`              │
//! │  STORAGE_ERROR         → show message, drop the submission             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `StartupError` is different: the app cannot run without its database,
//! so it ends the process with exit status 1.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use stockroom_core::ValidationError;
use stockroom_db::DbError;

/// Message shown when a login is refused.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "quantity must be positive",
///   "field": "quantity"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Offending form field, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Credentials did not match
    AuthenticationDenied,

    /// Form input rejected; nothing was written
    ValidationError,

    /// The database could not complete the operation
    StorageError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field: None,
        }
    }

    /// Creates an authentication error.
    pub fn denied(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::AuthenticationDenied, message)
    }

    /// Creates a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError {
            field: Some(field.into()),
            ..ApiError::new(ErrorCode::ValidationError, message)
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StorageError, message)
    }
}

/// Converts form validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.field(), err.to_string())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Validation(e) => ApiError::from(e),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::storage("Database connection failed")
            }
            DbError::SchemaFailed(e) => {
                tracing::error!("Database schema unavailable: {}", e);
                ApiError::storage("Database tables are unavailable")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::storage("Failed to save or load data")
            }
            DbError::PoolExhausted => ApiError::storage("Database is busy"),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::storage("Database operation failed")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Fatal errors that stop the app.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The database file could not be opened or its tables created.
    #[error("could not open database at {}: {source}", .path.display())]
    Database {
        path: PathBuf,
        #[source]
        source: DbError,
    },

    /// The product image directory could not be created.
    #[error("could not create image directory {}: {source}", .path.display())]
    ImageDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the operator's input or writing the prompt failed.
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
