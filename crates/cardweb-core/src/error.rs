//! Error types for cardweb-core

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Series entry not found
    EntryNotFound,
    /// Duplicate series entry
    DuplicateEntry,
    /// Field not part of the catalog
    FieldNotFound,
    /// Validation error
    ValidationError,
    /// Invalid data format
    InvalidFormat,
    /// IO error
    IoError,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::EntryNotFound => write!(f, "ENTRY_NOT_FOUND"),
            ErrorCode::DuplicateEntry => write!(f, "DUPLICATE_ENTRY"),
            ErrorCode::FieldNotFound => write!(f, "FIELD_NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for cardweb-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Series entry not found: {name}")]
    EntryNotFound { name: String },

    #[error("A series with that name already exists: {entry}")]
    DuplicateEntry { entry: String },

    #[error("Unknown field: {field}")]
    FieldNotFound { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("IO error occurred")]
    IoError,

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::EntryNotFound { .. } => ErrorCode::EntryNotFound,
            CoreError::DuplicateEntry { .. } => ErrorCode::DuplicateEntry,
            CoreError::FieldNotFound { .. } => ErrorCode::FieldNotFound,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::IoError => ErrorCode::IoError,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::EntryNotFound { .. } => ErrorSeverity::Info,
            CoreError::DuplicateEntry { .. } => ErrorSeverity::Warning,
            CoreError::FieldNotFound { .. } => ErrorSeverity::Warning,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            CoreError::IoError => ErrorSeverity::Error,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(_error: io::Error) -> Self {
        CoreError::IoError
    }
}

// ==================== Tests ====================
