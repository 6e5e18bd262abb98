//! # Error Types
//!
//! Structured error types for crate_core. Every failure carries enough
//! context (field, value, panel or format) for a caller to report it or map
//! it onto a transport status without parsing message strings.
//!
//! ## Example
//!
//! ```rust
//! use crate_core::errors::{CrateError, CrateResult};
//!
//! fn validate_weight(weight_lbs: f64) -> CrateResult<()> {
//!     if weight_lbs <= 0.0 {
//!         return Err(CrateError::invalid_configuration(
//!             "product.weight",
//!             weight_lbs.to_string(),
//!             "Weight must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for crate_core operations
pub type CrateResult<T> = Result<T, CrateError>;

/// Structured error type for crate configuration and export operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CrateError {
    /// Configuration is missing data or has out-of-range product fields
    #[error("Invalid configuration for '{field}': {value} - {reason}")]
    InvalidConfiguration {
        field: String,
        value: String,
        reason: String,
    },

    /// A direct function argument is invalid (e.g., non-positive skid count)
    #[error("Invalid argument '{argument}': {value} - {reason}")]
    InvalidArgument {
        argument: String,
        value: String,
        reason: String,
    },

    /// The splice optimizer cannot satisfy trim-width or cleat-clearance limits
    #[error("Layout infeasible for {panel}: {reason}")]
    LayoutInfeasible { panel: String, reason: String },

    /// An exporter failed after a valid model was produced
    #[error("Serialization failure ({format}): {reason}")]
    SerializationFailure { format: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },
}

impl CrateError {
    /// Create an InvalidConfiguration error
    pub fn invalid_configuration(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CrateError::InvalidConfiguration {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(
        argument: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CrateError::InvalidArgument {
            argument: argument.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a LayoutInfeasible error
    pub fn layout_infeasible(panel: impl Into<String>, reason: impl Into<String>) -> Self {
        CrateError::LayoutInfeasible {
            panel: panel.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationFailure error
    pub fn serialization(format: impl Into<String>, reason: impl Into<String>) -> Self {
        CrateError::SerializationFailure {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CrateError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CrateError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CrateError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CrateError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            CrateError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            CrateError::LayoutInfeasible { .. } => "LAYOUT_INFEASIBLE",
            CrateError::SerializationFailure { .. } => "SERIALIZATION_FAILURE",
            CrateError::FileError { .. } => "FILE_ERROR",
            CrateError::FileLocked { .. } => "FILE_LOCKED",
        }
    }

    /// HTTP status a network boundary should answer with for this error
    pub fn http_status(&self) -> u16 {
        match self {
            CrateError::InvalidConfiguration { .. } | CrateError::InvalidArgument { .. } => 400,
            CrateError::LayoutInfeasible { .. } => 422,
            CrateError::FileLocked { .. } => 409,
            CrateError::SerializationFailure { .. } | CrateError::FileError { .. } => 500,
        }
    }
}
