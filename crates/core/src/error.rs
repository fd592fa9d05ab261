//! Core Error Types
//!
//! Errors raised while building a `Document`. Kept dependency-free (only
//! thiserror + std) so the core crate stays lightweight; the application crate
//! wraps these in its own `AppError`.

use thiserror::Error;

/// Core error type for the Contract Risk workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
