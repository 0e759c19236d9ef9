//! Unified error handling for Vidya.
//!
//! Domain-specific enums (`ConfigError`, `LlmError`, `ImageError`,
//! `StorageError`) are consolidated into [`VidyaError`], which offers:
//!
//! - `user_message()` — the display string stored in the state store's
//!   error slots
//! - `error_code()` — a short code for logging
//! - `is_retryable()` — whether re-triggering the action may help
//!
//! No error is retried automatically; the user re-triggers the action.

mod config;
mod image;
mod llm;
mod storage;

pub use config::ConfigError;
pub use image::ImageError;
pub use llm::LlmError;
pub use storage::StorageError;

use thiserror::Error;

/// Unified error type for the application.
#[derive(Debug, Error)]
pub enum VidyaError {
    /// Configuration errors (missing credentials)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// LLM service errors (transport, schema, parse, empty quiz)
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Image service errors
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Persistence errors
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl VidyaError {
    /// Get a user-facing message suitable for an error slot.
    pub fn user_message(&self) -> String {
        match self {
            VidyaError::Config(err) => err.to_string(),
            VidyaError::Llm(err) => err.user_message(),
            VidyaError::Image(err) => err.user_message(),
            VidyaError::Storage(err) => err.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            VidyaError::Config(_) => "E_CONFIG",
            VidyaError::Llm(err) => err.error_code(),
            VidyaError::Image(err) => err.error_code(),
            VidyaError::Storage(_) => "E_STORAGE",
        }
    }

    /// Check if re-triggering the failed action may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            VidyaError::Config(_) => false,
            VidyaError::Llm(err) => err.is_retryable(),
            VidyaError::Image(err) => err.is_retryable(),
            VidyaError::Storage(_) => false,
        }
    }
}

impl From<std::io::Error> for VidyaError {
    fn from(err: std::io::Error) -> Self {
        VidyaError::Storage(StorageError::Io(err.to_string()))
    }
}

impl From<serde_json::Error> for VidyaError {
    fn from(err: serde_json::Error) -> Self {
        VidyaError::Storage(StorageError::Serialize(err.to_string()))
    }
}

/// Result type alias used across the crate.
pub type VidyaResult<T> = Result<T, VidyaError>;
