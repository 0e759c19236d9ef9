//! Configuration error types.

use thiserror::Error;

/// Errors raised while reading environment configuration.
///
/// A missing LLM key is fatal at startup; a missing image key is handled
/// upstream as a non-fatal warning and never reaches this enum.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("VIDYA_LLM_API_KEY is not set; the assistant cannot start without it")]
    MissingLlmKey,

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}
