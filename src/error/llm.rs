//! LLM service error types.
//!
//! Every failure at the LLM client boundary is re-raised as one of these
//! variants carrying the topic or chapter name it was generated for, so
//! the orchestration layer can store a scoped display string without
//! further formatting.

use thiserror::Error;

/// Errors from the LLM client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    /// Transport-level failure (connection, timeout, body read).
    #[error("Request for '{scope}' failed: {message}")]
    Transport { scope: String, message: String },

    /// Non-success HTTP status from the service.
    #[error("The model service returned HTTP {status} for '{scope}': {message}")]
    HttpStatus {
        scope: String,
        status: u16,
        message: String,
    },

    /// The response did not match the requested schema or was not
    /// parseable JSON.
    #[error("Could not understand the model's response for '{scope}': {message}")]
    Malformed { scope: String, message: String },

    /// The model returned an invalid or empty quiz.
    #[error("The model returned an invalid or empty quiz for '{topic}'")]
    EmptyQuiz { topic: String },

    /// A chat stream failed partway through.
    #[error("The tutor's reply was interrupted: {message}")]
    StreamInterrupted { message: String },
}

impl LlmError {
    /// Get a user-facing message for an error slot.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            LlmError::Transport { .. } => "E_LLM_TRANSPORT",
            LlmError::HttpStatus { .. } => "E_LLM_HTTP",
            LlmError::Malformed { .. } => "E_LLM_MALFORMED",
            LlmError::EmptyQuiz { .. } => "E_LLM_EMPTY_QUIZ",
            LlmError::StreamInterrupted { .. } => "E_LLM_STREAM",
        }
    }

    /// Check if re-triggering the action may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Transport { .. } => true,
            LlmError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            LlmError::Malformed { .. } => false,
            LlmError::EmptyQuiz { .. } => true,
            LlmError::StreamInterrupted { .. } => true,
        }
    }
}
