//! Image service error types.

use thiserror::Error;

use super::LlmError;

/// Errors from the image-generation client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageError {
    /// No image-service credential is configured; raised before any
    /// network call is attempted.
    #[error("Image generation is disabled: no image service API key is configured")]
    NotConfigured,

    /// The inference endpoint returned 503.
    #[error("The image model is warming up, please retry shortly")]
    WarmingUp,

    /// Any other non-success HTTP status.
    #[error("Image service returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The response JSON was missing the image payload field.
    #[error("The model returned no image")]
    NoImage,

    /// Transport-level failure.
    #[error("Image request failed: {message}")]
    Transport { message: String },

    /// The first step (asking the LLM for a visual description) failed.
    #[error("Could not compose an image prompt: {0}")]
    Prompt(#[from] LlmError),
}

impl ImageError {
    /// Get a user-facing message for the image slot.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ImageError::NotConfigured => "E_IMG_CONFIG",
            ImageError::WarmingUp => "E_IMG_WARMUP",
            ImageError::HttpStatus { .. } => "E_IMG_HTTP",
            ImageError::NoImage => "E_IMG_EMPTY",
            ImageError::Transport { .. } => "E_IMG_TRANSPORT",
            ImageError::Prompt(_) => "E_IMG_PROMPT",
        }
    }

    /// Check if re-triggering the action may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ImageError::NotConfigured => false,
            ImageError::WarmingUp => true,
            ImageError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            ImageError::NoImage => true,
            ImageError::Transport { .. } => true,
            ImageError::Prompt(inner) => inner.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warming_up_message() {
        assert!(ImageError::WarmingUp.to_string().contains("warming up"));
    }

    #[test]
    fn test_no_image_message() {
        assert_eq!(ImageError::NoImage.to_string(), "The model returned no image");
    }

    #[test]
    fn test_prompt_error_wraps_llm_error() {
        let err = ImageError::Prompt(LlmError::Malformed {
            scope: "Gravity".to_string(),
            message: "not json".to_string(),
        });
        assert!(err.to_string().contains("Gravity"));
        assert!(!err.is_retryable());
    }
}
