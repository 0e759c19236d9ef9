//! Environment configuration.
//!
//! Two credentials are injected through the environment: the LLM service
//! key (required; startup fails without it) and the image service key
//! (optional; image generation is disabled with a warning when absent).
//! Base URLs can be overridden for tests.

use crate::error::ConfigError;

/// Environment variable holding the LLM service API key.
pub const LLM_KEY_ENV: &str = "VIDYA_LLM_API_KEY";
/// Environment variable holding the image service API key.
pub const IMAGE_KEY_ENV: &str = "VIDYA_IMAGE_API_KEY";
/// Optional override for the LLM service base URL.
pub const LLM_BASE_URL_ENV: &str = "VIDYA_LLM_BASE_URL";
/// Optional override for the image service base URL.
pub const IMAGE_BASE_URL_ENV: &str = "VIDYA_IMAGE_BASE_URL";

const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_IMAGE_BASE_URL: &str = "https://router.huggingface.co";

/// Application configuration resolved at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM service API key (required)
    pub llm_api_key: String,
    /// Image service API key; `None` disables image generation
    pub image_api_key: Option<String>,
    /// LLM service base URL
    pub llm_base_url: String,
    /// Image service base URL
    pub image_base_url: String,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// Fails if the LLM key is absent or empty. An absent image key is
    /// not an error; callers should warn and continue.
    pub fn from_env() -> Result<Self, ConfigError> {
        let llm_api_key = std::env::var(LLM_KEY_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingLlmKey)?;

        let image_api_key = std::env::var(IMAGE_KEY_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());

        let llm_base_url = std::env::var(LLM_BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());

        let image_base_url = std::env::var(IMAGE_BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string());

        Ok(Self {
            llm_api_key,
            image_api_key,
            llm_base_url,
            image_base_url,
        })
    }

    /// Create a config with explicit values (used by tests).
    pub fn with_keys(llm_api_key: impl Into<String>, image_api_key: Option<String>) -> Self {
        Self {
            llm_api_key: llm_api_key.into(),
            image_api_key,
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }

    /// Override the LLM base URL.
    pub fn with_llm_base_url(mut self, url: impl Into<String>) -> Self {
        self.llm_base_url = url.into();
        self
    }

    /// Override the image base URL.
    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    /// Whether image generation is available.
    pub fn image_enabled(&self) -> bool {
        self.image_api_key.is_some()
    }
}
