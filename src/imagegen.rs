//! External image-generation client.
//!
//! Two-step contract: ask the LLM client for a short text-free visual
//! description of the topic, then POST it with a fixed model identifier
//! to the image-inference endpoint, requesting a base64 response.
//!
//! Without a configured credential the call fails before any network
//! traffic. A 503 is surfaced as a "warming up" error; other non-success
//! statuses carry the status code; a response without the payload field
//! is "model returned no image". The caller decides whether to retry.

use std::sync::Arc;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::ImageError;
use crate::llm::LlmClient;
use crate::traits::{Headers, HttpClient, HttpError};

/// Model used for image generation.
pub const IMAGE_MODEL: &str = "black-forest-labs/FLUX.1-schnell";

/// Request body for the inference endpoint.
#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    model: &'a str,
    response_format: &'a str,
}

/// One generated image of a response.
#[derive(Debug, Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}

/// Response body of the inference endpoint.
#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

/// Client for the image-inference service.
pub struct ImageClient<C: HttpClient> {
    http: Arc<C>,
    api_key: Option<String>,
    base_url: String,
}

impl<C: HttpClient> ImageClient<C> {
    /// Create a client; `api_key: None` disables generation.
    pub fn new(http: Arc<C>, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.into(),
        }
    }

    /// Whether a credential is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/images/generations", self.base_url)
    }

    /// Generate an illustration for a topic.
    ///
    /// Returns the base64-encoded bitmap. The credential check happens
    /// first so a misconfigured client never reaches the network.
    pub async fn generate(
        &self,
        llm: &LlmClient<C>,
        topic: &str,
        subject: &str,
    ) -> Result<String, ImageError> {
        let api_key = self.api_key.as_deref().ok_or(ImageError::NotConfigured)?;

        let prompt = llm.fetch_image_prompt(topic, subject).await?;
        tracing::debug!(topic, "requesting image generation");

        let body = serde_json::to_string(&ImageRequest {
            prompt: &prompt,
            model: IMAGE_MODEL,
            response_format: "b64_json",
        })
        .map_err(|e| ImageError::Transport {
            message: e.to_string(),
        })?;

        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", api_key));

        let response = self
            .http
            .post(&self.endpoint(), &body, &headers)
            .await
            .map_err(|e| match e {
                HttpError::ServerError { status: 503, .. } => ImageError::WarmingUp,
                HttpError::ServerError { status, message } => {
                    ImageError::HttpStatus { status, message }
                }
                other => ImageError::Transport {
                    message: other.to_string(),
                },
            })?;

        if response.status == 503 {
            return Err(ImageError::WarmingUp);
        }
        if !response.is_success() {
            return Err(ImageError::HttpStatus {
                status: response.status,
                message: response.text().unwrap_or_default(),
            });
        }

        let parsed: ImageResponse = response.json().map_err(|_| ImageError::NoImage)?;
        let b64 = parsed
            .data
            .into_iter()
            .find_map(|d| d.b64_json)
            .ok_or(ImageError::NoImage)?;

        // Reject payloads that are not actually base64 before they reach
        // the state store.
        base64::engine::general_purpose::STANDARD
            .decode(&b64)
            .map_err(|_| ImageError::NoImage)?;

        Ok(b64)
    }
}
