//! Wire types for the generative-text service.
//!
//! Requests carry a structured-output schema so the model returns JSON
//! that parses into the typed payloads below. Field names follow the
//! service's camelCase convention.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One text part of a content block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    pub text: String,
}

/// A content block: optional role plus ordered parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: String) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text }],
        }
    }

    pub fn model(text: String) -> Self {
        Self {
            role: Some("model".to_string()),
            parts: vec![Part { text }],
        }
    }

    /// System instructions carry no role on this service.
    pub fn system(text: String) -> Self {
        Self {
            role: None,
            parts: vec![Part { text }],
        }
    }
}

/// Hint limiting how much the model "thinks" before answering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: i32,
}

/// Generation parameters for one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

impl GenerationConfig {
    /// Request structured JSON output matching `schema`.
    pub fn json_with_schema(schema: Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            thinking_config: None,
        }
    }

    /// Attach a thinking-budget hint (0 selects the cheapest mode).
    pub fn with_thinking_budget(mut self, budget: i32) -> Self {
        self.thinking_config = Some(ThinkingConfig {
            thinking_budget: budget,
        });
        self
    }
}

/// A generateContent / streamGenerateContent request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Single-turn request from one user prompt.
    pub fn new(prompt: String) -> Self {
        Self {
            contents: vec![Content::user(prompt)],
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Attach a generation config.
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

/// One candidate of a response.
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

/// A generateContent response body (also the per-chunk payload of the
/// streaming variant).
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if any.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        if content.parts.is_empty() {
            return None;
        }
        Some(
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<String>(),
        )
    }
}

// ---------------------------------------------------------------------
// Structured-output schemas, one per request type
// ---------------------------------------------------------------------

/// Schema for topic lists: an array of strings.
pub fn topics_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

/// Schema for explanations: one-field object.
pub fn answer_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": { "answer": { "type": "STRING" } },
        "required": ["answer"]
    })
}

/// Schema for simplified explanations: one-field object.
pub fn eli5_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": { "explanation": { "type": "STRING" } },
        "required": ["explanation"]
    })
}

/// Schema for quizzes: array of four-option questions.
pub fn quiz_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "minItems": 4,
                    "maxItems": 4
                },
                "correctAnswer": { "type": "STRING" }
            },
            "required": ["question", "options", "correctAnswer"]
        }
    })
}

/// Schema for image prompts: one-field object.
pub fn image_prompt_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": { "prompt": { "type": "STRING" } },
        "required": ["prompt"]
    })
}

// ---------------------------------------------------------------------
// Typed payloads parsed from the structured JSON text
// ---------------------------------------------------------------------

/// Payload of an explanation response.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerPayload {
    pub answer: String,
}

/// Payload of a simplified-explanation response.
#[derive(Debug, Clone, Deserialize)]
pub struct Eli5Payload {
    pub explanation: String,
}

/// Payload of one quiz question.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqPayload {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// Payload of an image-prompt response.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagePromptPayload {
    pub prompt: String,
}
