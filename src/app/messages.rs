//! AppMessage enum for async communication within the application.
//!
//! Every spawned fetch reports back through one of these; the main loop
//! applies them to the state store. Content messages carry the course
//! generation they were spawned under so completions that outlive a
//! course reset can be recognized and discarded.

use uuid::Uuid;

use crate::state::Mcq;

/// Messages received from async operations.
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// Topic-list fetch finished for a chapter
    TopicsLoaded {
        chapter: String,
        generation: u64,
        topics: Vec<String>,
    },
    /// Topic-list fetch failed for a chapter
    TopicsFailed {
        chapter: String,
        generation: u64,
        error: String,
    },
    /// Explanation fetch finished
    AnswerLoaded {
        topic: String,
        generation: u64,
        text: String,
    },
    /// Explanation fetch failed
    AnswerFailed {
        topic: String,
        generation: u64,
        error: String,
    },
    /// Simplified explanation fetch finished
    Eli5Loaded {
        topic: String,
        generation: u64,
        text: String,
    },
    /// Simplified explanation fetch failed
    Eli5Failed {
        topic: String,
        generation: u64,
        error: String,
    },
    /// Quiz fetch finished
    QuizLoaded {
        topic: String,
        generation: u64,
        mcqs: Vec<Mcq>,
    },
    /// Quiz fetch failed
    QuizFailed {
        topic: String,
        generation: u64,
        error: String,
    },
    /// Image generation finished; payload is base64
    ImageLoaded {
        topic: String,
        generation: u64,
        base64: String,
    },
    /// Image generation failed
    ImageFailed {
        topic: String,
        generation: u64,
        error: String,
    },
    /// A text fragment arrived on the chat stream
    ChatToken { session_id: Uuid, token: String },
    /// The chat stream completed normally
    ChatComplete { session_id: Uuid },
    /// The chat stream failed; fragments already delivered stay
    ChatFailed { session_id: Uuid, error: String },
}
