//! Speech synthesizer trait abstraction.
//!
//! The controller in `crate::speech` drives an implementation of this
//! trait; voice settings are passed through opaquely.

use crate::state::VoiceSettings;

/// Errors from a speech synthesizer backend.
#[derive(Debug, Clone)]
pub enum SpeechError {
    /// No synthesizer binary/facility is available on this system
    Unavailable(String),
    /// Failed to start an utterance
    StartFailed(String),
}

impl std::fmt::Display for SpeechError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeechError::Unavailable(msg) => write!(f, "Speech unavailable: {}", msg),
            SpeechError::StartFailed(msg) => write!(f, "Speech failed to start: {}", msg),
        }
    }
}

impl std::error::Error for SpeechError {}

/// Trait for text-to-speech backends.
///
/// `start` begins speaking and returns immediately; `stop` cancels the
/// current utterance if one is playing. Implementations must tolerate
/// `stop` with nothing playing.
pub trait Synthesizer: Send + Sync {
    /// Begin speaking `text` with the given voice settings.
    fn start(&self, text: &str, settings: &VoiceSettings) -> Result<(), SpeechError>;

    /// Cancel the current utterance, if any.
    fn stop(&self);
}
