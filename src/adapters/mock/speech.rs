//! Mock speech synthesizer for testing.

use std::sync::{Arc, Mutex};

use crate::state::VoiceSettings;
use crate::traits::{SpeechError, Synthesizer};

/// One recorded synthesizer invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechCall {
    /// `start` was called with this text and voice identifier
    Start { text: String, voice: String },
    /// `stop` was called
    Stop,
}

/// Recording mock synthesizer.
///
/// Records every `start`/`stop` call; can be configured to fail starts.
#[derive(Clone, Default)]
pub struct MockSynthesizer {
    calls: Arc<Mutex<Vec<SpeechCall>>>,
    fail_start: Arc<Mutex<bool>>,
}

impl MockSynthesizer {
    /// Create a new mock synthesizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `start` calls fail.
    pub fn set_fail_start(&self, fail: bool) {
        *self.fail_start.lock().unwrap_or_else(|p| p.into_inner()) = fail;
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<SpeechCall> {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

impl Synthesizer for MockSynthesizer {
    fn start(&self, text: &str, settings: &VoiceSettings) -> Result<(), SpeechError> {
        if *self.fail_start.lock().unwrap_or_else(|p| p.into_inner()) {
            return Err(SpeechError::StartFailed("mock failure".to_string()));
        }
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(SpeechCall::Start {
                text: text.to_string(),
                voice: settings.voice.clone(),
            });
        Ok(())
    }

    fn stop(&self) {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(SpeechCall::Stop);
    }
}
