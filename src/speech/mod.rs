//! Text-to-speech controller.
//!
//! Single-flight policy: starting speech for a different topic cancels
//! the prior utterance first; re-requesting the topic that is currently
//! playing toggles it off. The answer-fetch-before-speaking step lives
//! in the orchestration layer, which calls into this controller once the
//! text is available.
//!
//! Synthesizer failures are logged and swallowed: the controller returns
//! to idle without surfacing an error, matching the fire-and-forget
//! nature of the speech path.

use std::sync::Arc;

use crate::state::VoiceSettings;
use crate::traits::Synthesizer;

/// What the controller is currently doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechStatus {
    Idle,
    Speaking { topic: String },
}

/// Single-flight speech controller over an injectable synthesizer.
pub struct SpeechController {
    synth: Arc<dyn Synthesizer>,
    status: SpeechStatus,
}

impl SpeechController {
    /// Create a controller over a synthesizer backend.
    pub fn new(synth: Arc<dyn Synthesizer>) -> Self {
        Self {
            synth,
            status: SpeechStatus::Idle,
        }
    }

    /// Current status.
    pub fn status(&self) -> &SpeechStatus {
        &self.status
    }

    /// Whether this topic is the one currently playing.
    pub fn is_speaking(&self, topic: &str) -> bool {
        matches!(&self.status, SpeechStatus::Speaking { topic: t } if t == topic)
    }

    /// Toggle speech for a topic.
    ///
    /// Same topic while playing → stop. Different topic → cancel the
    /// prior utterance and start the new one. Returns to idle silently
    /// if the synthesizer refuses to start.
    pub fn toggle(&mut self, topic: &str, text: &str, settings: &VoiceSettings) {
        if self.is_speaking(topic) {
            self.stop();
            return;
        }

        if self.status != SpeechStatus::Idle {
            self.stop();
        }

        match self.synth.start(text, settings) {
            Ok(()) => {
                self.status = SpeechStatus::Speaking {
                    topic: topic.to_string(),
                };
            }
            Err(e) => {
                tracing::warn!(topic, error = %e, "speech synthesis did not start");
                self.status = SpeechStatus::Idle;
            }
        }
    }

    /// Cancel any current utterance.
    pub fn stop(&mut self) {
        if self.status != SpeechStatus::Idle {
            self.synth.stop();
            self.status = SpeechStatus::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockSynthesizer, SpeechCall};

    fn controller() -> (SpeechController, MockSynthesizer) {
        let synth = MockSynthesizer::new();
        (SpeechController::new(Arc::new(synth.clone())), synth)
    }

    #[test]
    fn test_toggle_starts_speaking() {
        let (mut ctrl, synth) = controller();
        ctrl.toggle("Gravity", "Gravity pulls things down.", &VoiceSettings::default());
        assert!(ctrl.is_speaking("Gravity"));
        assert_eq!(synth.calls().len(), 1);
    }

    #[test]
    fn test_toggle_same_topic_twice_returns_to_idle() {
        let (mut ctrl, synth) = controller();
        let settings = VoiceSettings::default();
        ctrl.toggle("Gravity", "text", &settings);
        ctrl.toggle("Gravity", "text", &settings);
        assert_eq!(*ctrl.status(), SpeechStatus::Idle);
        assert_eq!(
            synth.calls().last().cloned().unwrap(),
            SpeechCall::Stop
        );
    }

    #[test]
    fn test_different_topic_cancels_prior_first() {
        let (mut ctrl, synth) = controller();
        let settings = VoiceSettings::default();
        ctrl.toggle("Gravity", "a", &settings);
        ctrl.toggle("Sound", "b", &settings);

        assert!(ctrl.is_speaking("Sound"));
        let calls = synth.calls();
        // start(Gravity), stop, start(Sound)
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1], SpeechCall::Stop);
        assert!(matches!(&calls[2], SpeechCall::Start { text, .. } if text == "b"));
    }

    #[test]
    fn test_start_failure_is_silent_idle() {
        let (mut ctrl, synth) = controller();
        synth.set_fail_start(true);
        ctrl.toggle("Gravity", "text", &VoiceSettings::default());
        assert_eq!(*ctrl.status(), SpeechStatus::Idle);
    }

    #[test]
    fn test_stop_when_idle_does_not_touch_backend() {
        let (mut ctrl, synth) = controller();
        ctrl.stop();
        assert!(synth.calls().is_empty());
    }
}
