//! Process-spawning speech synthesizer adapter.
//!
//! Shells out to a system text-to-speech command (`espeak-ng`, falling
//! back to `espeak`, or `say` on macOS). The child process handle is kept
//! so an in-progress utterance can be killed on cancel.

use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use crate::state::VoiceSettings;
use crate::traits::{SpeechError, Synthesizer};

/// Candidate TTS binaries, probed in order.
const CANDIDATES: &[&str] = &["espeak-ng", "espeak", "say"];

/// Synthesizer backed by an external TTS process.
pub struct EspeakSynthesizer {
    binary: String,
    child: Mutex<Option<Child>>,
}

impl EspeakSynthesizer {
    /// Probe the system for a usable TTS binary.
    pub fn detect() -> Result<Self, SpeechError> {
        for candidate in CANDIDATES {
            if Command::new(candidate)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .is_ok()
            {
                return Ok(Self {
                    binary: candidate.to_string(),
                    child: Mutex::new(None),
                });
            }
        }
        Err(SpeechError::Unavailable(format!(
            "none of {:?} found on PATH",
            CANDIDATES
        )))
    }

    /// Create a synthesizer for a specific binary without probing.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            child: Mutex::new(None),
        }
    }

    /// Build the argument list for one utterance.
    ///
    /// The rate multiplier maps onto espeak's words-per-minute scale
    /// (175 wpm baseline) and pitch onto its 0-99 scale (50 baseline).
    /// `say` only understands rate.
    fn args(&self, text: &str, settings: &VoiceSettings) -> Vec<String> {
        if self.binary == "say" {
            vec![
                "-r".to_string(),
                format!("{}", (175.0 * settings.rate) as u32),
                text.to_string(),
            ]
        } else {
            vec![
                "-v".to_string(),
                settings.voice.clone(),
                "-s".to_string(),
                format!("{}", (175.0 * settings.rate) as u32),
                "-p".to_string(),
                format!("{}", (50.0 * settings.pitch).clamp(0.0, 99.0) as u32),
                text.to_string(),
            ]
        }
    }
}

impl Synthesizer for EspeakSynthesizer {
    fn start(&self, text: &str, settings: &VoiceSettings) -> Result<(), SpeechError> {
        self.stop();

        let child = Command::new(&self.binary)
            .args(self.args(text, settings))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::StartFailed(e.to_string()))?;

        let mut guard = self.child.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(child);
        Ok(())
    }

    fn stop(&self) {
        let mut guard = self.child.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(mut child) = guard.take() {
            // Already-exited children make kill a no-op error.
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_espeak_args_include_voice_rate_pitch() {
        let synth = EspeakSynthesizer::with_binary("espeak-ng");
        let settings = VoiceSettings {
            voice: "en-us".to_string(),
            rate: 1.0,
            pitch: 1.0,
        };
        let args = synth.args("hello", &settings);
        assert!(args.contains(&"en-us".to_string()));
        assert!(args.contains(&"175".to_string()));
        assert!(args.contains(&"50".to_string()));
        assert_eq!(args.last().unwrap(), "hello");
    }

    #[test]
    fn test_say_args_omit_voice_and_pitch() {
        let synth = EspeakSynthesizer::with_binary("say");
        let settings = VoiceSettings::default();
        let args = synth.args("hi", &settings);
        assert_eq!(args[0], "-r");
        assert_eq!(args.last().unwrap(), "hi");
    }

    #[test]
    fn test_pitch_clamped_to_espeak_range() {
        let synth = EspeakSynthesizer::with_binary("espeak");
        let settings = VoiceSettings {
            voice: "en".to_string(),
            rate: 1.0,
            pitch: 5.0,
        };
        let args = synth.args("x", &settings);
        assert!(args.contains(&"99".to_string()));
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let synth = EspeakSynthesizer::with_binary("espeak-ng");
        synth.stop();
        synth.stop();
    }
}
