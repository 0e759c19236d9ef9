//! Application state store.
//!
//! [`StudyState`] is the single source of truth for everything the user
//! has selected or generated. It is serialized in full to persisted
//! storage on every mutation; nothing here is derived or cached
//! elsewhere.
//!
//! The ephemeral pieces (chat session handle, transcript, speech status)
//! live on the `App` and are rebuilt on restart.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user's chosen curriculum scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub subject: String,
    pub standard: String,
    pub is_course_selected: bool,
}

/// One independently tracked content fetch.
///
/// Invariant: `is_loading` is never true at the same time as a `data` or
/// `error` written by the same request; an error from a later fetch does
/// not clear data from an earlier successful one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot<T> {
    pub is_loading: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            is_loading: false,
            data: None,
            error: None,
        }
    }
}

impl<T> Slot<T> {
    /// A slot counts as loaded only when it is not loading and has data.
    pub fn is_loaded(&self) -> bool {
        !self.is_loading && self.data.is_some()
    }

    /// Mark the slot as loading; clears a stale error, keeps prior data.
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Complete the fetch with data.
    pub fn resolve(&mut self, data: T) {
        self.is_loading = false;
        self.data = Some(data);
        self.error = None;
    }

    /// Complete the fetch with an error, leaving prior data untouched.
    pub fn reject(&mut self, error: String) {
        self.is_loading = false;
        self.error = Some(error);
    }
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// Which content slot is currently displayed for a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    #[default]
    Answer,
    Image,
    Quiz,
    Eli5,
}

/// The four content slots of one topic plus its active view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicContent {
    pub answer: Slot<String>,
    /// Base64-encoded bitmap
    pub image: Slot<String>,
    pub mcqs: Slot<Vec<Mcq>>,
    pub eli5: Slot<String>,
    pub active_view: ActiveView,
}

impl TopicContent {
    /// Access a slot's loading flag by view, for in-flight checks.
    pub fn is_view_loading(&self, view: ActiveView) -> bool {
        match view {
            ActiveView::Answer => self.answer.is_loading,
            ActiveView::Image => self.image.is_loading,
            ActiveView::Quiz => self.mcqs.is_loading,
            ActiveView::Eli5 => self.eli5.is_loading,
        }
    }
}

/// Per-chapter topic list state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterState {
    /// Ordered, append-only list of topic strings.
    pub topics: Vec<String>,
    /// Set when the model signals it has no further distinct topics.
    pub no_more_topics: bool,
}

/// Role of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Model,
}

/// One entry of the local chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ChatEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Voice settings passed opaquely to the speech synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub voice: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice: "en".to_string(),
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

/// The persisted application state: selection, chapters, topics, content
/// and active views. Serialized verbatim as one JSON blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyState {
    pub selection: Selection,
    pub selected_chapter: Option<String>,
    pub selected_topic: Option<String>,
    /// Keyed by chapter name.
    pub chapters: HashMap<String, ChapterState>,
    /// Keyed by topic string.
    pub content: HashMap<String, TopicContent>,
}

impl StudyState {
    /// Record the course selection.
    pub fn select_course(&mut self, subject: impl Into<String>, standard: impl Into<String>) {
        self.selection = Selection {
            subject: subject.into(),
            standard: standard.into(),
            is_course_selected: true,
        };
    }

    /// Full teardown: every field back to default.
    pub fn reset(&mut self) {
        *self = StudyState::default();
    }

    /// Select a chapter, clearing the selected topic.
    pub fn select_chapter(&mut self, chapter: impl Into<String>) {
        self.selected_chapter = Some(chapter.into());
        self.selected_topic = None;
    }

    /// Chapter state, creating the entry on first access.
    pub fn chapter_mut(&mut self, chapter: &str) -> &mut ChapterState {
        self.chapters.entry(chapter.to_string()).or_default()
    }

    /// Topic content, creating the entry on first access.
    pub fn content_mut(&mut self, topic: &str) -> &mut TopicContent {
        self.content.entry(topic.to_string()).or_default()
    }

    /// Topic content, read-only.
    pub fn content_for(&self, topic: &str) -> Option<&TopicContent> {
        self.content.get(topic)
    }

    /// Topics of the currently selected chapter.
    pub fn current_topics(&self) -> &[String] {
        self.selected_chapter
            .as_deref()
            .and_then(|c| self.chapters.get(c))
            .map(|c| c.topics.as_slice())
            .unwrap_or(&[])
    }
}
