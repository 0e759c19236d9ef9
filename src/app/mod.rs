//! Application orchestration.
//!
//! [`App`] owns the state store, the external clients, the message
//! channel and all ephemeral UI state. User actions are handled in
//! `handlers`; chat streaming lives in `chat`; async completions arrive
//! as [`AppMessage`]s and are applied here, on the main loop, which is
//! the only place the state store is mutated.

mod chat;
mod handlers;
mod messages;

pub use messages::AppMessage;

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::Config;
use crate::imagegen::ImageClient;
use crate::llm::{ChatSession, LlmClient};
use crate::speech::SpeechController;
use crate::state::{ChatEntry, StudyState, VoiceSettings};
use crate::storage::{Store, THEME_KEY};
use crate::traits::{HttpClient, Synthesizer};
use crate::ui::theme::ThemeMode;

/// Which top-level screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    CourseSelect,
    Study,
}

/// Course-selection sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStage {
    Subject,
    Standard,
}

/// Which pane has keyboard focus on the study screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Chapters,
    Topics,
    Content,
    Chat,
}

/// Application state and orchestration.
pub struct App<C: HttpClient + 'static> {
    /// Environment configuration
    pub config: Config,
    /// Persisted store facade
    pub store: Store,
    /// The single source of truth for study data
    pub state: StudyState,
    /// LLM client
    pub llm: Arc<LlmClient<C>>,
    /// Image-generation client
    pub image: Arc<ImageClient<C>>,
    /// Speech controller
    pub speech: SpeechController,
    /// Voice settings (persisted under their own key)
    pub voice: VoiceSettings,
    /// Theme preference (persisted under its own key)
    pub theme: ThemeMode,

    /// Current chat session; recreated on course/chapter changes
    pub chat: Option<ChatSession>,
    /// Local transcript; last entry mutates in place while streaming
    pub transcript: Vec<ChatEntry>,
    /// A chat reply is currently streaming
    pub chat_streaming: bool,
    /// Topic waiting for its answer fetch before speech starts
    pub pending_speech: Option<String>,
    /// Chapters with a topic-list fetch outstanding
    pub topics_in_flight: HashSet<String>,
    /// Course generation; bumped on reset so stale completions are
    /// recognized and discarded
    pub generation: u64,
    /// Global error line (topic-list and generic failures)
    pub global_error: Option<String>,

    /// Sender cloned into every spawned fetch
    pub message_tx: mpsc::UnboundedSender<AppMessage>,
    /// Receiver; taken by the event loop
    pub message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,

    // View state
    pub screen: Screen,
    pub course_stage: CourseStage,
    pub focus: Focus,
    pub subject_cursor: usize,
    pub standard_cursor: usize,
    pub chapter_cursor: usize,
    pub topic_cursor: usize,
    pub quiz_cursor: usize,
    pub quiz_revealed: bool,
    pub chat_input: String,
    pub should_quit: bool,
    pub needs_redraw: bool,
    pub tick_count: u64,
}

impl<C: HttpClient + 'static> App<C> {
    /// Build the application from its injected pieces.
    ///
    /// Loads persisted state, theme and voice settings; resumes on the
    /// study screen when a course was already selected.
    pub fn new(
        config: Config,
        store: Store,
        http: Arc<C>,
        synth: Arc<dyn Synthesizer>,
    ) -> Self {
        let llm = Arc::new(LlmClient::new(
            Arc::clone(&http),
            config.llm_api_key.clone(),
            config.llm_base_url.clone(),
        ));
        let image = Arc::new(ImageClient::new(
            http,
            config.image_api_key.clone(),
            config.image_base_url.clone(),
        ));

        let state = store.load_state();
        let voice = store.load_voice();
        let theme = store.load_json::<ThemeMode>(THEME_KEY).unwrap_or_default();

        let (message_tx, message_rx) = mpsc::unbounded_channel();

        let screen = if state.selection.is_course_selected {
            Screen::Study
        } else {
            Screen::CourseSelect
        };

        let mut app = Self {
            config,
            store,
            state,
            llm,
            image,
            speech: SpeechController::new(synth),
            voice,
            theme,
            chat: None,
            transcript: Vec::new(),
            chat_streaming: false,
            pending_speech: None,
            topics_in_flight: HashSet::new(),
            generation: 0,
            global_error: None,
            message_tx,
            message_rx: Some(message_rx),
            screen,
            course_stage: CourseStage::Subject,
            focus: Focus::Chapters,
            subject_cursor: 0,
            standard_cursor: 0,
            chapter_cursor: 0,
            topic_cursor: 0,
            quiz_cursor: 0,
            quiz_revealed: false,
            chat_input: String::new(),
            should_quit: false,
            needs_redraw: true,
            tick_count: 0,
        };

        // Rebuild the ephemeral chat context for a resumed course.
        if app.screen == Screen::Study {
            app.recreate_chat_session();
        }
        app
    }

    /// Advance the animation tick.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    /// Request a redraw on the next loop iteration.
    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    /// Request application exit.
    pub fn quit(&mut self) {
        self.speech.stop();
        self.should_quit = true;
    }

    /// Persist the full state blob; failures land on the global error
    /// line rather than interrupting the session.
    pub fn persist(&mut self) {
        if let Err(e) = self.store.save_state(&self.state) {
            tracing::warn!(error = %e, "failed to persist state");
            self.global_error = Some(format!("Could not save progress: {}", e));
        }
    }

    /// Create a fresh chat session for the current selection, scoped to
    /// the selected chapter when there is one.
    pub fn recreate_chat_session(&mut self) {
        let selection = self.state.selection.clone();
        if !selection.is_course_selected {
            self.chat = None;
            return;
        }
        self.chat = Some(self.llm.create_chat(
            &selection.standard,
            &selection.subject,
            self.state.selected_chapter.as_deref(),
        ));
        self.chat_streaming = false;
    }

    /// Apply one async completion to the state store.
    pub fn handle_message(&mut self, msg: AppMessage) {
        self.mark_dirty();
        match msg {
            AppMessage::TopicsLoaded {
                chapter,
                generation,
                topics,
            } => {
                self.topics_in_flight.remove(&chapter);
                if generation != self.generation {
                    tracing::debug!(chapter, "discarding stale topic list");
                    return;
                }
                let entry = self.state.chapter_mut(&chapter);
                if topics.is_empty() {
                    entry.no_more_topics = true;
                } else {
                    entry.topics.extend(topics);
                }
                self.persist();
            }
            AppMessage::TopicsFailed {
                chapter,
                generation,
                error,
            } => {
                self.topics_in_flight.remove(&chapter);
                if generation != self.generation {
                    return;
                }
                self.global_error = Some(error);
            }
            AppMessage::AnswerLoaded {
                topic,
                generation,
                text,
            } => {
                if generation != self.generation {
                    return;
                }
                self.state.content_mut(&topic).answer.resolve(text.clone());
                self.persist();
                if self.pending_speech.as_deref() == Some(topic.as_str()) {
                    self.pending_speech = None;
                    let voice = self.voice.clone();
                    self.speech.toggle(&topic, &text, &voice);
                }
            }
            AppMessage::AnswerFailed {
                topic,
                generation,
                error,
            } => {
                if generation != self.generation {
                    return;
                }
                self.state.content_mut(&topic).answer.reject(error);
                self.persist();
                // Speech is abandoned silently when the fetch fails.
                if self.pending_speech.as_deref() == Some(topic.as_str()) {
                    self.pending_speech = None;
                }
            }
            AppMessage::Eli5Loaded {
                topic,
                generation,
                text,
            } => {
                if generation != self.generation {
                    return;
                }
                self.state.content_mut(&topic).eli5.resolve(text);
                self.persist();
            }
            AppMessage::Eli5Failed {
                topic,
                generation,
                error,
            } => {
                if generation != self.generation {
                    return;
                }
                self.state.content_mut(&topic).eli5.reject(error);
                self.persist();
            }
            AppMessage::QuizLoaded {
                topic,
                generation,
                mcqs,
            } => {
                if generation != self.generation {
                    return;
                }
                self.state.content_mut(&topic).mcqs.resolve(mcqs);
                self.quiz_cursor = 0;
                self.quiz_revealed = false;
                self.persist();
            }
            AppMessage::QuizFailed {
                topic,
                generation,
                error,
            } => {
                if generation != self.generation {
                    return;
                }
                self.state.content_mut(&topic).mcqs.reject(error);
                self.persist();
            }
            AppMessage::ImageLoaded {
                topic,
                generation,
                base64,
            } => {
                if generation != self.generation {
                    return;
                }
                self.state.content_mut(&topic).image.resolve(base64);
                self.persist();
            }
            AppMessage::ImageFailed {
                topic,
                generation,
                error,
            } => {
                if generation != self.generation {
                    return;
                }
                self.state.content_mut(&topic).image.reject(error);
                self.persist();
            }
            AppMessage::ChatToken { session_id, token } => {
                if self.chat.as_ref().map(|s| s.id) != Some(session_id) {
                    return;
                }
                if let Some(last) = self.transcript.last_mut() {
                    last.text.push_str(&token);
                }
            }
            AppMessage::ChatComplete { session_id } => {
                if self.chat.as_ref().map(|s| s.id) != Some(session_id) {
                    return;
                }
                self.chat_streaming = false;
                let reply = self
                    .transcript
                    .last()
                    .map(|e| e.text.clone())
                    .unwrap_or_default();
                if let Some(session) = self.chat.as_mut() {
                    session.push_model(reply);
                }
            }
            AppMessage::ChatFailed { session_id, error } => {
                if self.chat.as_ref().map(|s| s.id) != Some(session_id) {
                    return;
                }
                self.chat_streaming = false;
                if let Some(last) = self.transcript.last_mut() {
                    if last.text.is_empty() {
                        last.text = error;
                    } else {
                        // Fragments already delivered stay; the error
                        // replaces only the remainder.
                        last.text.push_str("\n\n");
                        last.text.push_str(&error);
                    }
                }
            }
        }
    }

    /// Whether any fetch or stream is outstanding (used to keep the
    /// render loop ticking for spinners).
    pub fn is_busy(&self) -> bool {
        if self.chat_streaming || !self.topics_in_flight.is_empty() {
            return true;
        }
        self.state.content.values().any(|c| {
            c.answer.is_loading || c.image.is_loading || c.mcqs.is_loading || c.eli5.is_loading
        })
    }

    /// Toggle the theme and persist the preference.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(e) = self.store.save_json(THEME_KEY, &self.theme) {
            tracing::warn!(error = %e, "failed to persist theme");
        }
        self.mark_dirty();
    }
}
