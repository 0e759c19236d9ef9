//! User-action handlers.
//!
//! Each handler maps one explicit user action onto state mutations and,
//! where needed, a spawned client call that reports back through the
//! message channel. Content fetches are strict single-flight per slot:
//! a generate action is a no-op while that slot is loading, and a slot
//! that already holds data only switches the view.

use std::sync::Arc;

use crate::catalog;
use crate::llm::prompts;
use crate::state::{ActiveView, ChatEntry};
use crate::traits::HttpClient;

use super::{App, AppMessage, CourseStage, Focus, Screen};

impl<C: HttpClient + 'static> App<C> {
    // =====================================================================
    // Course selection
    // =====================================================================

    /// Commit the course selection and enter the study screen.
    pub fn select_course(&mut self, subject: &str, standard: &str) {
        if catalog::chapters_for(subject, standard).is_none() {
            self.global_error = Some(format!(
                "No chapters available for {} {}",
                subject, standard
            ));
            return;
        }
        self.state.select_course(subject, standard);
        self.screen = Screen::Study;
        self.focus = Focus::Chapters;
        self.chapter_cursor = 0;
        self.recreate_chat_session();
        self.persist();
        self.mark_dirty();
    }

    /// Full teardown: persisted store and every piece of ephemeral state.
    pub fn reset_course(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.state.reset();
        if let Err(e) = self.store.clear_state() {
            tracing::warn!(error = %e, "failed to clear persisted state");
        }
        self.chat = None;
        self.transcript.clear();
        self.chat_streaming = false;
        self.chat_input.clear();
        self.speech.stop();
        self.pending_speech = None;
        self.topics_in_flight.clear();
        self.global_error = None;
        self.screen = Screen::CourseSelect;
        self.course_stage = CourseStage::Subject;
        self.subject_cursor = 0;
        self.standard_cursor = 0;
        self.chapter_cursor = 0;
        self.topic_cursor = 0;
        self.mark_dirty();
    }

    // =====================================================================
    // Chapters and topics
    // =====================================================================

    /// Chapters of the selected course, from the static catalog.
    pub fn chapters(&self) -> &'static [&'static str] {
        catalog::chapters_for(&self.state.selection.subject, &self.state.selection.standard)
            .unwrap_or(&[])
    }

    /// Select a chapter: reset the topic selection, reseed the chat
    /// session with a greeting, and fetch topics if none are cached.
    pub fn select_chapter(&mut self, chapter: &str) {
        self.state.select_chapter(chapter);
        self.topic_cursor = 0;
        self.recreate_chat_session();
        self.transcript.clear();
        self.transcript.push(ChatEntry::model(prompts::greeting(chapter)));

        let needs_fetch = {
            let entry = self.state.chapter_mut(chapter);
            entry.topics.is_empty() && !entry.no_more_topics
        };
        if needs_fetch {
            self.spawn_topics_fetch(chapter.to_string());
        }
        self.persist();
        self.mark_dirty();
    }

    /// Explicit "more topics" action for the selected chapter.
    pub fn fetch_more_topics(&mut self) {
        let Some(chapter) = self.state.selected_chapter.clone() else {
            return;
        };
        if self.state.chapter_mut(&chapter).no_more_topics {
            return;
        }
        self.spawn_topics_fetch(chapter);
    }

    /// Spawn a topic-list fetch, guarded per chapter.
    fn spawn_topics_fetch(&mut self, chapter: String) {
        if !self.topics_in_flight.insert(chapter.clone()) {
            return;
        }

        let llm = Arc::clone(&self.llm);
        let tx = self.message_tx.clone();
        let generation = self.generation;
        let subject = self.state.selection.subject.clone();
        let standard = self.state.selection.standard.clone();
        let existing = self.state.chapter_mut(&chapter).topics.clone();

        tokio::spawn(async move {
            match llm
                .fetch_topics(&chapter, &standard, &subject, &existing)
                .await
            {
                Ok(topics) => {
                    let _ = tx.send(AppMessage::TopicsLoaded {
                        chapter,
                        generation,
                        topics,
                    });
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::TopicsFailed {
                        chapter,
                        generation,
                        error: e.user_message(),
                    });
                }
            }
        });
    }

    /// Select a topic by index in the current chapter's list. Never
    /// triggers a fetch.
    pub fn select_topic(&mut self, index: usize) {
        let Some(topic) = self.state.current_topics().get(index).cloned() else {
            return;
        };
        self.state.selected_topic = Some(topic.clone());
        self.state.content_mut(&topic);
        self.quiz_cursor = 0;
        self.quiz_revealed = false;
        self.persist();
        self.mark_dirty();
    }

    // =====================================================================
    // Content generation
    // =====================================================================

    /// Switch the displayed slot for the selected topic.
    pub fn set_active_view(&mut self, view: ActiveView) {
        let Some(topic) = self.state.selected_topic.clone() else {
            return;
        };
        self.state.content_mut(&topic).active_view = view;
        self.persist();
        self.mark_dirty();
    }

    /// Generate the explanation for the selected topic.
    pub fn generate_answer(&mut self) {
        let Some(topic) = self.state.selected_topic.clone() else {
            return;
        };
        self.set_active_view(ActiveView::Answer);

        let slot = &mut self.state.content_mut(&topic).answer;
        if slot.is_loading || slot.data.is_some() {
            return;
        }
        slot.begin();
        self.persist();

        let llm = Arc::clone(&self.llm);
        let tx = self.message_tx.clone();
        let generation = self.generation;
        let subject = self.state.selection.subject.clone();
        let standard = self.state.selection.standard.clone();
        let chapter = self.state.selected_chapter.clone().unwrap_or_default();

        tokio::spawn(async move {
            match llm.fetch_answer(&topic, &chapter, &standard, &subject).await {
                Ok(text) => {
                    let _ = tx.send(AppMessage::AnswerLoaded {
                        topic,
                        generation,
                        text,
                    });
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::AnswerFailed {
                        topic,
                        generation,
                        error: e.user_message(),
                    });
                }
            }
        });
    }

    /// Generate the simplified explanation for the selected topic.
    pub fn generate_eli5(&mut self) {
        let Some(topic) = self.state.selected_topic.clone() else {
            return;
        };
        self.set_active_view(ActiveView::Eli5);

        let slot = &mut self.state.content_mut(&topic).eli5;
        if slot.is_loading || slot.data.is_some() {
            return;
        }
        slot.begin();
        self.persist();

        let llm = Arc::clone(&self.llm);
        let tx = self.message_tx.clone();
        let generation = self.generation;
        let subject = self.state.selection.subject.clone();

        tokio::spawn(async move {
            match llm.fetch_eli5(&topic, &subject).await {
                Ok(text) => {
                    let _ = tx.send(AppMessage::Eli5Loaded {
                        topic,
                        generation,
                        text,
                    });
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::Eli5Failed {
                        topic,
                        generation,
                        error: e.user_message(),
                    });
                }
            }
        });
    }

    /// Generate the quiz for the selected topic.
    pub fn generate_quiz(&mut self) {
        let Some(topic) = self.state.selected_topic.clone() else {
            return;
        };
        self.set_active_view(ActiveView::Quiz);

        let slot = &mut self.state.content_mut(&topic).mcqs;
        if slot.is_loading || slot.data.is_some() {
            return;
        }
        slot.begin();
        self.persist();

        let llm = Arc::clone(&self.llm);
        let tx = self.message_tx.clone();
        let generation = self.generation;
        let subject = self.state.selection.subject.clone();

        tokio::spawn(async move {
            match llm.fetch_quiz(&topic, &subject).await {
                Ok(mcqs) => {
                    let _ = tx.send(AppMessage::QuizLoaded {
                        topic,
                        generation,
                        mcqs,
                    });
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::QuizFailed {
                        topic,
                        generation,
                        error: e.user_message(),
                    });
                }
            }
        });
    }

    /// Generate the illustration for the selected topic.
    pub fn generate_image(&mut self) {
        let Some(topic) = self.state.selected_topic.clone() else {
            return;
        };
        self.set_active_view(ActiveView::Image);

        let slot = &mut self.state.content_mut(&topic).image;
        if slot.is_loading || slot.data.is_some() {
            return;
        }
        slot.begin();
        self.persist();

        let llm = Arc::clone(&self.llm);
        let image = Arc::clone(&self.image);
        let tx = self.message_tx.clone();
        let generation = self.generation;
        let subject = self.state.selection.subject.clone();

        tokio::spawn(async move {
            match image.generate(&llm, &topic, &subject).await {
                Ok(base64) => {
                    let _ = tx.send(AppMessage::ImageLoaded {
                        topic,
                        generation,
                        base64,
                    });
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::ImageFailed {
                        topic,
                        generation,
                        error: e.user_message(),
                    });
                }
            }
        });
    }

    // =====================================================================
    // Speech
    // =====================================================================

    /// Toggle read-aloud for the selected topic.
    ///
    /// If the answer text is not cached yet, the normal answer fetch
    /// runs first and speech starts when it lands; a failed fetch
    /// abandons playback silently.
    pub fn speak_selected_topic(&mut self) {
        let Some(topic) = self.state.selected_topic.clone() else {
            return;
        };

        if self.speech.is_speaking(&topic) {
            self.speech.stop();
            self.mark_dirty();
            return;
        }

        let cached = self
            .state
            .content_for(&topic)
            .and_then(|c| {
                if c.answer.is_loaded() {
                    c.answer.data.clone()
                } else {
                    None
                }
            });

        match cached {
            Some(text) => {
                let voice = self.voice.clone();
                self.speech.toggle(&topic, &text, &voice);
            }
            None => {
                self.pending_speech = Some(topic);
                self.generate_answer();
            }
        }
        self.mark_dirty();
    }

    // =====================================================================
    // Voice settings
    // =====================================================================

    /// Adjust the speech rate, clamped to [0.5, 2.0].
    pub fn adjust_voice_rate(&mut self, delta: f32) {
        self.voice.rate = (self.voice.rate + delta).clamp(0.5, 2.0);
        self.save_voice_settings();
    }

    /// Adjust the speech pitch, clamped to [0.5, 2.0].
    pub fn adjust_voice_pitch(&mut self, delta: f32) {
        self.voice.pitch = (self.voice.pitch + delta).clamp(0.5, 2.0);
        self.save_voice_settings();
    }

    fn save_voice_settings(&mut self) {
        if let Err(e) = self.store.save_voice(&self.voice) {
            tracing::warn!(error = %e, "failed to persist voice settings");
        }
        self.mark_dirty();
    }

    // =====================================================================
    // Quiz navigation (pure view state over fetched data)
    // =====================================================================

    /// Move to the next quiz question, hiding any revealed answer.
    pub fn quiz_next(&mut self) {
        let Some(topic) = self.state.selected_topic.as_deref() else {
            return;
        };
        let count = self
            .state
            .content_for(topic)
            .and_then(|c| c.mcqs.data.as_ref())
            .map(|m| m.len())
            .unwrap_or(0);
        if count > 0 && self.quiz_cursor + 1 < count {
            self.quiz_cursor += 1;
            self.quiz_revealed = false;
            self.mark_dirty();
        }
    }

    /// Move to the previous quiz question.
    pub fn quiz_prev(&mut self) {
        if self.quiz_cursor > 0 {
            self.quiz_cursor -= 1;
            self.quiz_revealed = false;
            self.mark_dirty();
        }
    }

    /// Reveal the correct answer of the current question.
    pub fn quiz_reveal(&mut self) {
        self.quiz_revealed = true;
        self.mark_dirty();
    }
}
