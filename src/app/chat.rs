//! Chat submission and fragment-stream consumption.
//!
//! Submitting a message appends a user entry plus an empty model entry
//! to the transcript, records the user turn on the session, and spawns a
//! task that pumps the fragment stream back through the message channel.
//! The main loop mutates the last transcript entry in place as tokens
//! arrive.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::llm::FragmentStream;
use crate::state::ChatEntry;
use crate::traits::HttpClient;

use super::{App, AppMessage};

impl<C: HttpClient + 'static> App<C> {
    /// Submit the chat input to the tutor.
    ///
    /// No-op while a reply is already streaming, when the input is
    /// empty, or before a session exists.
    pub fn submit_chat(&mut self) {
        let text = self.chat_input.trim().to_string();
        if text.is_empty() || self.chat_streaming {
            return;
        }
        let Some(session) = self.chat.as_mut() else {
            return;
        };

        session.push_user(text.clone());
        let snapshot = session.clone();
        let session_id = session.id;

        self.chat_input.clear();
        self.transcript.push(ChatEntry::user(text));
        self.transcript.push(ChatEntry::model(String::new()));
        self.chat_streaming = true;
        self.mark_dirty();

        let llm = Arc::clone(&self.llm);
        let tx = self.message_tx.clone();

        tokio::spawn(async move {
            match llm.stream_chat(&snapshot).await {
                Ok(stream) => {
                    pump_chat(stream, &tx, session_id).await;
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::ChatFailed {
                        session_id,
                        error: e.user_message(),
                    });
                }
            }
        });
    }
}

/// Forward fragments in arrival order until the stream ends or fails.
async fn pump_chat(
    mut stream: FragmentStream,
    tx: &mpsc::UnboundedSender<AppMessage>,
    session_id: Uuid,
) {
    while let Some(item) = stream.next().await {
        match item {
            Ok(token) => {
                if tx
                    .send(AppMessage::ChatToken { session_id, token })
                    .is_err()
                {
                    return;
                }
            }
            Err(e) => {
                let _ = tx.send(AppMessage::ChatFailed {
                    session_id,
                    error: e.user_message(),
                });
                return;
            }
        }
    }
    let _ = tx.send(AppMessage::ChatComplete { session_id });
}

