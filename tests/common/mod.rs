//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use vidya::adapters::mock::{MockHttpClient, MockResponse, MockSynthesizer};
use vidya::app::App;
use vidya::config::Config;
use vidya::storage::{MemoryStorage, Store};
use vidya::traits::Response;

/// Build an app over mock transport, mock speech and in-memory storage.
pub fn test_app(mock: &MockHttpClient) -> (App<MockHttpClient>, MockSynthesizer) {
    let synth = MockSynthesizer::new();
    let app = App::new(
        Config::with_keys("test-llm-key", Some("test-image-key".to_string())),
        Store::new(Box::new(MemoryStorage::new())),
        Arc::new(mock.clone()),
        Arc::new(synth.clone()),
    );
    (app, synth)
}

/// Receive one async message (with a timeout) and apply it.
pub async fn pump_one(app: &mut App<MockHttpClient>) {
    let rx = app.message_rx.as_mut().expect("receiver taken");
    let msg = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("message channel closed");
    app.handle_message(msg);
}

/// Wrap structured JSON the way the text service returns it: as the text
/// of the first candidate.
pub fn envelope(inner_json: &str) -> Bytes {
    Bytes::from(
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": inner_json}]}
            }]
        })
        .to_string(),
    )
}

/// Configure the mock to answer every generateContent call with the
/// given structured payload.
pub fn stub_generate(mock: &MockHttpClient, inner_json: &str) {
    mock.set_response(
        ":generateContent",
        MockResponse::Success(Response::new(200, envelope(inner_json))),
    );
}

/// One SSE-framed streaming chunk carrying a text fragment.
pub fn sse_chunk(text: &str) -> Bytes {
    Bytes::from(format!(
        "data: {}\r\n\r\n",
        serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        })
    ))
}
