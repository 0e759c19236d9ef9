//! Read-aloud flow: single-flight toggling and the
//! fetch-answer-then-speak path.

mod common;

use common::{pump_one, stub_generate, test_app};
use vidya::adapters::mock::{MockHttpClient, MockResponse, SpeechCall};
use vidya::speech::SpeechStatus;
use vidya::traits::Response;

use bytes::Bytes;

async fn setup_two_topics() -> (
    MockHttpClient,
    vidya::app::App<MockHttpClient>,
    vidya::adapters::mock::MockSynthesizer,
) {
    let mock = MockHttpClient::new();
    stub_generate(&mock, r#"["Topic one","Topic two"]"#);
    let (mut app, synth) = test_app(&mock);
    app.select_course("Science", "Class 9");
    app.select_chapter("Sound");
    pump_one(&mut app).await;
    (mock, app, synth)
}

#[tokio::test]
async fn test_toggle_twice_returns_to_idle() {
    let (mock, mut app, _synth) = setup_two_topics().await;
    app.select_topic(0);

    stub_generate(&mock, r#"{"answer":"Sound travels in waves."}"#);
    app.speak_selected_topic();
    pump_one(&mut app).await;
    assert!(app.speech.is_speaking("Topic one"));

    app.speak_selected_topic();
    assert_eq!(*app.speech.status(), SpeechStatus::Idle);
}

#[tokio::test]
async fn test_speak_uses_cached_answer_without_refetch() {
    let (mock, mut app, synth) = setup_two_topics().await;
    app.select_topic(0);

    stub_generate(&mock, r#"{"answer":"Cached answer text."}"#);
    app.generate_answer();
    pump_one(&mut app).await;
    let before = mock.request_count();

    app.speak_selected_topic();
    assert_eq!(mock.request_count(), before);
    assert!(matches!(
        synth.calls().last().unwrap(),
        SpeechCall::Start { text, .. } if text == "Cached answer text."
    ));
}

#[tokio::test]
async fn test_speak_fetches_missing_answer_first() {
    let (mock, mut app, synth) = setup_two_topics().await;
    app.select_topic(0);

    stub_generate(&mock, r#"{"answer":"Fetched before speaking."}"#);
    app.speak_selected_topic();

    // Not speaking yet: the answer fetch is in flight.
    assert_eq!(*app.speech.status(), SpeechStatus::Idle);
    assert!(synth.calls().is_empty());

    pump_one(&mut app).await;

    assert!(app.speech.is_speaking("Topic one"));
    assert!(app
        .state
        .content_for("Topic one")
        .unwrap()
        .answer
        .is_loaded());
}

#[tokio::test]
async fn test_failed_answer_fetch_abandons_playback_silently() {
    let (mock, mut app, synth) = setup_two_topics().await;
    app.select_topic(0);

    mock.set_response(
        ":generateContent",
        MockResponse::Success(Response::new(500, Bytes::from("overloaded"))),
    );
    app.speak_selected_topic();
    pump_one(&mut app).await;

    // Idle, nothing spoken, no global error through this path.
    assert_eq!(*app.speech.status(), SpeechStatus::Idle);
    assert!(synth.calls().is_empty());
    assert!(app.global_error.is_none());
}

#[tokio::test]
async fn test_speaking_other_topic_cancels_prior() {
    let (mock, mut app, synth) = setup_two_topics().await;

    stub_generate(&mock, r#"{"answer":"Some answer."}"#);
    app.select_topic(0);
    app.speak_selected_topic();
    pump_one(&mut app).await;
    assert!(app.speech.is_speaking("Topic one"));

    app.select_topic(1);
    app.speak_selected_topic();
    pump_one(&mut app).await;

    assert!(app.speech.is_speaking("Topic two"));
    let calls = synth.calls();
    let stops = calls.iter().filter(|c| **c == SpeechCall::Stop).count();
    assert_eq!(stops, 1);
    assert!(matches!(calls.last().unwrap(), SpeechCall::Start { .. }));
}
