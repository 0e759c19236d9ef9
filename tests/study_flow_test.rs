//! End-to-end study flow over mock transport: course selection, chapter
//! selection, topic lists and the answer slot lifecycle.

mod common;

use common::{pump_one, stub_generate, test_app};
use vidya::adapters::mock::{MockHttpClient, MockResponse};
use vidya::app::Screen;
use vidya::state::ActiveView;
use vidya::traits::Response;

use bytes::Bytes;

#[tokio::test]
async fn test_full_answer_flow_idle_loading_loaded() {
    let mock = MockHttpClient::new();
    stub_generate(
        &mock,
        r#"["What is a function?","How do you define a function in Python?"]"#,
    );
    let (mut app, _synth) = test_app(&mock);

    app.select_course("Computer Science", "Class 10");
    assert_eq!(app.screen, Screen::Study);

    app.select_chapter("Functions");
    pump_one(&mut app).await;

    let topics = app.state.current_topics().to_vec();
    assert_eq!(
        topics,
        vec![
            "What is a function?".to_string(),
            "How do you define a function in Python?".to_string()
        ]
    );

    app.select_topic(0);
    assert_eq!(
        app.state.selected_topic.as_deref(),
        Some("What is a function?")
    );

    // Idle before any generate action.
    let slot = &app.state.content_for("What is a function?").unwrap().answer;
    assert!(!slot.is_loading && slot.data.is_none() && slot.error.is_none());

    stub_generate(
        &mock,
        r#"{"answer":"A function is a named, reusable block of code."}"#,
    );
    app.generate_answer();

    // Loading while the fetch is outstanding.
    let slot = &app.state.content_for("What is a function?").unwrap().answer;
    assert!(slot.is_loading);
    assert!(!slot.is_loaded());

    pump_one(&mut app).await;

    // Loaded with a non-empty payload.
    let slot = &app.state.content_for("What is a function?").unwrap().answer;
    assert!(slot.is_loaded());
    assert!(!slot.data.as_deref().unwrap().is_empty());
    assert!(slot.error.is_none());
}

#[tokio::test]
async fn test_selecting_topic_never_fetches() {
    let mock = MockHttpClient::new();
    stub_generate(&mock, r#"["Topic A"]"#);
    let (mut app, _synth) = test_app(&mock);

    app.select_course("Science", "Class 9");
    app.select_chapter("Motion");
    pump_one(&mut app).await;
    let before = mock.request_count();

    app.select_topic(0);
    assert_eq!(mock.request_count(), before);
}

#[tokio::test]
async fn test_second_topics_fetch_excludes_existing() {
    let mock = MockHttpClient::new();
    stub_generate(&mock, r#"["First topic","Second topic"]"#);
    let (mut app, _synth) = test_app(&mock);

    app.select_course("Science", "Class 9");
    app.select_chapter("Sound");
    pump_one(&mut app).await;

    stub_generate(&mock, r#"["Third topic"]"#);
    app.fetch_more_topics();
    pump_one(&mut app).await;

    let requests = mock.requests();
    let second = &requests[1].body;
    assert!(second.contains("First topic"));
    assert!(second.contains("Second topic"));

    assert_eq!(
        app.state.current_topics(),
        &[
            "First topic".to_string(),
            "Second topic".to_string(),
            "Third topic".to_string()
        ]
    );
}

#[tokio::test]
async fn test_empty_topics_sets_exhaustion_and_keeps_list() {
    let mock = MockHttpClient::new();
    stub_generate(&mock, r#"["Only topic"]"#);
    let (mut app, _synth) = test_app(&mock);

    app.select_course("Science", "Class 9");
    app.select_chapter("Gravitation");
    pump_one(&mut app).await;

    stub_generate(&mock, "[]");
    app.fetch_more_topics();
    pump_one(&mut app).await;

    let chapter = app.state.chapters.get("Gravitation").unwrap();
    assert!(chapter.no_more_topics);
    assert_eq!(chapter.topics, vec!["Only topic".to_string()]);

    // Exhausted chapters are not fetched again.
    let before = mock.request_count();
    app.fetch_more_topics();
    assert_eq!(mock.request_count(), before);
}

#[tokio::test]
async fn test_topics_fetch_is_single_flight_per_chapter() {
    let mock = MockHttpClient::new();
    stub_generate(&mock, r#"["T1"]"#);
    let (mut app, _synth) = test_app(&mock);

    app.select_course("Science", "Class 9");
    app.select_chapter("Motion");
    app.fetch_more_topics();
    app.fetch_more_topics();
    pump_one(&mut app).await;

    // Only the select_chapter fetch went out.
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_cached_chapter_not_refetched_on_reselect() {
    let mock = MockHttpClient::new();
    stub_generate(&mock, r#"["T1"]"#);
    let (mut app, _synth) = test_app(&mock);

    app.select_course("Science", "Class 9");
    app.select_chapter("Motion");
    pump_one(&mut app).await;
    let before = mock.request_count();

    app.select_chapter("Motion");
    assert_eq!(mock.request_count(), before);
}

#[tokio::test]
async fn test_topics_failure_lands_on_global_error() {
    let mock = MockHttpClient::new();
    mock.set_response(
        ":generateContent",
        MockResponse::Success(Response::new(500, Bytes::from("overloaded"))),
    );
    let (mut app, _synth) = test_app(&mock);

    app.select_course("Science", "Class 9");
    app.select_chapter("Motion");
    pump_one(&mut app).await;

    let error = app.global_error.as_deref().unwrap();
    assert!(error.contains("Motion"));
    assert!(app.state.current_topics().is_empty());
}

#[tokio::test]
async fn test_course_reset_discards_late_completions() {
    let mock = MockHttpClient::new();
    stub_generate(&mock, r#"["Late topic"]"#);
    let (mut app, _synth) = test_app(&mock);

    app.select_course("Science", "Class 9");
    app.select_chapter("Motion");

    // Reset while the fetch is still outstanding.
    app.reset_course();
    assert_eq!(app.screen, Screen::CourseSelect);

    pump_one(&mut app).await;

    // The stale completion must not repopulate the cleared store.
    assert!(app.state.chapters.is_empty());
    assert!(app.state.current_topics().is_empty());
}

#[tokio::test]
async fn test_active_view_is_pure_selection() {
    let mock = MockHttpClient::new();
    stub_generate(&mock, r#"["T1"]"#);
    let (mut app, _synth) = test_app(&mock);

    app.select_course("Science", "Class 9");
    app.select_chapter("Motion");
    pump_one(&mut app).await;
    app.select_topic(0);

    let before = mock.request_count();
    app.set_active_view(ActiveView::Quiz);
    app.set_active_view(ActiveView::Eli5);

    assert_eq!(mock.request_count(), before);
    assert_eq!(
        app.state.content_for("T1").unwrap().active_view,
        ActiveView::Eli5
    );
}
