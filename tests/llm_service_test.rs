//! HTTP-level client tests against a local mock server, driving the
//! production reqwest adapter end to end.

use std::sync::Arc;

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vidya::adapters::ReqwestHttpClient;
use vidya::error::{ImageError, LlmError};
use vidya::imagegen::{ImageClient, IMAGE_MODEL};
use vidya::llm::{LlmClient, TEXT_MODEL};

fn envelope(inner_json: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": inner_json}]}
        }]
    })
}

fn llm_client(server: &MockServer) -> LlmClient<ReqwestHttpClient> {
    LlmClient::new(
        Arc::new(ReqwestHttpClient::new()),
        "test-key",
        server.uri(),
    )
}

#[tokio::test]
async fn test_fetch_topics_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1beta/models/{}:generateContent",
            TEXT_MODEL
        )))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(r#"["What is a function?"]"#)),
        )
        .mount(&server)
        .await;

    let client = llm_client(&server);
    let topics = client
        .fetch_topics("Functions", "Class 10", "Computer Science", &[])
        .await
        .unwrap();
    assert_eq!(topics, vec!["What is a function?".to_string()]);
}

#[tokio::test]
async fn test_request_carries_schema_and_thinking_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("responseSchema"))
        .and(body_string_contains("thinkingBudget"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("[]")))
        .expect(1)
        .mount(&server)
        .await;

    let client = llm_client(&server);
    client
        .fetch_topics("Functions", "Class 10", "Computer Science", &[])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_server_error_is_scoped_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let client = llm_client(&server);
    let err = client
        .fetch_answer("Photosynthesis", "Life Processes", "Class 10", "Science")
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::HttpStatus { status: 429, .. }));
    assert!(err.to_string().contains("Photosynthesis"));
}

#[tokio::test]
async fn test_image_generation_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1beta/models/{}:generateContent",
            TEXT_MODEL
        )))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(r#"{"prompt":"a red blood cell"}"#)),
        )
        .mount(&server)
        .await;

    use base64::Engine;
    let payload = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3]);
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(body_string_contains(IMAGE_MODEL))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"data": [{"b64_json": payload}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let http = Arc::new(ReqwestHttpClient::new());
    let llm = LlmClient::new(Arc::clone(&http), "test-key", server.uri());
    let image = ImageClient::new(http, Some("img-key".to_string()), server.uri());

    let b64 = image.generate(&llm, "Blood", "Science").await.unwrap();
    assert_eq!(b64, payload);
}

#[tokio::test]
async fn test_image_503_maps_to_warming_up_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1beta/models/{}:generateContent",
            TEXT_MODEL
        )))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(r#"{"prompt":"a cell"}"#)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
        .mount(&server)
        .await;

    let http = Arc::new(ReqwestHttpClient::new());
    let llm = LlmClient::new(Arc::clone(&http), "test-key", server.uri());
    let image = ImageClient::new(http, Some("img-key".to_string()), server.uri());

    let err = image.generate(&llm, "Cells", "Science").await.unwrap_err();
    assert_eq!(err, ImageError::WarmingUp);
}

#[tokio::test]
async fn test_chat_stream_over_http() {
    use futures_util::StreamExt;

    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hello\"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\" student\"}]}}]}\n\n",
    );
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1beta/models/{}:streamGenerateContent",
            TEXT_MODEL
        )))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let client = llm_client(&server);
    let mut session = client.create_chat("Class 10", "Science", None);
    session.push_user("hi");

    let mut stream = client.stream_chat(&session).await.unwrap();
    let mut reply = String::new();
    while let Some(fragment) = stream.next().await {
        reply.push_str(&fragment.unwrap());
    }
    assert_eq!(reply, "Hello student");
}
