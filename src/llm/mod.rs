//! External LLM client.
//!
//! Wraps the generative-text service: structured JSON generation for
//! topic lists, explanations, quizzes, simplified explanations and
//! image-prompt synthesis, plus streaming chat. Every failure is caught
//! at this boundary and re-raised as an [`LlmError`] carrying the topic
//! or chapter it was generated for; no retries are performed here.

pub mod prompts;
pub mod schema;
pub mod sse;

use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;
use futures_util::StreamExt;
use uuid::Uuid;

use crate::error::LlmError;
use crate::state::Mcq;
use crate::traits::{Headers, HttpClient, HttpError};

use schema::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};

/// Model used for all text generation.
pub const TEXT_MODEL: &str = "gemini-2.5-flash";

/// A stream of incremental chat reply fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// An externally-held chat context: fixed system framing plus the
/// accumulated turn history sent with every request.
///
/// Created fresh whenever the course/chapter selection changes.
#[derive(Debug, Clone)]
pub struct ChatSession {
    /// Identifies this session so late stream messages for a torn-down
    /// session can be recognized.
    pub id: Uuid,
    system: String,
    history: Vec<Content>,
}

impl ChatSession {
    fn new(system: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            system,
            history: Vec::new(),
        }
    }

    /// Append a user turn to the history.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.history.push(Content::user(text.into()));
    }

    /// Append a completed model turn to the history.
    pub fn push_model(&mut self, text: impl Into<String>) {
        self.history.push(Content::model(text.into()));
    }

    /// Number of turns recorded so far.
    pub fn turn_count(&self) -> usize {
        self.history.len()
    }
}

/// Client for the generative-text service.
pub struct LlmClient<C: HttpClient> {
    http: Arc<C>,
    api_key: String,
    base_url: String,
}

impl<C: HttpClient> LlmClient<C> {
    /// Create a client against a base URL with an API key.
    pub fn new(http: Arc<C>, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, TEXT_MODEL, self.api_key
        )
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, TEXT_MODEL, self.api_key
        )
    }

    /// Issue one structured-generation request and return the model's
    /// text, which is itself JSON when a response schema was attached.
    async fn generate(
        &self,
        request: &GenerateContentRequest,
        scope: &str,
    ) -> Result<String, LlmError> {
        let body = serde_json::to_string(request).map_err(|e| LlmError::Malformed {
            scope: scope.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!(scope, "sending generateContent request");
        let response = self
            .http
            .post(&self.generate_url(), &body, &Headers::new())
            .await
            .map_err(|e| transport_error(scope, e))?;

        if !response.is_success() {
            return Err(LlmError::HttpStatus {
                scope: scope.to_string(),
                status: response.status,
                message: response.text().unwrap_or_default(),
            });
        }

        let parsed: GenerateContentResponse =
            response.json().map_err(|e| LlmError::Malformed {
                scope: scope.to_string(),
                message: e.to_string(),
            })?;

        parsed.text().ok_or_else(|| LlmError::Malformed {
            scope: scope.to_string(),
            message: "response contained no candidate text".to_string(),
        })
    }

    /// Parse the JSON text of a structured response into a payload type.
    fn parse_payload<T: serde::de::DeserializeOwned>(
        text: &str,
        scope: &str,
    ) -> Result<T, LlmError> {
        serde_json::from_str(text).map_err(|e| LlmError::Malformed {
            scope: scope.to_string(),
            message: e.to_string(),
        })
    }

    /// Fetch new topics for a chapter.
    ///
    /// The prompt instructs the model not to repeat `existing`; an empty
    /// array is the exhaustion signal and is returned as-is, not as an
    /// error.
    pub async fn fetch_topics(
        &self,
        chapter: &str,
        standard: &str,
        subject: &str,
        existing: &[String],
    ) -> Result<Vec<String>, LlmError> {
        let request = GenerateContentRequest::new(prompts::topics(
            chapter, standard, subject, existing,
        ))
        .with_config(
            GenerationConfig::json_with_schema(schema::topics_schema()).with_thinking_budget(0),
        );

        let text = self.generate(&request, chapter).await?;
        Self::parse_payload(&text, chapter)
    }

    /// Fetch the explanation for a topic.
    pub async fn fetch_answer(
        &self,
        topic: &str,
        chapter: &str,
        standard: &str,
        subject: &str,
    ) -> Result<String, LlmError> {
        let request = GenerateContentRequest::new(prompts::answer(
            topic, chapter, standard, subject,
        ))
        .with_config(GenerationConfig::json_with_schema(schema::answer_schema()));

        let text = self.generate(&request, topic).await?;
        let payload: schema::AnswerPayload = Self::parse_payload(&text, topic)?;
        Ok(payload.answer)
    }

    /// Fetch the simplified ("explain like I'm 5") explanation.
    pub async fn fetch_eli5(&self, topic: &str, subject: &str) -> Result<String, LlmError> {
        let request = GenerateContentRequest::new(prompts::eli5(topic, subject))
            .with_config(GenerationConfig::json_with_schema(schema::eli5_schema()));

        let text = self.generate(&request, topic).await?;
        let payload: schema::Eli5Payload = Self::parse_payload(&text, topic)?;
        Ok(payload.explanation)
    }

    /// Fetch a quiz for a topic.
    ///
    /// An empty list is an error; so is any question whose designated
    /// correct answer does not appear among its own options.
    pub async fn fetch_quiz(&self, topic: &str, subject: &str) -> Result<Vec<Mcq>, LlmError> {
        let request = GenerateContentRequest::new(prompts::quiz(topic, subject))
            .with_config(GenerationConfig::json_with_schema(schema::quiz_schema()));

        let text = self.generate(&request, topic).await?;
        let payload: Vec<schema::McqPayload> = Self::parse_payload(&text, topic)?;

        if payload.is_empty() {
            return Err(LlmError::EmptyQuiz {
                topic: topic.to_string(),
            });
        }

        let mcqs: Vec<Mcq> = payload
            .into_iter()
            .map(|q| Mcq {
                question: q.question,
                options: q.options,
                correct_answer: q.correct_answer,
            })
            .collect();

        for mcq in &mcqs {
            if !mcq.options.contains(&mcq.correct_answer) {
                return Err(LlmError::EmptyQuiz {
                    topic: topic.to_string(),
                });
            }
        }

        Ok(mcqs)
    }

    /// Ask the model for a short, text-free visual description of a
    /// topic, used as the image-generation prompt.
    pub async fn fetch_image_prompt(
        &self,
        topic: &str,
        subject: &str,
    ) -> Result<String, LlmError> {
        let request = GenerateContentRequest::new(prompts::image_prompt(topic, subject))
            .with_config(GenerationConfig::json_with_schema(
                schema::image_prompt_schema(),
            ));

        let text = self.generate(&request, topic).await?;
        let payload: schema::ImagePromptPayload = Self::parse_payload(&text, topic)?;
        Ok(payload.prompt)
    }

    /// Create a fresh chat session with the tutor persona framing.
    ///
    /// Unscoped sessions (no chapter) are instructed to always name the
    /// relevant chapter in every answer.
    pub fn create_chat(
        &self,
        standard: &str,
        subject: &str,
        chapter: Option<&str>,
    ) -> ChatSession {
        ChatSession::new(prompts::chat_system(standard, subject, chapter))
    }

    /// Send the session's pending history and stream back the reply as
    /// ordered text fragments.
    ///
    /// The caller appends fragments in arrival order; the session's
    /// history is *not* mutated here — push the completed reply with
    /// [`ChatSession::push_model`] once the stream finishes.
    pub async fn stream_chat(&self, session: &ChatSession) -> Result<FragmentStream, LlmError> {
        let request = GenerateContentRequest {
            contents: session.history.clone(),
            system_instruction: Some(Content::system(session.system.clone())),
            generation_config: None,
        };
        let body = serde_json::to_string(&request).map_err(|e| LlmError::Malformed {
            scope: "chat".to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!(session = %session.id, turns = session.turn_count(), "opening chat stream");
        let byte_stream = self
            .http
            .post_stream(&self.stream_url(), &body, &Headers::new())
            .await
            .map_err(|e| transport_error("chat", e))?;

        let mut parser = sse::SseLineParser::new();
        let fragments = byte_stream
            .map(move |chunk| match chunk {
                Ok(bytes) => {
                    let mut out = Vec::new();
                    for data in parser.feed(&bytes) {
                        match serde_json::from_str::<GenerateContentResponse>(&data) {
                            Ok(response) => {
                                if let Some(text) = response.text() {
                                    if !text.is_empty() {
                                        out.push(Ok(text));
                                    }
                                }
                            }
                            Err(e) => out.push(Err(LlmError::StreamInterrupted {
                                message: format!("unparseable stream payload: {}", e),
                            })),
                        }
                    }
                    futures::stream::iter(out)
                }
                Err(e) => futures::stream::iter(vec![Err(LlmError::StreamInterrupted {
                    message: e.to_string(),
                })]),
            })
            .flatten();

        Ok(Box::pin(fragments))
    }
}

/// Map a transport-level HTTP error into a scoped LLM error.
fn transport_error(scope: &str, err: HttpError) -> LlmError {
    match err {
        HttpError::ServerError { status, message } => LlmError::HttpStatus {
            scope: scope.to_string(),
            status,
            message,
        },
        other => LlmError::Transport {
            scope: scope.to_string(),
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::traits::Response;
    use bytes::Bytes;

    fn client_with(mock: &MockHttpClient) -> LlmClient<MockHttpClient> {
        LlmClient::new(Arc::new(mock.clone()), "test-key", "https://llm.test")
    }

    /// Wrap a structured payload the way the service returns it: as the
    /// text of the first candidate.
    fn envelope(inner_json: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": inner_json}]}
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_fetch_topics_parses_list() {
        let mock = MockHttpClient::new();
        mock.set_response(
            ":generateContent",
            MockResponse::Success(Response::new(
                200,
                Bytes::from(envelope(r#"["What is a function?","How do you define a function in Python?"]"#)),
            )),
        );
        let client = client_with(&mock);

        let topics = client
            .fetch_topics("Functions", "Class 10", "Computer Science", &[])
            .await
            .unwrap();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0], "What is a function?");
    }

    #[tokio::test]
    async fn test_fetch_topics_sends_existing_topics_in_prompt() {
        let mock = MockHttpClient::new();
        mock.set_response(
            ":generateContent",
            MockResponse::Success(Response::new(200, Bytes::from(envelope("[]")))),
        );
        let client = client_with(&mock);

        let existing = vec!["What is a function?".to_string()];
        client
            .fetch_topics("Functions", "Class 10", "Computer Science", &existing)
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].body.contains("What is a function?"));
    }

    #[tokio::test]
    async fn test_fetch_topics_empty_is_not_an_error() {
        let mock = MockHttpClient::new();
        mock.set_response(
            ":generateContent",
            MockResponse::Success(Response::new(200, Bytes::from(envelope("[]")))),
        );
        let client = client_with(&mock);

        let topics = client
            .fetch_topics("Functions", "Class 10", "Computer Science", &[])
            .await
            .unwrap();
        assert!(topics.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_answer_unwraps_payload() {
        let mock = MockHttpClient::new();
        mock.set_response(
            ":generateContent",
            MockResponse::Success(Response::new(
                200,
                Bytes::from(envelope(r#"{"answer":"A function is a reusable block of code."}"#)),
            )),
        );
        let client = client_with(&mock);

        let answer = client
            .fetch_answer("What is a function?", "Functions", "Class 10", "Computer Science")
            .await
            .unwrap();
        assert!(answer.contains("reusable block"));
    }

    #[tokio::test]
    async fn test_fetch_quiz_empty_list_errors() {
        let mock = MockHttpClient::new();
        mock.set_response(
            ":generateContent",
            MockResponse::Success(Response::new(200, Bytes::from(envelope("[]")))),
        );
        let client = client_with(&mock);

        let err = client
            .fetch_quiz("Photosynthesis", "Science")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyQuiz { .. }));
        assert!(err.to_string().contains("invalid or empty"));
    }

    #[tokio::test]
    async fn test_fetch_quiz_correct_answer_must_be_an_option() {
        let mock = MockHttpClient::new();
        let quiz = r#"[{"question":"Q?","options":["a","b","c","d"],"correctAnswer":"e"}]"#;
        mock.set_response(
            ":generateContent",
            MockResponse::Success(Response::new(200, Bytes::from(envelope(quiz)))),
        );
        let client = client_with(&mock);

        let err = client.fetch_quiz("T", "Science").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyQuiz { .. }));
    }

    #[tokio::test]
    async fn test_fetch_quiz_valid() {
        let mock = MockHttpClient::new();
        let quiz = r#"[
            {"question":"Q1?","options":["a","b","c","d"],"correctAnswer":"a"},
            {"question":"Q2?","options":["w","x","y","z"],"correctAnswer":"z"},
            {"question":"Q3?","options":["1","2","3","4"],"correctAnswer":"2"},
            {"question":"Q4?","options":["p","q","r","s"],"correctAnswer":"r"}
        ]"#;
        mock.set_response(
            ":generateContent",
            MockResponse::Success(Response::new(200, Bytes::from(envelope(quiz)))),
        );
        let client = client_with(&mock);

        let mcqs = client.fetch_quiz("T", "Science").await.unwrap();
        assert_eq!(mcqs.len(), 4);
        assert_eq!(mcqs[1].correct_answer, "z");
    }

    #[tokio::test]
    async fn test_http_error_carries_scope() {
        let mock = MockHttpClient::new();
        mock.set_response(
            ":generateContent",
            MockResponse::Success(Response::new(500, Bytes::from("overloaded"))),
        );
        let client = client_with(&mock);

        let err = client
            .fetch_answer("What is gravity?", "Gravitation", "Class 9", "Science")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("What is gravity?"));
        assert!(matches!(err, LlmError::HttpStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_scoped_error() {
        let mock = MockHttpClient::new();
        mock.set_response(
            ":generateContent",
            MockResponse::Success(Response::new(200, Bytes::from(envelope("not json")))),
        );
        let client = client_with(&mock);

        let err = client
            .fetch_eli5("Sound", "Science")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Malformed { .. }));
        assert!(err.to_string().contains("Sound"));
    }

    #[tokio::test]
    async fn test_chat_stream_concatenates_fragments() {
        let mock = MockHttpClient::new();
        let chunk = |text: &str| {
            Bytes::from(format!(
                "data: {}\r\n\r\n",
                serde_json::json!({
                    "candidates": [{"content": {"parts": [{"text": text}]}}]
                })
            ))
        };
        mock.set_response(
            ":streamGenerateContent",
            MockResponse::Stream(vec![chunk("Hello"), chunk(" there"), chunk("!")]),
        );
        let client = client_with(&mock);

        let mut session = client.create_chat("Class 10", "Science", Some("Electricity"));
        session.push_user("Explain Ohm's law");
        let mut stream = client.stream_chat(&session).await.unwrap();

        let mut reply = String::new();
        while let Some(fragment) = stream.next().await {
            reply.push_str(&fragment.unwrap());
        }
        assert_eq!(reply, "Hello there!");
    }

    #[tokio::test]
    async fn test_chat_stream_propagates_mid_stream_error() {
        let mock = MockHttpClient::new();
        let chunk = Bytes::from(format!(
            "data: {}\r\n\r\n",
            serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "partial"}]}}]
            })
        ));
        mock.set_response(
            ":streamGenerateContent",
            MockResponse::StreamThenError(
                vec![chunk],
                crate::traits::HttpError::Io("connection reset".to_string()),
            ),
        );
        let client = client_with(&mock);

        let mut session = client.create_chat("Class 10", "Science", None);
        session.push_user("hi");
        let mut stream = client.stream_chat(&session).await.unwrap();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first, "partial");
        let second = stream.next().await.unwrap();
        assert!(matches!(second, Err(LlmError::StreamInterrupted { .. })));
    }

    #[test]
    fn test_chat_session_history_accumulates() {
        let mock = MockHttpClient::new();
        let client = client_with(&mock);
        let mut session = client.create_chat("Class 9", "Science", None);
        assert_eq!(session.turn_count(), 0);
        session.push_user("hello");
        session.push_model("hi!");
        assert_eq!(session.turn_count(), 2);
    }
}
