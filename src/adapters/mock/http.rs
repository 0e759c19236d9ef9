//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that can return predefined
//! responses or errors, and records every request so tests can inspect
//! the payloads that were sent.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: String,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful (or error-status) response
    Success(Response),
    /// Return a transport error
    Error(HttpError),
    /// Return a stream of byte chunks
    Stream(Vec<Bytes>),
    /// Return a stream that fails after yielding the given chunks
    StreamThenError(Vec<Bytes>, HttpError),
}

/// Mock HTTP client for testing.
///
/// Responses are keyed by URL substring; the first configured pattern
/// contained in the request URL wins, falling back to a default. Every
/// request is recorded for later inspection.
#[derive(Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<Vec<(String, MockResponse)>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for URLs containing `pattern`.
    ///
    /// Later calls with the same pattern replace the earlier entry.
    pub fn set_response(&self, pattern: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(entry) = responses.iter_mut().find(|(p, _)| p == pattern) {
            entry.1 = response;
        } else {
            responses.push((pattern.to_string(), response));
        }
    }

    /// Set a default response for URLs without a matching pattern.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self
            .default_response
            .lock()
            .unwrap_or_else(|p| p.into_inner());
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Number of requests recorded so far.
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .len()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
    }

    fn record_request(&self, url: &str, headers: &Headers, body: &str) {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(RecordedRequest {
                url: url.to_string(),
                headers: headers.clone(),
                body: body.to_string(),
            });
    }

    fn response_for(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap_or_else(|p| p.into_inner());
        for (pattern, response) in responses.iter() {
            if url.contains(pattern.as_str()) {
                return Some(response.clone());
            }
        }
        drop(responses);
        self.default_response
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request(url, headers, body);

        match self.response_for(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Stream(_)) | Some(MockResponse::StreamThenError(..)) => Err(
                HttpError::Other("stream response configured for non-stream request".to_string()),
            ),
            None => Err(HttpError::Other(format!(
                "no mock response for URL: {}",
                url
            ))),
        }
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record_request(url, headers, body);

        match self.response_for(url) {
            Some(MockResponse::Stream(chunks)) => {
                let items: Vec<Result<Bytes, HttpError>> =
                    chunks.into_iter().map(Ok).collect();
                Ok(Box::pin(stream::iter(items)))
            }
            Some(MockResponse::StreamThenError(chunks, err)) => {
                let mut items: Vec<Result<Bytes, HttpError>> =
                    chunks.into_iter().map(Ok).collect();
                items.push(Err(err));
                Ok(Box::pin(stream::iter(items)))
            }
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Success(response)) => {
                // Tolerate a plain response: deliver the body as one chunk.
                Ok(Box::pin(stream::iter(vec![Ok(response.body)])))
            }
            None => Err(HttpError::Other(format!(
                "no mock response for URL: {}",
                url
            ))),
        }
    }
}
