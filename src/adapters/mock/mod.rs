//! Mock adapters for testing.

pub mod http;
pub mod speech;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use speech::{MockSynthesizer, SpeechCall};
