//! Trait abstractions for external facilities.
//!
//! These traits decouple the orchestration layer from concrete transports,
//! enabling dependency injection and mocking in tests.

pub mod http;
pub mod speech;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
pub use speech::{SpeechError, Synthesizer};
