//! Adapter implementations of the trait abstractions.
//!
//! Production adapters live at the top level; configurable mocks for
//! testing live under `mock`.

pub mod espeak_speech;
pub mod mock;
pub mod reqwest_http;

pub use espeak_speech::EspeakSynthesizer;
pub use reqwest_http::ReqwestHttpClient;
