//! Google Gemini REST API client.
//!
//! Two endpoints are used:
//! - `GET {base}/models?key=…` for model discovery
//! - `POST {base}/{model}:generateContent?key=…` for generation
//!
//! Non-success responses are classified by status code: 429 and 503 are
//! transient (with the server's wait hint), 404 means the model is unknown,
//! everything else is permanent.

mod client;
mod dto;

pub use client::GeminiRestClient;
