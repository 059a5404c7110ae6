//! Rephrase backend library for pouf.
//!
//! This crate provides a trait-based abstraction over the services that
//! rewrite text, with implementations for a local Ollama server, Google
//! Gemini and xAI Grok.

mod configured;
mod gemini;
mod grok;
mod ollama;

use std::time::Duration;

use async_trait::async_trait;
pub use configured::{ConfiguredGateway, gateway_for};
pub use gemini::{GeminiClient, GeminiConfig};
pub use grok::{GrokClient, GrokConfig};
pub use ollama::{OllamaClient, OllamaConfig};
use pouf_core::Backend;
use serde::Deserialize;
use thiserror::Error;

/// Instruction sent with every request unless the config overrides it.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "Fix grammar and make it sound professional. Only return the corrected text, nothing else.";

/// HTTP timeout applied to every backend request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while rephrasing.
#[derive(Debug, Error)]
pub enum RephraseError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response shape: {0}")]
    InvalidResponseShape(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("No API key configured for {0}")]
    MissingCredential(&'static str),

    #[error("Unsupported backend: {0}")]
    UnsupportedBackend(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for rephrase operations.
pub type Result<T> = std::result::Result<T, RephraseError>;

/// Trait for rephrase backends.
///
/// One call, text in, improved text out. Callers treat every error the same
/// way and never retry.
#[async_trait]
pub trait RephraseGateway: Send + Sync {
    /// Rewrite `text`, returning the improved version with surrounding
    /// whitespace trimmed.
    async fn rephrase(&self, text: &str) -> Result<String>;

    /// Returns the name of this backend for logging/debugging.
    fn name(&self) -> &str;
}

/// Parse a backend name as written in the config file.
pub fn parse_backend(name: &str) -> Result<Backend> {
    match name.trim().to_ascii_lowercase().as_str() {
        "ollama" => Ok(Backend::Ollama),
        "gemini" => Ok(Backend::Gemini),
        "grok" => Ok(Backend::Grok),
        _ => Err(RephraseError::UnsupportedBackend(name.to_string())),
    }
}

/// Build the shared HTTP client with a request timeout.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

fn user_prompt(text: &str) -> String {
    format!("Text to improve:\n{}", text)
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Map a non-success status to `Server`, preferring the API's own
/// `error.message` over the raw body.
fn server_error(status: reqwest::StatusCode, body: &str) -> RephraseError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => RephraseError::Server(envelope.error.message),
        Err(_) if body.trim().is_empty() => RephraseError::Server(status.to_string()),
        Err(_) => RephraseError::Server(format!("{}: {}", status, body.trim())),
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| RephraseError::Decode(e.to_string()))
}

/// Send a JSON request and hand back the body of a successful response.
async fn post_json(request: reqwest::RequestBuilder, body: &serde_json::Value) -> Result<String> {
    let response = request.json(body).send().await?;
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(server_error(status, &text));
    }
    Ok(text)
}

/// Trim a reply and reject an empty one.
fn finish(reply: String) -> Result<String> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(RephraseError::InvalidResponseShape(
            "empty text in reply".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
