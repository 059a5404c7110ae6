//! Google Gemini `generateContent` backend.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{
    DEFAULT_SYSTEM_PROMPT, RephraseError, RephraseGateway, Result, decode, finish, post_json,
    user_prompt,
};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Gemini API key
    pub api_key: String,

    /// Model to use (defaults to gemini-2.0-flash)
    pub model: Option<String>,

    pub system_prompt: Option<String>,
}

impl GeminiConfig {
    /// Create a new Gemini config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: None,
            system_prompt: None,
        }
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Get the model name, using default if not set.
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    fn endpoint(&self) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/{}:generateContent", API_BASE, self.model()),
            &[("key", self.api_key.as_str())],
        )
        .map_err(|e| RephraseError::InvalidEndpoint(e.to_string()))
    }
}

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<crate::ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, client: reqwest::Client) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(RephraseError::MissingCredential("Gemini"));
        }
        Ok(Self { client, config })
    }
}

fn parse_reply(body: &str) -> Result<String> {
    let reply: GenerateContentResponse = decode(body)?;
    if let Some(error) = reply.error {
        return Err(RephraseError::Server(error.message));
    }
    let text = reply
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| {
            RephraseError::InvalidResponseShape("no candidate text in reply".to_string())
        })?;
    finish(text)
}

#[async_trait]
impl RephraseGateway for GeminiClient {
    async fn rephrase(&self, text: &str) -> Result<String> {
        debug!(
            model = self.config.model(),
            chars = text.chars().count(),
            "Sending rephrase request to Gemini"
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": user_prompt(text) }] }],
            "system_instruction": { "parts": [{ "text": self.config.system_prompt() }] },
        });
        let reply = post_json(self.client.post(self.config.endpoint()?), &body).await?;
        parse_reply(&reply)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
