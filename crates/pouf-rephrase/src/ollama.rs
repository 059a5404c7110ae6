//! Local Ollama server backend.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{
    DEFAULT_SYSTEM_PROMPT, RephraseError, RephraseGateway, Result, decode, finish, post_json,
};

const DEFAULT_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3";

/// Configuration for the Ollama client.
#[derive(Debug, Clone, Default)]
pub struct OllamaConfig {
    /// Base URL of the server (defaults to http://localhost:11434)
    pub url: Option<String>,

    /// Model to use (defaults to llama3)
    pub model: Option<String>,

    /// Instruction prepended to the text
    pub system_prompt: Option<String>,
}

impl OllamaConfig {
    /// Get the base URL, using default if not set.
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_URL)
    }

    /// Get the model name, using default if not set.
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    /// The generate endpoint under the configured base URL.
    pub fn endpoint(&self) -> Result<Url> {
        let base = self.url().trim_end_matches('/');
        Url::parse(&format!("{}/api/generate", base))
            .map_err(|e| RephraseError::InvalidEndpoint(format!("{}: {}", base, e)))
    }
}

/// Ollama `/api/generate` client.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    config: OllamaConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    fn prompt(&self, text: &str) -> String {
        format!("{}\n\n{}", self.config.system_prompt(), crate::user_prompt(text))
    }
}

fn parse_reply(body: &str) -> Result<String> {
    let reply: GenerateResponse = decode(body)?;
    let text = reply.response.ok_or_else(|| {
        RephraseError::InvalidResponseShape("missing `response` field".to_string())
    })?;
    finish(text)
}

#[async_trait]
impl RephraseGateway for OllamaClient {
    async fn rephrase(&self, text: &str) -> Result<String> {
        let endpoint = self.config.endpoint()?;
        debug!(
            endpoint = %endpoint,
            model = self.config.model(),
            chars = text.chars().count(),
            "Sending rephrase request to Ollama"
        );

        let body = json!({
            "model": self.config.model(),
            "prompt": self.prompt(text),
            "stream": false,
        });
        let reply = post_json(self.client.post(endpoint), &body).await?;
        parse_reply(&reply)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
