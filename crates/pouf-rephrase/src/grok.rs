//! xAI Grok chat completions backend.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{
    DEFAULT_SYSTEM_PROMPT, RephraseError, RephraseGateway, Result, decode, finish, post_json,
    user_prompt,
};

const COMPLETIONS_ENDPOINT: &str = "https://api.x.ai/v1/chat/completions";
const DEFAULT_MODEL: &str = "grok-3-latest";

/// Configuration for the Grok client.
#[derive(Debug, Clone)]
pub struct GrokConfig {
    /// xAI API key
    pub api_key: String,

    /// Model to use (defaults to grok-3-latest)
    pub model: Option<String>,

    pub system_prompt: Option<String>,
}

impl GrokConfig {
    /// Create a new Grok config with the given API key.
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
}

/// Grok API client.
#[derive(Debug, Clone)]
pub struct GrokClient {
    client: reqwest::Client,
    config: GrokConfig,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<crate::ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

impl GrokClient {
    pub fn new(config: GrokConfig, client: reqwest::Client) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(RephraseError::MissingCredential("Grok"));
        }
        Ok(Self { client, config })
    }

    fn request_body(&self, text: &str) -> serde_json::Value {
        json!({
            "model": self.config.model(),
            "messages": [
                { "role": "system", "content": self.config.system_prompt() },
                { "role": "user", "content": user_prompt(text) },
            ],
            "stream": false,
        })
    }
}

fn parse_reply(body: &str) -> Result<String> {
    let reply: CompletionResponse = decode(body)?;
    if let Some(error) = reply.error {
        return Err(RephraseError::Server(error.message));
    }
    let text = reply
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or_else(|| RephraseError::InvalidResponseShape("no choice in reply".to_string()))?;
    finish(text)
}

#[async_trait]
impl RephraseGateway for GrokClient {
    async fn rephrase(&self, text: &str) -> Result<String> {
        debug!(
            model = self.config.model(),
            chars = text.chars().count(),
            "Sending rephrase request to Grok"
        );

        let request = self
            .client
            .post(COMPLETIONS_ENDPOINT)
            .bearer_auth(&self.config.api_key);
        let reply = post_json(request, &self.request_body(text)).await?;
        parse_reply(&reply)
    }

    fn name(&self) -> &str {
        "grok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_missing_credential() {
        let result = GrokClient::new(GrokConfig::new(""), reqwest::Client::new());
        assert!(matches!(result, Err(RephraseError::MissingCredential("Grok"))));
    }

    #[test]
    fn test_request_body() {
        let client = GrokClient::new(GrokConfig::new("xai-key"), reqwest::Client::new()).unwrap();
        let body = client.request_body("teh cat");
        assert_eq!(body["model"], "grok-3-latest");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], DEFAULT_SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["content"], "Text to improve:\nteh cat");
    }

    #[test]
    fn test_parse_reply() {
        let body = r#"{
            "id": "x",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": " The cat sat. " } }]
        }"#;
        assert_eq!(parse_reply(body).unwrap(), "The cat sat.");

        assert!(matches!(
            parse_reply(r#"{"choices":[]}"#),
            Err(RephraseError::InvalidResponseShape(_))
        ));
        assert!(matches!(
            parse_reply(r#"{"error":{"message":"bad key"}}"#),
            Err(RephraseError::Server(msg)) if msg == "bad key"
        ));
    }
}
