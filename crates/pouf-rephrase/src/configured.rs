//! Backend selection from the live configuration.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use pouf_core::{Backend, Config};
use tracing::debug;

use crate::{
    GeminiClient, GeminiConfig, GrokClient, GrokConfig, OllamaClient, OllamaConfig,
    RephraseError, RephraseGateway, Result, http_client,
};

/// Build the backend `config` selects.
pub fn gateway_for(config: &Config) -> Result<Box<dyn RephraseGateway>> {
    let client = http_client(config.request_timeout())?;
    let system_prompt = config.system_prompt.clone();

    let gateway: Box<dyn RephraseGateway> = match config.backend {
        Backend::Ollama => Box::new(OllamaClient::new(
            OllamaConfig {
                url: config.ollama_url.clone(),
                model: config.ollama_model.clone(),
                system_prompt,
            },
            client,
        )),
        Backend::Gemini => {
            let key = config
                .api_key(Backend::Gemini)
                .ok_or(RephraseError::MissingCredential("Gemini"))?;
            let gemini = GeminiConfig {
                api_key: key.to_string(),
                model: config.gemini_model.clone(),
                system_prompt,
            };
            Box::new(GeminiClient::new(gemini, client)?)
        }
        Backend::Grok => {
            let key = config
                .api_key(Backend::Grok)
                .ok_or(RephraseError::MissingCredential("Grok"))?;
            let grok = GrokConfig {
                api_key: key.to_string(),
                model: config.grok_model.clone(),
                system_prompt,
            };
            Box::new(GrokClient::new(grok, client)?)
        }
    };
    Ok(gateway)
}

/// Gateway that resolves the backend from the shared config on every call,
/// so backend, key and model changes apply to the next activation.
#[derive(Clone)]
pub struct ConfiguredGateway {
    config: Arc<RwLock<Config>>,
}

impl ConfiguredGateway {
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl RephraseGateway for ConfiguredGateway {
    async fn rephrase(&self, text: &str) -> Result<String> {
        // The guard must not live across the request.
        let gateway = {
            let config = self.config.read();
            gateway_for(&config)?
        };
        debug!(backend = gateway.name(), "Resolved rephrase backend");
        gateway.rephrase(text).await
    }

    /// The backend the next call will use.
    fn name(&self) -> &str {
        self.config.read().backend.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_for_default_is_ollama() {
        let gateway = gateway_for(&Config::default()).unwrap();
        assert_eq!(gateway.name(), "ollama");
    }

    #[test]
    fn test_gateway_for_requires_key() {
        let config = Config {
            backend: Backend::Grok,
            ..Default::default()
        };
        assert!(matches!(
            gateway_for(&config),
            Err(RephraseError::MissingCredential("Grok"))
        ));

        let config = Config {
            backend: Backend::Gemini,
            gemini_key: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(gateway_for(&config).unwrap().name(), "gemini");
    }

    #[tokio::test]
    async fn test_configured_gateway_follows_config() {
        let config = Arc::new(RwLock::new(Config {
            backend: Backend::Gemini,
            ..Default::default()
        }));
        let gateway = ConfiguredGateway::new(config.clone());
        assert_eq!(gateway.name(), "Gemini");

        let result = gateway.rephrase("teh cat").await;
        assert!(matches!(
            result,
            Err(RephraseError::MissingCredential("Gemini"))
        ));

        *config.write() = Config {
            backend: Backend::Ollama,
            ollama_url: Some("::not a url::".to_string()),
            ..Default::default()
        };
        assert_eq!(gateway.name(), "Ollama");
        let result = gateway.rephrase("teh cat").await;
        assert!(matches!(result, Err(RephraseError::InvalidEndpoint(_))));
    }
}
