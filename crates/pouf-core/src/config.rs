//! Configuration management for pouf.
//!
//! This module provides core configuration that doesn't depend on
//! platform-specific UI libraries.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::APP_NAME;
use crate::shortcut::ShortcutSpec;

/// Rephrase backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// A local Ollama server (no key needed)
    #[default]
    Ollama,
    /// Google Gemini (requires API key)
    Gemini,
    /// xAI Grok (requires API key)
    Grok,
}

impl Backend {
    pub fn display_name(&self) -> &'static str {
        match self {
            Backend::Ollama => "Ollama",
            Backend::Gemini => "Gemini",
            Backend::Grok => "Grok",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Backend::Ollama)
    }
}

fn is_default_backend(v: &Backend) -> bool {
    *v == Backend::default()
}

/// Core configuration structure for the application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Rephrase backend to use (ollama, gemini or grok)
    #[serde(default, skip_serializing_if = "is_default_backend")]
    pub backend: Backend,

    /// Instruction sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Base URL of the Ollama server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ollama_url: Option<String>,

    /// Ollama model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ollama_model: Option<String>,

    /// Gemini API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_key: Option<String>,

    /// Gemini model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_model: Option<String>,

    /// Grok API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grok_key: Option<String>,

    /// Grok model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grok_model: Option<String>,

    /// Hotkey configuration (stored as string, parsed on use)
    /// Format: "modifier+modifier+key" e.g., "super+alt+Slash"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey: Option<String>,

    /// Rephrase the current line when it is typed ending in `::fix`
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub typed_trigger: bool,

    /// Upper bound on a single rephrase request (in seconds)
    #[serde(
        default = "default_request_timeout",
        skip_serializing_if = "is_default_request_timeout"
    )]
    pub request_timeout: u64,
}

fn default_true() -> bool {
    true
}

fn is_true(v: &bool) -> bool {
    *v
}

fn default_request_timeout() -> u64 {
    30
}

fn is_default_request_timeout(v: &u64) -> bool {
    *v == default_request_timeout()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            system_prompt: None,
            ollama_url: None,
            ollama_model: None,
            gemini_key: None,
            gemini_model: None,
            grok_key: None,
            grok_model: None,
            hotkey: None,
            typed_trigger: true,
            request_timeout: default_request_timeout(),
        }
    }
}

impl Config {
    /// The API key for `backend`, if one is needed and set.
    pub fn api_key(&self, backend: Backend) -> Option<&str> {
        match backend {
            Backend::Ollama => None,
            Backend::Gemini => self.gemini_key.as_deref(),
            Backend::Grok => self.grok_key.as_deref(),
        }
        .filter(|key| !key.is_empty())
    }

    /// The configured shortcut. An unparseable or invalid entry falls back
    /// to the default so a typo can't leave the hotkey dead.
    pub fn hotkey(&self) -> ShortcutSpec {
        let Some(raw) = self.hotkey.as_deref() else {
            return ShortcutSpec::default();
        };
        match raw.parse::<ShortcutSpec>() {
            Ok(spec) if spec.is_valid() => spec,
            Ok(spec) => {
                warn!(
                    hotkey = raw,
                    label = %spec.label(),
                    "Hotkey must use command or control, using the default"
                );
                ShortcutSpec::default()
            }
            Err(e) => {
                warn!("{}, using the default hotkey", e);
                ShortcutSpec::default()
            }
        }
    }

    pub fn set_hotkey(&mut self, spec: ShortcutSpec) {
        self.hotkey = Some(spec.to_string());
    }

    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Manages loading, saving, and reloading the configuration.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new ConfigManager with the default configuration directory.
    pub fn new() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self { config_path })
    }

    /// Creates a new ConfigManager with a specified configuration directory.
    #[cfg(test)]
    pub fn with_config_dir<P: AsRef<std::path::Path>>(dir: P) -> Self {
        let config_path = dir.as_ref().join(format!("{}.toml", APP_NAME));
        Self { config_path }
    }

    /// Returns the default path to the configuration file.
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to retrieve configuration directory")?;
        Ok(config_dir.join(APP_NAME).join(format!("{}.toml", APP_NAME)))
    }

    /// Loads the configuration from the config file or returns default.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }

        let config_content = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config file at {:?}", self.config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file at {:?}", self.config_path))?;

        if config.backend.requires_api_key() && config.api_key(config.backend).is_none() {
            warn!(
                "{} API key is not set. Rephrasing will not work without it. \
                 Copy the config path via the tray icon to set the key.",
                config.backend.display_name()
            );
        }

        Ok(config)
    }

    /// Reloads the configuration and returns `true` if there are changes.
    pub fn reload(&self, current_config: &mut Config) -> Result<bool> {
        let old_config = current_config.clone();
        *current_config = self.load()?;
        Ok(*current_config != old_config)
    }

    /// Saves the configuration to the config file.
    pub fn save(&self, config: &Config) -> Result<()> {
        let config_dir = self
            .config_path
            .parent()
            .with_context(|| format!("Failed to get parent directory of {:?}", self.config_path))?;

        fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config directory at {:?}", config_dir))?;

        let serialized =
            toml::to_string_pretty(&config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, serialized)
            .with_context(|| format!("Failed to write config file at {:?}", self.config_path))?;

        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path(&self) -> &std::path::Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use global_hotkey::hotkey::Code;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend, Backend::Ollama);
        assert!(config.typed_trigger);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.hotkey(), ShortcutSpec::default());
    }

    #[test]
    fn test_default_config_serializes_empty() {
        let serialized = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(serialized.trim().is_empty(), "got {serialized:?}");
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());

        let mut config = Config {
            backend: Backend::Grok,
            grok_key: Some("test-key".to_string()),
            typed_trigger: false,
            ..Default::default()
        };
        config.set_hotkey(ShortcutSpec::new(Code::KeyJ, ShortcutSpec::CONTROL));
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.api_key(Backend::Grok), Some("test-key"));
        assert_eq!(
            loaded.hotkey(),
            ShortcutSpec::new(Code::KeyJ, ShortcutSpec::CONTROL)
        );
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn test_reload_config() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());

        let mut config = manager.load().unwrap();
        assert!(!manager.reload(&mut config).unwrap());

        fs::write(
            manager.config_path(),
            "backend = \"gemini\"\ngemini_key = \"abc\"\nhotkey = \"ctrl+shift+K\"\n",
        )
        .unwrap();

        assert!(manager.reload(&mut config).unwrap());
        assert_eq!(config.backend, Backend::Gemini);
        assert_eq!(
            config.hotkey(),
            ShortcutSpec::new(Code::KeyK, ShortcutSpec::CONTROL | ShortcutSpec::SHIFT)
        );
    }

    #[test]
    fn test_invalid_hotkey_falls_back_to_default() {
        let config = Config {
            hotkey: Some("alt+K".to_string()),
            ..Default::default()
        };
        assert_eq!(config.hotkey(), ShortcutSpec::default());

        let config = Config {
            hotkey: Some("not a hotkey+".to_string()),
            ..Default::default()
        };
        assert_eq!(config.hotkey(), ShortcutSpec::default());
    }

    #[test]
    fn test_empty_api_key_is_missing() {
        let config = Config {
            gemini_key: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.api_key(Backend::Gemini), None);
        assert_eq!(config.api_key(Backend::Ollama), None);
    }
}
