use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

use crate::provider::Provider;
use crate::reveal::DEFAULT_REVEAL_SPEED;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub provider: Option<String>,
    pub default_model: Option<String>,
    pub gemini_api_key: Option<String>,
    pub claude_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub ollama_url: Option<String>,
    pub reveal_speed_ms: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            provider: Some(Provider::default().as_str().to_string()),
            ..Self::default()
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Configured provider, falling back to the default for unknown names.
    pub fn provider(&self) -> Provider {
        self.provider
            .as_deref()
            .and_then(Provider::from_str)
            .unwrap_or_default()
    }

    /// Model to use with `provider`. A saved default only applies to the
    /// provider it was saved for.
    pub fn model_for(&self, provider: Provider) -> String {
        match &self.default_model {
            Some(model) if self.provider() == provider => model.clone(),
            _ => provider.default_model().to_string(),
        }
    }

    /// API key for `provider`: environment first, then the config file.
    pub fn api_key(&self, provider: Provider) -> Option<String> {
        let from_env = provider
            .api_key_env()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.trim().is_empty());

        from_env.or_else(|| {
            let from_file = match provider {
                Provider::Gemini => self.gemini_api_key.clone(),
                Provider::Claude => self.claude_api_key.clone(),
                Provider::OpenAI => self.openai_api_key.clone(),
                Provider::Ollama => None,
            };
            from_file.filter(|key| !key.trim().is_empty())
        })
    }

    pub fn ollama_url(&self) -> String {
        self.ollama_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string())
    }

    pub fn reveal_speed(&self) -> Duration {
        self.reveal_speed_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REVEAL_SPEED)
    }

    pub fn save_defaults(provider: Provider, model: &str) -> Result<()> {
        let mut config = Self::load().unwrap_or_else(|_| Self::new());
        config.provider = Some(provider.as_str().to_string());
        config.default_model = Some(model.to_string());
        config.save()
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("elfchat").join("config.json"))
    }
}
