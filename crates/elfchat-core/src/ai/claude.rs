use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{check_status, non_empty, ModelClient};
use crate::error::ServiceError;
use crate::persona::PersonaConfig;
use crate::provider::Provider;

#[derive(Serialize)]
struct ClaudeMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ClaudeMessage<'a>>,
}

#[derive(Deserialize)]
struct ClaudeContent {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContent>,
}

#[derive(Clone)]
pub struct ClaudeClient {
    client: Client,
    api_key: String,
    persona: PersonaConfig,
}

impl ClaudeClient {
    pub const DEFAULT_MODEL: &'static str = "claude-3-5-haiku-20241022";

    pub fn new(api_key: &str, persona: PersonaConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            persona,
        }
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ClaudeRequest<'a> {
        ClaudeRequest {
            model: self.persona.model(),
            max_tokens: 4096,
            system: self.persona.instructions(),
            messages: vec![ClaudeMessage {
                role: "user",
                content: prompt,
            }],
        }
    }

    pub fn list_models() -> Vec<String> {
        vec![
            "claude-sonnet-4-20250514".to_string(),
            "claude-3-5-sonnet-20241022".to_string(),
            "claude-3-5-haiku-20241022".to_string(),
        ]
    }
}

#[async_trait]
impl ModelClient for ClaudeClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let provider = Provider::Claude;
        tracing::debug!(model = self.persona.model(), "sending request to Claude");

        let response = self.client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(|e| ServiceError::transport(provider, e))?;

        let response = check_status(provider, response).await?;
        let claude_response: ClaudeResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::transport(provider, e))?;

        let text: String = claude_response.content
            .into_iter()
            .map(|c| c.text)
            .collect();
        non_empty(provider, Some(text))
    }

    fn provider(&self) -> Provider {
        Provider::Claude
    }

    fn model(&self) -> &str {
        self.persona.model()
    }
}
