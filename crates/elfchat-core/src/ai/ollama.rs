use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{check_status, non_empty, ModelClient};
use crate::error::ServiceError;
use crate::persona::PersonaConfig;
use crate::provider::Provider;

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    persona: PersonaConfig,
}

impl OllamaClient {
    pub const DEFAULT_MODEL: &'static str = "llama3.2:latest";

    pub fn new(base_url: &str, persona: PersonaConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            persona,
        }
    }

    fn request<'a>(&'a self, prompt: &'a str) -> OllamaRequest<'a> {
        OllamaRequest {
            model: self.persona.model(),
            system: self.persona.instructions(),
            prompt,
            stream: false,
        }
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let provider = Provider::Ollama;
        let url = format!("{}/api/generate", self.base_url);
        tracing::debug!(%url, model = self.persona.model(), "sending request to Ollama");

        let response = self
            .client
            .post(&url)
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(|e| ServiceError::transport(provider, e))?;

        let response = check_status(provider, response).await?;
        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::transport(provider, e))?;

        non_empty(provider, Some(ollama_response.response))
    }

    fn provider(&self) -> Provider {
        Provider::Ollama
    }

    fn model(&self) -> &str {
        self.persona.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_is_non_streaming_with_system_prompt() {
        let client = OllamaClient::new("http://localhost:11434/", PersonaConfig::new("gemma3:latest"));
        let body = serde_json::to_value(client.request("How are you today?")).unwrap();

        assert_eq!(body["model"], json!("gemma3:latest"));
        assert_eq!(body["prompt"], json!("How are you today?"));
        assert_eq!(body["stream"], json!(false));
        assert_eq!(body["system"], json!(crate::persona::FRIEREN_INSTRUCTIONS));
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) is closed on test machines.
        let client = OllamaClient::new("http://127.0.0.1:9", PersonaConfig::new("m"));
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, ServiceError::Transport { provider: Provider::Ollama, .. }));
    }
}
