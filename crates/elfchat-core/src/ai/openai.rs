use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{check_status, non_empty, ModelClient};
use crate::error::ServiceError;
use crate::persona::PersonaConfig;
use crate::provider::Provider;

#[derive(Serialize)]
struct OpenAIMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    persona: PersonaConfig,
}

impl OpenAIClient {
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";

    pub fn new(api_key: &str, persona: PersonaConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            persona,
        }
    }

    fn request<'a>(&'a self, prompt: &'a str) -> OpenAIRequest<'a> {
        OpenAIRequest {
            model: self.persona.model(),
            messages: vec![
                OpenAIMessage {
                    role: "system",
                    content: self.persona.instructions(),
                },
                OpenAIMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        }
    }

    pub fn list_models() -> Vec<String> {
        vec![
            "gpt-4o".to_string(),
            "gpt-4o-mini".to_string(),
            "gpt-4-turbo".to_string(),
        ]
    }
}

#[async_trait]
impl ModelClient for OpenAIClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let provider = Provider::OpenAI;
        tracing::debug!(model = self.persona.model(), "sending request to OpenAI");

        let response = self.client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(|e| ServiceError::transport(provider, e))?;

        let response = check_status(provider, response).await?;
        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::transport(provider, e))?;

        let text = openai_response.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);
        non_empty(provider, text)
    }

    fn provider(&self) -> Provider {
        Provider::OpenAI
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
    fn test_system_message_leads() {
        let client = OpenAIClient::new("k", PersonaConfig::new("gpt-4o"));
        let body = serde_json::to_value(client.request("Tell me a fun fact")).unwrap();
        let messages = body["messages"].as_array().unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], json!("system"));
        assert_eq!(messages[0]["content"], json!(crate::persona::FRIEREN_INSTRUCTIONS));
        assert_eq!(messages[1], json!({ "role": "user", "content": "Tell me a fun fact" }));
    }

    #[test]
    fn test_null_content_decodes() {
        let response: OpenAIResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        }))
        .unwrap();
        assert!(response.choices[0].message.content.is_none());
    }
}
