use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{check_status, non_empty, ModelClient};
use crate::error::ServiceError;
use crate::persona::PersonaConfig;
use crate::provider::Provider;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiRequest {
    system_instruction: GeminiInstruction,
    contents: Vec<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    /// Text of the first candidate, all parts joined.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        Some(text)
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    persona: PersonaConfig,
}

impl GeminiClient {
    pub const DEFAULT_MODEL: &'static str = "gemini-2.0-flash";

    pub fn new(api_key: &str, persona: PersonaConfig) -> Self {
        Self::with_base_url(GEMINI_BASE_URL, api_key, persona)
    }

    pub fn with_base_url(base_url: &str, api_key: &str, persona: PersonaConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            persona,
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.persona.model())
    }

    fn request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            system_instruction: GeminiInstruction {
                parts: vec![GeminiPart {
                    text: self.persona.instructions().to_string(),
                }],
            },
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        }
    }

    pub fn list_models() -> Vec<String> {
        vec![
            "gemini-2.0-flash".to_string(),
            "gemini-2.0-flash-lite".to_string(),
            "gemini-1.5-pro".to_string(),
            "gemini-1.5-flash".to_string(),
        ]
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let provider = Provider::Gemini;
        tracing::debug!(model = self.persona.model(), "sending request to Gemini");

        let response = self.client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(|e| ServiceError::transport(provider, e))?;

        let response = check_status(provider, response).await?;
        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::transport(provider, e))?;

        non_empty(provider, gemini_response.into_text())
    }

    fn provider(&self) -> Provider {
        Provider::Gemini
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
    fn test_request_carries_persona_and_prompt_only() {
        let client = GeminiClient::new("k", PersonaConfig::new("gemini-2.0-flash"));
        let body = serde_json::to_value(client.request("Tell me a story")).unwrap();

        assert_eq!(
            body["system_instruction"]["parts"][0]["text"],
            json!(crate::persona::FRIEREN_INSTRUCTIONS)
        );
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(body["contents"][0]["role"], json!("user"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], json!("Tell me a story"));
    }

    #[test]
    fn test_url_uses_model() {
        let client = GeminiClient::with_base_url("http://localhost:9/v1beta/", "k", PersonaConfig::new("gemini-1.5-pro"));
        assert_eq!(client.url(), "http://localhost:9/v1beta/models/gemini-1.5-pro:generateContent");
    }

    #[test]
    fn test_reply_joins_parts_of_first_candidate() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "Once upon a time. " }, { "text": "It was calm." }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "Once upon a time. It was calm.");
    }

    #[test]
    fn test_blocked_reply_has_no_text() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        assert!(response.into_text().is_none());
    }
}
