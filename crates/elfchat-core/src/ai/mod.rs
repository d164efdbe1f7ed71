pub mod claude;
pub mod gemini;
pub mod ollama;
pub mod openai;

use async_trait::async_trait;

pub use claude::ClaudeClient;
pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use openai::OpenAIClient;

use crate::error::ServiceError;
use crate::provider::Provider;

/// A remote text-completion service speaking as the persona.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send `prompt` as the sole user content and return the whole reply.
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;

    fn provider(&self) -> Provider;

    fn model(&self) -> &str;
}

/// Stand-in for a provider whose API key is missing.
#[derive(Debug, Clone)]
pub struct Unconfigured {
    provider: Provider,
}

impl Unconfigured {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ModelClient for Unconfigured {
    async fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        Err(ServiceError::MissingApiKey {
            provider: self.provider,
            env_var: self.provider.api_key_env().unwrap_or("an API key"),
        })
    }

    fn provider(&self) -> Provider {
        self.provider
    }

    fn model(&self) -> &str {
        self.provider.default_model()
    }
}

/// Turn a non-2xx response into `ServiceError::Status`, keeping the body for the log.
pub(crate) async fn check_status(
    provider: Provider,
    response: reqwest::Response,
) -> Result<reqwest::Response, ServiceError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Status { provider, status, body })
}

/// Empty or whitespace-only replies count as failures.
pub(crate) fn non_empty(provider: Provider, text: Option<String>) -> Result<String, ServiceError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ServiceError::EmptyResponse { provider }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_rejects_blank_replies() {
        assert!(non_empty(Provider::Gemini, None).is_err());
        assert!(non_empty(Provider::Gemini, Some("  \n".to_string())).is_err());
        assert_eq!(non_empty(Provider::Gemini, Some("Hi.".to_string())).unwrap(), "Hi.");
    }

    #[tokio::test]
    async fn test_unconfigured_names_env_var() {
        let client = Unconfigured::new(Provider::OpenAI);
        let err = client.generate("hello").await.unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
        assert_eq!(client.model(), "gpt-4o-mini");
    }
}
