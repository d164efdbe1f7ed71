use thiserror::Error;

use crate::provider::Provider;

/// Any failure of a remote generate call.
///
/// The variants only matter for the diagnostic log; callers treat every
/// variant the same way.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} API error {status}: {body}")]
    Status {
        provider: Provider,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("{provider} returned no text")]
    EmptyResponse { provider: Provider },
    #[error("{provider} API key not configured (set {env_var})")]
    MissingApiKey {
        provider: Provider,
        env_var: &'static str,
    },
}

impl ServiceError {
    pub fn transport(provider: Provider, source: reqwest::Error) -> Self {
        ServiceError::Transport { provider, source }
    }

    pub fn provider(&self) -> Provider {
        match self {
            ServiceError::Transport { provider, .. }
            | ServiceError::Status { provider, .. }
            | ServiceError::EmptyResponse { provider }
            | ServiceError::MissingApiKey { provider, .. } => *provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message_names_env_var() {
        let err = ServiceError::MissingApiKey {
            provider: Provider::Gemini,
            env_var: "GEMINI_API_KEY",
        };
        assert_eq!(
            err.to_string(),
            "gemini API key not configured (set GEMINI_API_KEY)"
        );
        assert_eq!(err.provider(), Provider::Gemini);
    }

    #[test]
    fn test_status_message_includes_body() {
        let err = ServiceError::Status {
            provider: Provider::Claude,
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: "slow down".to_string(),
        };
        assert_eq!(err.to_string(), "claude API error 429 Too Many Requests: slow down");
    }
}
