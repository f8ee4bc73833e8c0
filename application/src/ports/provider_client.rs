//! Provider client port
//!
//! Defines the capability one LLM backend exposes to the orchestration
//! core: generate text, validate its credential, estimate token counts.
//! Implementations (adapters) live in the infrastructure layer, one per
//! wire-protocol family.

use async_trait::async_trait;
use ideastorm_domain::{GenerationRequest, ProviderId};
use thiserror::Error;

/// The single error type crossing the provider client boundary.
///
/// Wraps any transport or malformed-response condition together with the
/// provider it came from, so a batch caller can report failures per backend.
#[derive(Error, Debug, Clone)]
#[error("{provider} provider error: {message}")]
pub struct ProviderError {
    /// The provider this error originated from
    pub provider: ProviderId,
    /// Description of the underlying cause
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: ProviderId, message: impl Into<String>) -> Self {
        Self {
            provider,
            message: message.into(),
        }
    }
}

/// One LLM backend, bound to a specific model and credential.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// The backend family this client talks to.
    fn provider(&self) -> &ProviderId;

    /// The model identifier this client sends on the wire.
    fn model(&self) -> &str;

    /// Send one generation request and return the answer text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;

    /// Probe whether the configured credential is accepted by the backend.
    async fn validate_credential(&self) -> bool;

    /// Estimate the token count of `text`.
    ///
    /// Heuristic (length divided by 4) — approximate, not exact. Backend
    /// tokenizers differ; this is only good enough for budgeting.
    fn estimate_token_count(&self, text: &str) -> usize {
        text.len() / 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullClient(ProviderId);

    #[async_trait]
    impl ProviderClient for NullClient {
        fn provider(&self) -> &ProviderId {
            &self.0
        }
        fn model(&self) -> &str {
            "null"
        }
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, ProviderError> {
            Ok(String::new())
        }
        async fn validate_credential(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_default_token_estimate_is_len_over_four() {
        let client = NullClient(ProviderId::OpenAi);
        assert_eq!(client.estimate_token_count(""), 0);
        assert_eq!(client.estimate_token_count("abcd"), 1);
        assert_eq!(client.estimate_token_count("a".repeat(100).as_str()), 25);
    }

    #[test]
    fn test_provider_error_display_names_provider() {
        let error = ProviderError::new(ProviderId::Gemini, "HTTP 401");
        assert_eq!(error.to_string(), "gemini provider error: HTTP 401");
    }
}
