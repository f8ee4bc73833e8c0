//! Per-provider outcome of one dispatch.

use crate::core::provider::ProviderId;
use serde::{Deserialize, Serialize};

/// Outcome of one provider's generation attempt.
///
/// Exactly one of these exists per enabled provider configuration per
/// dispatch. `content` is non-empty iff `success` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResult {
    /// The provider that produced this result
    pub provider: ProviderId,
    /// The model that produced this result
    pub model: String,
    /// Raw answer text (empty on failure)
    pub content: String,
    /// Whether the call succeeded
    pub success: bool,
    /// Error description if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProviderResult {
    /// Creates a successful result carrying the provider's raw answer.
    pub fn success(
        provider: ProviderId,
        model: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            content: content.into(),
            success: true,
            error: None,
        }
    }

    /// Creates a failed result carrying the error description.
    pub fn failure(
        provider: ProviderId,
        model: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            content: String::new(),
            success: false,
            error: Some(error.into()),
        }
    }

    /// Returns `true` if this result was generated successfully.
    pub fn is_success(&self) -> bool {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_content_and_no_error() {
        let result = ProviderResult::success(ProviderId::OpenAi, "gpt-4o", "answer");
        assert!(result.is_success());
        assert_eq!(result.content, "answer");
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failure_has_empty_content() {
        let result = ProviderResult::failure(ProviderId::Gemini, "gemini-2.0-flash", "timeout");
        assert!(!result.is_success());
        assert!(result.content.is_empty());
        assert_eq!(result.error.as_deref(), Some("timeout"));
    }
}
