//! Provider identity and configuration value objects.
//!
//! A [`ProviderId`] names one LLM backend family. Two wire protocols exist:
//! the native messages protocol (Anthropic) and the OpenAI-compatible
//! chat-completions protocol (everything else). The protocol family is a
//! property of the identity, decided once — adapters are selected at
//! construction time, never re-dispatched per call.

use serde::{Deserialize, Serialize};

/// Identity of one LLM backend family (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Anthropic,
    OpenAi,
    Gemini,
    DeepSeek,
    Qwen,
    /// Any other OpenAI-compatible backend, identified by name
    Custom(String),
}

impl ProviderId {
    /// Get the string identifier for this provider
    pub fn as_str(&self) -> &str {
        match self {
            ProviderId::Anthropic => "anthropic",
            ProviderId::OpenAi => "openai",
            ProviderId::Gemini => "gemini",
            ProviderId::DeepSeek => "deepseek",
            ProviderId::Qwen => "qwen",
            ProviderId::Custom(s) => s,
        }
    }

    fn from_name(s: &str) -> Self {
        match s {
            "anthropic" => ProviderId::Anthropic,
            "openai" => ProviderId::OpenAi,
            "gemini" => ProviderId::Gemini,
            "deepseek" => ProviderId::DeepSeek,
            "qwen" => ProviderId::Qwen,
            other => ProviderId::Custom(other.to_string()),
        }
    }

    /// Whether this provider speaks the native messages protocol.
    ///
    /// Everything that is not Anthropic is treated as OpenAI-compatible,
    /// including custom backends.
    pub fn is_native_protocol(&self) -> bool {
        matches!(self, ProviderId::Anthropic)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl Serialize for ProviderId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProviderId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_name(&s))
    }
}

/// Configuration for one enabled backend.
///
/// Immutable once added to the orchestrator's provider set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which backend family this configuration targets
    pub provider: ProviderId,
    /// Model identifier sent on the wire
    pub model: String,
    /// API credential
    pub api_key: String,
    /// Endpoint override; `None` uses the family default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Disabled configurations are ignored at orchestrator build time
    pub enabled: bool,
}

impl ProviderConfig {
    /// Creates an enabled configuration with no endpoint override.
    pub fn new(
        provider: ProviderId,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: api_key.into(),
            base_url: None,
            enabled: true,
        }
    }

    /// Overrides the endpoint base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Marks the configuration disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Cache key for client reuse: one client per (provider, model).
    pub fn cache_key(&self) -> (String, String) {
        (self.provider.as_str().to_string(), self.model.clone())
    }
}
