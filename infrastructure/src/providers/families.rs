//! Static per-family defaults.
//!
//! Each backend family has a default model, a credential environment
//! variable, and (for OpenAI-compatible backends) a default endpoint. This
//! is a lookup table consulted at construction and configuration time, not
//! branching logic scattered through the call path.

use ideastorm_domain::ProviderId;

/// Defaults for one backend family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyDefaults {
    /// Default model identifier
    pub model: String,
    /// Environment variable holding the credential
    pub api_key_env: String,
    /// Default endpoint base URL; `None` means the protocol's canonical host
    pub base_url: Option<String>,
}

/// Look up the defaults for `provider`.
///
/// Custom backends get OpenAI-style defaults with a credential variable
/// derived from their name (`mistral` → `MISTRAL_API_KEY`).
pub fn family_defaults(provider: &ProviderId) -> FamilyDefaults {
    let (model, api_key_env, base_url) = match provider {
        ProviderId::Anthropic => ("claude-sonnet-4-20250514", "ANTHROPIC_API_KEY", None),
        ProviderId::OpenAi => ("gpt-4o", "OPENAI_API_KEY", None),
        ProviderId::Gemini => (
            "gemini-2.0-flash",
            "GEMINI_API_KEY",
            Some("https://generativelanguage.googleapis.com/v1beta/openai"),
        ),
        ProviderId::DeepSeek => (
            "deepseek-chat",
            "DEEPSEEK_API_KEY",
            Some("https://api.deepseek.com"),
        ),
        ProviderId::Qwen => (
            "qwen-plus",
            "DASHSCOPE_API_KEY",
            Some("https://dashscope.aliyuncs.com/compatible-mode/v1"),
        ),
        ProviderId::Custom(name) => {
            return FamilyDefaults {
                model: "gpt-4o".to_string(),
                api_key_env: format!("{}_API_KEY", name.to_uppercase().replace('-', "_")),
                base_url: None,
            };
        }
    };

    FamilyDefaults {
        model: model.to_string(),
        api_key_env: api_key_env.to_string(),
        base_url: base_url.map(str::to_string),
    }
}

/// The families probed during environment-driven enablement.
pub fn known_families() -> [ProviderId; 5] {
    [
        ProviderId::Anthropic,
        ProviderId::OpenAi,
        ProviderId::Gemini,
        ProviderId::DeepSeek,
        ProviderId::Qwen,
    ]
}
