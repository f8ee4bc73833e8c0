//! Environment-driven provider enablement.
//!
//! The presence of a family's credential variable auto-enables that
//! provider with its default model; `{PREFIX}_MODEL` and
//! `{PREFIX}_BASE_URL` variables (and file-config overrides) refine it.
//! The prefix is the credential variable minus `_API_KEY` — e.g.
//! `ANTHROPIC_MODEL`, `DASHSCOPE_BASE_URL`.

use crate::config::file_config::ProviderOverride;
use crate::providers::families::{family_defaults, known_families};
use ideastorm_domain::ProviderConfig;
use std::collections::HashMap;
use tracing::debug;

/// Discover enabled providers from the process environment.
pub fn providers_from_env(overrides: &HashMap<String, ProviderOverride>) -> Vec<ProviderConfig> {
    collect_providers(overrides, |name| std::env::var(name).ok())
}

/// Same as [`providers_from_env`], with an injectable variable lookup.
pub fn collect_providers(
    overrides: &HashMap<String, ProviderOverride>,
    env: impl Fn(&str) -> Option<String>,
) -> Vec<ProviderConfig> {
    let mut configs = Vec::new();

    for provider in known_families() {
        let defaults = family_defaults(&provider);
        let Some(api_key) = env(&defaults.api_key_env).filter(|k| !k.is_empty()) else {
            continue;
        };

        let over = overrides.get(provider.as_str());
        if over.and_then(|o| o.enabled) == Some(false) {
            debug!("Provider {} disabled by config", provider);
            continue;
        }

        let prefix = defaults
            .api_key_env
            .strip_suffix("_API_KEY")
            .unwrap_or(&defaults.api_key_env)
            .to_string();

        let model = env(&format!("{prefix}_MODEL"))
            .or_else(|| over.and_then(|o| o.model.clone()))
            .unwrap_or(defaults.model);
        let base_url =
            env(&format!("{prefix}_BASE_URL")).or_else(|| over.and_then(|o| o.base_url.clone()));

        let mut config = ProviderConfig::new(provider, model, api_key);
        if let Some(base_url) = base_url {
            config = config.with_base_url(base_url);
        }
        configs.push(config);
    }

    configs
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideastorm_domain::ProviderId;

    fn env_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_credential_presence_enables_provider() {
        let configs = collect_providers(
            &HashMap::new(),
            env_from(&[("ANTHROPIC_API_KEY", "sk-ant")]),
        );
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].provider, ProviderId::Anthropic);
        assert_eq!(configs[0].model, "claude-sonnet-4-20250514");
        assert!(configs[0].enabled);
    }

    #[test]
    fn test_model_and_base_url_env_overrides() {
        let configs = collect_providers(
            &HashMap::new(),
            env_from(&[
                ("ANTHROPIC_API_KEY", "sk-ant"),
                ("ANTHROPIC_MODEL", "claude-opus-4-5"),
                ("ANTHROPIC_BASE_URL", "https://proxy.internal"),
            ]),
        );
        assert_eq!(configs[0].model, "claude-opus-4-5");
        assert_eq!(configs[0].base_url.as_deref(), Some("https://proxy.internal"));
    }

    #[test]
    fn test_qwen_uses_dashscope_prefix() {
        let configs = collect_providers(
            &HashMap::new(),
            env_from(&[
                ("DASHSCOPE_API_KEY", "k"),
                ("DASHSCOPE_MODEL", "qwen-max"),
            ]),
        );
        assert_eq!(configs[0].provider, ProviderId::Qwen);
        assert_eq!(configs[0].model, "qwen-max");
    }

    #[test]
    fn test_missing_credential_means_absent() {
        let configs = collect_providers(&HashMap::new(), env_from(&[("OPENAI_MODEL", "gpt-4o")]));
        assert!(configs.is_empty());
    }

    #[test]
    fn test_empty_credential_means_absent() {
        let configs = collect_providers(&HashMap::new(), env_from(&[("OPENAI_API_KEY", "")]));
        assert!(configs.is_empty());
    }

    #[test]
    fn test_file_override_can_disable_provider() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "openai".to_string(),
            ProviderOverride {
                enabled: Some(false),
                ..Default::default()
            },
        );
        let configs = collect_providers(&overrides, env_from(&[("OPENAI_API_KEY", "sk")]));
        assert!(configs.is_empty());
    }

    #[test]
    fn test_file_override_model_applies_when_env_silent() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "gemini".to_string(),
            ProviderOverride {
                model: Some("gemini-2.5-pro".to_string()),
                ..Default::default()
            },
        );
        let configs = collect_providers(&overrides, env_from(&[("GEMINI_API_KEY", "k")]));
        assert_eq!(configs[0].model, "gemini-2.5-pro");
    }
}
