//! File-backed configuration schema.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Generation parameters
    pub generation: GenerationConfig,
    /// Per-provider overrides, keyed by provider name
    pub providers: HashMap<String, ProviderOverride>,
}

/// Generation parameters shared by every dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Ideas requested per provider
    pub num_ideas: usize,
    /// Fan-out width (simultaneous in-flight provider calls)
    pub concurrency: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            num_ideas: 5,
            concurrency: 5,
        }
    }
}

/// Overrides for one provider, merged over its family defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOverride {
    /// Model override
    pub model: Option<String>,
    /// Endpoint override
    pub base_url: Option<String>,
    /// Force-disable a provider even when its credential is present
    pub enabled: Option<bool>,
}
