//! Configuration loading: TOML files via figment, provider enablement via
//! environment variables.

pub mod env;
pub mod file_config;
pub mod loader;

pub use env::providers_from_env;
pub use file_config::{FileConfig, GenerationConfig, ProviderOverride};
pub use loader::ConfigLoader;
