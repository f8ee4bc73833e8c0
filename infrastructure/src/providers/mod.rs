//! Provider adapters, one per wire-protocol family.
//!
//! Protocol selection happens once, at construction time in the
//! [`HttpClientFactory`] — there is no per-call branching on provider names.

pub mod anthropic;
pub mod families;
pub mod openai_compat;
pub mod registry;

pub use anthropic::AnthropicClient;
pub use openai_compat::OpenAiCompatClient;
pub use registry::HttpClientFactory;
