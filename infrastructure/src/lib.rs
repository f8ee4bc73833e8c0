//! Infrastructure layer for ideastorm
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the retrying HTTP transport, one provider client per
//! wire-protocol family, environment/file configuration loading, JSONL
//! usage telemetry, and the report file writer.

pub mod config;
pub mod output;
pub mod providers;
pub mod transport;
pub mod usage;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, GenerationConfig, ProviderOverride, providers_from_env};
pub use output::ReportWriter;
pub use providers::{
    AnthropicClient, HttpClientFactory, OpenAiCompatClient, families::FamilyDefaults,
};
pub use transport::{
    HttpResponse, HttpTransport, Transport, TransportError, GENERATE_ATTEMPTS, VALIDATE_ATTEMPTS,
    send_with_retry,
};
pub use usage::JsonlUsageLogger;
