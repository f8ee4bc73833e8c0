//! Application layer for ideastorm
//!
//! This crate contains use cases and port definitions. It depends only on
//! the domain layer; infrastructure adapters implement the ports.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    client_factory::ClientFactory,
    provider_client::{ProviderClient, ProviderError},
    usage::{NoUsage, UsageRecord, UsageSink},
};
pub use use_cases::brainstorm::{BrainstormInput, BrainstormOutcome, BrainstormUseCase};
pub use use_cases::dispatch::{DispatchError, DispatchOptions, Orchestrator};
pub use use_cases::reconcile::Reconciler;
