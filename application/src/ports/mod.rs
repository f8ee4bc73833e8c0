//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod client_factory;
pub mod provider_client;
pub mod usage;
