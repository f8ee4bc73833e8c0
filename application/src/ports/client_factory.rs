//! Client factory port
//!
//! The orchestrator never constructs provider clients itself; it asks this
//! port, so tests can inject scripted clients and the protocol-family
//! selection stays a construction-time concern of the infrastructure layer.

use crate::ports::provider_client::{ProviderClient, ProviderError};
use ideastorm_domain::ProviderConfig;
use std::sync::Arc;

/// Builds one provider client for a configuration.
pub trait ClientFactory: Send + Sync {
    /// Construct a client for `config`.
    ///
    /// Called at most once per (provider, model) key per orchestrator — the
    /// orchestrator caches and reuses the returned client across dispatches.
    fn build(&self, config: &ProviderConfig) -> Result<Arc<dyn ProviderClient>, ProviderError>;
}
