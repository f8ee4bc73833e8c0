//! Client factory: protocol-family selection at construction time.

use crate::providers::anthropic::AnthropicClient;
use crate::providers::openai_compat::OpenAiCompatClient;
use crate::transport::{HttpTransport, Transport};
use ideastorm_application::ports::client_factory::ClientFactory;
use ideastorm_application::ports::provider_client::{ProviderClient, ProviderError};
use ideastorm_application::ports::usage::{NoUsage, UsageSink};
use ideastorm_domain::ProviderConfig;
use std::sync::Arc;

/// Builds HTTP-backed provider clients.
///
/// The wire protocol is decided once here, from the provider identity;
/// the constructed client never branches on provider names again.
pub struct HttpClientFactory {
    transport: Arc<dyn Transport>,
    usage: Arc<dyn UsageSink>,
}

impl HttpClientFactory {
    pub fn new() -> Self {
        Self {
            transport: Arc::new(HttpTransport::new()),
            usage: Arc::new(NoUsage),
        }
    }

    /// Route every successful call's usage record to `usage`.
    pub fn with_usage(mut self, usage: Arc<dyn UsageSink>) -> Self {
        self.usage = usage;
        self
    }

    /// Replace the transport (tests inject scripted transports here).
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }
}

impl Default for HttpClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientFactory for HttpClientFactory {
    fn build(&self, config: &ProviderConfig) -> Result<Arc<dyn ProviderClient>, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::new(
                config.provider.clone(),
                "missing credential",
            ));
        }

        let client: Arc<dyn ProviderClient> = if config.provider.is_native_protocol() {
            Arc::new(AnthropicClient::new(
                config,
                Arc::clone(&self.transport),
                Arc::clone(&self.usage),
            ))
        } else {
            Arc::new(OpenAiCompatClient::new(
                config,
                Arc::clone(&self.transport),
                Arc::clone(&self.usage),
            ))
        };
        Ok(client)
    }
}
