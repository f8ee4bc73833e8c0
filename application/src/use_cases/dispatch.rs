//! Dispatch use case (Orchestrator)
//!
//! Fans one generation request out to every enabled provider concurrently
//! and collects one [`ProviderResult`] per provider, without letting one
//! backend's failure affect its siblings.
//!
//! # Ordering
//!
//! Results surface in completion order, not submission order. Callers that
//! need a specific provider's result must look it up by provider identity,
//! not position.

use crate::ports::client_factory::ClientFactory;
use crate::ports::provider_client::ProviderClient;
use ideastorm_domain::{GenerationRequest, ProviderConfig, ProviderId, ProviderResult};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default number of simultaneous in-flight generation calls.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Errors that abort a dispatch outright
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Raised synchronously, before any client construction or network
    /// activity, when the provider set is empty.
    #[error("No providers configured")]
    NoProviders,
}

/// Options controlling one dispatch.
#[derive(Clone, Default)]
pub struct DispatchOptions {
    /// Fan-out width; 0 means [`DEFAULT_CONCURRENCY`]
    pub concurrency: usize,
    /// Cancellation signal threaded through every in-flight call, so an
    /// aborted dispatch promptly releases outstanding connections
    pub cancel: Option<CancellationToken>,
}

impl DispatchOptions {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn width(&self) -> usize {
        if self.concurrency == 0 {
            DEFAULT_CONCURRENCY
        } else {
            self.concurrency
        }
    }
}

/// Owns the enabled provider set and a cache of constructed clients.
///
/// The cache is keyed by (provider, model), populated on first use behind an
/// async mutex so concurrent dispatches never construct two live clients for
/// the same key, and reused across dispatches for the orchestrator's
/// lifetime.
pub struct Orchestrator {
    factory: Arc<dyn ClientFactory>,
    configs: Vec<ProviderConfig>,
    clients: Mutex<HashMap<(String, String), Arc<dyn ProviderClient>>>,
}

impl Orchestrator {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            factory,
            configs: Vec::new(),
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Append an enabled provider configuration.
    ///
    /// Disabled configurations are ignored here, never stored.
    pub fn add_provider(&mut self, config: ProviderConfig) {
        if config.enabled {
            info!("Added provider: {}/{}", config.provider, config.model);
            self.configs.push(config);
        } else {
            debug!(
                "Ignoring disabled provider: {}/{}",
                config.provider, config.model
            );
        }
    }

    /// Number of enabled providers.
    pub fn provider_count(&self) -> usize {
        self.configs.len()
    }

    /// The enabled provider configurations, in insertion order.
    pub fn providers(&self) -> &[ProviderConfig] {
        &self.configs
    }

    /// Look up the cached client for a (provider, model) key, if one was
    /// constructed by an earlier dispatch.
    pub async fn cached_client(
        &self,
        provider: &ProviderId,
        model: &str,
    ) -> Option<Arc<dyn ProviderClient>> {
        let clients = self.clients.lock().await;
        clients
            .get(&(provider.as_str().to_string(), model.to_string()))
            .cloned()
    }

    /// Get or construct the client for `config`.
    ///
    /// Holding the lock across lookup and construction makes population
    /// single-flight: a concurrent first use of the same key waits and then
    /// sees the already-inserted client.
    async fn client_for(
        &self,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn ProviderClient>, crate::ports::provider_client::ProviderError> {
        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(&config.cache_key()) {
            return Ok(Arc::clone(client));
        }
        let client = self.factory.build(config)?;
        clients.insert(config.cache_key(), Arc::clone(&client));
        Ok(client)
    }

    /// Fan `request` out to every enabled provider.
    ///
    /// Returns exactly one result per enabled configuration, in completion
    /// order. A failing provider produces a `success=false` result and does
    /// not cancel, delay, or otherwise affect its siblings. The only hard
    /// failure is an empty provider set.
    pub async fn dispatch(
        &self,
        request: &GenerationRequest,
        options: DispatchOptions,
    ) -> Result<Vec<ProviderResult>, DispatchError> {
        if self.configs.is_empty() {
            return Err(DispatchError::NoProviders);
        }

        info!("Dispatching to {} providers", self.configs.len());

        let semaphore = Arc::new(Semaphore::new(options.width()));
        let cancel = options.cancel.unwrap_or_default();
        let mut join_set = JoinSet::new();
        let mut results = Vec::with_capacity(self.configs.len());

        for config in &self.configs {
            let provider = config.provider.clone();
            let model = config.model.clone();

            // Construction failures are captured per provider, like any
            // other provider error
            let client = match self.client_for(config).await {
                Ok(client) => client,
                Err(e) => {
                    warn!("Could not build client for {}: {}", provider, e);
                    results.push(ProviderResult::failure(provider, model, e.to_string()));
                    continue;
                }
            };

            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();
            let request = request.clone();

            join_set.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return ProviderResult::failure(provider, model, "dispatch aborted");
                    }
                };

                tokio::select! {
                    _ = cancel.cancelled() => {
                        ProviderResult::failure(provider, model, "dispatch cancelled")
                    }
                    outcome = client.generate(&request) => match outcome {
                        Ok(content) => ProviderResult::success(provider, model, content),
                        Err(e) => ProviderResult::failure(provider, model, e.to_string()),
                    },
                }
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(result) => {
                    if result.success {
                        info!("Got response from {}", result.provider);
                    } else {
                        warn!(
                            "Provider {} failed: {}",
                            result.provider,
                            result.error.as_deref().unwrap_or("unknown")
                        );
                    }
                    results.push(result);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::provider_client::ProviderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Scripted client: fails when `fail` is set, otherwise echoes a canned
    /// answer after an optional delay.
    struct ScriptedClient {
        provider: ProviderId,
        model: String,
        answer: String,
        fail: bool,
        delay: Duration,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProviderClient for ScriptedClient {
        fn provider(&self) -> &ProviderId {
            &self.provider
        }
        fn model(&self) -> &str {
            &self.model
        }
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                Err(ProviderError::new(self.provider.clone(), "boom"))
            } else {
                Ok(self.answer.clone())
            }
        }
        async fn validate_credential(&self) -> bool {
            true
        }
    }

    /// Factory that builds scripted clients and counts constructions.
    struct ScriptedFactory {
        builds: AtomicUsize,
        calls: Arc<AtomicUsize>,
        fail_providers: Vec<ProviderId>,
        delay: Duration,
    }

    impl ScriptedFactory {
        fn new() -> Self {
            Self {
                builds: AtomicUsize::new(0),
                calls: Arc::new(AtomicUsize::new(0)),
                fail_providers: Vec::new(),
                delay: Duration::ZERO,
            }
        }

        fn failing(mut self, provider: ProviderId) -> Self {
            self.fail_providers.push(provider);
            self
        }
    }

    impl ClientFactory for ScriptedFactory {
        fn build(&self, config: &ProviderConfig) -> Result<Arc<dyn ProviderClient>, ProviderError> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(ScriptedClient {
                provider: config.provider.clone(),
                model: config.model.clone(),
                answer: format!("answer from {}", config.provider),
                fail: self.fail_providers.contains(&config.provider),
                delay: self.delay,
                calls: Arc::clone(&self.calls),
            }))
        }
    }

    fn config(provider: ProviderId, model: &str) -> ProviderConfig {
        ProviderConfig::new(provider, model, "test-key")
    }

    #[tokio::test]
    async fn test_dispatch_returns_one_result_per_provider() {
        let factory = Arc::new(ScriptedFactory::new().failing(ProviderId::Gemini));
        let mut orchestrator = Orchestrator::new(factory);
        orchestrator.add_provider(config(ProviderId::Anthropic, "claude-sonnet-4-5"));
        orchestrator.add_provider(config(ProviderId::OpenAi, "gpt-4o"));
        orchestrator.add_provider(config(ProviderId::Gemini, "gemini-2.0-flash"));

        let results = orchestrator
            .dispatch(&GenerationRequest::new("go"), DispatchOptions::default())
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        let failed: Vec<_> = results.iter().filter(|r| !r.success).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].provider, ProviderId::Gemini);
        assert!(failed[0].error.is_some());
        // Siblings are unaffected by the failure
        assert!(
            results
                .iter()
                .filter(|r| r.success)
                .all(|r| !r.content.is_empty())
        );
    }

    #[tokio::test]
    async fn test_dispatch_with_no_providers_fails_fast() {
        let factory = Arc::new(ScriptedFactory::new());
        let orchestrator = Orchestrator::new(Arc::clone(&factory) as Arc<dyn ClientFactory>);

        let outcome = orchestrator
            .dispatch(&GenerationRequest::new("go"), DispatchOptions::default())
            .await;

        assert!(matches!(outcome, Err(DispatchError::NoProviders)));
        // No client was built, so no network activity could have occurred
        assert_eq!(factory.builds.load(Ordering::SeqCst), 0);
        assert_eq!(factory.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_disabled_providers_are_never_stored() {
        let factory = Arc::new(ScriptedFactory::new());
        let mut orchestrator = Orchestrator::new(factory);
        orchestrator.add_provider(config(ProviderId::OpenAi, "gpt-4o").disabled());
        assert_eq!(orchestrator.provider_count(), 0);
    }

    #[tokio::test]
    async fn test_clients_are_cached_across_dispatches() {
        let factory = Arc::new(ScriptedFactory::new());
        let mut orchestrator = Orchestrator::new(Arc::clone(&factory) as Arc<dyn ClientFactory>);
        orchestrator.add_provider(config(ProviderId::OpenAi, "gpt-4o"));
        orchestrator.add_provider(config(ProviderId::Anthropic, "claude-sonnet-4-5"));

        let request = GenerationRequest::new("go");
        orchestrator
            .dispatch(&request, DispatchOptions::default())
            .await
            .unwrap();
        orchestrator
            .dispatch(&request, DispatchOptions::default())
            .await
            .unwrap();

        // One construction per (provider, model) key, reused on the second pass
        assert_eq!(factory.builds.load(Ordering::SeqCst), 2);
        assert_eq!(factory.calls.load(Ordering::SeqCst), 4);
        assert!(
            orchestrator
                .cached_client(&ProviderId::OpenAi, "gpt-4o")
                .await
                .is_some()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_bound_is_respected() {
        let mut factory = ScriptedFactory::new();
        factory.delay = Duration::from_secs(1);
        let factory = Arc::new(factory);

        let mut orchestrator = Orchestrator::new(Arc::clone(&factory) as Arc<dyn ClientFactory>);
        for model in ["m1", "m2", "m3", "m4"] {
            orchestrator.add_provider(config(ProviderId::Custom(model.to_string()), model));
        }

        let started = tokio::time::Instant::now();
        let results = orchestrator
            .dispatch(
                &GenerationRequest::new("go"),
                DispatchOptions::default().with_concurrency(1),
            )
            .await
            .unwrap();

        // Width 1 serializes the four 1s calls
        assert_eq!(results.len(), 4);
        assert!(started.elapsed() >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_abandons_in_flight_calls() {
        let mut factory = ScriptedFactory::new();
        factory.delay = Duration::from_secs(3600);
        let factory = Arc::new(factory);

        let mut orchestrator = Orchestrator::new(Arc::clone(&factory) as Arc<dyn ClientFactory>);
        orchestrator.add_provider(config(ProviderId::OpenAi, "gpt-4o"));
        orchestrator.add_provider(config(ProviderId::Gemini, "gemini-2.0-flash"));

        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            cancel.cancel();
        });

        let started = tokio::time::Instant::now();
        let results = orchestrator
            .dispatch(
                &GenerationRequest::new("go"),
                DispatchOptions::default().with_cancel(token),
            )
            .await
            .unwrap();

        // Both calls were abandoned promptly instead of running to timeout
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.success));
        assert!(
            results
                .iter()
                .all(|r| r.error.as_deref() == Some("dispatch cancelled"))
        );
    }
}
