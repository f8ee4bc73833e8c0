//! Reconcile use case
//!
//! Second-order pass over the union of idea lists from all providers: one
//! further generation call deduplicates, ranks, detects consensus and
//! summarizes. The step degrades gracefully — an unparseable answer keeps
//! the unreconciled input rather than discarding data.

use crate::ports::provider_client::{ProviderClient, ProviderError};
use ideastorm_domain::{
    GenerationRequest, IdeaRecord, ReconcilePrompt, ReconciliationSummary, first_object_with_key,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum tokens for the reconciliation answer.
const RECONCILE_MAX_TOKENS: u32 = 8000;

/// Low temperature: reconciliation is analysis, not ideation.
const RECONCILE_TEMPERATURE: f64 = 0.3;

/// Deduplicates, ranks and summarizes ideas drawn from all providers.
pub struct Reconciler {
    client: Arc<dyn ProviderClient>,
}

impl Reconciler {
    pub fn new(client: Arc<dyn ProviderClient>) -> Self {
        Self { client }
    }

    /// Reconcile the combined idea list into a summary.
    ///
    /// An empty input returns an empty summary immediately, issuing no
    /// generation call. Otherwise exactly one call is made; if its answer
    /// cannot be parsed, the summary falls back to the unreconciled input
    /// with the raw answer as the free-text summary.
    pub async fn reconcile(
        &self,
        all_ideas: Vec<IdeaRecord>,
    ) -> Result<ReconciliationSummary, ProviderError> {
        if all_ideas.is_empty() {
            debug!("Nothing to reconcile");
            return Ok(ReconciliationSummary::empty());
        }

        info!("Reconciling {} ideas via {}", all_ideas.len(), self.client.provider());

        let request = GenerationRequest::new(ReconcilePrompt::user(&all_ideas))
            .with_system(ReconcilePrompt::system())
            .with_max_tokens(RECONCILE_MAX_TOKENS)
            .with_temperature(RECONCILE_TEMPERATURE);

        let answer = self.client.generate(&request).await?;

        Ok(Self::parse_summary(&answer, all_ideas))
    }

    /// Parse a reconciliation answer with the same balanced-object strategy
    /// used for idea extraction.
    fn parse_summary(answer: &str, fallback_ideas: Vec<IdeaRecord>) -> ReconciliationSummary {
        if let Some(envelope) = first_object_with_key(answer, "unique_ideas")
            && let Ok(summary) = serde_json::from_value::<ReconciliationSummary>(envelope)
        {
            return summary;
        }

        warn!("Reconciliation answer did not parse; keeping unreconciled ideas");
        ReconciliationSummary::unreconciled(fallback_ideas, answer)
    }
}
