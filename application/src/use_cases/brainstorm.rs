//! Brainstorm use case
//!
//! The end-to-end flow: build the brainstorm prompt from a topic and its
//! research context, fan it out to every enabled provider, normalize each
//! successful answer into a [`ProviderReport`], then reconcile the union of
//! all ideas into one [`ReconciliationSummary`].

use crate::use_cases::dispatch::{DispatchError, DispatchOptions, Orchestrator};
use crate::use_cases::reconcile::Reconciler;
use ideastorm_domain::{
    BrainstormPrompt, GenerationRequest, ProviderReport, ProviderResult, ReconciliationSummary,
    parse_ideas,
};
use serde_json::json;
use tracing::{info, warn};

/// Maximum tokens for each brainstorm answer.
const BRAINSTORM_MAX_TOKENS: u32 = 8000;

/// High temperature: ideation benefits from diversity.
const BRAINSTORM_TEMPERATURE: f64 = 0.8;

/// Input for the Brainstorm use case
#[derive(Debug, Clone)]
pub struct BrainstormInput {
    /// Research topic
    pub topic: String,
    /// Identified research gaps
    pub gaps: Vec<String>,
    /// Weaknesses in current methods
    pub weaknesses: Vec<String>,
    /// Promising future directions
    pub directions: Vec<String>,
    /// Ideas requested per provider
    pub num_ideas: usize,
}

impl BrainstormInput {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            gaps: Vec::new(),
            weaknesses: Vec::new(),
            directions: Vec::new(),
            num_ideas: 5,
        }
    }

    pub fn with_gaps(mut self, gaps: Vec<String>) -> Self {
        self.gaps = gaps;
        self
    }

    pub fn with_weaknesses(mut self, weaknesses: Vec<String>) -> Self {
        self.weaknesses = weaknesses;
        self
    }

    pub fn with_directions(mut self, directions: Vec<String>) -> Self {
        self.directions = directions;
        self
    }

    pub fn with_num_ideas(mut self, num_ideas: usize) -> Self {
        self.num_ideas = num_ideas;
        self
    }

    /// The generation request sent to every provider.
    fn request(&self) -> GenerationRequest {
        GenerationRequest::new(BrainstormPrompt::user(self.num_ideas))
            .with_system(BrainstormPrompt::system())
            .with_context(json!({
                "topic": self.topic,
                "gaps": self.gaps,
                "weaknesses": self.weaknesses,
                "directions": self.directions,
            }))
            .with_max_tokens(BRAINSTORM_MAX_TOKENS)
            .with_temperature(BRAINSTORM_TEMPERATURE)
    }
}

/// Everything one brainstorm run produced.
#[derive(Debug, Clone)]
pub struct BrainstormOutcome {
    /// One result per enabled provider, in completion order
    pub results: Vec<ProviderResult>,
    /// One report per provider that answered successfully
    pub reports: Vec<ProviderReport>,
    /// The reconciled view over all ideas
    pub summary: ReconciliationSummary,
}

/// Use case for running a multi-provider brainstorm.
pub struct BrainstormUseCase {
    orchestrator: Orchestrator,
}

impl BrainstormUseCase {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Execute the full brainstorm flow.
    ///
    /// The reconciliation pass reuses the client of the first provider that
    /// answered successfully, looked up by provider identity. If
    /// reconciliation itself fails, the outcome degrades to the unreconciled
    /// idea union rather than losing data.
    pub async fn execute(
        &self,
        input: BrainstormInput,
        options: DispatchOptions,
    ) -> Result<BrainstormOutcome, DispatchError> {
        info!(
            "Brainstorming {} ideas per provider on topic: {}",
            input.num_ideas, input.topic
        );

        let request = input.request();
        let results = self.orchestrator.dispatch(&request, options).await?;

        let mut reports = Vec::new();
        let mut all_ideas = Vec::new();

        for result in results.iter().filter(|r| r.success) {
            let ideas = parse_ideas(&result.content);
            all_ideas.extend(ideas.iter().cloned());
            reports.push(ProviderReport {
                provider: result.provider.clone(),
                model: result.model.clone(),
                ideas,
                raw_response: result.content.clone(),
            });
        }

        let summary = match self.reconciler_for(&results).await {
            Some(reconciler) => match reconciler.reconcile(all_ideas.clone()).await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!("Reconciliation failed, keeping unreconciled ideas: {}", e);
                    ReconciliationSummary::unreconciled(all_ideas, e.to_string())
                }
            },
            None => {
                warn!("No provider answered successfully; nothing to reconcile");
                ReconciliationSummary::empty()
            }
        };

        Ok(BrainstormOutcome {
            results,
            reports,
            summary,
        })
    }

    /// The reconciling client: first successful result, by identity.
    async fn reconciler_for(&self, results: &[ProviderResult]) -> Option<Reconciler> {
        let first_success = results.iter().find(|r| r.success)?;
        let client = self
            .orchestrator
            .cached_client(&first_success.provider, &first_success.model)
            .await?;
        Some(Reconciler::new(client))
    }
}
