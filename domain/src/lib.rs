//! Domain layer for ideastorm
//!
//! This crate contains the core entities, value objects, and pure parsing
//! logic. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Fan-out brainstorming
//!
//! One generation request is sent to several LLM backends at once. Each
//! backend answers in freeform text; the answer is normalized into a list of
//! [`IdeaRecord`] values. A second-order reconciliation pass deduplicates,
//! ranks and summarizes the union of all ideas.
//!
//! ## Lenient extraction
//!
//! Providers are instructed, but never guaranteed, to answer with pure JSON.
//! The extraction logic in [`idea::extract`] tolerates prose around the JSON
//! payload and never discards a provider's answer.

pub mod core;
pub mod generation;
pub mod idea;
pub mod prompt;

// Re-export commonly used types
pub use crate::core::provider::{ProviderConfig, ProviderId};
pub use generation::request::{GenerationRequest, flatten_context};
pub use generation::result::ProviderResult;
pub use idea::extract::{first_object_with_key, parse_ideas};
pub use idea::record::{IdeaRecord, ProviderReport, ReconciliationSummary};
pub use prompt::{BrainstormPrompt, ReconcilePrompt};
