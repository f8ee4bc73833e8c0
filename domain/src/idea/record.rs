//! Structured idea records and aggregate result types.
//!
//! An [`IdeaRecord`] is deliberately an open mapping rather than a rigid
//! struct: providers attach whatever attributes they like (title,
//! one_sentence, problem, novelty, method_sketch, expected_contribution,
//! feasibility, required_resources, potential_venues, risks, first_steps,
//! ...). Only the `ideas` key and sequence shape are load-bearing for the
//! orchestration logic; everything else passes through opaquely.

use crate::core::provider::ProviderId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key used when an answer could not be parsed and is carried verbatim.
pub const RAW_RESPONSE_KEY: &str = "raw_response";

/// One research idea as produced by a provider's answer (open mapping).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdeaRecord(pub Map<String, Value>);

impl IdeaRecord {
    /// Wraps an unparseable answer into a fallback record holding the raw
    /// text under [`RAW_RESPONSE_KEY`].
    pub fn from_raw_text(text: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(RAW_RESPONSE_KEY.to_string(), Value::String(text.into()));
        Self(map)
    }

    /// The idea's title, if present.
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    /// The raw text carried by a fallback record, if this is one.
    pub fn raw_text(&self) -> Option<&str> {
        self.0.get(RAW_RESPONSE_KEY).and_then(Value::as_str)
    }

    /// Whether this record wraps an unparsed answer.
    pub fn is_fallback(&self) -> bool {
        self.0.len() == 1 && self.0.contains_key(RAW_RESPONSE_KEY)
    }
}

impl From<Map<String, Value>> for IdeaRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A successfully parsed provider outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderReport {
    /// The provider that produced these ideas
    pub provider: ProviderId,
    /// The model that produced these ideas
    pub model: String,
    /// Parsed idea records, in answer order
    pub ideas: Vec<IdeaRecord>,
    /// The provider's raw answer text
    pub raw_response: String,
}

/// Result of the second-order reconciliation pass over all ideas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// Deduplicated ideas, ranked by the reconciling model
    #[serde(default)]
    pub unique_ideas: Vec<IdeaRecord>,
    /// Themes multiple providers converged on
    #[serde(default)]
    pub consensus_themes: Vec<String>,
    /// The reconciling model's top picks
    #[serde(default)]
    pub top_recommendations: Vec<Value>,
    /// Free-text analysis
    #[serde(default)]
    pub summary: String,
}

impl ReconciliationSummary {
    /// An empty summary, returned when there is nothing to reconcile.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fallback when the reconciliation answer could not be parsed: keep the
    /// unreconciled input and carry the raw answer as the summary.
    pub fn unreconciled(ideas: Vec<IdeaRecord>, raw_answer: impl Into<String>) -> Self {
        Self {
            unique_ideas: ideas,
            consensus_themes: Vec::new(),
            top_recommendations: Vec::new(),
            summary: raw_answer.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.unique_ideas.is_empty()
            && self.consensus_themes.is_empty()
            && self.top_recommendations.is_empty()
            && self.summary.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fallback_record_carries_raw_text() {
        let record = IdeaRecord::from_raw_text("not json at all");
        assert!(record.is_fallback());
        assert_eq!(record.raw_text(), Some("not json at all"));
        assert_eq!(record.title(), None);
    }

    #[test]
    fn test_title_accessor() {
        let value = json!({"title": "X", "feasibility": "high"});
        let record = IdeaRecord(value.as_object().unwrap().clone());
        assert_eq!(record.title(), Some("X"));
        assert!(!record.is_fallback());
    }

    #[test]
    fn test_summary_deserializes_with_missing_keys() {
        let summary: ReconciliationSummary =
            serde_json::from_value(json!({"summary": "brief"})).unwrap();
        assert!(summary.unique_ideas.is_empty());
        assert_eq!(summary.summary, "brief");
    }

    #[test]
    fn test_empty_summary() {
        assert!(ReconciliationSummary::empty().is_empty());
    }
}
