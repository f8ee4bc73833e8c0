//! Prompt templates for the brainstorm and reconciliation passes.

use crate::idea::record::IdeaRecord;

/// Templates for the fan-out brainstorming pass.
pub struct BrainstormPrompt;

impl BrainstormPrompt {
    /// System instruction establishing the research-advisor persona.
    pub fn system() -> &'static str {
        r#"You are a brilliant research advisor at a top university, helping a postgraduate student brainstorm novel research ideas for top-tier AI conferences (ACL, EMNLP, NeurIPS, ICML, AAAI, IJCAI).

Your ideas should be:
1. NOVEL - Not just incremental improvements
2. FEASIBLE - Achievable by a master's student in 6-12 months
3. IMPACTFUL - Address real problems with clear contributions
4. PUBLISHABLE - Suitable for top venues

Think creatively! Combine ideas from different areas, challenge assumptions, find overlooked problems."#
    }

    /// User prompt asking for `num_ideas` ideas in a JSON envelope.
    pub fn user(num_ideas: usize) -> String {
        format!(
            r#"Generate {} novel research ideas. For each idea, provide JSON:
{{
    "ideas": [
        {{
            "title": "Catchy paper title",
            "one_sentence": "One sentence summary",
            "problem": "What problem does it solve?",
            "novelty": "What's new about this approach?",
            "method_sketch": "Brief method description",
            "expected_contribution": "What will this contribute?",
            "feasibility": "high/medium/low",
            "required_resources": ["GPU", "dataset"],
            "potential_venues": ["ACL", "NeurIPS"],
            "risks": ["risk1", "risk2"],
            "first_steps": ["step1", "step2", "step3"]
        }}
    ]
}}"#,
            num_ideas
        )
    }
}

/// Templates for the second-order reconciliation pass.
pub struct ReconcilePrompt;

impl ReconcilePrompt {
    /// System instruction for the reconciling model.
    pub fn system() -> &'static str {
        "You are a research advisor summarizing ideas."
    }

    /// User prompt carrying the combined idea list from all providers.
    pub fn user(all_ideas: &[IdeaRecord]) -> String {
        let ideas_text =
            serde_json::to_string_pretty(all_ideas).unwrap_or_else(|_| "[]".to_string());

        format!(
            r#"Analyze these research ideas from multiple AI models:

{}

Tasks:
1. Identify unique ideas (remove duplicates/similar ones)
2. Rank by novelty and feasibility
3. Highlight consensus ideas (mentioned by multiple models)
4. Note unique perspectives from each model

Output JSON:
{{
    "unique_ideas": [...],
    "consensus_themes": [...],
    "top_recommendations": [...],
    "summary": "Brief analysis"
}}"#,
            ideas_text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_carries_idea_count() {
        let prompt = BrainstormPrompt::user(5);
        assert!(prompt.starts_with("Generate 5 novel research ideas"));
        assert!(prompt.contains("\"ideas\""));
    }

    #[test]
    fn test_reconcile_prompt_embeds_ideas() {
        let ideas = vec![IdeaRecord::from_raw_text("idea one")];
        let prompt = ReconcilePrompt::user(&ideas);
        assert!(prompt.contains("idea one"));
        assert!(prompt.contains("unique_ideas"));
    }
}
