//! Lenient extraction of a JSON object from mixed prose-plus-JSON text.
//!
//! Providers are instructed to answer with a JSON envelope but routinely wrap
//! it in prose or markdown fences, and sometimes truncate it mid-object.
//! These functions extract structure from such answers without ever failing:
//! extraction is pure text scanning, and anything that cannot be decoded is
//! preserved verbatim as a fallback record.
//!
//! The scanner is incremental, not regex-based: a greedy `\{[\s\S]*\}` match
//! mis-bounds on nested objects and on braces inside string literals. Here
//! each `{` starts a depth/string/escape-aware balance scan, and only
//! candidates that decode as a JSON object holding the expected key are
//! accepted.

use crate::idea::record::IdeaRecord;
use serde_json::Value;

/// Find the first syntactically balanced JSON object in `text` that contains
/// `key` at its top level.
///
/// Scans left to right; every `{` (including ones nested inside an earlier
/// candidate) opens a new candidate, so a wrapper object without the key does
/// not hide an inner object that has it. Candidates that are unbalanced,
/// truncated, or fail to decode are skipped and scanning continues.
pub fn first_object_with_key(text: &str, key: &str) -> Option<Value> {
    let bytes = text.as_bytes();

    for start in 0..bytes.len() {
        if bytes[start] != b'{' {
            continue;
        }

        let Some(end) = balanced_end(bytes, start) else {
            // No matching close brace before end of input — truncated output
            continue;
        };

        let candidate = &text[start..=end];
        if let Ok(value) = serde_json::from_str::<Value>(candidate)
            && value.as_object().is_some_and(|map| map.contains_key(key))
        {
            return Some(value);
        }
    }

    None
}

/// Byte index of the `}` closing the object opened at `start`, tracking
/// string literals and escape sequences. `None` if the object never closes.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract a structured idea list from a single provider's freeform answer.
///
/// Looks for the first balanced object carrying an `ideas` array. When no
/// such object exists, or its `ideas` value is not an array, the entire input
/// is wrapped into a single fallback record — parsing never raises and never
/// discards the provider's answer. Non-object array entries are themselves
/// wrapped rather than dropped.
pub fn parse_ideas(text: &str) -> Vec<IdeaRecord> {
    if let Some(envelope) = first_object_with_key(text, "ideas")
        && let Some(Value::Array(items)) = envelope.get("ideas")
    {
        return items
            .iter()
            .map(|item| match item {
                Value::Object(map) => IdeaRecord(map.clone()),
                other => IdeaRecord::from_raw_text(other.to_string()),
            })
            .collect();
    }

    vec![IdeaRecord::from_raw_text(text)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_object_surrounded_by_prose() {
        let text = r#"blah blah {"ideas":[{"title":"X"}]} trailing"#;
        let ideas = parse_ideas(text);
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].title(), Some("X"));
    }

    #[test]
    fn test_no_json_wraps_whole_input() {
        let text = "Sorry, I cannot produce JSON today.";
        let ideas = parse_ideas(text);
        assert_eq!(ideas.len(), 1);
        assert!(ideas[0].is_fallback());
        assert_eq!(ideas[0].raw_text(), Some(text));
    }

    #[test]
    fn test_braces_inside_strings_do_not_mislead_scanner() {
        let text = r#"note {"ideas":[{"title":"Use {braces} safely \" ok"}]} done"#;
        let ideas = parse_ideas(text);
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].title(), Some(r#"Use {braces} safely " ok"#));
    }

    #[test]
    fn test_skips_earlier_object_without_key() {
        let text = r#"{"meta": 1} and then {"ideas": [{"title": "later"}]}"#;
        let ideas = parse_ideas(text);
        assert_eq!(ideas[0].title(), Some("later"));
    }

    #[test]
    fn test_finds_nested_object_inside_wrapper() {
        let text = r#"{"result": {"ideas": [{"title": "inner"}]}}"#;
        // The wrapper lacks the key at top level; the nested object has it
        let value = first_object_with_key(text, "ideas").unwrap();
        assert!(value.get("ideas").is_some());
        let ideas = parse_ideas(text);
        assert_eq!(ideas[0].title(), Some("inner"));
    }

    #[test]
    fn test_truncated_object_falls_back() {
        let text = r#"{"ideas": [{"title": "cut off"#;
        let ideas = parse_ideas(text);
        assert_eq!(ideas.len(), 1);
        assert!(ideas[0].is_fallback());
    }

    #[test]
    fn test_truncated_then_valid_object() {
        let text = r#"{"ideas": [broken... and later: {"ideas": [{"title": "ok"}]}"#;
        let ideas = parse_ideas(text);
        assert_eq!(ideas[0].title(), Some("ok"));
    }

    #[test]
    fn test_markdown_fenced_json() {
        let text = "Here you go:\n```json\n{\"ideas\": [{\"title\": \"A\"}, {\"title\": \"B\"}]}\n```";
        let ideas = parse_ideas(text);
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[1].title(), Some("B"));
    }

    #[test]
    fn test_empty_ideas_array_is_respected() {
        let ideas = parse_ideas(r#"{"ideas": []}"#);
        assert!(ideas.is_empty());
    }

    #[test]
    fn test_non_object_entries_are_wrapped_not_dropped() {
        let ideas = parse_ideas(r#"{"ideas": ["just a string"]}"#);
        assert_eq!(ideas.len(), 1);
        assert!(ideas[0].is_fallback());
    }

    #[test]
    fn test_ideas_key_with_non_array_value_falls_back() {
        let text = r#"{"ideas": "none"}"#;
        let ideas = parse_ideas(text);
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].raw_text(), Some(text));
    }

    #[test]
    fn test_first_object_with_key_for_summary_shape() {
        let text = r#"analysis... {"unique_ideas": [], "summary": "s"} end"#;
        let value = first_object_with_key(text, "unique_ideas").unwrap();
        assert_eq!(value, json!({"unique_ideas": [], "summary": "s"}));
    }

    #[test]
    fn test_unicode_prose_around_object() {
        let text = "考察：{\"ideas\": [{\"title\": \"多言語\"}]} 以上です";
        let ideas = parse_ideas(text);
        assert_eq!(ideas[0].title(), Some("多言語"));
    }
}
