//! Generation request and deterministic context flattening.

use serde_json::Value;

/// One generation request, sent identically to every enabled provider.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The user prompt
    pub prompt: String,
    /// Optional structured context, flattened into a text block and
    /// prepended to the prompt
    pub context: Option<Value>,
    /// Optional system instruction
    pub system: Option<String>,
    /// Maximum output tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
}

impl GenerationRequest {
    /// Creates a request with default generation parameters.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            context: None,
            system: None,
            max_tokens: 4096,
            temperature: 0.8,
        }
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// The prompt as sent on the wire: context block (if any) followed by
    /// the user prompt.
    pub fn rendered_prompt(&self) -> String {
        match &self.context {
            Some(context) => {
                format!("Context:\n{}\n\n{}", flatten_context(context), self.prompt)
            }
            None => self.prompt.clone(),
        }
    }
}

/// Flatten a structured context value into a deterministic text block.
///
/// Shape rules, applied per top-level key:
/// - nested mapping → `## key` subsection header plus `**sub_key:** value` lines
/// - sequence → `## key` header plus `- item` bullet lines
/// - scalar → a single `**key:** value` line
///
/// `serde_json` keeps object keys sorted, so the output is stable for a
/// given input regardless of insertion order.
pub fn flatten_context(context: &Value) -> String {
    let mut lines = Vec::new();

    let Some(map) = context.as_object() else {
        return scalar_text(context);
    };

    for (key, value) in map {
        match value {
            Value::Object(inner) => {
                lines.push(format!("## {}", key));
                for (sub_key, sub_value) in inner {
                    lines.push(format!("**{}:** {}", sub_key, scalar_text(sub_value)));
                }
            }
            Value::Array(items) => {
                lines.push(format!("## {}", key));
                for item in items {
                    lines.push(format!("- {}", scalar_text(item)));
                }
            }
            scalar => {
                lines.push(format!("**{}:** {}", key, scalar_text(scalar)));
            }
        }
    }

    lines.join("\n")
}

/// Render a leaf value without surrounding quotes for strings.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
