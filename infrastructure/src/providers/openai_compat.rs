//! OpenAI-compatible chat-completions client.
//!
//! Covers every backend that speaks the chat-completions protocol (OpenAI,
//! Gemini's compatibility endpoint, DeepSeek, Qwen, custom backends). Same
//! semantics as the native protocol, except the system instruction is
//! injected as a leading message with the `system` role rather than a
//! separate field. Per-family defaults come from the static table in
//! [`families`](crate::providers::families).

use crate::providers::families::family_defaults;
use crate::transport::{GENERATE_ATTEMPTS, Transport, VALIDATE_ATTEMPTS, send_with_retry};
use async_trait::async_trait;
use ideastorm_application::ports::provider_client::{ProviderClient, ProviderError};
use ideastorm_application::ports::usage::{UsageRecord, UsageSink};
use ideastorm_domain::{GenerationRequest, ProviderConfig, ProviderId};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiCompatClient {
    provider: ProviderId,
    model: String,
    api_key: String,
    base_url: String,
    transport: Arc<dyn Transport>,
    usage: Arc<dyn UsageSink>,
}

impl OpenAiCompatClient {
    pub fn new(
        config: &ProviderConfig,
        transport: Arc<dyn Transport>,
        usage: Arc<dyn UsageSink>,
    ) -> Self {
        let defaults = family_defaults(&config.provider);
        let model = if config.model.is_empty() {
            defaults.model
        } else {
            config.model.clone()
        };
        let base_url = config
            .base_url
            .clone()
            .or(defaults.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        debug!(
            "OpenAI-compatible client initialized: provider={}, model={}, base_url={}",
            config.provider, model, base_url
        );

        Self {
            provider: config.provider.clone(),
            model,
            api_key: config.api_key.clone(),
            base_url,
            transport,
            usage,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("content-type".to_string(), "application/json".to_string()),
            (
                "authorization".to_string(),
                format!("Bearer {}", self.api_key),
            ),
        ]
    }

    fn request_body(&self, request: &GenerationRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": request.rendered_prompt()}));

        json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": messages,
        })
    }

    fn extract(&self, body: &str) -> Result<(String, u64, u64), ProviderError> {
        let envelope: Value = serde_json::from_str(body).map_err(|e| {
            ProviderError::new(self.provider.clone(), format!("malformed response: {}", e))
        })?;

        let text = envelope
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ProviderError::new(
                    self.provider.clone(),
                    "response envelope missing message content",
                )
            })?
            .to_string();

        // Usage is optional on compatibility endpoints
        let input_tokens = envelope
            .pointer("/usage/prompt_tokens")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let output_tokens = envelope
            .pointer("/usage/completion_tokens")
            .and_then(Value::as_u64)
            .unwrap_or(0);

        Ok((text, input_tokens, output_tokens))
    }
}

#[async_trait]
impl ProviderClient for OpenAiCompatClient {
    fn provider(&self) -> &ProviderId {
        &self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let body = self.request_body(request);
        let response = send_with_retry(
            self.transport.as_ref(),
            &self.endpoint(),
            &self.headers(),
            &body,
            GENERATE_ATTEMPTS,
        )
        .await
        .map_err(|e| ProviderError::new(self.provider.clone(), e.to_string()))?;

        let (text, input_tokens, output_tokens) = self.extract(&response.body)?;

        self.usage.record(UsageRecord {
            endpoint: "chat.completions".to_string(),
            provider: self.provider.clone(),
            model: self.model.clone(),
            input_tokens,
            output_tokens,
        });
        debug!(
            "{} call ok: input_tokens={}, output_tokens={}",
            self.provider, input_tokens, output_tokens
        );

        Ok(text)
    }

    async fn validate_credential(&self) -> bool {
        let body = json!({
            "model": self.model,
            "max_tokens": 10,
            "messages": [{"role": "user", "content": "Hi"}],
        });
        send_with_retry(
            self.transport.as_ref(),
            &self.endpoint(),
            &self.headers(),
            &body,
            VALIDATE_ATTEMPTS,
        )
        .await
        .is_ok()
    }
}
