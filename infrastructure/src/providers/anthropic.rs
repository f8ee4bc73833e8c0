//! Native messages-protocol client (Anthropic).
//!
//! Wire contract: POST `{base}/v1/messages` with `x-api-key` and
//! `anthropic-version` headers; the system instruction travels as a
//! top-level `system` field, not a message. The answer envelope exposes
//! `content[0].text` and `usage.input_tokens` / `usage.output_tokens`.

use crate::providers::families::family_defaults;
use crate::transport::{GENERATE_ATTEMPTS, Transport, VALIDATE_ATTEMPTS, send_with_retry};
use async_trait::async_trait;
use ideastorm_application::ports::provider_client::{ProviderClient, ProviderError};
use ideastorm_application::ports::usage::{UsageRecord, UsageSink};
use ideastorm_domain::{GenerationRequest, ProviderConfig, ProviderId};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    provider: ProviderId,
    model: String,
    api_key: String,
    base_url: String,
    transport: Arc<dyn Transport>,
    usage: Arc<dyn UsageSink>,
}

impl AnthropicClient {
    pub fn new(
        config: &ProviderConfig,
        transport: Arc<dyn Transport>,
        usage: Arc<dyn UsageSink>,
    ) -> Self {
        let model = if config.model.is_empty() {
            family_defaults(&config.provider).model
        } else {
            config.model.clone()
        };
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        debug!("Anthropic client initialized: model={}, base_url={}", model, base_url);

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
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("content-type".to_string(), "application/json".to_string()),
            ("x-api-key".to_string(), self.api_key.clone()),
            (
                "anthropic-version".to_string(),
                ANTHROPIC_VERSION.to_string(),
            ),
        ]
    }

    fn request_body(&self, request: &GenerationRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": [{"role": "user", "content": request.rendered_prompt()}],
        });
        if let Some(system) = &request.system {
            body["system"] = json!(system);
        }
        body
    }

    /// Pull answer text and token counters out of the response envelope.
    fn extract(&self, body: &str) -> Result<(String, u64, u64), ProviderError> {
        let envelope: Value = serde_json::from_str(body).map_err(|e| {
            ProviderError::new(self.provider.clone(), format!("malformed response: {}", e))
        })?;

        let text = envelope
            .pointer("/content/0/text")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ProviderError::new(self.provider.clone(), "response envelope missing content text")
            })?
            .to_string();

        let input_tokens = envelope
            .pointer("/usage/input_tokens")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let output_tokens = envelope
            .pointer("/usage/output_tokens")
            .and_then(Value::as_u64)
            .unwrap_or(0);

        Ok((text, input_tokens, output_tokens))
    }
}

#[async_trait]
impl ProviderClient for AnthropicClient {
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
            endpoint: "messages".to_string(),
            provider: self.provider.clone(),
            model: self.model.clone(),
            input_tokens,
            output_tokens,
        });
        debug!(
            "Anthropic call ok: input_tokens={}, output_tokens={}",
            input_tokens, output_tokens
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
