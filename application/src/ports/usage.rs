//! Usage telemetry port
//!
//! Every successful provider call emits one [`UsageRecord`] describing the
//! endpoint hit and the token counts reported by the backend. The sink is a
//! collaborator interface — the core never interprets the records.

use ideastorm_domain::ProviderId;
use serde::{Deserialize, Serialize};

/// One API call's worth of usage accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Logical endpoint name (e.g. "messages", "chat.completions")
    pub endpoint: String,
    /// The provider that served the call
    pub provider: ProviderId,
    /// The model that served the call
    pub model: String,
    /// Input/prompt tokens as reported by the backend (0 if unreported)
    pub input_tokens: u64,
    /// Output/completion tokens as reported by the backend (0 if unreported)
    pub output_tokens: u64,
}

/// Consumer of usage records.
pub trait UsageSink: Send + Sync {
    fn record(&self, record: UsageRecord);
}

/// No-op sink for callers that don't collect telemetry.
pub struct NoUsage;

impl UsageSink for NoUsage {
    fn record(&self, _record: UsageRecord) {}
}
