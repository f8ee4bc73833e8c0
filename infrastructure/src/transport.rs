//! Retrying HTTP transport.
//!
//! [`Transport`] is one attempt: a single POST over a fresh connection.
//! [`send_with_retry`] layers the retry policy on top — transient network
//! failures and HTTP 502 are retried with exponential backoff, anything
//! else surfaces immediately. Providers call only `send_with_retry`.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Retry budget for generation calls.
pub const GENERATE_ATTEMPTS: u32 = 3;

/// Retry budget for credential-validation probes.
pub const VALIDATE_ATTEMPTS: u32 = 2;

/// First backoff delay; doubles on each subsequent attempt.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Connect timeout for every attempt.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default total (request) timeout for every attempt.
const DEFAULT_TOTAL_TIMEOUT: Duration = Duration::from_secs(180);

/// Errors raised by one transport attempt
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection failure or timeout — retryable
    #[error("Transient network error: {0}")]
    Transient(String),

    /// Non-2xx response — retryable only for 502
    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
}

impl TransportError {
    /// Whether the retry loop may try again after this error.
    ///
    /// 502 comes from intermediary proxies dropping the connection mid-flight
    /// and is treated like a transient network failure.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Transient(_) | TransportError::Upstream { status: 502, .. }
        )
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// One HTTP attempt against a provider endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as JSON to `endpoint` with the given headers.
    ///
    /// Returns the body for 2xx responses, [`TransportError::Upstream`] for
    /// any other status, and [`TransportError::Transient`] for connection
    /// failures and timeouts.
    async fn send(
        &self,
        endpoint: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport.
///
/// Every attempt builds a fresh client with connection pooling disabled and
/// sends `Connection: close`, so no attempt ever reuses a kept-alive socket
/// through a misbehaving intermediary proxy.
pub struct HttpTransport {
    connect_timeout: Duration,
    total_timeout: Duration,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
            total_timeout: DEFAULT_TOTAL_TIMEOUT,
        }
    }

    /// Override the total per-attempt timeout (direct provider calls can
    /// legitimately take several minutes).
    pub fn with_total_timeout(mut self, total_timeout: Duration) -> Self {
        self.total_timeout = total_timeout;
        self
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        endpoint: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.total_timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| TransportError::Transient(e.to_string()))?;

        let mut request = client
            .post(endpoint)
            .header("connection", "close")
            .json(body);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Transient(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Transient(e.to_string()))?;

        if (200..300).contains(&status) {
            Ok(HttpResponse { status, body: text })
        } else {
            Err(TransportError::Upstream { status, body: text })
        }
    }
}

/// Send with the retry policy applied.
///
/// Retries retryable errors up to `max_attempts` total attempts, sleeping
/// 1s, 2s, 4s, ... between attempts. The last error is surfaced once the
/// budget is exhausted; nothing is ever swallowed.
pub async fn send_with_retry(
    transport: &dyn Transport,
    endpoint: &str,
    headers: &[(String, String)],
    body: &serde_json::Value,
    max_attempts: u32,
) -> Result<HttpResponse, TransportError> {
    let mut backoff = INITIAL_BACKOFF;

    for attempt in 1..=max_attempts {
        match transport.send(endpoint, headers, body).await {
            Ok(response) => {
                debug!("{} answered with HTTP {}", endpoint, response.status);
                return Ok(response);
            }
            Err(e) if attempt < max_attempts && e.is_retryable() => {
                warn!(
                    "Attempt {}/{} against {} failed ({}), retrying in {:?}",
                    attempt, max_attempts, endpoint, e, backoff
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => return Err(e),
        }
    }

    // max_attempts >= 1 means the loop always returns above
    Err(TransportError::Transient("no attempts were made".into()))
}
