//! Optional post-ranking hooks: email verification and contact enrichment.
//!
//! The inference path never calls a verification or enrichment provider
//! directly — it calls through these two capability traits, which may or
//! may not be configured. A failing call degrades a field on the result,
//! never the request (§4.10 step 8, §9).
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use hyper::{Body, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use tokio::time::sleep;

/// Result of calling a verification provider for one candidate email.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub status: String,
    pub score: i32,
    pub deliverable: bool,
    pub raw: serde_json::Value,
}

/// Result of calling an enrichment provider for the single best-scoring
/// candidate email.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentResult {
    pub raw: serde_json::Value,
}

/// Capability satisfied by a verification provider adapter. The exact
/// provider wire schema is the provider's, not ours — only the four
/// normalised fields above are required of an implementation.
#[async_trait::async_trait]
pub trait VerificationHook: Send + Sync {
    async fn verify(&self, email: &str) -> Option<VerificationResult>;
}

/// Capability satisfied by an enrichment provider adapter.
#[async_trait::async_trait]
pub trait EnrichmentHook: Send + Sync {
    async fn enrich(&self, email: &str) -> Option<EnrichmentResult>;
}

/// Retry schedule shared by both hooks: five attempts, 500 ms initial
/// delay, exponential back-off capped at 8 s (§5). Retries trigger only on
/// HTTP 429/5xx or a small set of transient transport errors — anything
/// else is treated as a permanent failure and returned immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Runs `operation` with exponential backoff, retrying only while
    /// `is_retryable` says so. Every retry is logged at `warn` — these
    /// calls sit on the network and failures here are operationally
    /// interesting even though they never reach the caller of `predict`.
    pub async fn execute<F, Fut, T>(&self, mut operation: F, is_retryable: impl Fn(&str) -> bool) -> Result<T, String>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, String>>,
    {
        let mut attempt = 0;
        let mut delay = self.initial_delay;

        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts || !is_retryable(&e) => return Err(e),
                Err(e) => {
                    tracing::warn!(attempt, max_attempts = self.max_attempts, error = %e, "retrying hook call");
                    sleep(delay).await;
                    delay = std::cmp::min(Duration::from_secs_f64(delay.as_secs_f64() * self.multiplier), self.max_delay);
                }
            }
        }
    }
}

fn is_transient_transport_error(message: &str) -> bool {
    message.contains("429")
        || message.contains("timed out")
        || message.contains("connection reset")
        || message.contains("5")
            && (message.contains("500") || message.contains("502") || message.contains("503") || message.contains("504"))
}

/// A minimal single-request HTTPS GET, used by both HTTP hooks below.
/// Grounded in the same hyper + hyper-tls stack the rest of this crate's
/// network-facing code uses — a fresh `hyper::Client<HttpsConnector<..>>`
/// per call rather than a pooled, long-lived client, since these hooks run
/// at most a handful of times per prediction.
async fn https_get(uri: &Uri) -> Result<Bytes, String> {
    let https = HttpsConnector::new();
    let client = hyper::Client::builder().build::<_, Body>(https);

    let req = Request::builder()
        .uri(uri.clone())
        .header("Accept", "application/json")
        .body(Body::empty())
        .map_err(|e| format!("request build failed: {e}"))?;

    let res = client.request(req).await.map_err(|e| format!("request failed: {e}"))?;
    let status = res.status();
    let body = hyper::body::to_bytes(res.into_body()).await.map_err(|e| format!("body read failed: {e}"))?;

    match status {
        StatusCode::OK => Ok(body),
        StatusCode::TOO_MANY_REQUESTS => Err("429 rate limited".to_string()),
        s if s.is_server_error() => Err(format!("{} server error", s.as_u16())),
        s => Err(format!("unexpected status {s}")),
    }
}

/// Default, network-backed [`VerificationHook`] implementation.
pub struct HttpVerificationClient {
    base_url: String,
    api_key: String,
    retry_policy: RetryPolicy,
}

impl HttpVerificationClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), api_key: api_key.into(), retry_policy: RetryPolicy::default() }
    }
}

#[async_trait::async_trait]
impl VerificationHook for HttpVerificationClient {
    async fn verify(&self, email: &str) -> Option<VerificationResult> {
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("email", email)
            .append_pair("key", &self.api_key)
            .finish();
        let uri: Uri = format!("{}/v1/verify?{query}", self.base_url).parse().ok()?;

        let result = self
            .retry_policy
            .execute(|| async { https_get(&uri).await }, is_transient_transport_error)
            .await;

        let body = match result {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%email, error = %e, "verification call failed after retries");
                return None;
            }
        };

        let raw: serde_json::Value = serde_json::from_slice(&body).ok()?;
        Some(VerificationResult {
            status: raw.get("status")?.as_str()?.to_string(),
            score: raw.get("score").and_then(|v| v.as_i64()).unwrap_or(0) as i32,
            deliverable: raw.get("deliverable").and_then(|v| v.as_bool()).unwrap_or(false),
            raw,
        })
    }
}

/// Default, network-backed [`EnrichmentHook`] implementation.
pub struct HttpEnrichmentClient {
    base_url: String,
    api_key: String,
    retry_policy: RetryPolicy,
}

impl HttpEnrichmentClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), api_key: api_key.into(), retry_policy: RetryPolicy::default() }
    }
}

#[async_trait::async_trait]
impl EnrichmentHook for HttpEnrichmentClient {
    async fn enrich(&self, email: &str) -> Option<EnrichmentResult> {
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("email", email)
            .append_pair("key", &self.api_key)
            .finish();
        let uri: Uri = format!("{}/v1/enrich?{query}", self.base_url).parse().ok()?;

        let result = self
            .retry_policy
            .execute(|| async { https_get(&uri).await }, is_transient_transport_error)
            .await;

        let body = match result {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(%email, error = %e, "enrichment call failed after retries");
                return None;
            }
        };

        let raw: serde_json::Value = serde_json::from_slice(&body).ok()?;
        Some(EnrichmentResult { raw })
    }
}

/// Shared by both hooks via `Arc` so the engine can hold either, both, or
/// neither without a generic parameter leaking into its public type.
pub type SharedVerificationHook = Arc<dyn VerificationHook>;
pub type SharedEnrichmentHook = Arc<dyn EnrichmentHook>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn retry_policy_gives_up_on_non_retryable_error() {
        let policy = RetryPolicy { max_attempts: 5, ..Default::default() };
        let mut calls = 0;
        let result: Result<(), String> = policy
            .execute(
                || {
                    calls += 1;
                    async { Err("404 not found".to_string()) }
                },
                is_transient_transport_error,
            )
            .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn retry_policy_retries_transient_errors_up_to_max_attempts() {
        let policy = RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            multiplier: 2.0,
        };
        let mut calls = 0;
        let result: Result<(), String> = policy
            .execute(
                || {
                    calls += 1;
                    async { Err("connection reset".to_string()) }
                },
                is_transient_transport_error,
            )
            .await;
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[test]
    fn is_transient_transport_error_recognises_rate_limit_and_5xx() {
        assert!(is_transient_transport_error("429 rate limited"));
        assert!(is_transient_transport_error("503 server error"));
        assert!(!is_transient_transport_error("401 unauthorized"));
    }
}
