// Upstream market-data gateway.
//
// One outbound HTTP call per `fetch`, bounded by a fixed timeout, with the
// outcome classified so the orchestrator can tell "provider says no data"
// from "provider unreachable" without touching transport internals. Retry
// and fallback policy live entirely in the orchestrator; the gateway never
// retries.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

/// Fixed per-call timeout for upstream lookups.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// The three provider endpoints the orchestrator draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Outcode-keyed rent/demand statistics (rent tiers 1 and 2).
    RentalDemand,
    /// Local-market rent statistics keyed by full postcode (rent tier 3).
    LocalRents,
    /// Sold prices, filtered by property type and age (sale path).
    SoldPrices,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::RentalDemand => "rental-demand",
            Endpoint::LocalRents => "rents",
            Endpoint::SoldPrices => "prices",
        }
    }
}

/// A provider-level error status (the call itself completed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    /// Whether the provider is saying it has no data for the requested
    /// property type specifically (as opposed to no data at all). The sale
    /// path uses this to decide the area-wide fallback. Provider wording is
    /// the only signal available, so the match is owned here and nowhere
    /// else.
    pub fn is_type_unsupported(&self) -> bool {
        self.message.to_ascii_lowercase().contains("property type")
    }
}

/// Classified outcome of a single upstream call. Transient: consumed
/// immediately by the orchestrator, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamResponse {
    Success(Value),
    Error(ProviderError),
    Timeout,
    NetworkFailure(String),
}

/// The seam between the orchestrator and the outside world. Tests supply a
/// scripted implementation; production uses [`Gateway`].
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn fetch(&self, endpoint: Endpoint, query: &[(&str, String)]) -> UpstreamResponse;
}

/// Production gateway backed by a shared reqwest client.
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Gateway {
    /// Build a gateway for the given provider base URL. The API key may be
    /// empty; calls will then fail upstream with a provider error, which is
    /// the configured behavior (absence is a startup warning, not a hard
    /// failure).
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Turn a completed HTTP response body into a classified outcome.
    fn classify(body: Value) -> UpstreamResponse {
        if body.get("status").and_then(Value::as_str) == Some("error") {
            let code = match body.get("code") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => String::new(),
            };
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            return UpstreamResponse::Error(ProviderError { code, message });
        }
        UpstreamResponse::Success(body)
    }
}

#[async_trait]
impl MarketData for Gateway {
    async fn fetch(&self, endpoint: Endpoint, query: &[(&str, String)]) -> UpstreamResponse {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        debug!(%url, "upstream lookup");

        let request = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(query);

        let response = match request.send().await {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                warn!(%url, "upstream call timed out");
                return UpstreamResponse::Timeout;
            }
            Err(e) => {
                warn!(%url, error = %e, "upstream call failed");
                return UpstreamResponse::NetworkFailure(e.to_string());
            }
        };

        match response.json::<Value>().await {
            Ok(body) => Self::classify(body),
            Err(e) if e.is_timeout() => {
                warn!(%url, "upstream body read timed out");
                UpstreamResponse::Timeout
            }
            Err(e) => {
                warn!(%url, error = %e, "upstream returned an unreadable body");
                UpstreamResponse::NetworkFailure(e.to_string())
            }
        }
    }
}
