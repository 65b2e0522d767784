//! Heliox backend API client.
//!
//! Communicates with the backend using the synchronous `ureq` HTTP client
//! behind a small [`Transport`] trait, so views and tests can run against
//! scripted responses. Provides:
//!
//! - **URL resolution**: base address + `/api/v1` for versioned endpoints,
//!   bare base address for `/health`.
//! - **Raw and JSON fetches**: [`ApiClient::fetch`] hands back status and
//!   body; [`ApiClient::fetch_json`] fails on any non-2xx status.
//! - **Typed endpoint helpers** for every endpoint the dashboard consumes.
//!
//! There are no retries anywhere; a retry is always an explicit call.

pub mod error;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::schema::ApiConfig;

pub use error::ApiError;
pub use types::*;

/// Version prefix for all versioned endpoints.
pub const API_PREFIX: &str = "/api/v1";

/// Timeout applied to every health check regardless of configuration.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Status and body of an HTTP response, whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP surface the client needs.
///
/// Implementations return `Ok` for every response the server produced,
/// including 4xx/5xx, and `Err(ApiError::Network)` only when no response
/// arrived.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, timeout: Option<Duration>) -> Result<RawResponse, ApiError>;
    fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<RawResponse, ApiError>;
}

/// [`Transport`] backed by `ureq`.
#[derive(Debug, Default)]
pub struct UreqTransport;

impl UreqTransport {
    fn finish(result: Result<ureq::Response, ureq::Error>) -> Result<RawResponse, ApiError> {
        match result {
            Ok(resp) => Ok(Self::read(resp)),
            Err(ureq::Error::Status(_, resp)) => Ok(Self::read(resp)),
            Err(ureq::Error::Transport(t)) => Err(ApiError::Network(t.to_string())),
        }
    }

    fn read(resp: ureq::Response) -> RawResponse {
        let status = resp.status();
        let body = resp.into_string().unwrap_or_default();
        RawResponse { status, body }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, timeout: Option<Duration>) -> Result<RawResponse, ApiError> {
        let mut req = ureq::get(url).set("Accept", "application/json");
        if let Some(t) = timeout {
            req = req.timeout(t);
        }
        Self::finish(req.call())
    }

    fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<RawResponse, ApiError> {
        let mut req = ureq::post(url).set("Accept", "application/json");
        if let Some(t) = timeout {
            req = req.timeout(t);
        }
        Self::finish(req.send_json(body))
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the Heliox backend.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    timeout: Option<Duration>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from the resolved config, using `ureq`.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::from_config_with(config, Arc::new(UreqTransport))
    }

    /// Build a client from the resolved config over `transport`.
    /// `timeout_ms = 0` means no timeout on data requests.
    pub fn from_config_with(config: &ApiConfig, transport: Arc<dyn Transport>) -> Self {
        let timeout = (config.timeout_ms > 0).then(|| Duration::from_millis(config.timeout_ms));
        Self::with_transport(&config.base_url, timeout, transport)
    }

    /// Build a client over an arbitrary transport.
    pub fn with_transport(
        base_url: &str,
        timeout: Option<Duration>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a request path into a full URL.
    ///
    /// - absolute `http(s)://` URLs are returned unchanged
    /// - `/health` goes straight to the base address
    /// - paths already under `/api/` only get the base address
    /// - everything else is treated as a versioned endpoint under `/api/v1`
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        if path == "/health" || path.starts_with("/health?") || path.starts_with("/api/") {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}{}", self.base_url, API_PREFIX, path)
        }
    }

    /// Perform a GET and return the raw response, whatever its status.
    pub fn fetch(&self, path: &str) -> Result<RawResponse, ApiError> {
        self.transport.get(&self.resolve(path), self.timeout)
    }

    /// Perform a GET and decode a successful JSON body.
    pub fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.fetch(path)?;
        decode(resp)
    }

    /// POST a JSON body and return the raw response, whatever its status.
    pub fn post(&self, path: &str, body: &serde_json::Value) -> Result<RawResponse, ApiError> {
        self.transport
            .post_json(&self.resolve(path), body, self.timeout)
    }

    // -- endpoints ----------------------------------------------------------

    /// `GET /health` with the fixed 5 s timeout.
    pub fn health(&self) -> Result<HealthStatus, ApiError> {
        let resp = self
            .transport
            .get(&self.resolve("/health"), Some(HEALTH_TIMEOUT))?;
        decode(resp)
    }

    /// `GET /api/v1/analytics/cost/by-model?start=..&end=..`
    pub fn cost_by_model(&self, range: &DateRange) -> Result<Vec<ModelCost>, ApiError> {
        self.fetch_json(&format!(
            "/analytics/cost/by-model?start={}&end={}",
            range.start, range.end
        ))
    }

    /// `GET /api/v1/analytics/cost/by-team?start=..&end=..`
    pub fn cost_by_team(&self, range: &DateRange) -> Result<Vec<TeamCost>, ApiError> {
        self.fetch_json(&format!(
            "/analytics/cost/by-team?start={}&end={}",
            range.start, range.end
        ))
    }

    /// `GET /api/v1/recommendations?start_date=..&end_date=..`
    pub fn recommendations(&self, range: &DateRange) -> Result<RecommendationsResponse, ApiError> {
        self.fetch_json(&format!(
            "/recommendations?start_date={}&end_date={}",
            range.start, range.end
        ))
    }

    /// `GET /api/v1/forecast/spend?horizon_days=N[&provider=..][&gpu_type=..]`
    pub fn forecast(&self, query: &ForecastQuery) -> Result<ForecastData, ApiError> {
        let mut path = format!("/forecast/spend?horizon_days={}", query.horizon_days);
        if let Some(provider) = &query.provider {
            path.push_str(&format!("&provider={}", urlencoding::encode(provider)));
        }
        if let Some(gpu_type) = &query.gpu_type {
            path.push_str(&format!("&gpu_type={}", urlencoding::encode(gpu_type)));
        }
        self.fetch_json(&path)
    }

    /// `POST /api/v1/public/waitlist`. The raw status is returned so the
    /// caller can tell a duplicate (409) from other failures.
    pub fn join_waitlist(&self, entry: &WaitlistEntry) -> Result<RawResponse, ApiError> {
        let body = serde_json::to_value(entry).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.post("/public/waitlist", &body)
    }
}

/// Parameters of a forecast request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForecastQuery {
    pub horizon_days: u32,
    pub provider: Option<String>,
    pub gpu_type: Option<String>,
}

impl ForecastQuery {
    pub fn horizon(horizon_days: u32) -> Self {
        Self {
            horizon_days,
            provider: None,
            gpu_type: None,
        }
    }
}

fn decode<T: DeserializeOwned>(resp: RawResponse) -> Result<T, ApiError> {
    if !resp.is_success() {
        return Err(ApiError::Status {
            status: resp.status,
            body: resp.body,
        });
    }
    serde_json::from_str(&resp.body).map_err(|e| ApiError::Decode(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
