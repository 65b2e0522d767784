//! Remote resource — the fetch → state lifecycle shared by every data view.
//!
//! A [`RemoteResource`] owns the current input parameters, a request
//! generation counter, and the last settled [`ResourceState`]. Each fetch is
//! issued with a [`Ticket`] carrying the generation it was started for; a
//! completion whose generation is no longer current is discarded, so a slow
//! response for an old date range can never overwrite a newer one.
//!
//! Synchronous callers use [`RemoteResource::load`] / [`RemoteResource::retry`];
//! callers that fetch elsewhere (threads, the web server) pair
//! [`RemoteResource::begin`] with [`RemoteResource::complete`].

use serde::Serialize;

use crate::api::{ApiError, DailySpend, ForecastData, ModelCost, RecommendationsResponse, TeamCost};

// ---------------------------------------------------------------------------
// Payload emptiness
// ---------------------------------------------------------------------------

/// A payload that can be valid yet contain nothing to draw.
pub trait Payload {
    fn is_empty_payload(&self) -> bool;
}

impl Payload for Vec<ModelCost> {
    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

impl Payload for Vec<TeamCost> {
    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

impl Payload for Vec<DailySpend> {
    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

impl Payload for RecommendationsResponse {
    fn is_empty_payload(&self) -> bool {
        self.recommendations.is_empty()
    }
}

impl Payload for ForecastData {
    fn is_empty_payload(&self) -> bool {
        self.historical.is_empty() && self.forecast.is_empty()
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Render branch of a data view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum ResourceState<T> {
    /// No fetch has been started.
    Idle,
    /// A fetch is in flight for the current parameters.
    Loading,
    /// A valid response with zero rows.
    Empty,
    /// A failed fetch; the view offers a retry.
    #[serde(serialize_with = "serialize_error")]
    Error(ApiError),
    Ready(T),
}

fn serialize_error<S: serde::Serializer>(err: &ApiError, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&err.user_message())
}

impl<T> ResourceState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Map the ready payload, keeping every other branch.
    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> ResourceState<U> {
        match self {
            Self::Idle => ResourceState::Idle,
            Self::Loading => ResourceState::Loading,
            Self::Empty => ResourceState::Empty,
            Self::Error(err) => ResourceState::Error(err.clone()),
            Self::Ready(data) => ResourceState::Ready(f(data)),
        }
    }
}

/// Proof that a fetch was started for a given generation and parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<P> {
    generation: u64,
    pub params: P,
}

impl<P> Ticket<P> {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct RemoteResource<P, T> {
    params: Option<P>,
    generation: u64,
    state: ResourceState<T>,
}

impl<P, T> Default for RemoteResource<P, T> {
    fn default() -> Self {
        Self {
            params: None,
            generation: 0,
            state: ResourceState::Idle,
        }
    }
}

impl<P: Clone + PartialEq, T: Payload> RemoteResource<P, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ResourceState<T> {
        &self.state
    }

    pub fn params(&self) -> Option<&P> {
        self.params.as_ref()
    }

    /// Number of fetches started so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a fetch for `params` if they differ from the current ones.
    ///
    /// Returns `None` when the parameters are unchanged and a fetch for
    /// them has already been started.
    pub fn begin(&mut self, params: P) -> Option<Ticket<P>> {
        if self.params.as_ref() == Some(&params) && self.generation > 0 {
            return None;
        }
        self.params = Some(params);
        self.issue()
    }

    /// Start a new fetch for the current parameters, unconditionally.
    pub fn begin_retry(&mut self) -> Option<Ticket<P>> {
        self.issue()
    }

    fn issue(&mut self) -> Option<Ticket<P>> {
        let params = self.params.clone()?;
        self.generation += 1;
        self.state = ResourceState::Loading;
        Some(Ticket {
            generation: self.generation,
            params,
        })
    }

    /// Settle a fetch. Returns `false` (and changes nothing) if the ticket
    /// was superseded by a later [`begin`](Self::begin) or retry.
    pub fn complete(&mut self, ticket: Ticket<P>, result: Result<T, ApiError>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.state = match result {
            Ok(data) if data.is_empty_payload() => ResourceState::Empty,
            Ok(data) => ResourceState::Ready(data),
            Err(err) => ResourceState::Error(err),
        };
        true
    }

    /// Fetch synchronously for `params` (no-op if unchanged).
    pub fn load(&mut self, params: P, fetch: impl FnOnce(&P) -> Result<T, ApiError>) -> &ResourceState<T> {
        if let Some(ticket) = self.begin(params) {
            let result = fetch(&ticket.params);
            self.complete(ticket, result);
        }
        &self.state
    }

    /// Re-issue exactly one fetch for the current parameters.
    pub fn retry(&mut self, fetch: impl FnOnce(&P) -> Result<T, ApiError>) -> &ResourceState<T> {
        if let Some(ticket) = self.begin_retry() {
            let result = fetch(&ticket.params);
            self.complete(ticket, result);
        }
        &self.state
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
