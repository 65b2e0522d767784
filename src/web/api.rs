//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>`. Invalid query parameters answer 400.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::dashboard;
use crate::health::{self, HealthReport};
use crate::recommendations::{RecommendationFilters, export};
use crate::waitlist::{Outcome, SubmitStatus, WaitlistDraft, WaitlistForm};

use super::{AppState, HttpResponse, content_type_json, error_response, header};

// ---------------------------------------------------------------------------
// JSON request / response types
// ---------------------------------------------------------------------------

/// Waitlist relay request: the form draft plus an optional source tag.
#[derive(Debug, Deserialize)]
struct WaitlistRequest {
    #[serde(flatten)]
    draft: WaitlistDraft,
    #[serde(default)]
    source: Option<String>,
}

#[derive(Debug, Serialize)]
struct WaitlistResponse {
    outcome: Outcome,
    status: SubmitStatus,
    message: &'static str,
    /// Whether the client should clear its form.
    cleared: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse<'a> {
    backend: &'a str,
    #[serde(flatten)]
    report: HealthReport,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON response with the given status.
fn json_response<T: Serialize>(status: u16, data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status)))
}

/// Look up a query parameter, percent-decoded. Empty values count as absent.
pub(crate) fn query_param(url: &str, key: &str) -> Option<String> {
    url.split_once('?')?.1.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        if decode_component(k) != key {
            return None;
        }
        let v = decode_component(v);
        (!v.is_empty()).then_some(v)
    })
}

/// Decode `%XX` escapes and `+` as space. Malformed escapes pass through.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

fn date_param(url: &str, key: &str) -> Result<Option<NaiveDate>, String> {
    match query_param(url, key) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(&v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("invalid {key} date '{v}' (expected YYYY-MM-DD)")),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Point the recommendations view at the request's range and filters.
fn apply_recommendation_params(state: &mut AppState, url: &str) -> Result<(), String> {
    let start = date_param(url, "start")?;
    let end = date_param(url, "end")?;
    let filters = RecommendationFilters::from_choices(
        query_param(url, "severity").as_deref(),
        query_param(url, "provider").as_deref(),
        query_param(url, "type").as_deref(),
        query_param(url, "q").as_deref(),
    )
    .map_err(|e| e.to_string())?;

    let range = dashboard::resolve_range(&state.config.dashboard, today(), start, end);
    let AppState {
        api,
        recommendations,
        ..
    } = state;
    recommendations.filters = filters;
    // A changed range is fetched by `load`; retry only re-asks for the same one.
    if query_param(url, "retry").is_some()
        && recommendations.state().error().is_some()
        && recommendations.range() == Some(&range)
    {
        recommendations.retry(api);
    }
    recommendations.load(api, range);
    Ok(())
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/dashboard?start&end&horizon[&retry=1]` — every chart panel.
pub fn get_dashboard(state: &mut AppState, url: &str) -> Result<HttpResponse> {
    let (start, end) = match (date_param(url, "start"), date_param(url, "end")) {
        (Ok(s), Ok(e)) => (s, e),
        (Err(msg), _) | (_, Err(msg)) => return Ok(error_response(400, &msg)),
    };
    let horizon = match query_param(url, "horizon").map(|h| h.parse::<u32>()) {
        None => state.config.dashboard.forecast_horizon_days,
        Some(Ok(h)) if h > 0 => h,
        Some(_) => return Ok(error_response(400, "horizon must be a positive number of days")),
    };

    let range = dashboard::resolve_range(&state.config.dashboard, today(), start, end);
    let AppState { api, dashboard, .. } = state;
    dashboard.set_range(range);
    dashboard.set_horizon(horizon);
    if query_param(url, "retry").is_some() {
        dashboard.retry_failed(api);
    }
    dashboard.load(api);

    json_response(200, &dashboard.snapshot())
}

/// `GET /api/recommendations?start&end&severity&provider&type&q` — filtered
/// list plus aggregates.
pub fn get_recommendations(state: &mut AppState, url: &str) -> Result<HttpResponse> {
    if let Err(msg) = apply_recommendation_params(state, url) {
        return Ok(error_response(400, &msg));
    }
    json_response(200, &state.recommendations.report())
}

/// `GET /api/recommendations.csv?...` — CSV of the filtered set, 204 when
/// there is nothing to export.
pub fn get_recommendations_csv(state: &mut AppState, url: &str) -> Result<HttpResponse> {
    if let Err(msg) = apply_recommendation_params(state, url) {
        return Ok(error_response(400, &msg));
    }
    let Some(csv) = state.recommendations.to_csv() else {
        return Ok(Response::from_data(Vec::new()).with_status_code(StatusCode(204)));
    };

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::default_file_name(today())
    );
    Ok(Response::from_data(csv.into_bytes())
        .with_header(header("Content-Type", "text/csv; charset=utf-8"))
        .with_header(header("Content-Disposition", &disposition))
        .with_status_code(StatusCode(200)))
}

/// `POST /api/waitlist` — relay a signup to the backend.
///
/// Answers 201 on success, 409 for a duplicate, 400 for an invalid email,
/// and 502 when the backend failed or could not be reached.
pub fn post_waitlist(state: &mut AppState, body: &str) -> Result<HttpResponse> {
    let req: WaitlistRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => return Ok(error_response(400, &format!("invalid waitlist request: {e}"))),
    };
    let source = req
        .source
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| state.config.waitlist.source.clone());

    let mut form = WaitlistForm::with_draft(&source, req.draft);
    let Some(outcome) = form.submit(&state.api, state.sink.as_ref()) else {
        return Ok(error_response(400, "a valid email address is required"));
    };

    let status = match outcome {
        Outcome::Joined => 201,
        Outcome::Duplicate => 409,
        Outcome::Failed | Outcome::NetworkError => 502,
    };
    json_response(
        status,
        &WaitlistResponse {
            outcome,
            status: form.status(),
            message: outcome.message(),
            cleared: outcome == Outcome::Joined,
        },
    )
}

/// `GET /api/health` — backend reachability.
pub fn get_health(state: &mut AppState) -> Result<HttpResponse> {
    let report = health::check(&state.api);
    json_response(
        200,
        &HealthResponse {
            backend: state.api.base_url(),
            report,
        },
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
