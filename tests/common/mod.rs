//! Local stand-in for the Heliox backend, served by `tiny_http` on an
//! ephemeral port.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::thread;

use tiny_http::{Header, Response, Server};

type Handler = dyn Fn(&str, &str, &str) -> (u16, String) + Send + Sync;

pub struct FakeBackend {
    server: Arc<Server>,
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl FakeBackend {
    /// Start a backend answering `(method, url, body) -> (status, body)`.
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, &str, &str) -> (u16, String) + Send + Sync + 'static,
    {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let addr = server.server_addr().to_ip().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let handler: Arc<Handler> = Arc::new(handler);
        let srv = server.clone();
        let log = requests.clone();
        thread::spawn(move || {
            for mut request in srv.incoming_requests() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let method = request.method().to_string();
                let url = request.url().to_string();
                log.lock().unwrap().push(format!("{method} {url}"));

                let (status, reply) = handler(&method, &url, &body);
                let resp = Response::from_string(reply)
                    .with_status_code(tiny_http::StatusCode(status))
                    .with_header(
                        Header::from_bytes("Content-Type", "application/json").unwrap(),
                    );
                let _ = request.respond(resp);
            }
        });

        Self {
            server,
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// A backend answering the standard fixtures for every endpoint.
    pub fn standard() -> Self {
        Self::start(|method, url, body| standard_routes(method, url, body))
    }

    pub fn request_count(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.contains(needle))
            .count()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.unblock();
    }
}

pub const MODELS: &str = r#"[
  {"model_name": "llama-3-70b", "total_cost_usd": 1500.0, "job_count": 12},
  {"model_name": "sdxl", "total_cost_usd": 500.0, "job_count": 4}
]"#;

pub const TEAMS: &str = r#"[
  {"team_name": "ML Research", "team_id": "team-ml", "total_cost_usd": 1200.0, "job_count": 10},
  {"team_name": "Vision", "team_id": "team-vision", "total_cost_usd": 800.0, "job_count": 6}
]"#;

pub const FORECAST: &str = r#"{
  "provider": null,
  "gpu_type": null,
  "horizon_days": 2,
  "forecast_method": "moving_average",
  "historical": [{"date": "2026-01-13", "value": 100.0}, {"date": "2026-01-14", "value": 110.0}],
  "forecast": [
    {"date": "2026-01-15", "value": 120.0, "lower_bound": 100.0, "upper_bound": 140.0},
    {"date": "2026-01-16", "value": 125.0, "lower_bound": 101.0, "upper_bound": 149.0}
  ],
  "metadata": {"historical_data_points": 2, "forecast_generated_at": "2026-01-14T00:00:00"}
}"#;

pub const RECOMMENDATIONS: &str = r#"{
  "recommendations": [
    {
      "id": "r1", "type": "idle_gpu", "severity": "high",
      "title": "Idle H100 capacity on AWS",
      "description": "H100 nodes sat idle 62% of the time.",
      "estimated_savings_usd": 1200.0,
      "evidence": {"provider": "aws", "gpu_type": "h100", "waste_percentage": 62.0,
                   "date_range": {"start_date": "2026-01-01", "end_date": "2026-01-14"}},
      "created_at": "2026-01-14T00:00:00"
    },
    {
      "id": "r2", "type": "long_running_job", "severity": "medium",
      "title": "Long-running fine-tune, \"v2\"",
      "description": "Job ran 96h, well past the team median.",
      "estimated_savings_usd": 300.0,
      "evidence": {"provider": "gcp", "gpu_type": "a100", "team_name": "ML Research",
                   "job_id": "job-42", "job_runtime_hours": 96.0},
      "created_at": "2026-01-14T00:00:00"
    },
    {
      "id": "r3", "type": "off_hours_usage", "severity": "low",
      "title": "Weekend usage by Vision",
      "description": "Most GPU hours ran on weekends.",
      "estimated_savings_usd": 40.0,
      "evidence": {"team_name": "Vision", "metadata": {"weekend_pct": 71}},
      "created_at": "2026-01-14T00:00:00"
    }
  ],
  "summary": {"total": 3},
  "date_range": {"start_date": "2026-01-01", "end_date": "2026-01-14"},
  "total_estimated_savings_usd": 1540.0
}"#;

pub fn standard_routes(method: &str, url: &str, body: &str) -> (u16, String) {
    let path = url.split('?').next().unwrap_or(url);
    match (method, path) {
        ("GET", "/health") => (200, r#"{"status":"ok"}"#.to_string()),
        ("GET", "/api/v1/analytics/cost/by-model") => (200, MODELS.to_string()),
        ("GET", "/api/v1/analytics/cost/by-team") => (200, TEAMS.to_string()),
        ("GET", "/api/v1/forecast/spend") => (200, FORECAST.to_string()),
        ("GET", "/api/v1/recommendations") => (200, RECOMMENDATIONS.to_string()),
        ("POST", "/api/v1/public/waitlist") => {
            if body.contains("taken@example.com") {
                (409, r#"{"detail":"This email is already on the waitlist."}"#.to_string())
            } else {
                (201, r#"{"id":1}"#.to_string())
            }
        }
        _ => (404, r#"{"detail":"Not Found"}"#.to_string()),
    }
}
