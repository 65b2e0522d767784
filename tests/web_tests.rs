/// Embedded web server tests.
///
/// Each test binds the dashboard server on an ephemeral port in front of a
/// fake backend and talks to it over real HTTP.
mod common;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde_json::Value;

use common::FakeBackend;
use heliox::access::MemoryAccessStore;
use heliox::analytics::{EventSink, MemorySink};
use heliox::api::ApiClient;
use heliox::config::HelioxConfig;
use heliox::config::schema::ApiConfig;
use heliox::web::WebServer;

struct Harness {
    server: Arc<WebServer>,
    handle: Option<JoinHandle<()>>,
    base: String,
    events: Arc<MemorySink>,
    backend: FakeBackend,
}

impl Harness {
    fn start() -> Self {
        Self::with_backend(FakeBackend::standard())
    }

    fn with_backend(backend: FakeBackend) -> Self {
        let config = HelioxConfig::default();
        let api = ApiClient::from_config(&ApiConfig {
            base_url: backend.base_url.clone(),
            ..Default::default()
        });
        let events = Arc::new(MemorySink::default());
        let sink: Arc<dyn EventSink> = events.clone();

        let server = WebServer::bind_with(
            &config,
            "127.0.0.1:0",
            &MemoryAccessStore::default(),
            api,
            sink,
        )
        .unwrap();
        let server = Arc::new(server);
        let base = format!("http://{}", server.addr());

        let runner = server.clone();
        let handle = thread::spawn(move || runner.run());

        Self {
            server,
            handle: Some(handle),
            base,
            events,
            backend,
        }
    }

    fn get(&self, path: &str) -> (u16, String) {
        finish(ureq::get(&format!("{}{path}", self.base)).call())
    }

    fn post(&self, path: &str, body: &str) -> (u16, String) {
        finish(
            ureq::post(&format!("{}{path}", self.base))
                .set("Content-Type", "application/json")
                .send_string(body),
        )
    }

    fn get_json(&self, path: &str) -> (u16, Value) {
        let (status, body) = self.get(path);
        (status, serde_json::from_str(&body).unwrap())
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.server.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn finish(result: Result<ureq::Response, ureq::Error>) -> (u16, String) {
    match result {
        Ok(resp) => (resp.status(), resp.into_string().unwrap()),
        Err(ureq::Error::Status(code, resp)) => (code, resp.into_string().unwrap()),
        Err(e) => panic!("request failed: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[test]
fn landing_page_has_waitlist_form() {
    let h = Harness::start();
    let (status, body) = h.get("/");
    assert_eq!(status, 200);
    assert!(body.contains("<form"));
    assert!(body.contains("/api/waitlist"));
}

#[test]
fn dashboard_page_is_served() {
    let h = Harness::start();
    let (status, body) = h.get("/dashboard");
    assert_eq!(status, 200);
    assert!(body.contains("/api/dashboard"));
}

#[test]
fn unknown_path_is_404() {
    let h = Harness::start();
    let (status, body) = h.get_json("/nope");
    assert_eq!(status, 404);
    assert_eq!(body["error"], "not found");
}

// ---------------------------------------------------------------------------
// Dashboard data
// ---------------------------------------------------------------------------

#[test]
fn dashboard_returns_every_panel() {
    let h = Harness::start();
    let (status, body) = h.get_json("/api/dashboard?start=2026-01-01&end=2026-01-14&horizon=2");

    assert_eq!(status, 200);
    assert_eq!(body["start"], "2026-01-01");
    assert_eq!(body["horizon_days"], 2);
    assert_eq!(body["trend"]["status"], "ready");
    assert_eq!(body["trend"]["data"].as_array().unwrap().len(), 14);
    assert_eq!(body["by_model"]["status"], "ready");
    assert_eq!(body["by_model"]["data"][0]["label"], "llama-3-70b");
    assert_eq!(body["by_team"]["status"], "ready");
    assert_eq!(body["forecast"]["data"].as_array().unwrap().len(), 4);
    assert_eq!(body["projected_total"], 245.0);
}

#[test]
fn retry_with_new_range_fetches_only_the_new_range() {
    let backend = FakeBackend::start(|method, url, body| {
        if url.contains("by-model") || url.contains("recommendations") {
            return (500, r#"{"detail":"boom"}"#.to_string());
        }
        common::standard_routes(method, url, body)
    });
    let h = Harness::with_backend(backend);

    let (_, body) = h.get_json("/api/dashboard?start=2026-01-01&end=2026-01-14");
    assert_eq!(body["by_model"]["status"], "error");
    let (_, body) = h.get_json("/api/dashboard?start=2026-02-01&end=2026-02-14&retry=1");
    assert_eq!(body["by_model"]["status"], "error");

    h.get_json("/api/recommendations?start=2026-01-01&end=2026-01-14");
    h.get_json("/api/recommendations?start=2026-02-01&end=2026-02-14&retry=1");

    let backend = &h.backend;
    assert_eq!(backend.request_count("by-model?start=2026-01-01"), 1);
    assert_eq!(backend.request_count("by-model?start=2026-02-01"), 1);
    assert_eq!(backend.request_count("start_date=2026-01-01"), 1);
    assert_eq!(backend.request_count("start_date=2026-02-01"), 1);

    // Same range: retry asks once more.
    h.get_json("/api/dashboard?start=2026-02-01&end=2026-02-14&retry=1");
    assert_eq!(backend.request_count("by-model?start=2026-02-01"), 2);
}

#[test]
fn dashboard_rejects_bad_parameters() {
    let h = Harness::start();
    let (status, body) = h.get_json("/api/dashboard?start=yesterday");
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("YYYY-MM-DD"));

    let (status, _) = h.get_json("/api/dashboard?horizon=0");
    assert_eq!(status, 400);
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

#[test]
fn recommendations_apply_filters() {
    let h = Harness::start();
    let (status, body) = h.get_json("/api/recommendations?provider=GCP");

    assert_eq!(status, 200);
    assert_eq!(body["state"]["status"], "ready");
    assert_eq!(body["state"]["data"], 3);
    assert_eq!(body["summary"]["count"], 1);
    assert_eq!(body["summary"]["by_severity"]["medium"], 1);
    assert_eq!(body["recommendations"][0]["id"], "r2");
    assert_eq!(body["providers"], serde_json::json!(["aws", "gcp"]));
}

#[test]
fn unknown_severity_is_a_bad_request() {
    let h = Harness::start();
    let (status, _) = h.get("/api/recommendations?severity=urgent");
    assert_eq!(status, 400);
}

#[test]
fn csv_export_quotes_fields() {
    let h = Harness::start();
    let resp = ureq::get(&format!("{}/api/recommendations.csv?severity=medium", h.base))
        .call()
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert!(resp.content_type().starts_with("text/csv"));
    assert!(
        resp.header("Content-Disposition")
            .unwrap()
            .contains("heliox-recommendations-")
    );
    let body = resp.into_string().unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(r#""Long-running fine-tune, ""v2"""#));
}

#[test]
fn csv_export_with_no_matches_is_no_content() {
    let h = Harness::start();
    let (status, body) = h.get("/api/recommendations.csv?q=nomatch");
    assert_eq!(status, 204);
    assert!(body.is_empty());
}

// ---------------------------------------------------------------------------
// Waitlist relay
// ---------------------------------------------------------------------------

#[test]
fn waitlist_signup_is_relayed() {
    let h = Harness::start();
    let (status, body) = h.post(
        "/api/waitlist",
        r#"{"email":"new@example.com","name":"Ada","source":"web_test"}"#,
    );
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, 201);
    assert_eq!(body["outcome"], "joined");
    assert_eq!(body["cleared"], true);

    let events = h.events.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, "waitlist_submitted");
    assert_eq!(events[0].properties["source"], "web_test");
}

#[test]
fn duplicate_waitlist_email_is_conflict() {
    let h = Harness::start();
    let (status, body) = h.post("/api/waitlist", r#"{"email":"taken@example.com"}"#);
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, 409);
    assert_eq!(body["message"], "This email is already on the waitlist.");
    assert_eq!(body["cleared"], false);
    assert_eq!(h.events.names(), vec!["waitlist_duplicate"]);
}

#[test]
fn waitlist_without_email_is_bad_request() {
    let h = Harness::start();
    let (status, _) = h.post("/api/waitlist", r#"{"name":"No Email"}"#);
    assert_eq!(status, 400);
    let (status, _) = h.post("/api/waitlist", "not json");
    assert_eq!(status, 400);
    assert!(h.events.events().is_empty());
}

// ---------------------------------------------------------------------------
// Health and access
// ---------------------------------------------------------------------------

#[test]
fn health_endpoint_reports_backend() {
    let h = Harness::start();
    let (status, body) = h.get_json("/api/health");
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert!(body["backend"].as_str().unwrap().starts_with("http://127.0.0.1:"));
}

#[test]
fn server_refuses_to_start_behind_closed_gate() {
    let mut config = HelioxConfig::default();
    config.access.code = Some("beta-2026".into());
    let api = ApiClient::from_config(&config.api);
    let sink: Arc<dyn EventSink> = Arc::new(MemorySink::default());

    let refused = WebServer::bind_with(
        &config,
        "127.0.0.1:0",
        &MemoryAccessStore::default(),
        api.clone(),
        sink.clone(),
    );
    assert!(refused.is_err());

    let allowed = WebServer::bind_with(
        &config,
        "127.0.0.1:0",
        &MemoryAccessStore::granted(),
        api,
        sink,
    );
    assert!(allowed.is_ok());
}
