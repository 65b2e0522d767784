//! Embedded web dashboard for heliox.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A landing page with the waitlist form
//! - The dashboard page (charts and recommendations)
//! - JSON endpoints with chart-ready data, CSV export, and a waitlist relay
//!
//! Launched via `heliox web` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::access::{AccessGate, AccessStore};
use crate::analytics::{EventSink, JsonlSink};
use crate::api::ApiClient;
use crate::config::HelioxConfig;
use crate::dashboard::Dashboard;
use crate::recommendations::RecommendationsView;

pub(crate) type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the given address.
///
/// Refuses to start while the access gate is closed. Blocks the current
/// thread and handles requests sequentially.
pub fn serve(config: &HelioxConfig, addr: &str, store: &dyn AccessStore) -> Result<()> {
    let server = WebServer::bind(config, addr, store)?;
    let url = format!("http://{}", server.addr());

    println!("heliox dashboard running at {url}");
    println!("Press Ctrl+C to stop.\n");

    if config.web.open_browser {
        let _ = open_browser(&format!("{url}/dashboard"));
    }

    server.run();
    Ok(())
}

/// Per-server state shared by the handlers.
pub(crate) struct AppState {
    pub config: HelioxConfig,
    pub api: ApiClient,
    pub sink: Arc<dyn EventSink>,
    pub dashboard: Dashboard,
    pub recommendations: RecommendationsView,
}

/// A bound dashboard server.
pub struct WebServer {
    server: Server,
    state: Mutex<AppState>,
}

impl WebServer {
    /// Bind with the configured backend client and event log.
    pub fn bind(config: &HelioxConfig, addr: &str, store: &dyn AccessStore) -> Result<Self> {
        let api = ApiClient::from_config(&config.api);
        let sink = Arc::new(JsonlSink::from_config(config.logging.enabled));
        Self::bind_with(config, addr, store, api, sink)
    }

    /// Bind with an explicit backend client and event sink.
    pub fn bind_with(
        config: &HelioxConfig,
        addr: &str,
        store: &dyn AccessStore,
        api: ApiClient,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let gate = AccessGate::resolved(&config.access, store);
        if !gate.is_authorized() {
            anyhow::bail!(
                "access code required before starting the dashboard. Run `heliox unlock` first."
            );
        }

        let server = Server::http(addr)
            .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

        Ok(Self {
            server,
            state: Mutex::new(AppState {
                config: config.clone(),
                api,
                sink,
                dashboard: Dashboard::new(&config.dashboard),
                recommendations: RecommendationsView::default(),
            }),
        })
    }

    /// Actual bound address (useful when binding port 0).
    pub fn addr(&self) -> String {
        match self.server.server_addr().to_ip() {
            Some(ip) => ip.to_string(),
            None => "unknown".to_string(),
        }
    }

    /// Serve until [`shutdown`](Self::shutdown) is called.
    pub fn run(&self) {
        for request in self.server.incoming_requests() {
            self.handle(request);
        }
    }

    /// Make [`run`](Self::run) return.
    pub fn shutdown(&self) {
        self.server.unblock();
    }

    fn handle(&self, mut request: Request) {
        let method = request.method().clone();
        let url = request.url().to_string();

        // Read body up-front for methods that carry one
        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let result = match self.state.lock() {
            Ok(mut state) => dispatch(&mut state, &method, &url, body.as_deref()),
            Err(_) => Err(anyhow::anyhow!("server state is poisoned")),
        };

        let status = match result {
            Ok(resp) => {
                let code = resp.status_code().0;
                let _ = request.respond(resp);
                code
            }
            Err(e) => {
                let _ = request.respond(error_response(500, &e.to_string()));
                500
            }
        };

        // Brief access log
        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    state: &mut AppState,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<HttpResponse> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Pages
        (&Method::Get, "/") | (&Method::Get, "/index.html") => {
            Ok(html_response(frontend::LANDING_HTML))
        }
        (&Method::Get, "/dashboard") => Ok(html_response(frontend::DASHBOARD_HTML)),

        // API — charts and recommendations
        (&Method::Get, "/api/dashboard") => api::get_dashboard(state, url),
        (&Method::Get, "/api/recommendations") => api::get_recommendations(state, url),
        (&Method::Get, "/api/recommendations.csv") => api::get_recommendations_csv(state, url),

        // API — waitlist relay
        (&Method::Post, "/api/waitlist") => api::post_waitlist(state, body.unwrap_or("{}")),

        // API — health
        (&Method::Get, "/api/health") => api::get_health(state),

        // 404
        _ => Ok(error_response(404, "not found")),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn html_response(html: &str) -> HttpResponse {
    Response::from_data(html.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// JSON `{"error": message}` with the given status.
pub(crate) fn error_response(status: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    header("Content-Type", "application/json; charset=utf-8")
}

/// HTML content type header.
fn content_type_html() -> Header {
    header("Content-Type", "text/html; charset=utf-8")
}

/// Build a header from ASCII parts.
pub(crate) fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name, value).expect("header parts are ASCII")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}
