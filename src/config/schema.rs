/// Configuration schema and defaults for the heliox client.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[api]`, `[access]`, `[dashboard]`, `[waitlist]`, `[logging]`, and
/// `[web]`.
///
/// Every field has a sensible built-in default. Users only need to set the
/// values they want to override.
use serde::{Deserialize, Serialize};

/// Default backend base address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default address for the embedded web dashboard.
pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:9747";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level heliox configuration.
///
/// Maps directly to the `~/.heliox/config.toml` and `.heliox.toml` file
/// schemas. All sections and fields are optional — missing values fall back
/// to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HelioxConfig {
    pub api: ApiConfig,
    pub access: AccessConfig,
    pub dashboard: DashboardConfig,
    pub waitlist: WaitlistConfig,
    pub logging: LoggingConfig,
    pub web: WebConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base address of the Heliox backend (no trailing slash needed).
    pub base_url: String,
    /// Request timeout for data endpoints (milliseconds). `0` disables it.
    pub timeout_ms: u64,
    /// Seconds between background health checks.
    pub health_interval_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 0,
            health_interval_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// [access]
// ---------------------------------------------------------------------------

/// Beta access gate settings.
///
/// When `code` is unset every visitor is authorized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

// ---------------------------------------------------------------------------
// [dashboard]
// ---------------------------------------------------------------------------

/// Dashboard defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Length of the default date range, ending today (inclusive).
    pub default_range_days: u32,
    /// Forecast horizon in days.
    pub forecast_horizon_days: u32,
    /// Fixed seed for the mock daily-spend series. Unset means random.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend_seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_range_days: 14,
            forecast_horizon_days: 14,
            trend_seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// [waitlist]
// ---------------------------------------------------------------------------

/// Waitlist submission settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitlistConfig {
    /// Attribution source sent with every signup.
    pub source: String,
}

impl Default for WaitlistConfig {
    fn default() -> Self {
        Self {
            source: "landing".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Analytics event log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

/// Embedded web dashboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub addr: String,
    /// Open the system browser when the server starts.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_WEB_ADDR.to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl HelioxConfig {
    /// The annotated default config written by `heliox config init`.
    pub fn default_toml() -> String {
        r#"# heliox Configuration
# GPU spend dashboard client
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (HELIOX_*)
#   2. Project config (.heliox.toml in current directory)
#   3. User global config (~/.heliox/config.toml)
#   4. Built-in defaults

[api]
base_url = "http://localhost:8000"
timeout_ms = 0                  # 0 = no timeout (health checks always use 5 s)
health_interval_secs = 30

[access]
# code = "beta-code"            # Unset = open access

[dashboard]
default_range_days = 14
forecast_horizon_days = 14
# trend_seed = 42               # Fixed seed for the mock daily-spend chart

[waitlist]
source = "landing"

[logging]
enabled = true                  # ~/.heliox/events.jsonl

[web]
addr = "127.0.0.1:9747"
open_browser = true
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
