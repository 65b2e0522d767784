//! Wire types for the Heliox backend.
//!
//! Records are passed through as the backend sends them. The one place the
//! client adds structure is [`Evidence`], which is decoded into a typed
//! variant chosen by the recommendation's `type`.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Date range
// ---------------------------------------------------------------------------

/// Inclusive calendar date range used by every date-scoped query.
///
/// `start <= end` is not checked here; the backend decides what an inverted
/// range means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days`-long range ending on `today` (inclusive).
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self {
            start: today - Duration::days(span),
            end: today,
        }
    }

    /// Every calendar day in the range, both ends included.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Cost analytics
// ---------------------------------------------------------------------------

/// One row of `GET /analytics/cost/by-model`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCost {
    pub model_name: String,
    pub total_cost_usd: f64,
    pub job_count: u64,
}

/// One row of `GET /analytics/cost/by-team`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCost {
    pub team_name: String,
    pub team_id: String,
    pub total_cost_usd: f64,
    pub job_count: u64,
}

/// One point of the daily spend trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySpend {
    pub date: NaiveDate,
    pub cost: f64,
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommendation category. Unknown categories are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecommendationType {
    IdleGpu,
    LongRunningJob,
    OffHoursUsage,
    CostOptimization,
    Other(String),
}

impl RecommendationType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::IdleGpu => "idle_gpu",
            Self::LongRunningJob => "long_running_job",
            Self::OffHoursUsage => "off_hours_usage",
            Self::CostOptimization => "cost_optimization",
            Self::Other(s) => s,
        }
    }

    /// Human label, e.g. `Idle GPU`.
    pub fn label(&self) -> String {
        match self {
            Self::IdleGpu => "Idle GPU".to_string(),
            Self::LongRunningJob => "Long-running job".to_string(),
            Self::OffHoursUsage => "Off-hours usage".to_string(),
            Self::CostOptimization => "Cost optimization".to_string(),
            Self::Other(s) => s.replace('_', " "),
        }
    }
}

impl From<String> for RecommendationType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "idle_gpu" => Self::IdleGpu,
            "long_running_job" => Self::LongRunningJob,
            "off_hours_usage" => Self::OffHoursUsage,
            "cost_optimization" => Self::CostOptimization,
            _ => Self::Other(s),
        }
    }
}

impl From<RecommendationType> for String {
    fn from(t: RecommendationType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{start_date, end_date}` attached to most evidence records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceDateRange {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

/// Evidence for under-utilized GPU capacity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdleGpuEvidence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<EvidenceDateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_usage_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_usage_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Evidence for a single job running past the long-run threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LongRunningJobEvidence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<EvidenceDateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_runtime_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Evidence for a team running jobs during business hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffHoursEvidence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<EvidenceDateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Evidence for categories without a dedicated shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericEvidence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Evidence bag, typed by recommendation category.
#[derive(Debug, Clone, PartialEq)]
pub enum Evidence {
    IdleGpu(IdleGpuEvidence),
    LongRunningJob(LongRunningJobEvidence),
    OffHoursUsage(OffHoursEvidence),
    Generic(GenericEvidence),
}

impl Evidence {
    /// Decode a raw evidence object according to its recommendation type.
    ///
    /// A body that does not match the typed shape degrades to
    /// [`Evidence::Generic`] so one malformed record never fails the list.
    pub fn decode(kind: &RecommendationType, raw: Value) -> Self {
        let raw = if raw.is_null() {
            Value::Object(Map::new())
        } else {
            raw
        };
        let typed = match kind {
            RecommendationType::IdleGpu => serde_json::from_value(raw.clone()).map(Self::IdleGpu),
            RecommendationType::LongRunningJob => {
                serde_json::from_value(raw.clone()).map(Self::LongRunningJob)
            }
            RecommendationType::OffHoursUsage => {
                serde_json::from_value(raw.clone()).map(Self::OffHoursUsage)
            }
            RecommendationType::CostOptimization | RecommendationType::Other(_) => {
                serde_json::from_value(raw.clone()).map(Self::Generic)
            }
        };
        typed.unwrap_or_else(|_| {
            let extra = match raw {
                Value::Object(map) => map,
                other => {
                    let mut map = Map::new();
                    map.insert("value".to_string(), other);
                    map
                }
            };
            Self::Generic(GenericEvidence {
                extra,
                ..Default::default()
            })
        })
    }

    pub fn to_value(&self) -> Value {
        let encoded = match self {
            Self::IdleGpu(e) => serde_json::to_value(e),
            Self::LongRunningJob(e) => serde_json::to_value(e),
            Self::OffHoursUsage(e) => serde_json::to_value(e),
            Self::Generic(e) => serde_json::to_value(e),
        };
        encoded.unwrap_or(Value::Null)
    }

    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::IdleGpu(e) => e.provider.as_deref(),
            Self::LongRunningJob(e) => e.provider.as_deref(),
            Self::OffHoursUsage(e) => extra_str(&e.extra, "provider"),
            Self::Generic(e) => e.provider.as_deref(),
        }
    }

    pub fn gpu_type(&self) -> Option<&str> {
        match self {
            Self::IdleGpu(e) => e.gpu_type.as_deref(),
            Self::LongRunningJob(e) => e.gpu_type.as_deref(),
            Self::OffHoursUsage(e) => extra_str(&e.extra, "gpu_type"),
            Self::Generic(e) => e.gpu_type.as_deref(),
        }
    }

    pub fn team_name(&self) -> Option<&str> {
        match self {
            Self::IdleGpu(e) => extra_str(&e.extra, "team_name"),
            Self::LongRunningJob(e) => e.team_name.as_deref(),
            Self::OffHoursUsage(e) => e.team_name.as_deref(),
            Self::Generic(e) => e.team_name.as_deref(),
        }
    }
}

fn extra_str<'a>(extra: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    extra.get(key).and_then(Value::as_str)
}

/// A cost-saving suggestion generated by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecommendation", into = "RawRecommendation")]
pub struct Recommendation {
    pub id: String,
    pub kind: RecommendationType,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub estimated_savings_usd: f64,
    pub evidence: Evidence,
    pub created_at: String,
}

impl Recommendation {
    pub fn provider(&self) -> Option<&str> {
        self.evidence.provider()
    }

    pub fn gpu_type(&self) -> Option<&str> {
        self.evidence.gpu_type()
    }

    pub fn team_name(&self) -> Option<&str> {
        self.evidence.team_name()
    }
}

/// Recommendation exactly as it appears on the wire.
#[derive(Serialize, Deserialize)]
struct RawRecommendation {
    id: String,
    #[serde(rename = "type")]
    kind: RecommendationType,
    title: String,
    #[serde(default)]
    description: String,
    severity: Severity,
    #[serde(default)]
    estimated_savings_usd: f64,
    #[serde(default)]
    evidence: Value,
    #[serde(default)]
    created_at: String,
}

impl From<RawRecommendation> for Recommendation {
    fn from(raw: RawRecommendation) -> Self {
        let evidence = Evidence::decode(&raw.kind, raw.evidence);
        Self {
            id: raw.id,
            kind: raw.kind,
            title: raw.title,
            description: raw.description,
            severity: raw.severity,
            estimated_savings_usd: raw.estimated_savings_usd,
            evidence,
            created_at: raw.created_at,
        }
    }
}

impl From<Recommendation> for RawRecommendation {
    fn from(rec: Recommendation) -> Self {
        Self {
            evidence: rec.evidence.to_value(),
            id: rec.id,
            kind: rec.kind,
            title: rec.title,
            description: rec.description,
            severity: rec.severity,
            estimated_savings_usd: rec.estimated_savings_usd,
            created_at: rec.created_at,
        }
    }
}

/// Body of `GET /recommendations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub summary: Map<String, Value>,
    #[serde(default)]
    pub date_range: EvidenceDateRange,
    #[serde(default)]
    pub total_estimated_savings_usd: f64,
}

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: String,
    pub value: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetadata {
    #[serde(default)]
    pub historical_data_points: u32,
    #[serde(default)]
    pub forecast_generated_at: String,
}

/// Body of `GET /forecast/spend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastData {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub gpu_type: Option<String>,
    pub horizon_days: u32,
    pub forecast_method: String,
    #[serde(default)]
    pub historical: Vec<HistoricalPoint>,
    #[serde(default)]
    pub forecast: Vec<ForecastPoint>,
    #[serde(default)]
    pub metadata: ForecastMetadata,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Waitlist / health
// ---------------------------------------------------------------------------

/// Body of `POST /public/waitlist`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub name: Option<String>,
    pub email: String,
    pub company: Option<String>,
    pub role: Option<String>,
    pub source: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
