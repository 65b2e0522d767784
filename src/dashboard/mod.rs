//! Dashboard page state.
//!
//! Owns the shared date range and forecast horizon and one instance of each
//! chart view. [`Dashboard::load`] refreshes every view; the backend-backed
//! views are fetched concurrently on scoped threads, and each settles into
//! its own state.

use std::thread;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::api::{ApiClient, DailySpend, DateRange, ForecastQuery};
use crate::charts::{ForecastChart, ForecastRow, ModelCostChart, PieSlice, TeamCostChart, TrendChart};
use crate::config::schema::DashboardConfig;
use crate::resource::ResourceState;

/// Default range from config, ending on `today`.
pub fn default_range(today: NaiveDate, config: &DashboardConfig) -> DateRange {
    DateRange::last_days(today, config.default_range_days)
}

/// Range from optional start/end bounds, filling gaps from the configured
/// default length.
pub fn resolve_range(
    config: &DashboardConfig,
    today: NaiveDate,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> DateRange {
    match (start, end) {
        (Some(start), Some(end)) => DateRange::new(start, end),
        (Some(start), None) => DateRange::new(start, today),
        (None, Some(end)) => DateRange::last_days(end, config.default_range_days),
        (None, None) => default_range(today, config),
    }
}

#[derive(Debug)]
pub struct Dashboard {
    range: DateRange,
    forecast: ForecastQuery,
    pub trend: TrendChart,
    pub models: ModelCostChart,
    pub teams: TeamCostChart,
    pub forecast_chart: ForecastChart,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig) -> Self {
        Self::starting(Local::now().date_naive(), config)
    }

    /// Dashboard whose default range ends on `today`.
    pub fn starting(today: NaiveDate, config: &DashboardConfig) -> Self {
        Self {
            range: default_range(today, config),
            forecast: ForecastQuery::horizon(config.forecast_horizon_days),
            trend: TrendChart::new(config.trend_seed),
            models: ModelCostChart::new(),
            teams: TeamCostChart::new(),
            forecast_chart: ForecastChart::new(),
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
    }

    pub fn forecast_query(&self) -> &ForecastQuery {
        &self.forecast
    }

    pub fn set_horizon(&mut self, days: u32) {
        self.forecast.horizon_days = days;
    }

    pub fn set_forecast_filters(&mut self, provider: Option<String>, gpu_type: Option<String>) {
        self.forecast.provider = provider;
        self.forecast.gpu_type = gpu_type;
    }

    /// Bring every view up to date with the current inputs.
    ///
    /// Views whose input did not change keep their state without a refetch.
    pub fn load(&mut self, api: &ApiClient) {
        let range = self.range;
        let query = self.forecast.clone();
        let Self {
            trend,
            models,
            teams,
            forecast_chart,
            ..
        } = self;

        trend.load(range);
        thread::scope(|s| {
            s.spawn(|| {
                models.load(api, range);
            });
            s.spawn(|| {
                teams.load(api, range);
            });
            s.spawn(|| {
                forecast_chart.load(api, query);
            });
        });
    }

    /// Re-issue one fetch for every view in the error state whose input
    /// is still the current one. Views whose input changed are left to
    /// [`load`](Self::load), which fetches them anyway.
    pub fn retry_failed(&mut self, api: &ApiClient) {
        let range = Some(&self.range);
        if self.models.state().error().is_some() && self.models.range() == range {
            self.models.retry(api);
        }
        if self.teams.state().error().is_some() && self.teams.range() == range {
            self.teams.retry(api);
        }
        if self.forecast_chart.state().error().is_some()
            && self.forecast_chart.query() == Some(&self.forecast)
        {
            self.forecast_chart.retry(api);
        }
    }

    /// Chart-ready view of every panel.
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            start: self.range.start,
            end: self.range.end,
            horizon_days: self.forecast.horizon_days,
            trend: self.trend.state().clone(),
            trend_total: self.trend.total(),
            by_model: self.models.slices(),
            by_team: self.teams.slices(),
            forecast: self.forecast_chart.rows(),
            projected_total: self.forecast_chart.projected_total(),
        }
    }
}

/// Serializable state of all four panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub horizon_days: u32,
    pub trend: ResourceState<Vec<DailySpend>>,
    pub trend_total: Option<f64>,
    pub by_model: ResourceState<Vec<PieSlice>>,
    pub by_team: ResourceState<Vec<PieSlice>>,
    pub forecast: ResourceState<Vec<ForecastRow>>,
    pub projected_total: Option<f64>,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::api::{ApiError, RawResponse, Transport};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 14).unwrap()
    }

    /// Answers by URL so concurrent fetches don't depend on ordering.
    struct Routed;

    impl Transport for Routed {
        fn get(&self, url: &str, _: Option<std::time::Duration>) -> Result<RawResponse, ApiError> {
            let (status, body) = if url.contains("by-model") {
                (200, r#"[{"model_name":"llama","total_cost_usd":300.0,"job_count":3},{"model_name":"sdxl","total_cost_usd":100.0,"job_count":1}]"#)
            } else if url.contains("by-team") {
                (500, r#"{"detail":"boom"}"#)
            } else if url.contains("forecast") {
                (200, r#"{"horizon_days":14,"forecast_method":"moving_average","historical":[],"forecast":[]}"#)
            } else {
                (404, "")
            };
            Ok(RawResponse {
                status,
                body: body.to_string(),
            })
        }

        fn post_json(
            &self,
            _: &str,
            _: &serde_json::Value,
            _: Option<std::time::Duration>,
        ) -> Result<RawResponse, ApiError> {
            Err(ApiError::Network("unused".into()))
        }
    }

    #[test]
    fn default_range_is_last_fourteen_days() {
        let range = default_range(today(), &DashboardConfig::default());
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(range.end, today());
        assert_eq!(range.days().count(), 14);
    }

    #[test]
    fn partial_bounds_are_filled_in() {
        let cfg = DashboardConfig::default();
        let day = |d: u32| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
        assert_eq!(
            resolve_range(&cfg, day(10), Some(day(1)), None),
            DateRange::new(day(1), day(10))
        );
        assert_eq!(
            resolve_range(&cfg, day(20), None, Some(day(14))),
            DateRange::new(day(1), day(14))
        );
        assert_eq!(
            resolve_range(&cfg, day(20), Some(day(5)), Some(day(2))),
            DateRange::new(day(5), day(2))
        );
    }

    #[test]
    fn panels_settle_independently() {
        let api = ApiClient::with_transport("http://api.test", None, Arc::new(Routed));
        let config = DashboardConfig {
            trend_seed: Some(7),
            ..Default::default()
        };
        let mut dash = Dashboard::starting(today(), &config);
        dash.load(&api);

        let snap = dash.snapshot();
        assert_eq!(snap.trend.data().map(Vec::len), Some(14));
        let slices = snap.by_model.data().unwrap();
        assert_eq!(slices[0].share_pct, 75.0);
        assert_eq!(snap.by_team.error().and_then(ApiError::status), Some(500));
        assert_eq!(snap.forecast, ResourceState::Empty);
    }

    #[test]
    fn unchanged_inputs_do_not_refetch() {
        let t = ScriptedTransport::new();
        for _ in 0..3 {
            t.push(200, "[]");
        }
        let api = ApiClient::with_transport("http://api.test", None, t.clone());
        let mut dash = Dashboard::starting(today(), &DashboardConfig::default());
        dash.load(&api);
        assert_eq!(t.request_count(), 3);
        dash.load(&api);
        assert_eq!(t.request_count(), 3);
    }

    #[test]
    fn horizon_change_only_refetches_forecast() {
        let api = ApiClient::with_transport("http://api.test", None, Arc::new(Routed));
        let mut dash = Dashboard::starting(today(), &DashboardConfig::default());
        dash.load(&api);
        let models_gen = dash.models.state().clone();

        dash.set_horizon(30);
        dash.load(&api);
        assert_eq!(dash.forecast_query().horizon_days, 30);
        assert_eq!(dash.models.state(), &models_gen);
        assert_eq!(dash.snapshot().horizon_days, 30);
    }

    #[test]
    fn snapshot_serializes_states() {
        let api = ApiClient::with_transport("http://api.test", None, Arc::new(Routed));
        let mut dash = Dashboard::starting(today(), &DashboardConfig::default());
        dash.load(&api);
        let json = serde_json::to_value(dash.snapshot()).unwrap();
        assert_eq!(json["by_model"]["status"], "ready");
        assert_eq!(json["by_team"]["status"], "error");
        assert_eq!(json["by_team"]["data"], "Request failed with status 500: boom");
        assert_eq!(json["forecast"]["status"], "empty");
        assert_eq!(json["start"], "2026-01-01");
    }
}
