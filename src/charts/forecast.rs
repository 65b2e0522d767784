//! Spend forecast with a 95% confidence band.
//!
//! Historical and forecast series share one x-axis. Each merged row carries
//! the series it belongs to and `None` (JSON `null`) for the other, so a
//! line chart draws a gap instead of a false join. When the last observed
//! day is also the first forecast day, both land on the same row.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::{ApiClient, ApiError, ForecastData, ForecastQuery};
use crate::resource::{RemoteResource, ResourceState};

/// One x-axis position of the merged forecast chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub date: String,
    /// Short display label, e.g. `Jan 5`.
    pub label: String,
    pub actual: Option<f64>,
    pub forecast: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl ForecastRow {
    fn at(date: &str) -> Self {
        Self {
            date: date.to_string(),
            label: display_label(date),
            actual: None,
            forecast: None,
            lower: None,
            upper: None,
        }
    }
}

/// `2026-01-05` → `Jan 5`. Unparseable dates are shown as-is.
pub fn display_label(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%b %-d").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Merge both series into date-ordered rows.
pub fn merge_series(data: &ForecastData) -> Vec<ForecastRow> {
    let mut rows: BTreeMap<String, ForecastRow> = BTreeMap::new();

    for point in &data.historical {
        rows.entry(point.date.clone())
            .or_insert_with(|| ForecastRow::at(&point.date))
            .actual = Some(point.value);
    }

    for point in &data.forecast {
        let row = rows
            .entry(point.date.clone())
            .or_insert_with(|| ForecastRow::at(&point.date));
        row.forecast = Some(point.value);
        row.lower = Some(point.lower_bound);
        row.upper = Some(point.upper_bound);
    }

    rows.into_values().collect()
}

#[derive(Debug, Default)]
pub struct ForecastChart {
    resource: RemoteResource<ForecastQuery, ForecastData>,
}

impl ForecastChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, api: &ApiClient, query: ForecastQuery) -> &ResourceState<ForecastData> {
        self.resource.load(query, |q| fetch(api, q))
    }

    pub fn retry(&mut self, api: &ApiClient) -> &ResourceState<ForecastData> {
        self.resource.retry(|q| fetch(api, q))
    }

    pub fn query(&self) -> Option<&ForecastQuery> {
        self.resource.params()
    }

    pub fn state(&self) -> &ResourceState<ForecastData> {
        self.resource.state()
    }

    pub fn rows(&self) -> ResourceState<Vec<ForecastRow>> {
        self.state().map(merge_series)
    }

    /// Sum of the forecast values over the horizon.
    pub fn projected_total(&self) -> Option<f64> {
        self.state()
            .data()
            .map(|d| d.forecast.iter().map(|p| p.value).sum())
    }
}

/// Fetch a forecast, turning an in-body `error` into an error state.
fn fetch(api: &ApiClient, query: &ForecastQuery) -> Result<ForecastData, ApiError> {
    let data = api.forecast(query)?;
    match data.error.as_deref() {
        Some(message) if !message.is_empty() => Err(ApiError::Backend(message.to_string())),
        _ => Ok(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{ScriptedTransport, client};
    use crate::api::{ForecastMetadata, ForecastPoint, HistoricalPoint};

    fn data() -> ForecastData {
        ForecastData {
            provider: None,
            gpu_type: None,
            horizon_days: 2,
            forecast_method: "moving_average".to_string(),
            historical: vec![
                HistoricalPoint {
                    date: "2026-01-13".into(),
                    value: 100.0,
                },
                HistoricalPoint {
                    date: "2026-01-14".into(),
                    value: 110.0,
                },
            ],
            forecast: vec![
                ForecastPoint {
                    date: "2026-01-15".into(),
                    value: 120.0,
                    lower_bound: 100.0,
                    upper_bound: 140.0,
                },
                ForecastPoint {
                    date: "2026-01-16".into(),
                    value: 125.0,
                    lower_bound: 101.0,
                    upper_bound: 149.0,
                },
            ],
            metadata: ForecastMetadata {
                historical_data_points: 2,
                forecast_generated_at: "2026-01-14".into(),
            },
            error: None,
        }
    }

    #[test]
    fn labels_are_month_day() {
        assert_eq!(display_label("2026-01-05"), "Jan 5");
        assert_eq!(display_label("2026-12-25"), "Dec 25");
        assert_eq!(display_label("soon"), "soon");
    }

    #[test]
    fn series_merge_on_one_axis_with_gaps() {
        let rows = merge_series(&data());
        assert_eq!(rows.len(), 4);

        assert_eq!(rows[0].actual, Some(100.0));
        assert_eq!(rows[0].forecast, None);
        assert_eq!(rows[2].actual, None);
        assert_eq!(rows[2].forecast, Some(120.0));
        assert_eq!(rows[2].upper, Some(140.0));
        assert_eq!(rows[3].label, "Jan 16");
    }

    #[test]
    fn shared_boundary_day_merges_into_one_row() {
        let mut d = data();
        d.forecast[0].date = "2026-01-14".into();
        let rows = merge_series(&d);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].actual, Some(110.0));
        assert_eq!(rows[1].forecast, Some(120.0));
    }

    #[test]
    fn gaps_serialize_as_null() {
        let rows = merge_series(&data());
        let json = serde_json::to_value(&rows).unwrap();
        assert!(json[0]["forecast"].is_null());
        assert!(json[3]["actual"].is_null());
    }

    #[test]
    fn body_error_becomes_error_state() {
        let t = ScriptedTransport::new();
        t.push(
            200,
            r#"{"horizon_days":14,"forecast_method":"moving_average","historical":[],"forecast":[],"error":"Insufficient data"}"#,
        );
        let mut chart = ForecastChart::new();
        let state = chart.load(&client(&t), ForecastQuery::horizon(14));
        assert_eq!(
            state.error(),
            Some(&ApiError::Backend("Insufficient data".into()))
        );
    }

    #[test]
    fn horizon_change_refetches() {
        let t = ScriptedTransport::new();
        let body = serde_json::to_string(&data()).unwrap();
        t.push(200, &body);
        t.push(200, &body);
        let api = client(&t);
        let mut chart = ForecastChart::new();
        chart.load(&api, ForecastQuery::horizon(7));
        chart.load(&api, ForecastQuery::horizon(7));
        chart.load(&api, ForecastQuery::horizon(30));
        assert_eq!(t.request_count(), 2);
        assert_eq!(chart.projected_total(), Some(245.0));
    }
}
