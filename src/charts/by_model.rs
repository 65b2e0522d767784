//! Cost by ML model for the selected date range.

use crate::api::{ApiClient, DateRange, ModelCost};
use crate::resource::{RemoteResource, ResourceState};

use super::{PieSlice, pie_slices};

#[derive(Debug, Default)]
pub struct ModelCostChart {
    resource: RemoteResource<DateRange, Vec<ModelCost>>,
}

impl ModelCostChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch for `range` unless it is already the current range.
    pub fn load(&mut self, api: &ApiClient, range: DateRange) -> &ResourceState<Vec<ModelCost>> {
        self.resource.load(range, |r| api.cost_by_model(r))
    }

    pub fn retry(&mut self, api: &ApiClient) -> &ResourceState<Vec<ModelCost>> {
        self.resource.retry(|r| api.cost_by_model(r))
    }

    /// Range of the latest fetch, if any.
    pub fn range(&self) -> Option<&DateRange> {
        self.resource.params()
    }

    pub fn state(&self) -> &ResourceState<Vec<ModelCost>> {
        self.resource.state()
    }

    /// Chart-ready slices, one per model.
    pub fn slices(&self) -> ResourceState<Vec<PieSlice>> {
        self.state().map(|rows| {
            pie_slices(
                rows.iter()
                    .map(|r| (r.model_name.clone(), r.total_cost_usd, r.job_count)),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::api::testing::{ScriptedTransport, client};
    use crate::charts::PALETTE;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
        )
    }

    #[test]
    fn empty_response_renders_no_data_state() {
        let t = ScriptedTransport::new();
        t.push(200, "[]");
        let mut chart = ModelCostChart::new();
        assert_eq!(chart.load(&client(&t), range()), &ResourceState::Empty);
        assert_eq!(chart.slices(), ResourceState::Empty);
    }

    #[test]
    fn rows_become_colored_slices() {
        let t = ScriptedTransport::new();
        t.push(
            200,
            r#"[{"model_name":"llama-70b","total_cost_usd":300.0,"job_count":3},
                {"model_name":"sdxl","total_cost_usd":100.0,"job_count":9}]"#,
        );
        let mut chart = ModelCostChart::new();
        chart.load(&client(&t), range());
        let slices = chart.slices();
        let slices = slices.data().unwrap();
        assert_eq!(slices[0].label, "llama-70b");
        assert_eq!(slices[0].share_pct, 75.0);
        assert_eq!(slices[1].color, PALETTE[1]);
    }

    #[test]
    fn error_then_retry_fetches_once_more() {
        let t = ScriptedTransport::new();
        t.push(500, "{}");
        t.push(200, r#"[{"model_name":"m","total_cost_usd":1.0,"job_count":1}]"#);
        let api = client(&t);
        let mut chart = ModelCostChart::new();

        assert!(chart.load(&api, range()).error().is_some());
        assert_eq!(t.request_count(), 1);

        assert!(chart.retry(&api).data().is_some());
        assert_eq!(t.request_count(), 2);
    }

    #[test]
    fn same_range_does_not_refetch() {
        let t = ScriptedTransport::new();
        t.push(200, "[]");
        let api = client(&t);
        let mut chart = ModelCostChart::new();
        chart.load(&api, range());
        chart.load(&api, range());
        assert_eq!(t.request_count(), 1);
    }
}
