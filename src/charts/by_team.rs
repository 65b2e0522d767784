//! Cost by team for the selected date range.

use crate::api::{ApiClient, DateRange, TeamCost};
use crate::resource::{RemoteResource, ResourceState};

use super::{PieSlice, pie_slices};

#[derive(Debug, Default)]
pub struct TeamCostChart {
    resource: RemoteResource<DateRange, Vec<TeamCost>>,
}

impl TeamCostChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, api: &ApiClient, range: DateRange) -> &ResourceState<Vec<TeamCost>> {
        self.resource.load(range, |r| api.cost_by_team(r))
    }

    pub fn retry(&mut self, api: &ApiClient) -> &ResourceState<Vec<TeamCost>> {
        self.resource.retry(|r| api.cost_by_team(r))
    }

    pub fn range(&self) -> Option<&DateRange> {
        self.resource.params()
    }

    pub fn state(&self) -> &ResourceState<Vec<TeamCost>> {
        self.resource.state()
    }

    /// Chart-ready slices, one per team (keyed by `team_id` upstream).
    pub fn slices(&self) -> ResourceState<Vec<PieSlice>> {
        self.state().map(|rows| {
            pie_slices(
                rows.iter()
                    .map(|r| (r.team_name.clone(), r.total_cost_usd, r.job_count)),
            )
        })
    }
}
