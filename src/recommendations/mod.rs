//! Cost-optimization recommendations view.
//!
//! Fetches once per date range, then filters, aggregates, and exports
//! entirely in memory.

pub mod export;
pub mod filter;

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::api::{ApiClient, DateRange, Recommendation, RecommendationsResponse};
use crate::resource::{RemoteResource, ResourceState};

pub use filter::{FilterSummary, RecommendationFilters, SeverityCounts};

#[derive(Debug, Default)]
pub struct RecommendationsView {
    resource: RemoteResource<DateRange, RecommendationsResponse>,
    pub filters: RecommendationFilters,
}

impl RecommendationsView {
    pub fn new(filters: RecommendationFilters) -> Self {
        Self {
            resource: RemoteResource::new(),
            filters,
        }
    }

    pub fn load(
        &mut self,
        api: &ApiClient,
        range: DateRange,
    ) -> &ResourceState<RecommendationsResponse> {
        self.resource.load(range, |r| api.recommendations(r))
    }

    pub fn retry(&mut self, api: &ApiClient) -> &ResourceState<RecommendationsResponse> {
        self.resource.retry(|r| api.recommendations(r))
    }

    /// Range of the latest fetch, if any.
    pub fn range(&self) -> Option<&DateRange> {
        self.resource.params()
    }

    pub fn state(&self) -> &ResourceState<RecommendationsResponse> {
        self.resource.state()
    }

    /// Everything the backend returned (empty unless ready).
    pub fn all(&self) -> &[Recommendation] {
        self.state()
            .data()
            .map(|d| d.recommendations.as_slice())
            .unwrap_or(&[])
    }

    /// The filtered set, in display order.
    pub fn filtered(&self) -> Vec<&Recommendation> {
        let mut recs = self.filters.apply(self.all());
        filter::sort_for_display(&mut recs);
        recs
    }

    pub fn summary(&self) -> FilterSummary {
        filter::summarize(&self.filtered())
    }

    /// Provider choices for the filter control.
    pub fn providers(&self) -> Vec<String> {
        filter::providers(self.all())
    }

    /// Export is disabled when the filtered set is empty.
    pub fn can_export(&self) -> bool {
        !self.filtered().is_empty()
    }

    pub fn to_csv(&self) -> Option<String> {
        export::to_csv(&self.filtered())
    }

    pub fn export_csv(&self, path: &Path) -> Result<Option<PathBuf>> {
        export::write_csv(&self.filtered(), path)
    }

    /// Serializable snapshot: fetch state, aggregates, and the filtered list.
    ///
    /// A ready state carries the number of recommendations fetched before
    /// filtering.
    pub fn report(&self) -> RecommendationsReport<'_> {
        RecommendationsReport {
            state: self.state().map(|d| d.recommendations.len()),
            summary: self.summary(),
            providers: self.providers(),
            recommendations: self.filtered(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationsReport<'a> {
    pub state: ResourceState<usize>,
    pub summary: FilterSummary,
    pub providers: Vec<String>,
    pub recommendations: Vec<&'a Recommendation>,
}
