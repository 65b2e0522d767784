//! In-memory recommendation filters and derived aggregates.
//!
//! Filtering is a single pass: a record is kept when every active predicate
//! (severity, provider, type, text search) accepts it. Aggregates are
//! recomputed from the filtered set on every call; lists are small.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::api::{Recommendation, RecommendationType, Severity};

/// Active filter selections. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationFilters {
    pub severity: Option<Severity>,
    pub provider: Option<String>,
    pub kind: Option<RecommendationType>,
    pub search: String,
}

impl RecommendationFilters {
    /// Build filters from user-facing choices. `"all"` or an empty value
    /// leaves that dimension unfiltered.
    pub fn from_choices(
        severity: Option<&str>,
        provider: Option<&str>,
        kind: Option<&str>,
        search: Option<&str>,
    ) -> Result<Self> {
        fn chosen(value: Option<&str>) -> Option<&str> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        }

        let severity = match chosen(severity) {
            Some(s) => Some(
                Severity::parse(s).with_context(|| {
                    let valid: Vec<_> = Severity::ALL.iter().map(Severity::as_str).collect();
                    format!("unknown severity '{s}' ({})", valid.join(", "))
                })?,
            ),
            None => None,
        };

        Ok(Self {
            severity,
            provider: chosen(provider).map(str::to_lowercase),
            kind: chosen(kind).map(|k| RecommendationType::from(k.to_string())),
            search: search.unwrap_or_default().to_string(),
        })
    }

    pub fn matches_severity(&self, rec: &Recommendation) -> bool {
        self.severity.is_none_or(|s| rec.severity == s)
    }

    pub fn matches_provider(&self, rec: &Recommendation) -> bool {
        match &self.provider {
            None => true,
            Some(wanted) => rec
                .provider()
                .is_some_and(|p| p.eq_ignore_ascii_case(wanted)),
        }
    }

    pub fn matches_kind(&self, rec: &Recommendation) -> bool {
        self.kind.as_ref().is_none_or(|k| &rec.kind == k)
    }

    /// Case-insensitive substring match over title, description, team
    /// name, GPU type, and provider.
    pub fn matches_search(&self, rec: &Recommendation) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            Some(rec.title.as_str()),
            Some(rec.description.as_str()),
            rec.team_name(),
            rec.gpu_type(),
            rec.provider(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn matches(&self, rec: &Recommendation) -> bool {
        self.matches_severity(rec)
            && self.matches_provider(rec)
            && self.matches_kind(rec)
            && self.matches_search(rec)
    }

    pub fn apply<'a>(&self, recs: &'a [Recommendation]) -> Vec<&'a Recommendation> {
        recs.iter().filter(|r| self.matches(r)).collect()
    }

    pub fn is_active(&self) -> bool {
        self.severity.is_some()
            || self.provider.is_some()
            || self.kind.is_some()
            || !self.search.trim().is_empty()
    }
}

/// Count of recommendations per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// Aggregates over a (filtered) set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterSummary {
    pub count: usize,
    pub total_savings_usd: f64,
    pub by_severity: SeverityCounts,
}

pub fn summarize(recs: &[&Recommendation]) -> FilterSummary {
    let mut summary = FilterSummary {
        count: recs.len(),
        ..Default::default()
    };
    for rec in recs {
        summary.total_savings_usd += rec.estimated_savings_usd;
        match rec.severity {
            Severity::High => summary.by_severity.high += 1,
            Severity::Medium => summary.by_severity.medium += 1,
            Severity::Low => summary.by_severity.low += 1,
        }
    }
    summary
}

/// Distinct providers present in the list, lowercased and sorted, for the
/// provider filter choices.
pub fn providers(recs: &[Recommendation]) -> Vec<String> {
    recs.iter()
        .filter_map(|r| r.provider())
        .map(str::to_lowercase)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Display order: severity high → low, then larger savings first.
pub fn sort_for_display(recs: &mut [&Recommendation]) {
    recs.sort_by(|a, b| {
        b.severity.cmp(&a.severity).then_with(|| {
            b.estimated_savings_usd
                .partial_cmp(&a.estimated_savings_usd)
                .unwrap_or(Ordering::Equal)
        })
    });
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::json;

    use crate::api::Recommendation;

    pub fn rec(
        id: &str,
        kind: &str,
        severity: &str,
        provider: &str,
        gpu: &str,
        team: Option<&str>,
        savings: f64,
    ) -> Recommendation {
        let mut evidence = json!({"provider": provider, "gpu_type": gpu});
        if let Some(team) = team {
            evidence["team_name"] = json!(team);
        }
        serde_json::from_value(json!({
            "id": id,
            "type": kind,
            "title": format!("{kind} on {provider}"),
            "description": format!("Recommendation {id}"),
            "severity": severity,
            "estimated_savings_usd": savings,
            "evidence": evidence,
            "created_at": "2026-01-14T00:00:00"
        }))
        .unwrap()
    }

    pub fn sample() -> Vec<Recommendation> {
        vec![
            rec("1", "idle_gpu", "high", "aws", "h100", None, 1200.0),
            rec("2", "idle_gpu", "medium", "gcp", "a100", None, 300.0),
            rec("3", "long_running_job", "medium", "aws", "a100", Some("ML Research"), 150.0),
            rec("4", "long_running_job", "low", "azure", "v100", Some("Vision"), 40.0),
            rec("5", "off_hours_usage", "low", "gcp", "t4", Some("NLP"), 25.5),
        ]
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::fixtures::{rec, sample};
    use super::*;

    #[test]
    fn default_filters_keep_everything() {
        let recs = sample();
        assert_eq!(RecommendationFilters::default().apply(&recs).len(), 5);
        assert!(!RecommendationFilters::default().is_active());
    }

    #[test]
    fn choices_treat_all_as_unfiltered() {
        let filters =
            RecommendationFilters::from_choices(Some("all"), Some("AWS"), Some(""), None).unwrap();
        assert_eq!(filters.severity, None);
        assert_eq!(filters.provider.as_deref(), Some("aws"));
        assert_eq!(filters.kind, None);

        let filters =
            RecommendationFilters::from_choices(Some("High"), None, Some("idle_gpu"), Some("h100"))
                .unwrap();
        assert_eq!(filters.severity, Some(Severity::High));
        assert_eq!(filters.kind, Some(RecommendationType::IdleGpu));
        assert!(filters.is_active());

        let err = RecommendationFilters::from_choices(Some("urgent"), None, None, None).unwrap_err();
        assert_eq!(err.to_string(), "unknown severity 'urgent' (high, medium, low)");
    }

    #[test]
    fn provider_match_is_case_insensitive() {
        let recs = sample();
        let filters = RecommendationFilters {
            provider: Some("AWS".into()),
            ..Default::default()
        };
        let ids: Vec<_> = filters.apply(&recs).iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn search_covers_team_gpu_and_provider() {
        let recs = sample();
        let by = |q: &str| {
            RecommendationFilters {
                search: q.into(),
                ..Default::default()
            }
            .apply(&recs)
            .len()
        };
        assert_eq!(by("research"), 1);
        assert_eq!(by("V100"), 1);
        assert_eq!(by("azure"), 1);
        assert_eq!(by("recommendation 5"), 1);
        assert_eq!(by("nothing-matches"), 0);
        assert_eq!(by("   "), 5);
    }

    #[test]
    fn summary_counts_filtered_set() {
        let recs = sample();
        let filters = RecommendationFilters {
            severity: Some(Severity::Medium),
            ..Default::default()
        };
        let filtered = filters.apply(&recs);
        let summary = summarize(&filtered);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_savings_usd, 450.0);
        assert_eq!(summary.by_severity.get(Severity::Medium), 2);
        assert_eq!(summary.by_severity.high, 0);
    }

    #[test]
    fn providers_are_distinct_and_sorted() {
        assert_eq!(providers(&sample()), vec!["aws", "azure", "gcp"]);
    }

    #[test]
    fn display_sort_orders_by_severity_then_savings() {
        let recs = sample();
        let mut all: Vec<_> = recs.iter().collect();
        sort_for_display(&mut all);
        let ids: Vec<_> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn randomized_filters_equal_intersection_of_predicates() {
        let providers = ["aws", "gcp", "azure", "lambda"];
        let kinds = ["idle_gpu", "long_running_job", "off_hours_usage", "cost_optimization"];
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for round in 0..200 {
            let recs: Vec<_> = (0..rng.gen_range(0..40))
                .map(|i| {
                    rec(
                        &format!("{round}-{i}"),
                        kinds[rng.gen_range(0..kinds.len())],
                        Severity::ALL[rng.gen_range(0..Severity::ALL.len())].as_str(),
                        providers[rng.gen_range(0..providers.len())],
                        "h100",
                        None,
                        rng.gen_range(0.0..1000.0),
                    )
                })
                .collect();

            let filters = RecommendationFilters {
                severity: rng
                    .gen_bool(0.5)
                    .then(|| Severity::ALL[rng.gen_range(0..Severity::ALL.len())]),
                provider: rng
                    .gen_bool(0.5)
                    .then(|| providers[rng.gen_range(0..providers.len())].to_string()),
                kind: rng
                    .gen_bool(0.5)
                    .then(|| RecommendationType::from(kinds[rng.gen_range(0..kinds.len())].to_string())),
                search: String::new(),
            };

            let combined: BTreeSet<_> = filters.apply(&recs).iter().map(|r| r.id.clone()).collect();

            let only = |pred: &dyn Fn(&Recommendation) -> bool| -> BTreeSet<String> {
                recs.iter().filter(|r| pred(r)).map(|r| r.id.clone()).collect()
            };
            let sev = only(&|r: &Recommendation| filters.matches_severity(r));
            let prov = only(&|r: &Recommendation| filters.matches_provider(r));
            let kind = only(&|r: &Recommendation| filters.matches_kind(r));
            let intersection: BTreeSet<_> = sev
                .intersection(&prov)
                .cloned()
                .collect::<BTreeSet<_>>()
                .intersection(&kind)
                .cloned()
                .collect();

            assert_eq!(combined, intersection, "round {round}: {filters:?}");
        }
    }
}
