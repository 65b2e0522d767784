//! Chart views — each owns a [`RemoteResource`](crate::resource::RemoteResource)
//! for its own input and turns the payload into chart-ready rows.
//!
//! - [`trend`] — daily spend (mock series, see module docs)
//! - [`by_model`] — cost share per ML model
//! - [`by_team`] — cost share per team
//! - [`forecast`] — history + forecast with confidence band
//!
//! Views never depend on each other; a failure in one leaves the rest
//! untouched.

pub mod by_model;
pub mod by_team;
pub mod forecast;
pub mod trend;

use serde::Serialize;

pub use by_model::ModelCostChart;
pub use by_team::TeamCostChart;
pub use forecast::{ForecastChart, ForecastRow};
pub use trend::TrendChart;

/// Message for the explicit empty state.
pub const NO_DATA_MESSAGE: &str = "No data available for the selected date range.";

/// Fixed slice palette; colors cycle by index.
pub const PALETTE: [&str; 8] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
];

/// Palette color for the slice at `index`.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// One category/value pair of a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
    /// Share of the total, in percent.
    pub share_pct: f64,
    pub job_count: u64,
}

/// Build slices from `(label, value, job_count)` rows, in input order.
pub fn pie_slices<I>(rows: I) -> Vec<PieSlice>
where
    I: IntoIterator<Item = (String, f64, u64)>,
{
    let rows: Vec<_> = rows.into_iter().collect();
    let total: f64 = rows.iter().map(|(_, v, _)| *v).sum();

    rows.into_iter()
        .enumerate()
        .map(|(i, (label, value, job_count))| PieSlice {
            label,
            value,
            color: palette_color(i),
            share_pct: if total > 0.0 {
                value / total * 100.0
            } else {
                0.0
            },
            job_count,
        })
        .collect()
}

/// Horizontal bar of `width` cells scaled against `max`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 || width == 0 {
        return String::new();
    }
    let cells = ((value / max) * width as f64).round() as usize;
    "█".repeat(cells.clamp(1, width))
}

/// Format a dollar amount with thousands separators, e.g. `$12,345.67`.
pub fn format_usd(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let whole: String = grouped.chars().rev().collect();
    format!(
        "{}${}.{:02}",
        if negative { "-" } else { "" },
        whole,
        cents % 100
    )
}
