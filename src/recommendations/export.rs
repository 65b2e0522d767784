//! CSV export of the currently filtered recommendations.
//!
//! Every value is double-quoted with embedded quotes doubled, so
//! descriptions containing commas, quotes, or newlines survive intact.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::api::Recommendation;

/// Fixed header row.
pub const CSV_HEADER: &str =
    "Severity,Title,Type,Description,Estimated Savings (USD),Provider,GPU Type,Team";

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn row(rec: &Recommendation) -> String {
    [
        rec.severity.as_str().to_string(),
        rec.title.clone(),
        rec.kind.as_str().to_string(),
        rec.description.clone(),
        format!("{:.2}", rec.estimated_savings_usd),
        rec.provider().unwrap_or_default().to_string(),
        rec.gpu_type().unwrap_or_default().to_string(),
        rec.team_name().unwrap_or_default().to_string(),
    ]
    .iter()
    .map(|v| quote(v))
    .collect::<Vec<_>>()
    .join(",")
}

/// Render the CSV document, or `None` when there is nothing to export.
pub fn to_csv(recs: &[&Recommendation]) -> Option<String> {
    if recs.is_empty() {
        return None;
    }
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for rec in recs {
        out.push_str(&row(rec));
        out.push('\n');
    }
    Some(out)
}

/// `heliox-recommendations-YYYY-MM-DD.csv`
pub fn default_file_name(today: NaiveDate) -> String {
    format!("heliox-recommendations-{today}.csv")
}

/// Write the CSV to `path`. Writes nothing and returns `Ok(None)` for an
/// empty set.
pub fn write_csv(recs: &[&Recommendation], path: &Path) -> Result<Option<PathBuf>> {
    let Some(csv) = to_csv(recs) else {
        return Ok(None);
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(Some(path.to_path_buf()))
}
