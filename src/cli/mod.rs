//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `heliox dashboard` — every panel for one date range
//! - `heliox trend|models|teams` — a single chart
//! - `heliox forecast` — spend forecast with confidence band
//! - `heliox recommendations` — filter, search, and export recommendations
//! - `heliox waitlist` — join the waitlist
//! - `heliox health [--watch]` — backend health check
//! - `heliox unlock|lock` — beta access gate
//! - `heliox web` — embedded web dashboard
//! - `heliox config show|init|set|reset` — configuration management

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use serde::Serialize;

use crate::access::{AccessGate, AccessStore, FileAccessStore, GateState, MemoryAccessStore};
use crate::analytics::JsonlSink;
use crate::api::{ApiClient, DailySpend, DateRange, ForecastQuery, Recommendation, Severity};
use crate::charts::{self, ForecastChart, ForecastRow, ModelCostChart, NO_DATA_MESSAGE, PieSlice, TeamCostChart, TrendChart};
use crate::config::{self, HelioxConfig};
use crate::dashboard::{self, Dashboard};
use crate::health::{self, HealthMonitor, HealthReport};
use crate::recommendations::{FilterSummary, RecommendationFilters, RecommendationsView, export};
use crate::resource::ResourceState;
use crate::waitlist::{Outcome, WaitlistDraft, WaitlistForm};
use crate::web;

/// Output format for data commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Width of terminal bar charts, in cells.
const BAR_WIDTH: usize = 30;

// ---------------------------------------------------------------------------
// Shared plumbing
// ---------------------------------------------------------------------------

fn resolve_range(
    config: &HelioxConfig,
    today: NaiveDate,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> DateRange {
    dashboard::resolve_range(&config.dashboard, today, start, end)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn access_store() -> Box<dyn AccessStore> {
    match FileAccessStore::default_location() {
        Some(store) => Box::new(store),
        None => Box::new(MemoryAccessStore::default()),
    }
}

/// Refuse to continue unless the access gate is open.
pub fn require_access(config: &HelioxConfig, store: &dyn AccessStore) -> Result<()> {
    let gate = AccessGate::resolved(&config.access, store);
    if gate.is_authorized() {
        return Ok(());
    }
    anyhow::bail!("heliox is in private beta. Run `heliox unlock` with your access code first.")
}

/// Print the non-ready branches of a view; return the payload when ready.
fn settled<'a, T>(state: &'a ResourceState<T>) -> Option<&'a T> {
    match state {
        ResourceState::Ready(data) => Some(data),
        ResourceState::Empty => {
            println!("  {}", NO_DATA_MESSAGE.yellow());
            None
        }
        ResourceState::Error(err) => {
            println!("  {} {}", "✗".red().bold(), err.user_message().red());
            println!("  {}", "Run the command again to retry.".dimmed());
            None
        }
        ResourceState::Idle | ResourceState::Loading => {
            println!("  {}", "Loading…".dimmed());
            None
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn heading(title: &str) {
    println!("{}", title.bold().cyan());
    println!("{}", "=".repeat(60));
}

// ---------------------------------------------------------------------------
// heliox dashboard
// ---------------------------------------------------------------------------

/// Show every dashboard panel for one range.
pub fn run_dashboard(
    config: &HelioxConfig,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    horizon: Option<u32>,
    format: OutputFormat,
) -> Result<()> {
    require_access(config, access_store().as_ref())?;

    let api = ApiClient::from_config(&config.api);
    let mut dash = Dashboard::new(&config.dashboard);
    dash.set_range(resolve_range(config, today(), start, end));
    if let Some(days) = horizon {
        dash.set_horizon(days);
    }
    dash.load(&api);
    let snap = dash.snapshot();

    match format {
        OutputFormat::Json => print_json(&snap)?,
        OutputFormat::Csv => {
            if let Some(points) = snap.trend.data() {
                print_trend_csv(points);
            }
        }
        OutputFormat::Table => {
            heading(&format!("Heliox GPU Spend — {}", dash.range()));
            println!();
            println!("{}", "Daily spend".bold());
            if let Some(points) = settled(&snap.trend) {
                print!("{}", trend_table(points));
            }
            println!();
            println!("{}", "Cost by model".bold());
            if let Some(slices) = settled(&snap.by_model) {
                print!("{}", slice_table(slices));
            }
            println!();
            println!("{}", "Cost by team".bold());
            if let Some(slices) = settled(&snap.by_team) {
                print!("{}", slice_table(slices));
            }
            println!();
            println!(
                "{}",
                format!("Forecast — next {} days", snap.horizon_days).bold()
            );
            if let Some(rows) = settled(&snap.forecast) {
                print!("{}", forecast_table(rows));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// heliox trend | models | teams
// ---------------------------------------------------------------------------

/// Daily spend trend (synthesized series).
pub fn run_trend(
    config: &HelioxConfig,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    format: OutputFormat,
) -> Result<()> {
    require_access(config, access_store().as_ref())?;

    let range = resolve_range(config, today(), start, end);
    let mut chart = TrendChart::new(config.dashboard.trend_seed);
    let state = chart.load(range);

    match format {
        OutputFormat::Json => print_json(state)?,
        OutputFormat::Csv => {
            if let Some(points) = state.data() {
                print_trend_csv(points);
            }
        }
        OutputFormat::Table => {
            heading(&format!("Daily Spend — {range}"));
            if let Some(points) = settled(state) {
                print!("{}", trend_table(points));
            }
        }
    }

    Ok(())
}

/// Cost share per model.
pub fn run_models(
    config: &HelioxConfig,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    format: OutputFormat,
) -> Result<()> {
    require_access(config, access_store().as_ref())?;

    let api = ApiClient::from_config(&config.api);
    let range = resolve_range(config, today(), start, end);
    let mut chart = ModelCostChart::new();
    chart.load(&api, range);
    print_slices(&format!("Cost by Model — {range}"), "model", &chart.slices(), format)
}

/// Cost share per team.
pub fn run_teams(
    config: &HelioxConfig,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    format: OutputFormat,
) -> Result<()> {
    require_access(config, access_store().as_ref())?;

    let api = ApiClient::from_config(&config.api);
    let range = resolve_range(config, today(), start, end);
    let mut chart = TeamCostChart::new();
    chart.load(&api, range);
    print_slices(&format!("Cost by Team — {range}"), "team", &chart.slices(), format)
}

fn print_slices(
    title: &str,
    label: &str,
    state: &ResourceState<Vec<PieSlice>>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(state)?,
        OutputFormat::Csv => {
            if let Some(slices) = state.data() {
                println!("{label},total_cost_usd,share_pct,job_count,color");
                for s in slices {
                    println!(
                        "{},{:.2},{:.1},{},{}",
                        csv_field(&s.label),
                        s.value,
                        s.share_pct,
                        s.job_count,
                        s.color
                    );
                }
            }
        }
        OutputFormat::Table => {
            heading(title);
            if let Some(slices) = settled(state) {
                print!("{}", slice_table(slices));
            }
        }
    }
    Ok(())
}

fn print_trend_csv(points: &[DailySpend]) {
    println!("date,cost_usd");
    for p in points {
        println!("{},{:.2}", p.date, p.cost);
    }
}

fn trend_table(points: &[DailySpend]) -> String {
    let max = points.iter().map(|p| p.cost).fold(0.0, f64::max);
    let total: f64 = points.iter().map(|p| p.cost).sum();
    let mut out = String::new();
    for p in points {
        out.push_str(&format!(
            "  {:<12} {:>12} {}\n",
            p.date.format("%b %-d").to_string(),
            charts::format_usd(p.cost),
            charts::bar(p.cost, max, BAR_WIDTH).blue()
        ));
    }
    out.push_str(&format!(
        "  {:<12} {:>12}\n",
        "Total".bold(),
        charts::format_usd(total).bold()
    ));
    out
}

fn slice_table(slices: &[PieSlice]) -> String {
    let max = slices.iter().map(|s| s.value).fold(0.0, f64::max);
    let mut out = String::new();
    for s in slices {
        out.push_str(&format!(
            "  {:<24} {:>12} {:>6.1}% {:>5} jobs {}\n",
            truncate(&s.label, 24),
            charts::format_usd(s.value),
            s.share_pct,
            s.job_count,
            charts::bar(s.value, max, BAR_WIDTH).cyan()
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// heliox forecast
// ---------------------------------------------------------------------------

/// Spend forecast with confidence band.
pub fn run_forecast(config: &HelioxConfig, query: ForecastQuery, format: OutputFormat) -> Result<()> {
    require_access(config, access_store().as_ref())?;

    let api = ApiClient::from_config(&config.api);
    let mut chart = ForecastChart::new();
    chart.load(&api, query.clone());
    let rows = chart.rows();

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Csv => {
            if let Some(rows) = rows.data() {
                println!("date,actual,forecast,lower_bound,upper_bound");
                for r in rows {
                    println!(
                        "{},{},{},{},{}",
                        r.date,
                        opt_num(r.actual),
                        opt_num(r.forecast),
                        opt_num(r.lower),
                        opt_num(r.upper)
                    );
                }
            }
        }
        OutputFormat::Table => {
            heading(&format!("Spend Forecast — next {} days", query.horizon_days));
            if let Some(data) = chart.state().data() {
                println!(
                    "  {} {}",
                    "Method:".bold(),
                    data.forecast_method.replace('_', " ")
                );
            }
            if let Some(rows) = settled(&rows) {
                print!("{}", forecast_table(rows));
            }
            if let Some(total) = chart.projected_total() {
                println!();
                println!(
                    "  {} {}",
                    "Projected total:".bold(),
                    charts::format_usd(total).green()
                );
            }
        }
    }

    Ok(())
}

fn opt_num(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn forecast_table(rows: &[ForecastRow]) -> String {
    let max = rows
        .iter()
        .filter_map(|r| r.upper.or(r.actual).or(r.forecast))
        .fold(0.0, f64::max);
    let mut out = format!(
        "  {:<8} {:>12} {:>12} {:>25}\n",
        "Date", "Actual", "Forecast", "95% band"
    );
    out.push_str(&format!("  {}\n", "-".repeat(60)));
    for r in rows {
        let actual = r.actual.map(charts::format_usd).unwrap_or_default();
        let forecast = r.forecast.map(charts::format_usd).unwrap_or_default();
        let band = match (r.lower, r.upper) {
            (Some(lo), Some(hi)) => {
                format!("{} – {}", charts::format_usd(lo), charts::format_usd(hi))
            }
            _ => String::new(),
        };
        let bar = match (r.actual, r.forecast) {
            (Some(a), _) => charts::bar(a, max, BAR_WIDTH).blue(),
            (None, Some(f)) => charts::bar(f, max, BAR_WIDTH).magenta(),
            _ => "".normal(),
        };
        out.push_str(&format!(
            "  {:<8} {:>12} {:>12} {:>25} {}\n",
            r.label, actual, forecast, band, bar
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// heliox recommendations
// ---------------------------------------------------------------------------

/// List, filter, and optionally export recommendations.
pub fn run_recommendations(
    config: &HelioxConfig,
    range: (Option<NaiveDate>, Option<NaiveDate>),
    filters: RecommendationFilters,
    export_path: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    require_access(config, access_store().as_ref())?;

    let api = ApiClient::from_config(&config.api);
    let range = resolve_range(config, today(), range.0, range.1);
    let mut view = RecommendationsView::new(filters);
    view.load(&api, range);

    match format {
        OutputFormat::Json => print_json(&view.report())?,
        OutputFormat::Csv => {
            if let Some(csv) = view.to_csv() {
                print!("{csv}");
            }
        }
        OutputFormat::Table => {
            heading(&format!("Recommendations — {range}"));
            if settled(view.state()).is_some() {
                print!("{}", recommendations_table(&view.filtered(), &view.summary()));
            }
        }
    }

    if let Some(path) = export_path {
        let path = if path.is_dir() {
            path.join(export::default_file_name(today()))
        } else {
            path
        };
        match view.export_csv(&path)? {
            Some(written) => eprintln!(
                "{} Exported {} recommendations to {}",
                "✓".green().bold(),
                view.summary().count,
                written.display()
            ),
            None => eprintln!("{}", "Nothing to export.".yellow()),
        }
    }

    Ok(())
}

fn colorize_severity(severity: Severity) -> colored::ColoredString {
    let label = severity.as_str().to_uppercase();
    match severity {
        Severity::High => label.red().bold(),
        Severity::Medium => label.yellow().bold(),
        Severity::Low => label.blue(),
    }
}

fn recommendations_table(recs: &[&Recommendation], summary: &FilterSummary) -> String {
    let mut out = format!(
        "  {} {}   {} {}   {} {}/{}/{}\n",
        "Showing:".bold(),
        summary.count,
        "Potential savings:".bold(),
        charts::format_usd(summary.total_savings_usd).green(),
        "High/Medium/Low:".bold(),
        summary.by_severity.high,
        summary.by_severity.medium,
        summary.by_severity.low,
    );
    if recs.is_empty() {
        out.push_str(&format!(
            "\n  {}\n",
            "No recommendations match the current filters.".yellow()
        ));
        return out;
    }
    for rec in recs {
        out.push('\n');
        out.push_str(&format!(
            "  {:<8} {} {}\n",
            colorize_severity(rec.severity),
            rec.title.bold(),
            format!("({})", rec.kind.label()).dimmed()
        ));
        let context: Vec<&str> = [rec.provider(), rec.gpu_type(), rec.team_name()]
            .into_iter()
            .flatten()
            .collect();
        out.push_str(&format!(
            "           {} {}   {}\n",
            "Saves".dimmed(),
            charts::format_usd(rec.estimated_savings_usd).green(),
            context.join(" · ").dimmed()
        ));
        out.push_str(&format!("           {}\n", rec.description));
    }
    out
}

// ---------------------------------------------------------------------------
// heliox waitlist
// ---------------------------------------------------------------------------

/// Join the waitlist.
pub fn run_waitlist(config: &HelioxConfig, draft: WaitlistDraft, source: Option<String>) -> Result<()> {
    let source = source.unwrap_or_else(|| config.waitlist.source.clone());
    let mut form = WaitlistForm::with_draft(&source, draft);
    if !form.can_submit() {
        anyhow::bail!("a valid email address is required (it must contain '@')");
    }

    let api = ApiClient::from_config(&config.api);
    let sink = JsonlSink::from_config(config.logging.enabled);
    let outcome = form.submit(&api, &sink);

    match outcome {
        Some(Outcome::Joined) => println!("{} {}", "✓".green().bold(), Outcome::Joined.message()),
        Some(other) => {
            println!("{} {}", "✗".red().bold(), other.message());
            anyhow::bail!("waitlist submission failed");
        }
        None => {}
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// heliox health
// ---------------------------------------------------------------------------

/// Check the backend once, or keep polling with `--watch`.
pub fn run_health(config: &HelioxConfig, watch: bool) -> Result<()> {
    let api = ApiClient::from_config(&config.api);
    heading("Heliox Health Check");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.heliox/config.toml found"
        } else {
            "not found (run `heliox config init` to create)"
        },
    );
    print_health_item("Backend", true, api.base_url());

    if !watch {
        print_report(&health::check(&api));
        return Ok(());
    }

    let interval = Duration::from_secs(config.api.health_interval_secs.max(1));
    println!(
        "  {}",
        format!(
            "Polling every {}s. Press Enter to stop.",
            interval.as_secs()
        )
        .dimmed()
    );
    let monitor = HealthMonitor::watch(api, interval, |report| print_report(&report));
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
    monitor.stop();
    Ok(())
}

fn print_report(report: &HealthReport) {
    let time = Local::now().format("%H:%M:%S").to_string();
    match report {
        HealthReport::Healthy => print_health_item("API", true, &format!("ok ({time})")),
        HealthReport::Unhealthy(reason) => {
            print_health_item("API", false, &format!("{reason} ({time})"))
        }
    }
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// heliox unlock | lock
// ---------------------------------------------------------------------------

/// Enter the beta access code. Prompts on stdin when `code` is omitted.
pub fn run_unlock(config: &HelioxConfig, code: Option<String>) -> Result<()> {
    let store = access_store();
    let mut gate = AccessGate::resolved(&config.access, store.as_ref());
    if gate.is_authorized() {
        println!("{} Access already granted.", "✓".green().bold());
        return Ok(());
    }

    let code = match code {
        Some(code) => code,
        None => prompt("Access code: ")?,
    };

    match gate.submit_code(&code)? {
        GateState::Authorized => {
            println!("{} Access granted.", "✓".green().bold());
            Ok(())
        }
        _ => {
            let message = gate.error().unwrap_or(crate::access::INVALID_CODE_MESSAGE);
            anyhow::bail!("{message}")
        }
    }
}

/// Forget the stored access grant.
pub fn run_lock(config: &HelioxConfig) -> Result<()> {
    let store = access_store();
    let mut gate = AccessGate::resolved(&config.access, store.as_ref());
    gate.lock()?;
    println!("{} Access grant removed.", "✓".green().bold());
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

// ---------------------------------------------------------------------------
// heliox web
// ---------------------------------------------------------------------------

/// Start the embedded web dashboard.
pub fn run_web(config: &HelioxConfig, addr: Option<String>) -> Result<()> {
    let addr = addr.unwrap_or_else(|| config.web.addr.clone());
    let store = access_store();
    web::serve(config, &addr, store.as_ref())
}

// ---------------------------------------------------------------------------
// heliox config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show(config: &HelioxConfig) -> Result<()> {
    let toml_str = config::show_effective_config(config)?;
    println!("{}", "Effective Heliox Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    for (exists, name) in [
        (global_exists, "~/.heliox/config.toml"),
        (project_exists, ".heliox.toml"),
    ] {
        if exists {
            println!("  {} {}", "✓".green(), name.dimmed());
        } else {
            println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
        }
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "HELIOX_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.heliox/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// Quote a CSV field when it contains a separator, quote, or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::AccessConfig;
    use crate::recommendations::filter::fixtures::sample;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn range_defaults_to_last_fourteen_days() {
        let cfg = HelioxConfig::default();
        let range = resolve_range(&cfg, date("2026-01-14"), None, None);
        assert_eq!(range, DateRange::new(date("2026-01-01"), date("2026-01-14")));
    }

    #[test]
    fn gate_blocks_until_unlocked() {
        let mut cfg = HelioxConfig::default();
        let store = MemoryAccessStore::default();
        assert!(require_access(&cfg, &store).is_ok());

        cfg.access = AccessConfig {
            code: Some("beta".into()),
        };
        assert!(require_access(&cfg, &store).is_err());
        store.set().unwrap();
        assert!(require_access(&cfg, &store).is_ok());
    }

    #[test]
    fn trend_table_has_row_per_day_and_total() {
        colored::control::set_override(false);
        let points: Vec<_> = (1..=3)
            .map(|d| DailySpend {
                date: date(&format!("2026-01-0{d}")),
                cost: 100.0 * d as f64,
            })
            .collect();
        let table = trend_table(&points);
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("Jan 1"));
        assert!(table.contains("$600.00"));
    }

    #[test]
    fn recommendations_table_shows_summary() {
        colored::control::set_override(false);
        let recs = sample();
        let refs: Vec<_> = recs.iter().collect();
        let summary = crate::recommendations::filter::summarize(&refs);
        let table = recommendations_table(&refs, &summary);
        assert!(table.contains("Showing: 5"));
        assert!(table.contains("$1,715.50"));
        assert!(table.contains("ML Research"));

        let empty = recommendations_table(&[], &FilterSummary::default());
        assert!(empty.contains("No recommendations match"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
    }

    #[test]
    fn csv_field_quotes_when_needed() {
        assert_eq!(csv_field("llama"), "llama");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }
}
