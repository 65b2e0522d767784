use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use heliox::api::ForecastQuery;
use heliox::cli::{self, OutputFormat};
use heliox::config;
use heliox::recommendations::RecommendationFilters;
use heliox::waitlist::WaitlistDraft;

#[derive(Debug, Parser)]
#[command(name = "heliox")]
#[command(about = "GPU spend analytics: charts, forecasts, and savings recommendations")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

/// Shared `--start` / `--end` / `--format` flags.
#[derive(Debug, clap::Args)]
struct RangeArgs {
    /// First day of the range (YYYY-MM-DD). Defaults to 14 days before --end
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last day of the range (YYYY-MM-DD). Defaults to today
    #[arg(long)]
    end: Option<NaiveDate>,
    /// Output format: table (default), json, csv
    #[arg(long, default_value = "table")]
    format: String,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show every dashboard panel for a date range
    Dashboard {
        #[command(flatten)]
        range: RangeArgs,
        /// Forecast horizon in days
        #[arg(long)]
        horizon: Option<u32>,
    },
    /// Daily spend trend
    Trend {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Cost by ML model
    Models {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Cost by team
    Teams {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Spend forecast with 95% confidence band
    Forecast {
        /// Forecast horizon in days
        #[arg(long)]
        horizon: Option<u32>,
        /// Only forecast spend on this provider
        #[arg(long)]
        provider: Option<String>,
        /// Only forecast spend on this GPU type
        #[arg(long)]
        gpu_type: Option<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Cost-optimization recommendations
    Recommendations {
        #[command(flatten)]
        range: RangeArgs,
        /// Severity: all (default), high, medium, low
        #[arg(long)]
        severity: Option<String>,
        /// Provider, e.g. aws (case-insensitive)
        #[arg(long)]
        provider: Option<String>,
        /// Type: idle_gpu, long_running_job, off_hours_usage, cost_optimization
        #[arg(long = "type")]
        kind: Option<String>,
        /// Case-insensitive text search over title, description, team, GPU, provider
        #[arg(long)]
        search: Option<String>,
        /// Write the filtered list as CSV to this file or directory
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Join the Heliox waitlist
    Waitlist {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        role: Option<String>,
        /// Attribution source (default from config: landing)
        #[arg(long)]
        source: Option<String>,
    },
    /// Check backend health
    Health {
        /// Keep polling until Enter is pressed
        #[arg(long)]
        watch: bool,
    },
    /// Enter the beta access code
    Unlock {
        /// Access code; prompted for when omitted
        code: Option<String>,
    },
    /// Forget the stored access grant
    Lock,
    /// Launch the web dashboard
    Web {
        /// Address to bind (default from config: 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config file to ~/.heliox/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a config value, e.g. `heliox config set api.base_url http://10.0.0.5:8000`
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let cfg = config::load();

    match app.command {
        Commands::Dashboard { range, horizon } => {
            let fmt = OutputFormat::from_str_opt(Some(&range.format));
            cli::run_dashboard(&cfg, range.start, range.end, horizon, fmt)
        }
        Commands::Trend { range } => {
            let fmt = OutputFormat::from_str_opt(Some(&range.format));
            cli::run_trend(&cfg, range.start, range.end, fmt)
        }
        Commands::Models { range } => {
            let fmt = OutputFormat::from_str_opt(Some(&range.format));
            cli::run_models(&cfg, range.start, range.end, fmt)
        }
        Commands::Teams { range } => {
            let fmt = OutputFormat::from_str_opt(Some(&range.format));
            cli::run_teams(&cfg, range.start, range.end, fmt)
        }
        Commands::Forecast {
            horizon,
            provider,
            gpu_type,
            format,
        } => {
            let query = ForecastQuery {
                horizon_days: horizon.unwrap_or(cfg.dashboard.forecast_horizon_days),
                provider,
                gpu_type,
            };
            cli::run_forecast(&cfg, query, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Recommendations {
            range,
            severity,
            provider,
            kind,
            search,
            export,
        } => {
            let filters = RecommendationFilters::from_choices(
                severity.as_deref(),
                provider.as_deref(),
                kind.as_deref(),
                search.as_deref(),
            )?;
            let fmt = OutputFormat::from_str_opt(Some(&range.format));
            cli::run_recommendations(&cfg, (range.start, range.end), filters, export, fmt)
        }
        Commands::Waitlist {
            email,
            name,
            company,
            role,
            source,
        } => {
            let draft = WaitlistDraft {
                name: name.unwrap_or_default(),
                email,
                company: company.unwrap_or_default(),
                role: role.unwrap_or_default(),
            };
            cli::run_waitlist(&cfg, draft, source)
        }
        Commands::Health { watch } => cli::run_health(&cfg, watch),
        Commands::Unlock { code } => cli::run_unlock(&cfg, code),
        Commands::Lock => cli::run_lock(&cfg),
        Commands::Web { addr } => cli::run_web(&cfg, addr),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(&cfg),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
