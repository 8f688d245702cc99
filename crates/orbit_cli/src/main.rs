//! Command-line front end over `orbit_core`.
//!
//! # Responsibility
//! - Open a tracking database, evaluate one view and print it as JSON.
//! - Record and remove day completions.
//!
//! # Invariants
//! - The local clock is read only when `--today` is absent.

use std::error::Error;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use uuid::Uuid;

use orbit_core::db::open_db;
use orbit_core::{
    core_version, default_log_level, init_logging, AnalyticsFilters, AnalyticsLevel,
    AnalyticsService, DashboardService, OwnerScope, SqliteTrackingRepository, TimePeriod,
    TimeScale, TrackingConfig, TrackingRepository,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "orbit", version, about = "Orbit/Phase/Pulse progress tracker")]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, default_value = "orbit.db")]
    db: PathBuf,

    /// Owner scope as `user:<id>` or `group:<id>`.
    #[arg(long, global = true, default_value = "user:local", value_parser = parse_scope)]
    scope: OwnerScope,

    /// Evaluation day (YYYY-MM-DD); defaults to the local date.
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// JSON file with tracking configuration overrides.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Log level for file logging.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Day view: resolved pulses, cascade, commitments, week and month progress.
    Dashboard {
        /// Selected day; defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Month grid padded to whole weeks.
    Calendar {
        /// Any day inside the month; defaults to today.
        #[arg(long)]
        month: Option<NaiveDate>,
    },

    /// Lifetime progress per Orbit, Phase and Pulse.
    Panel,

    /// Progress time series and KPIs.
    Analytics {
        #[arg(long, value_enum, default_value = "orbits")]
        level: LevelArg,

        #[arg(long, value_enum, default_value = "last30d")]
        period: PeriodArg,

        /// Custom range start; required with `--period custom`.
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Custom range end; required with `--period custom`.
        #[arg(long)]
        to: Option<NaiveDate>,

        #[arg(long, value_enum, default_value = "daily")]
        scale: ScaleArg,

        #[arg(long)]
        orbit: Option<Uuid>,

        #[arg(long)]
        phase: Option<Uuid>,

        #[arg(long)]
        pulse: Option<Uuid>,
    },

    /// Record a completion; repeated logs on one day accumulate.
    Log {
        pulse: Uuid,

        /// Day of the completion; defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Amount to add; one unit when omitted.
        #[arg(long)]
        value: Option<f64>,
    },

    /// Remove the completion recorded for a day.
    Unlog {
        pulse: Uuid,

        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Print the core version.
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum LevelArg {
    Orbits,
    Phases,
    Pulses,
}

#[derive(Clone, Copy, ValueEnum)]
enum PeriodArg {
    All,
    #[value(name = "last30d")]
    Last30d,
    #[value(name = "last3m")]
    Last3m,
    Custom,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScaleArg {
    Daily,
    Weekly,
    Monthly,
}

fn parse_scope(raw: &str) -> Result<OwnerScope, String> {
    match raw.split_once(':') {
        Some(("user", id)) if !id.is_empty() => Ok(OwnerScope::User(id.to_string())),
        Some(("group", id)) if !id.is_empty() => Ok(OwnerScope::Group(id.to_string())),
        _ => Err(format!("expected `user:<id>` or `group:<id>`, got `{raw}`")),
    }
}

fn load_config(path: Option<&PathBuf>) -> CliResult<TrackingConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(TrackingConfig::default()),
    }
}

fn time_period(period: PeriodArg, from: Option<NaiveDate>, to: Option<NaiveDate>) -> CliResult<TimePeriod> {
    Ok(match period {
        PeriodArg::All => TimePeriod::All,
        PeriodArg::Last30d => TimePeriod::RecentDays,
        PeriodArg::Last3m => TimePeriod::RecentMonths,
        PeriodArg::Custom => match (from, to) {
            (Some(from), Some(to)) => TimePeriod::Custom { from, to },
            _ => return Err("--period custom requires --from and --to".into()),
        },
    })
}

fn print_json(value: &impl serde::Serialize) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    if let Commands::Version = cli.command {
        println!("orbit_core version={}", core_version());
        return Ok(());
    }

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let config = load_config(cli.config.as_ref())?;
    let conn = open_db(&cli.db)?;
    let repo = SqliteTrackingRepository::new(&conn);

    match cli.command {
        Commands::Dashboard { date } => {
            let service = DashboardService::with_config(repo, config);
            print_json(&service.dashboard(&cli.scope, date.unwrap_or(today), today)?)?;
        }

        Commands::Calendar { month } => {
            let service = DashboardService::with_config(repo, config);
            print_json(&service.calendar(&cli.scope, month.unwrap_or(today), today)?)?;
        }

        Commands::Panel => {
            let service = DashboardService::with_config(repo, config);
            print_json(&service.panel(&cli.scope, today)?)?;
        }

        Commands::Analytics {
            level,
            period,
            from,
            to,
            scale,
            orbit,
            phase,
            pulse,
        } => {
            let filters = AnalyticsFilters {
                level: match level {
                    LevelArg::Orbits => AnalyticsLevel::Orbits,
                    LevelArg::Phases => AnalyticsLevel::Phases,
                    LevelArg::Pulses => AnalyticsLevel::Pulses,
                },
                time_period: time_period(period, from, to)?,
                scale: Some(match scale {
                    ScaleArg::Daily => TimeScale::Daily,
                    ScaleArg::Weekly => TimeScale::Weekly,
                    ScaleArg::Monthly => TimeScale::Monthly,
                }),
                orbit_id: orbit,
                phase_id: phase,
                pulse_id: pulse,
            };
            let service = AnalyticsService::with_config(repo, config);
            print_json(&service.analytics(&cli.scope, &filters, today)?)?;
        }

        Commands::Log { pulse, date, value } => {
            let log = repo.log_completion(pulse, date.unwrap_or(today), value)?;
            info!("event=cli_log module=cli status=ok pulse_id={}", pulse);
            print_json(&log)?;
        }

        Commands::Unlog { pulse, date } => {
            let removed = repo.remove_completion(pulse, date.unwrap_or(today))?;
            info!("event=cli_unlog module=cli status=ok pulse_id={} removed={}", pulse, removed);
            println!("{{\"removed\": {removed}}}");
        }

        Commands::Version => {}
    }

    Ok(())
}
