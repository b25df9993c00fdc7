mod commands;
mod consent;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "healthsync")]
#[command(about = "HealthSync CLI - Authorize, query and log health samples", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show store availability and recorded consent decisions
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Request share and read access for the configured sample types
    Authorize,
    /// List samples for an activity (mindfulness, steps, workout, sleep)
    Query {
        activity: String,
        /// Look back this many hours instead of the configured window
        #[arg(long, conflicts_with = "all")]
        hours: Option<u32>,
        /// Return every stored sample regardless of date
        #[arg(long)]
        all: bool,
        /// Maximum number of samples, 0 for no limit
        #[arg(long, default_value_t = 0)]
        limit: usize,
        #[arg(long)]
        newest_first: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show daily step totals
    Steps {
        /// Number of days including today
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Record a sample ending now
    Log {
        activity: String,
        /// Duration in minutes
        #[arg(long, default_value_t = 10)]
        minutes: u32,
        /// Step count, for steps
        #[arg(long)]
        count: Option<f64>,
        /// Sleep stage (in-bed, asleep, awake, core, deep, rem)
        #[arg(long)]
        stage: Option<String>,
        /// Workout kind, for workouts
        #[arg(long, default_value = "other")]
        kind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("healthsync_cli=warn".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Status { json } => commands::status(json).await,
        Commands::Authorize => commands::authorize().await,
        Commands::Query {
            activity,
            hours,
            all,
            limit,
            newest_first,
            json,
        } => {
            let scope = match (all, hours) {
                (true, _) => commands::QueryScope::All,
                (false, Some(hours)) => commands::QueryScope::LastHours(hours),
                (false, None) => commands::QueryScope::Configured,
            };
            commands::query(&activity, scope, limit, newest_first, json).await
        }
        Commands::Steps { days, json } => commands::steps(days, json).await,
        Commands::Log {
            activity,
            minutes,
            count,
            stage,
            kind,
        } => {
            let entry = commands::LogEntry {
                minutes,
                count,
                stage,
                kind,
            };
            commands::log(&activity, entry).await
        }
    }
}
