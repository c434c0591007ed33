//! RankVault CLI
//!
//! Command-line interface for RankVault

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rankvault_core::logging_facility::{self, Profile};
use rankvault_core::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "rankvault")]
#[command(about = "RankVault - Hourly leaderboard snapshots", long_about = None)]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "RANKVAULT_DB")]
    db: Option<PathBuf>,

    /// Log profile: development, production or test
    #[arg(long, global = true, env = "RANKVAULT_LOG_PROFILE")]
    log_profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every partition and record one hourly snapshot run
    Ingest(commands::ingest::IngestArgs),
    /// Show the current snapshot of one partition
    Query(commands::query::QueryArgs),
    /// List recent ingestion runs
    Runs(commands::runs::RunsArgs),
    /// Show one account's recorded ranks across snapshots
    History(commands::history::HistoryArgs),
    /// List the stored snapshots of one partition, newest first
    Snapshots(commands::snapshots::SnapshotsArgs),
    /// Create or upgrade the database schema
    Migrate,
}

fn main() {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::from_env()?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    if let Some(raw) = cli.log_profile {
        config.log_profile =
            Profile::parse(&raw).ok_or_else(|| format!("unknown log profile '{}'", raw))?;
    }
    logging_facility::init(config.log_profile);

    match cli.command {
        Commands::Ingest(args) => commands::ingest::execute(args, &config),
        Commands::Query(args) => commands::query::execute(args, &config),
        Commands::Runs(args) => commands::runs::execute(args, &config),
        Commands::History(args) => commands::history::execute(args, &config),
        Commands::Snapshots(args) => commands::snapshots::execute(args, &config),
        Commands::Migrate => commands::migrate::execute(&config),
    }
}
