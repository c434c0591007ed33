//! Account history command

use clap::Args;
use rankvault_core::Config;
use rankvault_store::snapshot::query::account_history;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Exact account name
    pub account: String,

    /// Maximum number of rows to show
    #[arg(long)]
    pub limit: Option<u32>,
}

pub fn execute(args: HistoryArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let conn = rankvault_store::db::open_and_migrate(&config.database_path)?;
    let rows = account_history(&conn, &args.account, args.limit)?;

    if rows.is_empty() {
        println!("No records for {}", args.account);
        return Ok(());
    }

    for row in rows {
        println!(
            "{} {:<12} rank={} rating={}",
            row.snapshot_at.to_rfc3339(),
            row.partition.to_string(),
            row.rank,
            row.rating
        );
    }
    Ok(())
}
