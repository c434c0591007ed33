//! Stored snapshot listing command

use clap::Args;
use rankvault_core::model::PartitionKey;
use rankvault_core::Config;
use rankvault_store::snapshot::list_snapshots;

#[derive(Debug, Args)]
pub struct SnapshotsArgs {
    #[arg(long, default_value = "EU")]
    pub region: String,

    /// standard or duos
    #[arg(long, default_value = "standard")]
    pub mode: String,
}

pub fn execute(args: SnapshotsArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let partition = PartitionKey::new(args.region.parse()?, args.mode.parse()?);
    let conn = rankvault_store::db::open_and_migrate(&config.database_path)?;
    let summaries = list_snapshots(&conn, partition)?;

    if summaries.is_empty() {
        println!("No snapshots stored for {}", partition);
        return Ok(());
    }

    for summary in summaries {
        println!(
            "{} {} players",
            summary.snapshot_at.to_rfc3339(),
            summary.row_count
        );
    }
    Ok(())
}
