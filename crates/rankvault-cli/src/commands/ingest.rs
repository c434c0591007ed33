//! Ingestion run command

use std::time::Duration;

use clap::Args;
use rankvault_core::model::{GameMode, PartitionKey, Region, RunStatus};
use rankvault_core::Config;
use rankvault_engine::{run_ingestion, HttpLeaderboardSource, IngestOptions};

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Only ingest these regions (repeatable; default: all)
    #[arg(long = "region", value_name = "REGION")]
    pub regions: Vec<String>,

    /// Only ingest these game modes (repeatable; default: all)
    #[arg(long = "mode", value_name = "MODE")]
    pub modes: Vec<String>,

    /// Skip the pause between partitions
    #[arg(long)]
    pub no_delay: bool,
}

pub fn execute(args: IngestArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let partitions = select_partitions(&args.regions, &args.modes)?;

    let mut conn = rankvault_store::db::open_and_migrate(&config.database_path)?;
    let source = HttpLeaderboardSource::new(&config.source)?;

    let options = IngestOptions::default()
        .with_partitions(partitions)
        .with_partition_delay(if args.no_delay {
            Duration::ZERO
        } else {
            config.source.partition_delay
        });

    let outcome = run_ingestion(&mut conn, &source, &options)?;
    let run = &outcome.run;

    println!("Ingestion run {}:", outcome.run_id);
    println!("  run_at: {}", run.run_at.to_rfc3339());
    println!("  status: {}", run.status);
    println!(
        "  partitions: {}/{} written",
        run.partitions_processed.len(),
        run.partitions_attempted
    );
    println!("  rows_written: {}", run.rows_written);
    for written in &outcome.written {
        println!("  {}: {} rows", written.partition, written.rows_written);
    }
    for failure in &outcome.failures {
        println!(
            "  {}: FAILED [{}] {}",
            failure.partition,
            failure.error.code(),
            failure.error.message()
        );
    }

    if run.status == RunStatus::Failure {
        return Err("ingestion run wrote no partition".into());
    }
    Ok(())
}

fn select_partitions(
    regions: &[String],
    modes: &[String],
) -> Result<Vec<PartitionKey>, Box<dyn std::error::Error>> {
    let regions: Vec<Region> = if regions.is_empty() {
        Region::ALL.to_vec()
    } else {
        regions
            .iter()
            .map(|r| r.parse::<Region>())
            .collect::<Result<Vec<_>, _>>()?
    };
    let modes: Vec<GameMode> = if modes.is_empty() {
        GameMode::ALL.to_vec()
    } else {
        modes
            .iter()
            .map(|m| m.parse::<GameMode>())
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(regions
        .iter()
        .flat_map(|r| modes.iter().map(move |m| PartitionKey::new(*r, *m)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_by_default() {
        assert_eq!(select_partitions(&[], &[]).unwrap(), PartitionKey::all());
    }

    #[test]
    fn test_select_subset() {
        let partitions =
            select_partitions(&["us".to_string()], &["battlegroundsduo".to_string()]).unwrap();
        assert_eq!(
            partitions,
            vec![PartitionKey::new(Region::Us, GameMode::Duos)]
        );
    }

    #[test]
    fn test_select_rejects_unknown_region() {
        assert!(select_partitions(&["mars".to_string()], &[]).is_err());
    }
}
