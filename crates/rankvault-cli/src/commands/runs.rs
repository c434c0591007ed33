//! Run log listing command

use clap::Args;
use rankvault_core::Config;
use rankvault_store::run_log::list_runs;

#[derive(Debug, Args)]
pub struct RunsArgs {
    /// Maximum number of runs to show
    #[arg(long, default_value_t = 10)]
    pub limit: u32,
}

pub fn execute(args: RunsArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let conn = rankvault_store::db::open_and_migrate(&config.database_path)?;
    let runs = list_runs(&conn, args.limit)?;

    if runs.is_empty() {
        println!("No ingestion runs recorded");
        return Ok(());
    }

    for entry in runs {
        let run = entry.run;
        let partitions: Vec<String> = run
            .partitions_processed
            .iter()
            .map(|p| p.to_string())
            .collect();
        println!(
            "#{} {} {} rows={} partitions={}/{} [{}]",
            entry.id,
            run.run_at.to_rfc3339(),
            run.status,
            run.rows_written,
            run.partitions_processed.len(),
            run.partitions_attempted,
            partitions.join(", ")
        );
        if let Some(detail) = run.error_detail {
            println!("    {}", detail);
        }
    }
    Ok(())
}
