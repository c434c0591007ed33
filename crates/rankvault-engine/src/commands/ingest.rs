//! Hourly ingestion runs.
//!
//! A run picks one hour-aligned timestamp, then for each partition fetches
//! the full ranked list, validates it and replaces the partition snapshot at
//! that timestamp in its own transaction. Partition failures are isolated:
//! the failed partition keeps its previous state and the run moves on.
//! Every invocation appends exactly one run log entry.
//!
//! ## Logging
//!
//! - `log_op_start!` / `log_op_end!` around the whole run
//! - one `info`/`warn` event per partition carrying `region`, `game_mode`, `rows`
//! - `log_op_error!` only when the run log itself cannot be written

#![allow(clippy::result_large_err)]

use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rankvault_core::errors::ExError;
use rankvault_core::model::{GameMode, IngestionRun, PartitionKey, RunStatus};
use rankvault_core_types::RunId;
use rankvault_core::rules::prepare_snapshot;
use rankvault_core::time::align_to_hour;
use rankvault_core::{log_op_end, log_op_error, log_op_start};
use rankvault_store::errors::Result;
use rankvault_store::run_log::append_run;
use rankvault_store::snapshot::persist::{replace_partition_snapshot, PartitionWriteResult};
use rusqlite::Connection;

use crate::source::LeaderboardSource;

/// Options for one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Partitions to ingest, in order. Duplicates are ignored.
    pub partitions: Vec<PartitionKey>,
    /// Clock override; the run timestamp is this instant aligned down to the hour
    pub run_at: Option<DateTime<Utc>>,
    /// Pause between consecutive partitions
    pub partition_delay: Duration,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            partitions: PartitionKey::all(),
            run_at: None,
            partition_delay: Duration::ZERO,
        }
    }
}

impl IngestOptions {
    pub fn with_partitions(mut self, partitions: Vec<PartitionKey>) -> Self {
        self.partitions = partitions;
        self
    }

    pub fn with_run_at(mut self, run_at: DateTime<Utc>) -> Self {
        self.run_at = Some(run_at);
        self
    }

    pub fn with_partition_delay(mut self, delay: Duration) -> Self {
        self.partition_delay = delay;
        self
    }
}

/// A partition that could not be ingested in this run.
#[derive(Debug, Clone)]
pub struct PartitionFailure {
    pub partition: PartitionKey,
    pub error: ExError,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: RunId,
    /// Id of the run log entry
    pub run_log_id: i64,
    /// The run log entry as written
    pub run: IngestionRun,
    pub written: Vec<PartitionWriteResult>,
    pub failures: Vec<PartitionFailure>,
}

/// Execute one ingestion run against `source`.
///
/// # Errors
///
/// Partition failures never fail the run; they are reported in
/// [`RunOutcome::failures`] and the run log. Returns `Err` only when the run
/// log entry cannot be appended.
pub fn run_ingestion(
    conn: &mut Connection,
    source: &dyn LeaderboardSource,
    options: &IngestOptions,
) -> Result<RunOutcome> {
    let run_id = RunId::new();
    let started_at = Utc::now();
    let run_at = align_to_hour(options.run_at.unwrap_or(started_at));

    log_op_start!(
        "run_ingestion",
        run_id = run_id.as_str(),
        run_at = %run_at,
        partitions = options.partitions.len()
    );
    let start = Instant::now();

    let mut partitions: Vec<PartitionKey> = Vec::with_capacity(options.partitions.len());
    for partition in &options.partitions {
        if !partitions.contains(partition) {
            partitions.push(*partition);
        }
    }

    let mut written = Vec::new();
    let mut failures = Vec::new();

    for (index, partition) in partitions.iter().copied().enumerate() {
        if index > 0 && !options.partition_delay.is_zero() {
            thread::sleep(options.partition_delay);
        }

        match ingest_partition(conn, source, partition, run_at) {
            Ok(result) => {
                tracing::info!(
                    run_id = run_id.as_str(),
                    region = partition.region.as_str(),
                    game_mode = partition.game_mode.as_str(),
                    rows = result.rows_written,
                    rows_replaced = result.rows_replaced,
                    "Partition snapshot written"
                );
                written.push(result);
            }
            Err(error) => {
                let error = error.with_run_id(run_id.clone());
                tracing::warn!(
                    run_id = run_id.as_str(),
                    region = partition.region.as_str(),
                    game_mode = partition.game_mode.as_str(),
                    rows = 0u64,
                    err.kind = ?error.kind(),
                    err.code = error.code(),
                    "Partition ingestion failed: {}",
                    error.message()
                );
                failures.push(PartitionFailure { partition, error });
            }
        }
    }

    let run = IngestionRun {
        run_at,
        rows_written: written.iter().map(|w| w.rows_written).sum(),
        partitions_processed: written.iter().map(|w| w.partition).collect(),
        game_modes_processed: distinct_modes(&written),
        partitions_attempted: partitions.len() as u32,
        status: RunStatus::classify(partitions.len(), written.len()),
        error_detail: error_detail(&failures),
        started_at,
        finished_at: Utc::now(),
    };

    let run_log_id = append_run(conn, &run).map_err(|e| {
        let e = e.with_run_id(run_id.clone());
        log_op_error!(
            "run_ingestion",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = run_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "run_ingestion",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = run_id.as_str(),
        status = run.status.as_str(),
        rows = run.rows_written
    );

    Ok(RunOutcome {
        run_id,
        run_log_id,
        run,
        written,
        failures,
    })
}

fn ingest_partition(
    conn: &mut Connection,
    source: &dyn LeaderboardSource,
    partition: PartitionKey,
    run_at: DateTime<Utc>,
) -> Result<PartitionWriteResult> {
    let records = source
        .fetch_partition(partition)
        .map_err(|e| ExError::from(e).with_entity_id(partition.to_string()))?;

    let records = prepare_snapshot(records).map_err(|e| {
        ExError::from(e)
            .with_op("ingest_partition")
            .with_entity_id(partition.to_string())
    })?;

    replace_partition_snapshot(conn, partition, run_at, &records)
}

fn distinct_modes(written: &[PartitionWriteResult]) -> Vec<GameMode> {
    let mut modes = Vec::new();
    for result in written {
        if !modes.contains(&result.partition.game_mode) {
            modes.push(result.partition.game_mode);
        }
    }
    modes
}

fn error_detail(failures: &[PartitionFailure]) -> Option<String> {
    if failures.is_empty() {
        return None;
    }
    Some(
        failures
            .iter()
            .map(|f| format!("{}: [{}] {}", f.partition, f.error.code(), f.error.message()))
            .collect::<Vec<_>>()
            .join("; "),
    )
}
