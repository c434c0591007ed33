//! Append-only ingestion run log.
//!
//! One row per ingestion attempt. Partition and game-mode lists are stored
//! as JSON arrays of their display names (`["EU/standard", "US/duos"]`).
//! Updates are rejected by a trigger, so entries are immutable once written.

#![allow(clippy::result_large_err)]

use crate::errors::{persistence, serialization, Result};
use rankvault_core::model::{GameMode, IngestionRun, PartitionKey, RunStatus};
use rankvault_core::time::{from_millis, to_millis};
use rusqlite::{Connection, OptionalExtension};

/// A stored run log entry with its generated id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLogEntry {
    pub id: i64,
    pub run: IngestionRun,
}

type RawRunRow = (
    i64,
    i64,
    i64,
    String,
    String,
    i64,
    String,
    Option<String>,
    i64,
    i64,
);

const RUN_COLUMNS: &str = "id, run_at, rows_written, partitions_processed, game_modes_processed,
     partitions_attempted, status, error_detail, started_at, finished_at";

/// Append one run entry and return its id.
///
/// # Errors
///
/// - `Serialization`: partition list could not be encoded
/// - `Persistence`: insert failed
pub fn append_run(conn: &Connection, run: &IngestionRun) -> Result<i64> {
    let partitions: Vec<String> = run
        .partitions_processed
        .iter()
        .map(PartitionKey::to_string)
        .collect();
    let modes: Vec<&str> = run.game_modes_processed.iter().map(GameMode::as_str).collect();

    let partitions_json = serde_json::to_string(&partitions)
        .map_err(|e| serialization("append_run", e.to_string()))?;
    let modes_json =
        serde_json::to_string(&modes).map_err(|e| serialization("append_run", e.to_string()))?;

    conn.execute(
        "INSERT INTO ingestion_runs
            (run_at, rows_written, partitions_processed, game_modes_processed,
             partitions_attempted, status, error_detail, started_at, finished_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            to_millis(run.run_at),
            i64::try_from(run.rows_written).unwrap_or(i64::MAX),
            partitions_json,
            modes_json,
            run.partitions_attempted,
            run.status.as_str(),
            run.error_detail,
            to_millis(run.started_at),
            to_millis(run.finished_at),
        ],
    )
    .map_err(|e| persistence("append_run", e))?;

    let id = conn.last_insert_rowid();
    tracing::debug!(run_log_id = id, status = run.status.as_str(), "Appended run log entry");
    Ok(id)
}

/// Most recent run entries, newest first.
///
/// # Errors
///
/// - `Persistence`: query failed
/// - `Serialization`: a stored entry could not be decoded
pub fn list_runs(conn: &Connection, limit: u32) -> Result<Vec<RunLogEntry>> {
    let sql = format!(
        "SELECT {} FROM ingestion_runs ORDER BY run_at DESC, id DESC LIMIT ?1",
        RUN_COLUMNS
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| persistence("list_runs", e))?;
    let raw = stmt
        .query_map([limit], read_raw)
        .map_err(|e| persistence("list_runs", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| persistence("list_runs", e))?;

    raw.into_iter().map(decode_run).collect()
}

/// The newest run entry, if any run has been recorded.
///
/// # Errors
///
/// - `Persistence`: query failed
/// - `Serialization`: the stored entry could not be decoded
pub fn latest_run(conn: &Connection) -> Result<Option<RunLogEntry>> {
    let sql = format!(
        "SELECT {} FROM ingestion_runs ORDER BY run_at DESC, id DESC LIMIT 1",
        RUN_COLUMNS
    );
    conn.query_row(&sql, [], read_raw)
        .optional()
        .map_err(|e| persistence("latest_run", e))?
        .map(decode_run)
        .transpose()
}

fn read_raw(row: &rusqlite::Row) -> rusqlite::Result<RawRunRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
    ))
}

fn decode_run(raw: RawRunRow) -> Result<RunLogEntry> {
    let (
        id,
        run_at,
        rows_written,
        partitions_json,
        modes_json,
        partitions_attempted,
        status,
        error_detail,
        started_at,
        finished_at,
    ) = raw;

    let partition_names: Vec<String> = serde_json::from_str(&partitions_json)
        .map_err(|e| serialization("decode_run", e.to_string()).with_entity_id(id.to_string()))?;
    let mode_names: Vec<String> = serde_json::from_str(&modes_json)
        .map_err(|e| serialization("decode_run", e.to_string()).with_entity_id(id.to_string()))?;

    let partitions_processed = partition_names
        .iter()
        .map(|s| s.parse::<PartitionKey>())
        .collect::<Result<Vec<_>>>()?;
    let game_modes_processed = mode_names
        .iter()
        .map(|s| s.parse::<GameMode>())
        .collect::<Result<Vec<_>>>()?;

    Ok(RunLogEntry {
        id,
        run: IngestionRun {
            run_at: from_millis(run_at)?,
            rows_written: rows_written.max(0) as u64,
            partitions_processed,
            game_modes_processed,
            partitions_attempted: u32::try_from(partitions_attempted).unwrap_or(0),
            status: status.parse::<RunStatus>()?,
            error_detail,
            started_at: from_millis(started_at)?,
            finished_at: from_millis(finished_at)?,
        },
    })
}
