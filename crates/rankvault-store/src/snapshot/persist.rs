//! Snapshot write operations.
//!
//! A partition's rows for one timestamp are written inside a single
//! transaction: either the full set becomes visible or none of it does.

#![allow(clippy::result_large_err)]

use crate::errors::{persistence, Result};
use chrono::{DateTime, Utc};
use rankvault_core::errors::{ExError, ExErrorKind};
use rankvault_core::model::{PartitionKey, RawPlayerRecord};
use rankvault_core::rules::validate_snapshot;
use rankvault_core::time::{is_hour_aligned, to_millis};
use rusqlite::Connection;

/// Result of writing one partition snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionWriteResult {
    pub partition: PartitionKey,
    pub snapshot_at: DateTime<Utc>,
    /// Rows inserted by this write
    pub rows_written: u64,
    /// Rows removed because the same (partition, timestamp) was written before
    pub rows_replaced: u64,
}

/// Replace the snapshot of `partition` at `snapshot_at` with `records`.
///
/// `records` must already be in rank order and form a well-formed snapshot
/// (dense ranks from 1, non-increasing rating). Any rows already stored at
/// the same (partition, timestamp) are deleted first, so re-running an
/// ingestion within the same hour replaces rather than accumulates.
///
/// ## Errors
///
/// - `ExErrorKind::InvalidInput`: `snapshot_at` is not hour aligned
/// - `ExErrorKind::InvariantViolation` / `EmptySnapshot`: malformed records
/// - `ExErrorKind::Persistence`: the transaction failed; nothing was written
pub fn replace_partition_snapshot(
    conn: &mut Connection,
    partition: PartitionKey,
    snapshot_at: DateTime<Utc>,
    records: &[RawPlayerRecord],
) -> Result<PartitionWriteResult> {
    if !is_hour_aligned(snapshot_at) {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("replace_partition_snapshot")
            .with_entity_id(partition.to_string())
            .with_message(format!("snapshot timestamp {} is not hour aligned", snapshot_at)));
    }
    validate_snapshot(records).map_err(|e| {
        ExError::from(e)
            .with_op("replace_partition_snapshot")
            .with_entity_id(partition.to_string())
    })?;

    let at_ms = to_millis(snapshot_at);
    let region = partition.region.as_str();
    let game_mode = partition.game_mode.as_str();

    let tx = conn
        .transaction()
        .map_err(|e| persistence("replace_partition_snapshot", e))?;

    let rows_replaced = tx
        .execute(
            "DELETE FROM player_snapshots
             WHERE region = ?1 AND game_mode = ?2 AND snapshot_at = ?3",
            rusqlite::params![region, game_mode, at_ms],
        )
        .map_err(|e| persistence("replace_partition_snapshot", e))?;

    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO player_snapshots
                    (account_id, rank, rating, region, game_mode, snapshot_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .map_err(|e| persistence("replace_partition_snapshot", e))?;

        for record in records {
            stmt.execute(rusqlite::params![
                record.account_id,
                record.rank,
                record.rating,
                region,
                game_mode,
                at_ms,
            ])
            .map_err(|e| {
                persistence("replace_partition_snapshot", e)
                    .with_entity_id(format!("{} rank {}", partition, record.rank))
            })?;
        }
    }

    // Dropping an uncommitted transaction rolls it back, so every early
    // return above leaves the previous state untouched.
    tx.commit()
        .map_err(|e| persistence("replace_partition_snapshot", e))?;

    tracing::debug!(
        region,
        game_mode,
        snapshot_at = at_ms,
        rows = records.len(),
        rows_replaced,
        "Committed partition snapshot"
    );

    Ok(PartitionWriteResult {
        partition,
        snapshot_at,
        rows_written: records.len() as u64,
        rows_replaced: rows_replaced as u64,
    })
}
