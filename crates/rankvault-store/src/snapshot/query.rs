//! Read-only snapshot query operations.
//!
//! Every read except [`resolve_current_timestamp`] takes an explicit
//! `snapshot_at`, so a caller that resolves the timestamp once and reuses it
//! inside one read transaction sees a single consistent snapshot even while
//! a newer one is being committed.

#![allow(clippy::result_large_err)]

use crate::errors::{persistence, serialization, Result};
use chrono::{DateTime, Utc};
use rankvault_core::model::{PartitionKey, PlayerSnapshotRow};
use rankvault_core::time::{from_millis, to_millis};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};

const ROW_COLUMNS: &str = "id, account_id, rank, rating, region, game_mode, snapshot_at";

/// One stored snapshot of a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub snapshot_at: DateTime<Utc>,
    pub row_count: u64,
}

/// Latest snapshot timestamp stored for `partition`, or `None` if the
/// partition has never been written.
///
/// # Errors
///
/// - `Persistence`: SQLite query failed
/// - `Serialization`: stored timestamp out of range
pub fn resolve_current_timestamp(
    conn: &Connection,
    partition: PartitionKey,
) -> Result<Option<DateTime<Utc>>> {
    let max: Option<i64> = conn
        .query_row(
            "SELECT MAX(snapshot_at) FROM player_snapshots
             WHERE region = ?1 AND game_mode = ?2",
            rusqlite::params![partition.region.as_str(), partition.game_mode.as_str()],
            |row| row.get(0),
        )
        .map_err(|e| persistence("resolve_current_timestamp", e))?;

    max.map(from_millis).transpose()
}

/// Number of rows in the snapshot of `partition` at `snapshot_at`.
///
/// # Errors
///
/// - `Persistence`: SQLite query failed
pub fn count_rows(
    conn: &Connection,
    partition: PartitionKey,
    snapshot_at: DateTime<Utc>,
) -> Result<u64> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM player_snapshots
             WHERE region = ?1 AND game_mode = ?2 AND snapshot_at = ?3",
            rusqlite::params![
                partition.region.as_str(),
                partition.game_mode.as_str(),
                to_millis(snapshot_at)
            ],
            |row| row.get(0),
        )
        .map_err(|e| persistence("count_rows", e))?;
    Ok(count as u64)
}

/// Highest rating in the snapshot, `None` when the snapshot has no rows.
///
/// # Errors
///
/// - `Persistence`: SQLite query failed
pub fn max_rating(
    conn: &Connection,
    partition: PartitionKey,
    snapshot_at: DateTime<Utc>,
) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT MAX(rating) FROM player_snapshots
         WHERE region = ?1 AND game_mode = ?2 AND snapshot_at = ?3",
        rusqlite::params![
            partition.region.as_str(),
            partition.game_mode.as_str(),
            to_millis(snapshot_at)
        ],
        |row| row.get(0),
    )
    .map_err(|e| persistence("max_rating", e))
}

/// One page of the snapshot in rank order.
///
/// # Errors
///
/// - `Persistence`: SQLite query failed
/// - `Serialization`: a stored row could not be decoded
pub fn fetch_page(
    conn: &Connection,
    partition: PartitionKey,
    snapshot_at: DateTime<Utc>,
    limit: u32,
    offset: u64,
) -> Result<Vec<PlayerSnapshotRow>> {
    let sql = format!(
        "SELECT {} FROM player_snapshots
         WHERE region = ?1 AND game_mode = ?2 AND snapshot_at = ?3
         ORDER BY rank ASC
         LIMIT ?4 OFFSET ?5",
        ROW_COLUMNS
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| persistence("fetch_page", e))?;
    let rows = stmt
        .query_map(
            rusqlite::params![
                partition.region.as_str(),
                partition.game_mode.as_str(),
                to_millis(snapshot_at),
                limit,
                // SQLite integers are signed; clamp instead of wrapping
                i64::try_from(offset).unwrap_or(i64::MAX),
            ],
            row_to_player_row,
        )
        .map_err(|e| persistence("fetch_page", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| read_error("fetch_page", e))?;
    Ok(rows)
}

/// Every row of the snapshot in rank order, optionally only the exact `rank`.
///
/// # Errors
///
/// - `Persistence`: SQLite query failed
/// - `Serialization`: a stored row could not be decoded
pub fn fetch_ranked(
    conn: &Connection,
    partition: PartitionKey,
    snapshot_at: DateTime<Utc>,
    rank: Option<u32>,
) -> Result<Vec<PlayerSnapshotRow>> {
    let sql = format!(
        "SELECT {} FROM player_snapshots
         WHERE region = ?1 AND game_mode = ?2 AND snapshot_at = ?3
           AND (?4 IS NULL OR rank = ?4)
         ORDER BY rank ASC",
        ROW_COLUMNS
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| persistence("fetch_ranked", e))?;
    let rows = stmt
        .query_map(
            rusqlite::params![
                partition.region.as_str(),
                partition.game_mode.as_str(),
                to_millis(snapshot_at),
                rank,
            ],
            row_to_player_row,
        )
        .map_err(|e| persistence("fetch_ranked", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| read_error("fetch_ranked", e))?;
    Ok(rows)
}

/// All stored snapshots of a partition, newest first.
///
/// # Errors
///
/// - `Persistence`: SQLite query failed
/// - `Serialization`: stored timestamp out of range
pub fn list_snapshots(conn: &Connection, partition: PartitionKey) -> Result<Vec<SnapshotSummary>> {
    let mut stmt = conn
        .prepare(
            "SELECT snapshot_at, COUNT(*) FROM player_snapshots
             WHERE region = ?1 AND game_mode = ?2
             GROUP BY snapshot_at
             ORDER BY snapshot_at DESC",
        )
        .map_err(|e| persistence("list_snapshots", e))?;
    let raw = stmt
        .query_map(
            rusqlite::params![partition.region.as_str(), partition.game_mode.as_str()],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )
        .map_err(|e| persistence("list_snapshots", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| persistence("list_snapshots", e))?;

    raw.into_iter()
        .map(|(at, count)| {
            Ok::<_, rankvault_core::ExError>(SnapshotSummary {
                snapshot_at: from_millis(at)?,
                row_count: count as u64,
            })
        })
        .collect()
}

/// Rows recorded for one account across every partition and snapshot,
/// newest snapshot first. `limit` caps the number of rows returned.
///
/// # Errors
///
/// - `Persistence`: SQLite query failed
/// - `Serialization`: a stored row could not be decoded
pub fn account_history(
    conn: &Connection,
    account_id: &str,
    limit: Option<u32>,
) -> Result<Vec<PlayerSnapshotRow>> {
    let sql = format!(
        "SELECT {} FROM player_snapshots
         WHERE account_id = ?1
         ORDER BY snapshot_at DESC, region ASC, game_mode ASC
         LIMIT ?2",
        ROW_COLUMNS
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| persistence("account_history", e))?;
    // LIMIT -1 means no limit in SQLite
    let limit = limit.map(i64::from).unwrap_or(-1);
    let rows = stmt
        .query_map(rusqlite::params![account_id, limit], row_to_player_row)
        .map_err(|e| persistence("account_history", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| read_error("account_history", e))?;
    Ok(rows)
}

fn read_error(op: &str, err: rusqlite::Error) -> rankvault_core::ExError {
    match err {
        rusqlite::Error::FromSqlConversionFailure(_, _, inner) => {
            serialization(op, inner.to_string())
        }
        other => persistence(op, other),
    }
}

fn conversion_failure(idx: usize, err: rankvault_core::ExError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn row_to_player_row(row: &Row) -> rusqlite::Result<PlayerSnapshotRow> {
    let region: String = row.get(4)?;
    let game_mode: String = row.get(5)?;
    let snapshot_at: i64 = row.get(6)?;

    let partition = PartitionKey::new(
        region.parse().map_err(|e| conversion_failure(4, e))?,
        game_mode.parse().map_err(|e| conversion_failure(5, e))?,
    );
    let snapshot_at = from_millis(snapshot_at).map_err(|e| conversion_failure(6, e))?;

    Ok(PlayerSnapshotRow {
        id: row.get(0)?,
        account_id: row.get(1)?,
        rank: row.get(2)?,
        rating: row.get(3)?,
        partition,
        snapshot_at,
    })
}
