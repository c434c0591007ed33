//! Snapshot-consistent leaderboard queries.
//!
//! One query runs inside one read transaction and resolves the partition's
//! current timestamp exactly once. Rows, total count and max rating are all
//! read at that pinned (partition, timestamp), so a snapshot committed while
//! the query runs is never mixed into its result.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use chrono::{DateTime, Utc};
use rankvault_core::model::{PartitionKey, PlayerSnapshotRow};
use rankvault_core_types::RequestId;
use rankvault_core::session::LeaderboardRequest;
use rankvault_core::{log_op_end, log_op_error, log_op_start};
use rankvault_store::errors::{persistence, Result};
use rankvault_store::snapshot::query::{
    count_rows, fetch_page, fetch_ranked, max_rating, resolve_current_timestamp,
};
use rusqlite::Connection;
use serde::Serialize;

/// One view of a partition's current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardPage {
    pub partition: PartitionKey,
    /// Timestamp every row and total was read at; `None` if the partition has no data
    pub snapshot_at: Option<DateTime<Utc>>,
    /// Rows in rank order
    pub rows: Vec<PlayerSnapshotRow>,
    /// Row count of the whole snapshot, regardless of filters and page
    pub total_count: u64,
    /// Highest rating in the whole snapshot
    pub max_rating: Option<i64>,
    /// Effective page number; always 1 for a filtered view
    pub page: u32,
    pub page_size: u32,
    /// Page count of the unfiltered snapshot; 1 for a filtered view, 0 with no data
    pub total_pages: u32,
    /// Whether a filter was active and pagination was suspended
    pub filtered: bool,
}

impl LeaderboardPage {
    fn empty(request: &LeaderboardRequest) -> Self {
        Self {
            partition: request.partition,
            snapshot_at: None,
            rows: Vec::new(),
            total_count: 0,
            max_rating: None,
            page: request.effective_page(),
            page_size: request.effective_page_size(),
            total_pages: 0,
            filtered: request.filters.is_active(),
        }
    }
}

/// Query the current snapshot of a partition.
///
/// A partition with no data yields an empty page, not an error.
///
/// # Errors
///
/// - `Persistence`: a store read failed
/// - `Serialization`: a stored row could not be decoded
pub fn query_leaderboard(conn: &Connection, request: &LeaderboardRequest) -> Result<LeaderboardPage> {
    let request_id = RequestId::new();
    log_op_start!(
        "query_leaderboard",
        request_id = request_id.as_str(),
        partition = %request.partition,
        filtered = request.filters.is_active()
    );
    let start = Instant::now();

    let page = query_leaderboard_impl(conn, request).map_err(|e| {
        let e = e.with_request_id(request_id.clone());
        log_op_error!(
            "query_leaderboard",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = request_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "query_leaderboard",
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = request_id.as_str(),
        rows = page.rows.len(),
        total_count = page.total_count
    );

    Ok(page)
}

fn query_leaderboard_impl(
    conn: &Connection,
    request: &LeaderboardRequest,
) -> Result<LeaderboardPage> {
    // Deferred: the read snapshot is taken at the first SELECT and held
    // until the transaction ends.
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| persistence("query_leaderboard", e))?;

    let partition = request.partition;
    let Some(snapshot_at) = resolve_current_timestamp(&tx, partition)? else {
        return Ok(LeaderboardPage::empty(request));
    };

    let total_count = count_rows(&tx, partition, snapshot_at)?;
    let max_rating = max_rating(&tx, partition, snapshot_at)?;
    let page_size = request.effective_page_size();

    let page = if request.filters.is_active() {
        let mut rows = fetch_ranked(&tx, partition, snapshot_at, request.filters.rank)?;
        if let Some(needle) = request.filters.name_needle() {
            let needle = needle.to_lowercase();
            rows.retain(|row| row.account_id.to_lowercase().contains(&needle));
        }
        LeaderboardPage {
            partition,
            snapshot_at: Some(snapshot_at),
            rows,
            total_count,
            max_rating,
            page: 1,
            page_size,
            total_pages: 1,
            filtered: true,
        }
    } else {
        let rows = fetch_page(&tx, partition, snapshot_at, page_size, request.offset())?;
        LeaderboardPage {
            partition,
            snapshot_at: Some(snapshot_at),
            rows,
            total_count,
            max_rating,
            page: request.effective_page(),
            page_size,
            total_pages: total_count.div_ceil(u64::from(page_size)) as u32,
            filtered: false,
        }
    };

    tx.commit()
        .map_err(|e| persistence("query_leaderboard", e))?;

    Ok(page)
}
