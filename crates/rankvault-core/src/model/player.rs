//! Player rank records: raw upstream shape and persisted snapshot row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::partition::PartitionKey;

/// One ranked entry as produced by a leaderboard source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPlayerRecord {
    pub rank: u32,
    pub account_id: String,
    pub rating: i64,
}

impl RawPlayerRecord {
    pub fn new(rank: u32, account_id: impl Into<String>, rating: i64) -> Self {
        Self {
            rank,
            account_id: account_id.into(),
            rating,
        }
    }
}

/// A persisted player-rank row, immutable once written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshotRow {
    /// Generated store identity
    pub id: i64,
    pub account_id: String,
    pub rank: u32,
    pub rating: i64,
    pub partition: PartitionKey,
    /// Hour-aligned run timestamp
    pub snapshot_at: DateTime<Utc>,
}
