//! Snapshot record store.
//!
//! ## Responsibilities
//!
//! - Write one partition's full ranked list for one hour-aligned timestamp
//!   atomically, replacing any rows already present at that
//!   (partition, timestamp)
//! - Resolve the current snapshot timestamp of a partition
//! - Read rows, counts and rating bounds pinned to one (partition, timestamp)
//!
//! ## Non-Responsibilities
//!
//! - Fetching upstream data and run bookkeeping (handled by `rankvault-engine`)
//! - Filter/pagination policy (handled by `rankvault-engine::query`)

pub mod persist;
pub mod query;

// Re-export primary types
pub use persist::{replace_partition_snapshot, PartitionWriteResult};
pub use query::{
    account_history, count_rows, fetch_page, fetch_ranked, list_snapshots, max_rating,
    resolve_current_timestamp, SnapshotSummary,
};
