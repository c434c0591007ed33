//! RankVault Core - domain kernel for hourly leaderboard snapshots
//!
//! This crate provides:
//! - Partition, player-row and run-log models
//! - Snapshot well-formedness rules (dense ranks, non-increasing rating)
//! - Hour alignment of snapshot timestamps
//! - Immutable leaderboard query requests and their transitions
//! - The structured error and logging facilities shared by every crate
//! - Runtime configuration

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rules;
pub mod session;
pub mod time;

// Used by the exported logging macros
pub use rankvault_core_types;

// Re-export commonly used types
pub use config::Config;
pub use errors::{ExError, ExErrorKind, Result, SnapshotInvariantError};
pub use model::{
    GameMode, IngestionRun, PartitionKey, PlayerSnapshotRow, RawPlayerRecord, Region, RunStatus,
};
pub use session::{Filters, LeaderboardRequest, SessionAction, DEFAULT_PAGE_SIZE};
