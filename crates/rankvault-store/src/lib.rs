//! RankVault Store - SQLite persistence for leaderboard snapshots
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - Snapshot record store: all-or-nothing partition replace on write,
//!   timestamp-pinned reads
//! - Append-only ingestion run log

pub mod db;
pub mod errors;
pub mod migrations;
pub mod run_log;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
