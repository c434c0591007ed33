//! RankVault Engine - Orchestration layer
//!
//! Coordinates the upstream leaderboard source, core snapshot rules and the
//! SQLite store:
//! - `commands::ingest`: hourly ingestion runs with per-partition isolation
//! - `commands::query`: snapshot-consistent leaderboard reads
//! - `source`: the upstream adapter seam and its HTTP implementation

pub mod commands;
pub mod source;

pub use commands::ingest::{run_ingestion, IngestOptions, PartitionFailure, RunOutcome};
pub use commands::query::{query_leaderboard, LeaderboardPage};
pub use source::{HttpLeaderboardSource, LeaderboardSource, SourceError};
