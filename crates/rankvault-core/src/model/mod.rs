//! Domain models for leaderboard snapshots and ingestion runs

pub mod partition;
pub mod player;
pub mod run;

pub use partition::{GameMode, PartitionKey, Region};
pub use player::{PlayerSnapshotRow, RawPlayerRecord};
pub use run::{IngestionRun, RunStatus};
