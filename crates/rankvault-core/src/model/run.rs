//! Ingestion run log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::partition::{GameMode, PartitionKey};
use crate::errors::{ExError, ExErrorKind};

/// Outcome classification of one ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every attempted partition was written
    Success,
    /// Some partitions were written, others failed
    Partial,
    /// No partition was written
    Failure,
}

impl RunStatus {
    /// Classify from attempted/succeeded partition counts
    pub fn classify(attempted: usize, succeeded: usize) -> Self {
        if attempted > 0 && succeeded == attempted {
            RunStatus::Success
        } else if succeeded == 0 {
            RunStatus::Failure
        } else {
            RunStatus::Partial
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Partial => "partial",
            RunStatus::Failure => "failure",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(RunStatus::Success),
            "partial" => Ok(RunStatus::Partial),
            "failure" => Ok(RunStatus::Failure),
            other => Err(ExError::new(ExErrorKind::Serialization)
                .with_op("parse_run_status")
                .with_message(format!("unknown run status '{}'", other))),
        }
    }
}

/// One run log entry; written once at the end of an ingestion attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionRun {
    /// Hour-aligned snapshot timestamp the run produced
    pub run_at: DateTime<Utc>,
    pub rows_written: u64,
    /// Partitions whose full snapshot was committed
    pub partitions_processed: Vec<PartitionKey>,
    /// Distinct game modes among the committed partitions
    pub game_modes_processed: Vec<GameMode>,
    pub partitions_attempted: u32,
    pub status: RunStatus,
    /// Operator-facing free text; never parsed
    pub error_detail: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
