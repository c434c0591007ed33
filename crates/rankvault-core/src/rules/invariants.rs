//! Snapshot well-formedness rules.
//!
//! Within one (partition, timestamp) ranks must be dense from 1 with no
//! duplicates, and rating must be non-increasing as rank increases. Records
//! that break either rule are never written.

use crate::errors::SnapshotInvariantError;
use crate::model::RawPlayerRecord;

/// Check that `records`, already in rank order, form a well-formed snapshot.
pub fn validate_snapshot(records: &[RawPlayerRecord]) -> Result<(), SnapshotInvariantError> {
    if records.is_empty() {
        return Err(SnapshotInvariantError::Empty);
    }

    let mut previous_rating: Option<i64> = None;
    for (idx, record) in records.iter().enumerate() {
        if record.rank == 0 {
            return Err(SnapshotInvariantError::ZeroRank {
                account_id: record.account_id.clone(),
            });
        }
        if record.account_id.trim().is_empty() {
            return Err(SnapshotInvariantError::BlankAccount { rank: record.rank });
        }

        let expected = idx as u32 + 1;
        if record.rank != expected {
            // Sorted input: a repeat of the previous rank shows up as rank < expected.
            if record.rank < expected {
                return Err(SnapshotInvariantError::DuplicateRank { rank: record.rank });
            }
            return Err(SnapshotInvariantError::RankGap {
                expected,
                found: record.rank,
            });
        }

        if let Some(previous) = previous_rating {
            if record.rating > previous {
                return Err(SnapshotInvariantError::RatingIncrease {
                    rank: record.rank,
                    previous,
                    rating: record.rating,
                });
            }
        }
        previous_rating = Some(record.rating);
    }

    Ok(())
}

/// Order upstream records by rank and validate them.
pub fn prepare_snapshot(
    mut records: Vec<RawPlayerRecord>,
) -> Result<Vec<RawPlayerRecord>, SnapshotInvariantError> {
    records.sort_by_key(|r| r.rank);
    validate_snapshot(&records)?;
    Ok(records)
}
