//! Upstream leaderboard sources.
//!
//! A source returns one partition's complete ranked list or an error; it
//! never returns a partially fetched list.

use rankvault_core::errors::{ExError, ExErrorKind};
use rankvault_core::model::{PartitionKey, RawPlayerRecord};

pub mod http;

pub use http::HttpLeaderboardSource;

/// Anything that can produce the current ranked list of a partition.
pub trait LeaderboardSource {
    /// Fetch every ranked entry of `partition`, in upstream order.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if any part of the list could not be fetched.
    fn fetch_partition(&self, partition: PartitionKey) -> Result<Vec<RawPlayerRecord>, SourceError>;
}

/// Upstream fetch failure
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    #[error("request for page {page} failed: {message}")]
    Request { page: u32, message: String },

    #[error("request for page {page} timed out")]
    Timeout { page: u32 },

    #[error("upstream returned HTTP {status} for page {page}")]
    Status { page: u32, status: u16 },

    #[error("could not decode page {page}: {message}")]
    Decode { page: u32, message: String },
}

impl From<SourceError> for ExError {
    fn from(err: SourceError) -> Self {
        let kind = match err {
            SourceError::Timeout { .. } => ExErrorKind::Timeout,
            SourceError::Client(_) => ExErrorKind::Internal,
            _ => ExErrorKind::ExternalService,
        };
        ExError::new(kind)
            .with_op("fetch_partition")
            .with_message(err.to_string())
    }
}
