// Shared fixtures for engine integration tests

#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use rankvault_core::model::{PartitionKey, RawPlayerRecord};
use rankvault_engine::source::{LeaderboardSource, SourceError};
use rusqlite::Connection;

/// Scripted upstream: each partition returns fixed records or fails.
#[derive(Default)]
pub struct FakeSource {
    responses: HashMap<PartitionKey, Result<Vec<RawPlayerRecord>, u16>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, partition: PartitionKey, records: Vec<RawPlayerRecord>) -> Self {
        self.responses.insert(partition, Ok(records));
        self
    }

    /// Partition answers with the given HTTP status
    pub fn with_failure(mut self, partition: PartitionKey, status: u16) -> Self {
        self.responses.insert(partition, Err(status));
        self
    }
}

impl LeaderboardSource for FakeSource {
    fn fetch_partition(&self, partition: PartitionKey) -> Result<Vec<RawPlayerRecord>, SourceError> {
        match self.responses.get(&partition) {
            Some(Ok(records)) => Ok(records.clone()),
            Some(Err(status)) => Err(SourceError::Status {
                page: 1,
                status: *status,
            }),
            None => Err(SourceError::Status {
                page: 1,
                status: 404,
            }),
        }
    }
}

pub fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    rankvault_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

pub fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap()
}

/// `n` well-formed records with account ids `{prefix}1..={prefix}n`
pub fn ranked(n: u32, prefix: &str) -> Vec<RawPlayerRecord> {
    (1..=n)
        .map(|r| RawPlayerRecord::new(r, format!("{}{}", prefix, r), 15_000 - i64::from(r) * 7))
        .collect()
}
