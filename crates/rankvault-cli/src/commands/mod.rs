pub mod history;
pub mod ingest;
pub mod migrate;
pub mod query;
pub mod runs;
pub mod snapshots;
