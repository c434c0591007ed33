// Test suite for the append-only run log

use chrono::{DateTime, Duration, TimeZone, Utc};
use rankvault_core::model::{GameMode, IngestionRun, PartitionKey, Region, RunStatus};
use rankvault_store::run_log::{append_run, latest_run, list_runs};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    rankvault_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

fn run_at(h: u32, status: RunStatus) -> IngestionRun {
    let at: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 3, 1, h, 0, 0).unwrap();
    IngestionRun {
        run_at: at,
        rows_written: 58,
        partitions_processed: vec![
            PartitionKey::new(Region::Eu, GameMode::Standard),
            PartitionKey::new(Region::Us, GameMode::Duos),
        ],
        game_modes_processed: vec![GameMode::Standard, GameMode::Duos],
        partitions_attempted: 6,
        status,
        error_detail: Some("AP/standard: upstream returned 503".to_string()),
        started_at: at + Duration::seconds(3),
        finished_at: at + Duration::seconds(40),
    }
}

#[test]
fn test_append_and_read_back() {
    let conn = setup();
    let run = run_at(10, RunStatus::Partial);

    let id = append_run(&conn, &run).unwrap();
    let latest = latest_run(&conn).unwrap().unwrap();

    assert_eq!(latest.id, id);
    assert_eq!(latest.run, run);
}

#[test]
fn test_latest_run_empty_log() {
    let conn = setup();
    assert!(latest_run(&conn).unwrap().is_none());
    assert!(list_runs(&conn, 10).unwrap().is_empty());
}

#[test]
fn test_list_runs_newest_first_with_limit() {
    let conn = setup();
    append_run(&conn, &run_at(8, RunStatus::Success)).unwrap();
    append_run(&conn, &run_at(10, RunStatus::Failure)).unwrap();
    append_run(&conn, &run_at(9, RunStatus::Partial)).unwrap();

    let runs = list_runs(&conn, 2).unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].run.status, RunStatus::Failure);
    assert_eq!(runs[1].run.status, RunStatus::Partial);
}

#[test]
fn test_each_attempt_is_a_separate_entry() {
    let conn = setup();
    let run = run_at(10, RunStatus::Success);
    let first = append_run(&conn, &run).unwrap();
    let second = append_run(&conn, &run).unwrap();

    assert_ne!(first, second);
    assert_eq!(list_runs(&conn, 10).unwrap().len(), 2);
}

#[test]
fn test_failure_run_with_no_partitions() {
    let conn = setup();
    let mut run = run_at(10, RunStatus::Failure);
    run.rows_written = 0;
    run.partitions_processed.clear();
    run.game_modes_processed.clear();

    append_run(&conn, &run).unwrap();
    let latest = latest_run(&conn).unwrap().unwrap();
    assert!(latest.run.partitions_processed.is_empty());
    assert_eq!(latest.run.rows_written, 0);
}
