// Test suite for snapshot persistence
// Covers atomic partition writes, same-hour replacement, and partition isolation

use chrono::{DateTime, TimeZone, Utc};
use rankvault_core::model::{GameMode, PartitionKey, RawPlayerRecord, Region};
use rankvault_core::ExErrorKind;
use rankvault_store::snapshot::persist::replace_partition_snapshot;
use rankvault_store::snapshot::query::{count_rows, fetch_ranked, resolve_current_timestamp};
use rusqlite::Connection;
use tempfile::TempDir;

fn setup_test_env() -> (TempDir, Connection) {
    let temp_dir = TempDir::new().unwrap();
    let conn = rankvault_store::db::open_and_migrate(temp_dir.path().join("test.db")).unwrap();
    (temp_dir, conn)
}

fn hour(h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, h, 0, 0).unwrap()
}

fn eu_standard() -> PartitionKey {
    PartitionKey::new(Region::Eu, GameMode::Standard)
}

fn records(n: u32, prefix: &str) -> Vec<RawPlayerRecord> {
    (1..=n)
        .map(|r| RawPlayerRecord::new(r, format!("{}{}", prefix, r), 12_000 - i64::from(r) * 10))
        .collect()
}

#[test]
fn test_write_then_read_back() {
    let (_dir, mut conn) = setup_test_env();

    let result =
        replace_partition_snapshot(&mut conn, eu_standard(), hour(10), &records(30, "p")).unwrap();
    assert_eq!(result.rows_written, 30);
    assert_eq!(result.rows_replaced, 0);

    assert_eq!(count_rows(&conn, eu_standard(), hour(10)).unwrap(), 30);
    assert_eq!(
        resolve_current_timestamp(&conn, eu_standard()).unwrap(),
        Some(hour(10))
    );

    let rows = fetch_ranked(&conn, eu_standard(), hour(10), None).unwrap();
    let ranks: Vec<u32> = rows.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, (1..=30).collect::<Vec<_>>());
    assert!(rows.iter().all(|r| r.snapshot_at == hour(10)));
    assert!(rows.iter().all(|r| r.partition == eu_standard()));
}

#[test]
fn test_same_hour_rewrite_replaces_instead_of_appending() {
    let (_dir, mut conn) = setup_test_env();

    replace_partition_snapshot(&mut conn, eu_standard(), hour(10), &records(30, "old")).unwrap();
    let result =
        replace_partition_snapshot(&mut conn, eu_standard(), hour(10), &records(20, "new")).unwrap();

    assert_eq!(result.rows_replaced, 30);
    assert_eq!(count_rows(&conn, eu_standard(), hour(10)).unwrap(), 20);

    let rows = fetch_ranked(&conn, eu_standard(), hour(10), None).unwrap();
    assert!(rows.iter().all(|r| r.account_id.starts_with("new")));
}

#[test]
fn test_older_snapshots_are_retained() {
    let (_dir, mut conn) = setup_test_env();

    replace_partition_snapshot(&mut conn, eu_standard(), hour(9), &records(30, "a")).unwrap();
    replace_partition_snapshot(&mut conn, eu_standard(), hour(10), &records(28, "b")).unwrap();

    assert_eq!(count_rows(&conn, eu_standard(), hour(9)).unwrap(), 30);
    assert_eq!(count_rows(&conn, eu_standard(), hour(10)).unwrap(), 28);
    assert_eq!(
        resolve_current_timestamp(&conn, eu_standard()).unwrap(),
        Some(hour(10))
    );
}

#[test]
fn test_partitions_are_independent() {
    let (_dir, mut conn) = setup_test_env();
    let us_duos = PartitionKey::new(Region::Us, GameMode::Duos);

    replace_partition_snapshot(&mut conn, eu_standard(), hour(10), &records(5, "eu")).unwrap();
    replace_partition_snapshot(&mut conn, us_duos, hour(11), &records(7, "us")).unwrap();

    assert_eq!(
        resolve_current_timestamp(&conn, eu_standard()).unwrap(),
        Some(hour(10))
    );
    assert_eq!(resolve_current_timestamp(&conn, us_duos).unwrap(), Some(hour(11)));
    assert_eq!(
        resolve_current_timestamp(&conn, PartitionKey::new(Region::Ap, GameMode::Standard))
            .unwrap(),
        None
    );
}

#[test]
fn test_failed_insert_rolls_back_whole_partition() {
    let (_dir, mut conn) = setup_test_env();

    replace_partition_snapshot(&mut conn, eu_standard(), hour(10), &records(10, "old")).unwrap();

    // Make the third row of any later write fail mid-transaction
    conn.execute_batch(
        "CREATE TRIGGER fail_rank_three BEFORE INSERT ON player_snapshots
         WHEN NEW.rank = 3 AND NEW.account_id LIKE 'new%'
         BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
    )
    .unwrap();

    let err = replace_partition_snapshot(&mut conn, eu_standard(), hour(10), &records(10, "new"))
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);

    // Prior snapshot at the same hour is untouched; no partial new rows
    let rows = fetch_ranked(&conn, eu_standard(), hour(10), None).unwrap();
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|r| r.account_id.starts_with("old")));
}

#[test]
fn test_empty_snapshot_is_rejected() {
    let (_dir, mut conn) = setup_test_env();

    let err = replace_partition_snapshot(&mut conn, eu_standard(), hour(10), &[]).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::EmptySnapshot);
    assert_eq!(resolve_current_timestamp(&conn, eu_standard()).unwrap(), None);
}
