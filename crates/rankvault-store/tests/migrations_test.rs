// Integration tests for the migration framework

use rusqlite::Connection;

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = setup_test_db();

    let result = rankvault_store::migrations::apply_migrations(&mut conn);
    assert!(
        result.is_ok(),
        "Migrations should succeed: {:?}",
        result.err()
    );

    let tables = get_table_names(&conn);
    for expected in [
        "schema_version",
        "player_snapshots",
        "ingestion_runs",
        "sqlite_sequence", // created by SQLite for AUTOINCREMENT columns
    ] {
        assert!(
            tables.contains(&expected.to_string()),
            "Missing table: {}",
            expected
        );
    }
}

#[test]
fn test_migration_idempotency() {
    let mut conn = setup_test_db();
    rankvault_store::migrations::apply_migrations(&mut conn).unwrap();
    rankvault_store::migrations::apply_migrations(&mut conn).unwrap();

    let applied = rankvault_store::migrations::applied_migrations(&conn).unwrap();
    assert_eq!(applied, vec!["001_player_snapshots", "002_ingestion_runs"]);
}

#[test]
fn test_checksum_drift_is_rejected() {
    let mut conn = setup_test_db();
    rankvault_store::migrations::apply_migrations(&mut conn).unwrap();

    conn.execute(
        "UPDATE schema_version SET checksum = 'deadbeef' WHERE migration_id = '001_player_snapshots'",
        [],
    )
    .unwrap();

    let err = rankvault_store::migrations::apply_migrations(&mut conn).unwrap_err();
    assert_eq!(
        err.kind(),
        rankvault_core::ExErrorKind::ConstraintViolation
    );
    assert_eq!(err.entity_id(), Some("001_player_snapshots"));
}

#[test]
fn test_duplicate_rank_rejected_by_schema() {
    let mut conn = setup_test_db();
    rankvault_store::migrations::apply_migrations(&mut conn).unwrap();

    let insert = "INSERT INTO player_snapshots
        (account_id, rank, rating, region, game_mode, snapshot_at)
        VALUES (?1, 1, 9000, 'EU', 'standard', 3600000)";
    conn.execute(insert, ["first"]).unwrap();
    assert!(conn.execute(insert, ["second"]).is_err());
}

#[test]
fn test_run_log_rejects_updates() {
    let mut conn = setup_test_db();
    rankvault_store::migrations::apply_migrations(&mut conn).unwrap();

    conn.execute(
        "INSERT INTO ingestion_runs
            (run_at, rows_written, partitions_processed, game_modes_processed,
             partitions_attempted, status, error_detail, started_at, finished_at)
         VALUES (3600000, 0, '[]', '[]', 6, 'failure', NULL, 3600000, 3600001)",
        [],
    )
    .unwrap();

    let result = conn.execute("UPDATE ingestion_runs SET status = 'success'", []);
    assert!(result.is_err());
}
