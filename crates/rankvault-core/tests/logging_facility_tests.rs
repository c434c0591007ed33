#![allow(clippy::unwrap_used, clippy::expect_used)]

use rankvault_core::errors::{ExError, ExErrorKind, SnapshotInvariantError};
use rankvault_core::logging_facility::test_capture::init_test_capture;
use rankvault_core::{log_op_end, log_op_error, log_op_start};
use rankvault_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let starts: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .collect();
    assert_eq!(starts.len(), 1);
}

#[test]
fn test_log_op_end_macro_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42u64);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].fields.get(FIELD_DURATION_MS), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = ExError::new(ExErrorKind::Persistence).with_message("locked");
    log_op_error!(op_name, err, duration_ms = 10u64);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(
        events[0].fields.get(FIELD_ERR_CODE),
        Some(&"ERR_PERSISTENCE".to_string())
    );
}

#[test]
fn test_log_op_error_converts_domain_errors() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    log_op_error!(
        op_name,
        SnapshotInvariantError::DuplicateRank { rank: 3 },
        duration_ms = 1u64
    );

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let event = &capture.events_for_op(op_name)[0];
    assert_eq!(
        event.fields.get(FIELD_ERR_CODE),
        Some(&"ERR_INVARIANT_VIOLATION".to_string())
    );
}

#[test]
fn test_log_macros_with_extra_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_fields_unique_5";

    log_op_start!(op_name, region = "EU", game_mode = "duos");
    log_op_end!(op_name, duration_ms = 5u64, rows = 128u64);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].fields.get("region"), Some(&"EU".to_string()));
    assert_eq!(events[1].fields.get("rows"), Some(&"128".to_string()));
    assert!(events[0]
        .component
        .as_deref()
        .is_some_and(|c| c.contains("logging_facility_tests")));
}
