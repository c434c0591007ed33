//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_RUN_ID: &str = "run_id";

// Partition identifiers
pub const FIELD_REGION: &str = "region";
pub const FIELD_GAME_MODE: &str = "game_mode";
pub const FIELD_SNAPSHOT_AT: &str = "snapshot_at";

// Collection sizes
pub const FIELD_ROWS: &str = "rows";
pub const FIELD_TOTAL_COUNT: &str = "total_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
