//! Structured logging for RankVault
//!
//! Engine entry points (`run_ingestion`, `query_leaderboard`) bracket their
//! work with `log_op_start!` / `log_op_end!`, or `log_op_error!` on failure,
//! carrying a `run_id` or `request_id`. Store code below them only emits
//! `tracing::debug!`.
//!
//! Binaries call [`init`] once with a [`Profile`]; tests install the
//! in-memory capture layer with [`init_test_capture`] instead.
//!
//! ```rust
//! use rankvault_core::logging_facility::{init, Profile};
//!
//! init(Profile::Production);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
