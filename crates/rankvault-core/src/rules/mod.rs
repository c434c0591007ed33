pub mod invariants;

pub use invariants::{prepare_snapshot, validate_snapshot};
