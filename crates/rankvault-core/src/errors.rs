use rankvault_core_types::{RequestId, RunId};
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// handling, testing, and the CLI exit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    ConstraintViolation,

    // Snapshot discipline
    /// Upstream records do not form a well-formed snapshot (ranks not dense, rating increases)
    InvariantViolation,
    /// Upstream returned zero records for a partition
    EmptySnapshot,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    ExternalService,
    Timeout,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::EmptySnapshot => "ERR_EMPTY_SNAPSHOT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, entity, correlation ids) for operators.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    run_id: Option<RunId>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            run_id: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (a partition key, an account id, a migration id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add run ID context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the run ID context, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Ways a fetched ranked list can fail to be a well-formed snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotInvariantError {
    /// No records at all
    #[error("leaderboard is empty")]
    Empty,

    /// A rank of zero was supplied
    #[error("rank 0 is not a valid rank (account {account_id})")]
    ZeroRank { account_id: String },

    /// The same rank appears twice
    #[error("duplicate rank {rank}")]
    DuplicateRank { rank: u32 },

    /// Ranks skip a value
    #[error("rank gap: expected rank {expected}, found {found}")]
    RankGap { expected: u32, found: u32 },

    /// A lower-ranked player has a higher rating than the one above
    #[error("rating increases at rank {rank}: {previous} -> {rating}")]
    RatingIncrease {
        rank: u32,
        previous: i64,
        rating: i64,
    },

    /// Account identifier is blank
    #[error("blank account id at rank {rank}")]
    BlankAccount { rank: u32 },
}

impl From<SnapshotInvariantError> for ExError {
    fn from(err: SnapshotInvariantError) -> Self {
        let kind = match err {
            SnapshotInvariantError::Empty => ExErrorKind::EmptySnapshot,
            _ => ExErrorKind::InvariantViolation,
        };
        ExError::new(kind)
            .with_op("validate_snapshot")
            .with_message(err.to_string())
    }
}
