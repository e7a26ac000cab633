//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the hierarchy rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed record at line {line}: missing {field}")]
    MalformedRecord { line: u64, field: &'static str },

    #[error("person listed twice with different supervisors: {name}")]
    DuplicatePerson { name: String },

    #[error("cycle detected in hierarchy: {0}")]
    CycleDetected(String),

    #[error("no top-level supervisor found (every supervisor reports to someone)")]
    NoTopLevel,

    #[error("person name collides with synthetic root label: {0}")]
    SentinelCollision(String),

    #[error("hierarchy is empty: no records")]
    EmptyHierarchy,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
