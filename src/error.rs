//! Error types.
//!
//! Every failure the solver can report is a [`MkpError`]. Invalid input is
//! rejected before any optimization work starts; nothing is retried.

/// Errors raised while building an instance, validating a configuration,
/// or evaluating an individual.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MkpError {
    /// The problem data violates the model hypotheses (dimensions,
    /// non-positive profit or capacity, an item that consumes nothing).
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// A solver parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An individual reached the evaluator without being repaired.
    ///
    /// Signals a programming error rather than bad input.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MkpError>;
