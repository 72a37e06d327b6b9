//! Error types for the grammar analysis core.

use thiserror::Error;

/// Errors raised by the grammar core.
///
/// All of these are hard failures: the core never retries and never
/// partially applies a mutation before returning `Err`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("symbol `{0}` is already registered as a non-terminal and cannot be added as a terminal")]
    ClassificationConflict(String),

    #[error("symbol `{0}` is not registered in this grammar")]
    UnknownSymbol(String),

    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("symbol `{0}` is already registered")]
    AlreadyRegistered(String),
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, GrammarError>;
