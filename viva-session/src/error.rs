//! Error types for viva-session

use thiserror::Error;

use viva_core::{InterviewError, QuestionId, ScoringError};

/// Top-level error type for session orchestration.
#[derive(Error, Debug)]
pub enum VivaError {
    #[error("interview error: {0}")]
    Interview(#[from] InterviewError),

    #[error("scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// The submitted question id does not match what the interview is
    /// waiting on - usually a stale client.
    #[error("unexpected question {got}: interview is waiting on {expected:?}")]
    UnexpectedQuestion {
        expected: Option<QuestionId>,
        got: QuestionId,
    },

    /// A loaded aggregate violated one of its own invariants.
    #[error("aggregate invariant violated: {0}")]
    InvariantViolated(String),
}

impl VivaError {
    /// Whether the caller may retry the same event unchanged.
    ///
    /// Only collaborator failures are retryable; everything else is a
    /// caller bug or missing data and retrying would not help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Collaborator(e) if e.is_retryable())
    }
}

/// Errors from the persistence collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors from the external LLM collaborators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    #[error("{collaborator} call timed out")]
    Timeout { collaborator: &'static str },

    #[error("{collaborator} call failed: {message}")]
    Failed {
        collaborator: &'static str,
        message: String,
        retryable: bool,
    },
}

impl CollaboratorError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Failed { retryable, .. } => *retryable,
        }
    }
}
