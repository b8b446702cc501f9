//! Error types for viva-core

use thiserror::Error;

use crate::interview::InterviewStatus;

/// Errors raised by the interview state machine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterviewError {
    /// The requested transition is not in the transition table.
    ///
    /// Carries both the current state and the attempted target so
    /// callers can show a precise diagnostic.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: InterviewStatus,
        to: InterviewStatus,
    },

    /// A fourth follow-up was requested for the same parent question.
    #[error("maximum follow-ups reached for this question ({count})")]
    MaxFollowUpsExceeded { count: u8 },

    /// The question sequence is empty; the interview cannot start.
    #[error("interview has no planned questions")]
    NoQuestionsPlanned,
}

/// Errors raised by the scoring components.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// Attempt numbers outside 1..=3 violate the follow-up cap contract.
    #[error("invalid attempt number {0}: attempts are limited to 1-3")]
    InvalidAttempt(u8),

    /// A score or ratio reported by the evaluator is out of range.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    /// The combiner was handed evaluations of the wrong kind.
    #[error("expected a {expected} evaluation, got {actual}")]
    WrongKind {
        expected: &'static str,
        actual: &'static str,
    },

    /// The combiner was handed evaluations for different questions.
    #[error("evaluations belong to different questions")]
    QuestionMismatch,

    /// More follow-up evaluations than the cap allows.
    #[error("too many follow-up evaluations: {0} (max 2)")]
    TooManyFollowUps(usize),
}

/// Errors raised while loading or validating engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
