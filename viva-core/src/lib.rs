//! viva-core: domain engine for the viva adaptive interview system
//!
//! This crate holds the synchronous, I/O-free heart of viva:
//!
//! - **Interview state machine** - [`Interview`] with an explicit
//!   transition table over [`InterviewStatus`]
//! - **Scoring** - attempt penalties, score clamping, the
//!   [`scoring::GapTracker`], and the evaluation combiner
//! - **Follow-up decisions** - [`followup::DecisionEngine`] applying
//!   the break conditions in fixed order
//! - **Boundary schema** - [`AnswerAssessment`], the validated shape
//!   of an external evaluator's result
//!
//! Async orchestration and persistence seams live in `viva-session`;
//! post-completion analytics in `viva-evals`.
//!
//! # Architecture
//!
//! ```text
//! answer ──► Orchestrator (viva-session)
//!               │ load aggregate
//!               ▼
//!         ┌──────────────────────────────┐
//!         │          viva-core           │
//!         │  Interview ──► GapTracker    │
//!         │      │             │         │
//!         │      ▼             ▼         │
//!         │  penalties ──► DecisionEngine│
//!         └──────────────────────────────┘
//!               │ persist + next event
//!               ▼
//!         COMPLETE ──► SummaryAggregator (viva-evals)
//! ```

pub mod config;
pub mod error;
pub mod evaluation;
pub mod followup;
pub mod interview;
pub mod question;
pub mod scoring;
pub mod types;

// Re-export key types for convenience
pub use config::EngineConfig;
pub use error::{ConfigError, InterviewError, ScoringError};
pub use evaluation::{AnswerAssessment, Evaluation, EvaluationKind};
pub use followup::{DecisionEngine, FollowUpDecision};
pub use interview::{Interview, InterviewStatus, MAX_FOLLOW_UPS, Progress};
pub use question::{FollowUpQuestion, Question};
pub use scoring::{ConceptGap, FlaggedGap, GapSeverity, GapTracker, MAX_ATTEMPTS};
pub use types::{AnswerId, EvaluationId, InterviewId, QuestionId};
