//! viva-session: async orchestration for viva interviews
//!
//! This crate wires the pure engine in `viva-core` to the outside
//! world:
//!
//! - **Collaborator seams** - [`Evaluator`] and [`FollowUpGenerator`]
//!   traits for the external LLM integration, with deterministic
//!   mocks for tests
//! - **Persistence seam** - [`InterviewStore`] with an in-memory
//!   implementation, [`MemoryStore`]
//! - **Orchestration** - the stateless [`SessionOrchestrator`]:
//!   load-mutate-save per event, per-interview ordering via
//!   [`InterviewLocks`], bounded retry on collaborator failures, and
//!   summary aggregation on completion
//!
//! The orchestrator is the only place recovery decisions are made;
//! the core engine fails loudly and deterministically, and no
//! transition is committed under partial or uncertain data.

pub mod collab;
pub mod error;
pub mod locks;
pub mod orchestrator;
pub mod store;

// Re-export key types for convenience
pub use collab::{CannedGenerator, EvaluationRequest, Evaluator, FollowUpGenerator, ScriptedEvaluator};
pub use error::{CollaboratorError, StoreError, VivaError};
pub use locks::InterviewLocks;
pub use orchestrator::{AnswerOutcome, NextAction, SessionOrchestrator, SessionSnapshot};
pub use store::{InterviewStore, MemoryStore};
