//! External LLM collaborator seams.

mod mock;
mod traits;

pub use mock::{CannedGenerator, ScriptedEvaluator};
pub use traits::{EvaluationRequest, Evaluator, FollowUpGenerator};
