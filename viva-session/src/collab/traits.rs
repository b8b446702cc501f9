//! Evaluator and FollowUpGenerator traits
//!
//! The engine never constructs prompts; these traits hand structured
//! context to an external LLM integration and consume its structured
//! result. Implementations own their own timeouts - a timeout surfaces
//! as a retryable [`CollaboratorError`] and the orchestrator commits
//! nothing until the call succeeds.

use async_trait::async_trait;

use viva_core::{AnswerAssessment, ConceptGap, Evaluation, Question, QuestionId};

use crate::error::CollaboratorError;

/// Context for one evaluation call.
#[derive(Debug)]
pub struct EvaluationRequest<'a> {
    /// The question actually asked (a follow-up's own id for attempts 2-3)
    pub question_id: QuestionId,
    pub question_text: &'a str,
    pub answer_text: &'a str,
    pub attempt_number: u8,
    /// Prior evaluated attempts for the same parent question, in order
    pub prior_attempts: &'a [Evaluation],
}

/// External LLM that scores one answer.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(
        &self,
        request: EvaluationRequest<'_>,
    ) -> Result<AnswerAssessment, CollaboratorError>;
}

/// External LLM that writes the next follow-up question.
#[async_trait]
pub trait FollowUpGenerator: Send + Sync {
    /// Produce follow-up text targeting the accumulated unresolved
    /// gaps, not just the latest attempt's.
    async fn generate(
        &self,
        parent: &Question,
        cumulative_gaps: &[ConceptGap],
        attempt_order: u8,
    ) -> Result<String, CollaboratorError>;
}
