//! Persistence seam for the session engine.
//!
//! Each operation is a per-aggregate transaction; the orchestrator
//! only writes after every collaborator call has succeeded, so a
//! failed event never leaves a partially-mutated interview behind.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use viva_core::{
    AnswerId, Evaluation, FollowUpQuestion, Interview, InterviewId, Question, QuestionId,
};

use crate::error::StoreError;

/// Load/save operations over the engine's aggregates.
#[async_trait]
pub trait InterviewStore: Send + Sync {
    async fn load_interview(&self, id: InterviewId) -> Result<Interview, StoreError>;

    async fn save_interview(&self, interview: &Interview) -> Result<(), StoreError>;

    async fn load_question(&self, id: QuestionId) -> Result<Question, StoreError>;

    async fn save_question(&self, question: &Question) -> Result<(), StoreError>;

    /// All evaluations recorded for a parent question, attempt order.
    async fn load_evaluations(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<Evaluation>, StoreError>;

    async fn save_evaluation(&self, evaluation: &Evaluation) -> Result<(), StoreError>;

    /// Lookup by answer id, used to deduplicate retried submissions.
    async fn find_evaluation_by_answer(
        &self,
        answer_id: AnswerId,
    ) -> Result<Option<Evaluation>, StoreError>;

    /// Follow-up questions generated for a parent, in sequence order.
    async fn load_follow_ups(
        &self,
        parent_question_id: QuestionId,
    ) -> Result<Vec<FollowUpQuestion>, StoreError>;

    async fn save_follow_up(&self, follow_up: &FollowUpQuestion) -> Result<(), StoreError>;
}
