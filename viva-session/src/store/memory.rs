//! In-memory InterviewStore implementation
//!
//! Backs tests and single-process deployments. Thread-safe via
//! RwLocks; each method is one atomic operation on one aggregate,
//! matching the per-aggregate transaction contract.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use viva_core::{
    AnswerId, Evaluation, FollowUpQuestion, Interview, InterviewId, Question, QuestionId,
};

use crate::error::StoreError;

use super::InterviewStore;

/// In-memory implementation of [`InterviewStore`].
#[derive(Default)]
pub struct MemoryStore {
    interviews: RwLock<HashMap<InterviewId, Interview>>,
    questions: RwLock<HashMap<QuestionId, Question>>,
    /// Evaluations keyed by parent question id
    evaluations: RwLock<HashMap<QuestionId, Vec<Evaluation>>>,
    follow_ups: RwLock<HashMap<QuestionId, Vec<FollowUpQuestion>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an interview and its planned questions in one call.
    pub async fn seed(&self, interview: Interview, questions: Vec<Question>) {
        self.questions
            .write()
            .await
            .extend(questions.into_iter().map(|q| (q.id, q)));
        self.interviews
            .write()
            .await
            .insert(interview.id(), interview);
    }
}

#[async_trait]
impl InterviewStore for MemoryStore {
    async fn load_interview(&self, id: InterviewId) -> Result<Interview, StoreError> {
        self.interviews
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: "interview",
                id: id.to_string(),
            })
    }

    async fn save_interview(&self, interview: &Interview) -> Result<(), StoreError> {
        self.interviews
            .write()
            .await
            .insert(interview.id(), interview.clone());
        Ok(())
    }

    async fn load_question(&self, id: QuestionId) -> Result<Question, StoreError> {
        self.questions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: "question",
                id: id.to_string(),
            })
    }

    async fn save_question(&self, question: &Question) -> Result<(), StoreError> {
        self.questions
            .write()
            .await
            .insert(question.id, question.clone());
        Ok(())
    }

    async fn load_evaluations(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<Evaluation>, StoreError> {
        let mut evaluations = self
            .evaluations
            .read()
            .await
            .get(&question_id)
            .cloned()
            .unwrap_or_default();
        evaluations.sort_by_key(|e| e.attempt_number);
        Ok(evaluations)
    }

    async fn save_evaluation(&self, evaluation: &Evaluation) -> Result<(), StoreError> {
        self.evaluations
            .write()
            .await
            .entry(evaluation.question_id)
            .or_default()
            .push(evaluation.clone());
        Ok(())
    }

    async fn find_evaluation_by_answer(
        &self,
        answer_id: AnswerId,
    ) -> Result<Option<Evaluation>, StoreError> {
        Ok(self
            .evaluations
            .read()
            .await
            .values()
            .flatten()
            .find(|e| e.answer_id == answer_id)
            .cloned())
    }

    async fn load_follow_ups(
        &self,
        parent_question_id: QuestionId,
    ) -> Result<Vec<FollowUpQuestion>, StoreError> {
        let mut follow_ups = self
            .follow_ups
            .read()
            .await
            .get(&parent_question_id)
            .cloned()
            .unwrap_or_default();
        follow_ups.sort_by_key(|f| f.order_in_sequence);
        Ok(follow_ups)
    }

    async fn save_follow_up(&self, follow_up: &FollowUpQuestion) -> Result<(), StoreError> {
        self.follow_ups
            .write()
            .await
            .entry(follow_up.parent_question_id)
            .or_default()
            .push(follow_up.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_interview_is_not_found() {
        let store = MemoryStore::new();
        let err = store.load_interview(InterviewId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "interview", .. }));
    }

    #[tokio::test]
    async fn seed_makes_interview_and_questions_loadable() {
        let store = MemoryStore::new();
        let question = Question::new(QuestionId::new(), "Explain ACID.");
        let interview = Interview::new(InterviewId::new(), vec![question.id]);
        let id = interview.id();

        store.seed(interview, vec![question.clone()]).await;

        assert_eq!(store.load_interview(id).await.unwrap().id(), id);
        assert_eq!(store.load_question(question.id).await.unwrap(), question);
    }

    #[tokio::test]
    async fn evaluations_come_back_in_attempt_order() {
        use viva_core::AnswerAssessment;

        let store = MemoryStore::new();
        let question_id = QuestionId::new();
        let assessment = AnswerAssessment {
            raw_score: 70.0,
            similarity_score: None,
            voice_score: None,
            completeness: 0.5,
            relevance: 0.5,
            gaps: vec![],
            feedback: String::new(),
        };
        let second =
            Evaluation::from_assessment(AnswerId::new(), question_id, 2, None, &assessment)
                .unwrap();
        let first =
            Evaluation::from_assessment(AnswerId::new(), question_id, 1, None, &assessment)
                .unwrap();

        store.save_evaluation(&second).await.unwrap();
        store.save_evaluation(&first).await.unwrap();

        let loaded = store.load_evaluations(question_id).await.unwrap();
        assert_eq!(loaded[0].attempt_number, 1);
        assert_eq!(loaded[1].attempt_number, 2);

        let found = store
            .find_evaluation_by_answer(first.answer_id)
            .await
            .unwrap();
        assert_eq!(found.map(|e| e.id), Some(first.id));
    }
}
