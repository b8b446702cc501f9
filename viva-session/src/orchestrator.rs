//! Stateless session orchestrator
//!
//! The orchestrator holds no interview-specific state across events.
//! Each inbound event reloads the aggregate, performs exactly one
//! state transition on a working copy, calls collaborators, and only
//! then persists - so a dropped session or failed LLM call never
//! leaves stale or half-committed state behind. A per-interview lock
//! keeps events for one interview strictly in arrival order.

use std::sync::Arc;

use viva_core::scoring::{GapTracker, combine};
use viva_core::{
    AnswerAssessment, AnswerId, ConceptGap, DecisionEngine, EngineConfig, Evaluation,
    EvaluationKind, FollowUpQuestion, Interview, InterviewError, InterviewId, InterviewStatus,
    Progress, Question, QuestionId,
};
use viva_evals::{InterviewSummary, SummaryAggregator};

use crate::collab::{EvaluationRequest, Evaluator, FollowUpGenerator};
use crate::error::VivaError;
use crate::locks::InterviewLocks;
use crate::store::InterviewStore;

/// Read-only recovery/debug view of one interview.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionSnapshot {
    pub status: InterviewStatus,
    pub current_question_index: usize,
    pub follow_up_count: u8,
}

/// What the caller should do after an answer was evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum NextAction {
    /// Put this follow-up in front of the candidate
    FollowUp(FollowUpQuestion),
    /// Move on to this main question
    NextQuestion(Question),
    /// The interview finished; here is the report
    Complete(Box<InterviewSummary>),
}

/// Result of one handled answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub evaluation: Evaluation,
    pub next: NextAction,
}

/// Coordinates one interview session per inbound event.
pub struct SessionOrchestrator {
    store: Arc<dyn InterviewStore>,
    evaluator: Arc<dyn Evaluator>,
    generator: Arc<dyn FollowUpGenerator>,
    config: EngineConfig,
    decisions: DecisionEngine,
    aggregator: SummaryAggregator,
    locks: InterviewLocks,
}

impl SessionOrchestrator {
    pub fn new(
        store: Arc<dyn InterviewStore>,
        evaluator: Arc<dyn Evaluator>,
        generator: Arc<dyn FollowUpGenerator>,
        config: EngineConfig,
    ) -> Self {
        let decisions = DecisionEngine::from_config(&config);
        let aggregator = SummaryAggregator::new(config.clone());
        Self {
            store,
            evaluator,
            generator,
            config,
            decisions,
            aggregator,
            locks: InterviewLocks::new(),
        }
    }

    /// Begin the interview and return its first question.
    pub async fn start_session(&self, interview_id: InterviewId) -> Result<Question, VivaError> {
        let _guard = self.locks.acquire(interview_id).await;
        let mut interview = self.store.load_interview(interview_id).await?;
        let first = interview.start()?;
        let question = self.store.load_question(first).await?;
        self.store.save_interview(&interview).await?;
        Ok(question)
    }

    /// Evaluate one submitted answer and drive the next transition.
    ///
    /// `answer_id` is caller-supplied: resubmitting the same answer
    /// after a lost acknowledgement replays the stored outcome instead
    /// of evaluating again, so attempt counters never double-increment.
    pub async fn handle_answer(
        &self,
        interview_id: InterviewId,
        question_id: QuestionId,
        answer_id: AnswerId,
        answer_text: &str,
    ) -> Result<AnswerOutcome, VivaError> {
        let _guard = self.locks.acquire(interview_id).await;
        let mut interview = self.store.load_interview(interview_id).await?;

        if let Some(existing) = self.store.find_evaluation_by_answer(answer_id).await? {
            tracing::info!(
                interview = %interview_id,
                answer = %answer_id,
                "duplicate answer submission; replaying stored outcome"
            );
            return self.replay_outcome(&interview, existing).await;
        }

        // Resolve which question is being answered and transition the
        // working copy; nothing is persisted until collaborators succeed.
        let (parent_id, asked_text, attempt_number) = match interview.status() {
            InterviewStatus::Questioning => {
                let expected = interview.current_question_id();
                if expected != Some(question_id) {
                    return Err(VivaError::UnexpectedQuestion {
                        expected,
                        got: question_id,
                    });
                }
                interview.submit_answer()?;
                let question = self.store.load_question(question_id).await?;
                (question_id, question.text, 1)
            }
            InterviewStatus::FollowUp => {
                let parent_id = interview.current_parent_question_id().ok_or_else(|| {
                    VivaError::InvariantViolated(
                        "follow-up state without a parent question".into(),
                    )
                })?;
                let pending = self
                    .store
                    .load_follow_ups(parent_id)
                    .await?
                    .into_iter()
                    .find(|f| f.order_in_sequence == interview.current_follow_up_count())
                    .ok_or_else(|| {
                        VivaError::InvariantViolated(
                            "follow-up state without a pending follow-up question".into(),
                        )
                    })?;
                if pending.id != question_id {
                    return Err(VivaError::UnexpectedQuestion {
                        expected: Some(pending.id),
                        got: question_id,
                    });
                }
                interview.answer_follow_up()?;
                (parent_id, pending.text, interview.current_follow_up_count() + 1)
            }
            status => {
                return Err(InterviewError::InvalidStateTransition {
                    from: status,
                    to: InterviewStatus::Evaluating,
                }
                .into());
            }
        };

        let prior: Vec<Evaluation> = self
            .store
            .load_evaluations(parent_id)
            .await?
            .into_iter()
            .filter(|e| e.kind != EvaluationKind::Combined)
            .collect();

        let assessment = self
            .evaluate_with_retry(question_id, &asked_text, answer_text, attempt_number, &prior)
            .await?;

        let parent_evaluation_id = prior
            .iter()
            .find(|e| e.kind == EvaluationKind::Parent)
            .map(|e| e.id);
        let evaluation = Evaluation::from_assessment(
            answer_id,
            parent_id,
            attempt_number,
            parent_evaluation_id,
            &assessment,
        )?;

        let flagged: Vec<(u8, Vec<_>)> = prior
            .iter()
            .map(|e| (e.attempt_number, e.flagged_gaps()))
            .collect();
        let mut tracker =
            GapTracker::replay(flagged.iter().map(|(attempt, f)| (*attempt, f.as_slice())));
        tracker.record_attempt(evaluation.attempt_number, &evaluation.flagged_gaps());

        let decision =
            self.decisions
                .decide(interview.current_follow_up_count(), &evaluation, &tracker);

        let next = if decision.needs_follow_up {
            let parent_question = self.store.load_question(parent_id).await?;
            let order = interview.current_follow_up_count() + 1;
            let text = self
                .generate_with_retry(&parent_question, &decision.cumulative_gaps, order)
                .await?;
            let follow_up = FollowUpQuestion {
                id: QuestionId::new(),
                parent_question_id: parent_id,
                order_in_sequence: order,
                text,
                targeted_gaps: decision
                    .cumulative_gaps
                    .iter()
                    .map(|g| g.concept.clone())
                    .collect(),
            };
            interview.ask_follow_up(follow_up.id, parent_id)?;

            self.store.save_evaluation(&evaluation).await?;
            self.store.save_follow_up(&follow_up).await?;
            self.store.save_interview(&interview).await?;
            NextAction::FollowUp(follow_up)
        } else {
            tracing::info!(
                interview = %interview_id,
                question = %parent_id,
                reason = %decision.reason,
                "probing finished"
            );
            self.store.save_evaluation(&evaluation).await?;
            self.save_combined_if_probed(&prior, &evaluation).await?;

            let progress = interview.proceed_to_next_question()?;
            self.store.save_interview(&interview).await?;
            match progress {
                Progress::NextQuestion(next_id) => {
                    NextAction::NextQuestion(self.store.load_question(next_id).await?)
                }
                Progress::Complete => {
                    NextAction::Complete(Box::new(self.build_summary(&interview).await?))
                }
            }
        };

        Ok(AnswerOutcome { evaluation, next })
    }

    /// Cancel from any non-terminal state; a no-op on terminal ones.
    pub async fn cancel_session(
        &self,
        interview_id: InterviewId,
    ) -> Result<InterviewStatus, VivaError> {
        let _guard = self.locks.acquire(interview_id).await;
        let mut interview = self.store.load_interview(interview_id).await?;
        let status = interview.cancel();
        self.store.save_interview(&interview).await?;
        Ok(status)
    }

    /// Read-only view, safe to call concurrently with event handling.
    pub async fn snapshot(&self, interview_id: InterviewId) -> Result<SessionSnapshot, VivaError> {
        let interview = self.store.load_interview(interview_id).await?;
        Ok(SessionSnapshot {
            status: interview.status(),
            current_question_index: interview.current_question_index(),
            follow_up_count: interview.current_follow_up_count(),
        })
    }

    /// Derive and store the COMBINED record once probing of a parent
    /// question ends with follow-up evaluations on file.
    async fn save_combined_if_probed(
        &self,
        prior: &[Evaluation],
        latest: &Evaluation,
    ) -> Result<(), VivaError> {
        let follow_ups: Vec<Evaluation> = prior
            .iter()
            .chain(std::iter::once(latest))
            .filter(|e| e.kind == EvaluationKind::FollowUp)
            .cloned()
            .collect();
        if follow_ups.is_empty() {
            return Ok(());
        }
        let parent = prior
            .iter()
            .chain(std::iter::once(latest))
            .find(|e| e.kind == EvaluationKind::Parent)
            .ok_or_else(|| {
                VivaError::InvariantViolated(
                    "follow-up evaluations without a parent evaluation".into(),
                )
            })?;
        let combined = combine(parent, &follow_ups)?;
        self.store.save_evaluation(&combined).await?;
        Ok(())
    }

    async fn build_summary(&self, interview: &Interview) -> Result<InterviewSummary, VivaError> {
        let mut evaluations = Vec::new();
        for &question_id in interview.question_sequence() {
            evaluations.extend(self.store.load_evaluations(question_id).await?);
        }
        Ok(self.aggregator.build(interview, &evaluations))
    }

    /// Rebuild the outcome of an already-processed answer from stored
    /// state, without touching collaborators or counters.
    async fn replay_outcome(
        &self,
        interview: &Interview,
        evaluation: Evaluation,
    ) -> Result<AnswerOutcome, VivaError> {
        let next = match interview.status() {
            InterviewStatus::FollowUp => {
                let parent_id = interview.current_parent_question_id().ok_or_else(|| {
                    VivaError::InvariantViolated(
                        "follow-up state without a parent question".into(),
                    )
                })?;
                let pending = self
                    .store
                    .load_follow_ups(parent_id)
                    .await?
                    .into_iter()
                    .find(|f| f.order_in_sequence == interview.current_follow_up_count())
                    .ok_or_else(|| {
                        VivaError::InvariantViolated(
                            "follow-up state without a pending follow-up question".into(),
                        )
                    })?;
                NextAction::FollowUp(pending)
            }
            InterviewStatus::Questioning => {
                let current = interview.current_question_id().ok_or_else(|| {
                    VivaError::InvariantViolated(
                        "questioning state without a current question".into(),
                    )
                })?;
                NextAction::NextQuestion(self.store.load_question(current).await?)
            }
            InterviewStatus::Complete => {
                NextAction::Complete(Box::new(self.build_summary(interview).await?))
            }
            status => {
                return Err(VivaError::InvariantViolated(format!(
                    "stored evaluation for an interview in {status} state"
                )));
            }
        };
        Ok(AnswerOutcome { evaluation, next })
    }

    async fn evaluate_with_retry(
        &self,
        question_id: QuestionId,
        question_text: &str,
        answer_text: &str,
        attempt_number: u8,
        prior_attempts: &[Evaluation],
    ) -> Result<AnswerAssessment, VivaError> {
        let mut retries = 0;
        loop {
            let request = EvaluationRequest {
                question_id,
                question_text,
                answer_text,
                attempt_number,
                prior_attempts,
            };
            match self.evaluator.evaluate(request).await {
                Ok(assessment) => return Ok(assessment),
                Err(e) if e.is_retryable() && retries < self.config.max_collaborator_retries => {
                    retries += 1;
                    tracing::warn!(error = %e, retry = retries, "evaluator failed; retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn generate_with_retry(
        &self,
        parent: &Question,
        cumulative_gaps: &[ConceptGap],
        attempt_order: u8,
    ) -> Result<String, VivaError> {
        let mut retries = 0;
        loop {
            match self
                .generator
                .generate(parent, cumulative_gaps, attempt_order)
                .await
            {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && retries < self.config.max_collaborator_retries => {
                    retries += 1;
                    tracing::warn!(error = %e, retry = retries, "generator failed; retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
