//! Interview struct and state machine
//!
//! The Interview aggregate owns the question progression and follow-up
//! counters. Status is private and only changes through the transition
//! methods below; any transition not in the table fails with
//! [`InterviewError::InvalidStateTransition`] and leaves the aggregate
//! untouched.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InterviewError;
use crate::types::{InterviewId, QuestionId};

/// Maximum number of follow-ups per parent question.
pub const MAX_FOLLOW_UPS: u8 = 3;

/// Status of an interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    /// Questions are still being planned
    Planning,
    /// Planned and waiting for the candidate to begin
    Idle,
    /// A main question is in front of the candidate
    Questioning,
    /// An answer is being evaluated
    Evaluating,
    /// A follow-up question is in front of the candidate
    FollowUp,
    /// Finished (terminal state)
    Complete,
    /// Cancelled (terminal state)
    Cancelled,
}

impl InterviewStatus {
    /// Convert to database string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Idle => "idle",
            Self::Questioning => "questioning",
            Self::Evaluating => "evaluating",
            Self::FollowUp => "follow_up",
            Self::Complete => "complete",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse from database string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "planning" => Some(Self::Planning),
            "idle" => Some(Self::Idle),
            "questioning" => Some(Self::Questioning),
            "evaluating" => Some(Self::Evaluating),
            "follow_up" => Some(Self::FollowUp),
            "complete" => Some(Self::Complete),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether this status admits no further transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled)
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`Interview::proceed_to_next_question`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// More questions remain; the interview moved to this one.
    NextQuestion(QuestionId),
    /// The sequence is exhausted; the interview is complete.
    Complete,
}

/// The interview aggregate root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    id: InterviewId,
    status: InterviewStatus,
    question_sequence: Vec<QuestionId>,
    current_question_index: usize,
    current_parent_question_id: Option<QuestionId>,
    current_follow_up_count: u8,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Interview {
    /// Create a new interview in the PLANNING state.
    pub fn new(id: InterviewId, question_sequence: Vec<QuestionId>) -> Self {
        Self {
            id,
            status: InterviewStatus::Planning,
            question_sequence,
            current_question_index: 0,
            current_parent_question_id: None,
            current_follow_up_count: 0,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn id(&self) -> InterviewId {
        self.id
    }

    pub fn status(&self) -> InterviewStatus {
        self.status
    }

    pub fn question_sequence(&self) -> &[QuestionId] {
        &self.question_sequence
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    /// The main question currently in play.
    pub fn current_question_id(&self) -> Option<QuestionId> {
        self.question_sequence.get(self.current_question_index).copied()
    }

    /// Set while inside a follow-up sub-sequence.
    pub fn current_parent_question_id(&self) -> Option<QuestionId> {
        self.current_parent_question_id
    }

    pub fn current_follow_up_count(&self) -> u8 {
        self.current_follow_up_count
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    fn require(&self, from: &[InterviewStatus], to: InterviewStatus) -> Result<(), InterviewError> {
        if from.contains(&self.status) {
            Ok(())
        } else {
            Err(InterviewError::InvalidStateTransition {
                from: self.status,
                to,
            })
        }
    }

    /// PLANNING -> IDLE. Planning is finished and questions are in place.
    pub fn mark_ready(&mut self) -> Result<(), InterviewError> {
        self.require(&[InterviewStatus::Planning], InterviewStatus::Idle)?;
        if self.question_sequence.is_empty() {
            return Err(InterviewError::NoQuestionsPlanned);
        }
        self.status = InterviewStatus::Idle;
        Ok(())
    }

    /// IDLE -> QUESTIONING. Returns the first question.
    pub fn start(&mut self) -> Result<QuestionId, InterviewError> {
        self.require(&[InterviewStatus::Idle], InterviewStatus::Questioning)?;
        self.status = InterviewStatus::Questioning;
        self.started_at = Some(Utc::now());
        tracing::info!(interview = %self.id, "interview started");
        // mark_ready rejects an empty sequence, so index 0 exists
        Ok(self.question_sequence[self.current_question_index])
    }

    /// QUESTIONING -> EVALUATING. An answer to the main question came in.
    pub fn submit_answer(&mut self) -> Result<(), InterviewError> {
        self.require(&[InterviewStatus::Questioning], InterviewStatus::Evaluating)?;
        self.status = InterviewStatus::Evaluating;
        Ok(())
    }

    /// EVALUATING -> FOLLOW_UP. A follow-up question goes out.
    ///
    /// Fails with [`InterviewError::MaxFollowUpsExceeded`] once the
    /// per-question cap is reached. A follow-up for a new parent
    /// question resets the counter to 1; the same parent increments.
    pub fn ask_follow_up(
        &mut self,
        follow_up_id: QuestionId,
        parent_question_id: QuestionId,
    ) -> Result<(), InterviewError> {
        self.require(&[InterviewStatus::Evaluating], InterviewStatus::FollowUp)?;
        if self.current_follow_up_count >= MAX_FOLLOW_UPS {
            return Err(InterviewError::MaxFollowUpsExceeded {
                count: self.current_follow_up_count,
            });
        }
        if self.current_parent_question_id == Some(parent_question_id) {
            self.current_follow_up_count += 1;
        } else {
            self.current_parent_question_id = Some(parent_question_id);
            self.current_follow_up_count = 1;
        }
        self.status = InterviewStatus::FollowUp;
        tracing::debug!(
            interview = %self.id,
            follow_up = %follow_up_id,
            parent = %parent_question_id,
            count = self.current_follow_up_count,
            "follow-up asked"
        );
        Ok(())
    }

    /// FOLLOW_UP -> EVALUATING. Counters unchanged.
    pub fn answer_follow_up(&mut self) -> Result<(), InterviewError> {
        self.require(&[InterviewStatus::FollowUp], InterviewStatus::Evaluating)?;
        self.status = InterviewStatus::Evaluating;
        Ok(())
    }

    /// EVALUATING -> QUESTIONING or EVALUATING -> COMPLETE.
    ///
    /// Unconditionally resets the follow-up counters; advances to the
    /// next main question when one remains, otherwise completes the
    /// interview and stamps `completed_at`.
    pub fn proceed_to_next_question(&mut self) -> Result<Progress, InterviewError> {
        self.require(&[InterviewStatus::Evaluating], InterviewStatus::Questioning)?;
        self.current_parent_question_id = None;
        self.current_follow_up_count = 0;

        if self.current_question_index + 1 < self.question_sequence.len() {
            self.current_question_index += 1;
            self.status = InterviewStatus::Questioning;
            Ok(Progress::NextQuestion(
                self.question_sequence[self.current_question_index],
            ))
        } else {
            self.status = InterviewStatus::Complete;
            self.completed_at = Some(Utc::now());
            tracing::info!(interview = %self.id, "interview complete");
            Ok(Progress::Complete)
        }
    }

    /// Cancel from any non-terminal state.
    ///
    /// Idempotent: cancelling an already-terminal interview is a no-op
    /// that reports the current status.
    pub fn cancel(&mut self) -> InterviewStatus {
        if !self.status.is_terminal() {
            self.status = InterviewStatus::Cancelled;
            self.completed_at = Some(Utc::now());
            tracing::info!(interview = %self.id, "interview cancelled");
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planned(n: usize) -> Interview {
        let seq = (0..n).map(|_| QuestionId::new()).collect();
        Interview::new(InterviewId::new(), seq)
    }

    fn questioning(n: usize) -> Interview {
        let mut interview = planned(n);
        interview.mark_ready().unwrap();
        interview.start().unwrap();
        interview
    }

    #[test]
    fn happy_path_single_question() {
        let mut interview = planned(1);
        assert_eq!(interview.status(), InterviewStatus::Planning);

        interview.mark_ready().unwrap();
        assert_eq!(interview.status(), InterviewStatus::Idle);

        let first = interview.start().unwrap();
        assert_eq!(Some(first), interview.current_question_id());
        assert!(interview.started_at().is_some());

        interview.submit_answer().unwrap();
        assert_eq!(interview.status(), InterviewStatus::Evaluating);

        let progress = interview.proceed_to_next_question().unwrap();
        assert_eq!(progress, Progress::Complete);
        assert_eq!(interview.status(), InterviewStatus::Complete);
        assert!(interview.completed_at().is_some());
    }

    #[test]
    fn proceed_advances_through_sequence() {
        let mut interview = questioning(2);
        let second = interview.question_sequence()[1];

        interview.submit_answer().unwrap();
        let progress = interview.proceed_to_next_question().unwrap();
        assert_eq!(progress, Progress::NextQuestion(second));
        assert_eq!(interview.status(), InterviewStatus::Questioning);
        assert_eq!(interview.current_question_index(), 1);
    }

    #[test]
    fn mark_ready_rejects_empty_sequence() {
        let mut interview = planned(0);
        assert_eq!(
            interview.mark_ready(),
            Err(InterviewError::NoQuestionsPlanned)
        );
        assert_eq!(interview.status(), InterviewStatus::Planning);
    }

    #[test]
    fn follow_up_counter_increments_for_same_parent() {
        let mut interview = questioning(1);
        let parent = interview.current_question_id().unwrap();

        interview.submit_answer().unwrap();
        interview.ask_follow_up(QuestionId::new(), parent).unwrap();
        assert_eq!(interview.current_follow_up_count(), 1);
        assert_eq!(interview.current_parent_question_id(), Some(parent));

        interview.answer_follow_up().unwrap();
        interview.ask_follow_up(QuestionId::new(), parent).unwrap();
        assert_eq!(interview.current_follow_up_count(), 2);

        interview.answer_follow_up().unwrap();
        interview.ask_follow_up(QuestionId::new(), parent).unwrap();
        assert_eq!(interview.current_follow_up_count(), 3);
    }

    #[test]
    fn fourth_follow_up_is_rejected() {
        let mut interview = questioning(1);
        let parent = interview.current_question_id().unwrap();

        interview.submit_answer().unwrap();
        for _ in 0..3 {
            interview.ask_follow_up(QuestionId::new(), parent).unwrap();
            interview.answer_follow_up().unwrap();
        }
        assert_eq!(
            interview.ask_follow_up(QuestionId::new(), parent),
            Err(InterviewError::MaxFollowUpsExceeded { count: 3 })
        );
        // the failed call must not change state
        assert_eq!(interview.status(), InterviewStatus::Evaluating);
        assert_eq!(interview.current_follow_up_count(), 3);
    }

    #[test]
    fn new_parent_resets_counter_to_one() {
        let mut interview = questioning(2);
        let first = interview.current_question_id().unwrap();

        interview.submit_answer().unwrap();
        interview.ask_follow_up(QuestionId::new(), first).unwrap();
        interview.answer_follow_up().unwrap();
        interview.proceed_to_next_question().unwrap();

        let second = interview.current_question_id().unwrap();
        assert_ne!(first, second);
        interview.submit_answer().unwrap();
        interview.ask_follow_up(QuestionId::new(), second).unwrap();
        assert_eq!(interview.current_follow_up_count(), 1);
        assert_eq!(interview.current_parent_question_id(), Some(second));
    }

    #[test]
    fn proceed_resets_counters_unconditionally() {
        let mut interview = questioning(2);
        let parent = interview.current_question_id().unwrap();

        interview.submit_answer().unwrap();
        interview.ask_follow_up(QuestionId::new(), parent).unwrap();
        interview.answer_follow_up().unwrap();
        interview.proceed_to_next_question().unwrap();

        assert_eq!(interview.current_parent_question_id(), None);
        assert_eq!(interview.current_follow_up_count(), 0);
    }

    #[test]
    fn transition_closure_rejects_everything_not_in_the_table() {
        // Every (state, method) pair outside the table must fail with
        // InvalidStateTransition and leave the status unchanged.
        let parent = QuestionId::new();
        let methods: Vec<(
            &str,
            Box<dyn Fn(&mut Interview) -> Result<(), InterviewError>>,
        )> = vec![
            ("mark_ready", Box::new(|i: &mut Interview| i.mark_ready())),
            ("start", Box::new(|i: &mut Interview| i.start().map(|_| ()))),
            (
                "submit_answer",
                Box::new(|i: &mut Interview| i.submit_answer()),
            ),
            (
                "ask_follow_up",
                Box::new(move |i: &mut Interview| i.ask_follow_up(QuestionId::new(), parent)),
            ),
            (
                "answer_follow_up",
                Box::new(|i: &mut Interview| i.answer_follow_up()),
            ),
            (
                "proceed",
                Box::new(|i: &mut Interview| i.proceed_to_next_question().map(|_| ())),
            ),
        ];
        let allowed: &[(&str, InterviewStatus)] = &[
            ("mark_ready", InterviewStatus::Planning),
            ("start", InterviewStatus::Idle),
            ("submit_answer", InterviewStatus::Questioning),
            ("ask_follow_up", InterviewStatus::Evaluating),
            ("answer_follow_up", InterviewStatus::FollowUp),
            ("proceed", InterviewStatus::Evaluating),
        ];

        for status in [
            InterviewStatus::Planning,
            InterviewStatus::Idle,
            InterviewStatus::Questioning,
            InterviewStatus::Evaluating,
            InterviewStatus::FollowUp,
            InterviewStatus::Complete,
            InterviewStatus::Cancelled,
        ] {
            for (name, method) in &methods {
                if allowed.contains(&(*name, status)) {
                    continue;
                }
                let mut interview = planned(1);
                interview.status = status;
                let result = method(&mut interview);
                assert!(
                    matches!(
                        result,
                        Err(InterviewError::InvalidStateTransition { .. })
                    ),
                    "{name} from {status} should be rejected, got {result:?}"
                );
                assert_eq!(interview.status(), status, "{name} mutated {status}");
            }
        }
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut interview = questioning(1);
        assert_eq!(interview.cancel(), InterviewStatus::Cancelled);
        assert_eq!(interview.cancel(), InterviewStatus::Cancelled);
    }

    #[test]
    fn cancel_on_complete_reports_complete() {
        let mut interview = questioning(1);
        interview.submit_answer().unwrap();
        interview.proceed_to_next_question().unwrap();
        assert_eq!(interview.cancel(), InterviewStatus::Complete);
        assert_eq!(interview.status(), InterviewStatus::Complete);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            InterviewStatus::Planning,
            InterviewStatus::Idle,
            InterviewStatus::Questioning,
            InterviewStatus::Evaluating,
            InterviewStatus::FollowUp,
            InterviewStatus::Complete,
            InterviewStatus::Cancelled,
        ] {
            assert_eq!(InterviewStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(InterviewStatus::parse("bogus"), None);
    }
}
