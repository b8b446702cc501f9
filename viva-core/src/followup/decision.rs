//! Decides, after each evaluated answer, whether to probe deeper.
//!
//! Break conditions are checked in a fixed order; the first that holds
//! stops the follow-up loop and returns control to the main question
//! sequence. The decision is an explicit record, not a scattered set
//! of booleans, so the orchestrator and tests see the same thing.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::evaluation::Evaluation;
use crate::interview::MAX_FOLLOW_UPS;
use crate::scoring::MAX_ATTEMPTS;
use crate::scoring::gaps::{ConceptGap, GapTracker};

/// Outcome of one follow-up decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpDecision {
    pub needs_follow_up: bool,
    /// Human-readable break condition or gap count.
    pub reason: String,
    /// Follow-ups already asked for this parent question.
    pub follow_up_count: u8,
    /// Unresolved gaps accumulated across all attempts so far, in
    /// order of first identification. This set, not just the latest
    /// attempt's gaps, is what the follow-up generator receives so
    /// intermittently-missed gaps are not forgotten.
    pub cumulative_gaps: Vec<ConceptGap>,
}

/// Applies the break conditions for one parent question.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    quality_threshold: f64,
}

impl DecisionEngine {
    pub fn new(quality_threshold: f64) -> Self {
        Self { quality_threshold }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.quality_threshold)
    }

    /// Decide whether another follow-up is warranted.
    ///
    /// `tracker` must already have the latest attempt's flagged gaps
    /// recorded. Conditions, first match wins:
    ///
    /// 1. attempt or follow-up cap reached. The attempt guard is what
    ///    upholds the penalty table's contract that no fourth attempt
    ///    is ever requested; the counter guard is the state machine's
    ///    own cap.
    /// 2. similarity at or above the quality threshold
    /// 3. no unresolved gaps
    /// 4. otherwise, probe the unresolved gaps
    pub fn decide(
        &self,
        follow_up_count: u8,
        latest: &Evaluation,
        tracker: &GapTracker,
    ) -> FollowUpDecision {
        let cumulative_gaps: Vec<ConceptGap> = tracker.unresolved().cloned().collect();

        let (needs_follow_up, reason) = if latest.attempt_number >= MAX_ATTEMPTS
            || follow_up_count >= MAX_FOLLOW_UPS
        {
            (false, "max attempts reached".to_string())
        } else if latest
            .similarity_score
            .is_some_and(|s| s >= self.quality_threshold)
        {
            (false, "quality threshold met".to_string())
        } else if cumulative_gaps.is_empty() {
            (false, "no gaps detected".to_string())
        } else {
            let n = cumulative_gaps.len();
            (true, format!("{n} unresolved concept gap(s)"))
        };

        tracing::debug!(
            question = %latest.question_id,
            follow_up_count,
            needs_follow_up,
            reason,
            "follow-up decision"
        );

        FollowUpDecision {
            needs_follow_up,
            reason,
            follow_up_count,
            cumulative_gaps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::AnswerAssessment;
    use crate::scoring::gaps::{FlaggedGap, GapSeverity};
    use crate::types::{AnswerId, QuestionId};

    fn engine() -> DecisionEngine {
        DecisionEngine::new(0.8)
    }

    fn latest(attempt: u8, similarity: Option<f64>, gaps: Vec<FlaggedGap>) -> Evaluation {
        let assessment = AnswerAssessment {
            raw_score: 60.0,
            similarity_score: similarity,
            voice_score: None,
            completeness: 0.7,
            relevance: 0.8,
            gaps,
            feedback: String::new(),
        };
        Evaluation::from_assessment(AnswerId::new(), QuestionId::new(), attempt, None, &assessment)
            .unwrap()
    }

    fn tracker_for(eval: &Evaluation) -> GapTracker {
        let mut tracker = GapTracker::new();
        tracker.record_attempt(eval.attempt_number, &eval.flagged_gaps());
        tracker
    }

    #[test]
    fn max_attempts_takes_precedence_over_everything() {
        // third attempt, poor similarity, gaps present: still stop
        let eval = latest(
            3,
            Some(0.5),
            vec![FlaggedGap::new("acid", GapSeverity::Major)],
        );
        let decision = engine().decide(2, &eval, &tracker_for(&eval));
        assert!(!decision.needs_follow_up);
        assert_eq!(decision.reason, "max attempts reached");
        assert_eq!(decision.follow_up_count, 2);
    }

    #[test]
    fn follow_up_counter_cap_also_stops_probing() {
        let eval = latest(
            2,
            Some(0.5),
            vec![FlaggedGap::new("acid", GapSeverity::Major)],
        );
        let decision = engine().decide(3, &eval, &tracker_for(&eval));
        assert!(!decision.needs_follow_up);
        assert_eq!(decision.reason, "max attempts reached");
        assert_eq!(decision.follow_up_count, 3);
    }

    #[test]
    fn quality_threshold_stops_early() {
        // attempt 2 of 3, but similarity 0.82 >= 0.8
        let eval = latest(
            2,
            Some(0.82),
            vec![FlaggedGap::new("acid", GapSeverity::Minor)],
        );
        let decision = engine().decide(1, &eval, &tracker_for(&eval));
        assert!(!decision.needs_follow_up);
        assert_eq!(decision.reason, "quality threshold met");
    }

    #[test]
    fn no_gaps_means_no_follow_up() {
        let eval = latest(1, Some(0.6), vec![]);
        let decision = engine().decide(0, &eval, &tracker_for(&eval));
        assert!(!decision.needs_follow_up);
        assert_eq!(decision.reason, "no gaps detected");
        assert!(decision.cumulative_gaps.is_empty());
    }

    #[test]
    fn unresolved_gaps_trigger_a_follow_up() {
        let eval = latest(
            1,
            Some(0.6),
            vec![
                FlaggedGap::new("indexing", GapSeverity::Major),
                FlaggedGap::new("acid", GapSeverity::Moderate),
            ],
        );
        let decision = engine().decide(0, &eval, &tracker_for(&eval));
        assert!(decision.needs_follow_up);
        assert_eq!(decision.reason, "2 unresolved concept gap(s)");
        assert_eq!(decision.cumulative_gaps.len(), 2);
    }

    #[test]
    fn missing_similarity_does_not_satisfy_the_threshold() {
        let eval = latest(1, None, vec![FlaggedGap::new("acid", GapSeverity::Minor)]);
        let decision = engine().decide(0, &eval, &tracker_for(&eval));
        assert!(decision.needs_follow_up);
    }

    #[test]
    fn cumulative_gaps_carry_prior_unresolved_concepts() {
        // gap from attempt 1 persists; attempt 2 adds a new one
        let mut tracker = GapTracker::new();
        tracker.record_attempt(1, &[FlaggedGap::new("indexing", GapSeverity::Major)]);
        let eval = latest(
            2,
            Some(0.4),
            vec![
                FlaggedGap::new("indexing", GapSeverity::Major),
                FlaggedGap::new("replication", GapSeverity::Minor),
            ],
        );
        tracker.record_attempt(2, &eval.flagged_gaps());

        let decision = engine().decide(1, &eval, &tracker);
        assert!(decision.needs_follow_up);
        let concepts: Vec<_> = decision
            .cumulative_gaps
            .iter()
            .map(|g| g.concept.as_str())
            .collect();
        assert_eq!(concepts, ["indexing", "replication"]);
    }
}
