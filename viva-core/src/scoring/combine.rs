//! Evaluation combiner: one parent plus its follow-ups, merged into a
//! single COMBINED record.
//!
//! `combined_similarity` weights the parent at 0.7 and the follow-up
//! average at 0.3 and represents overall demonstrated competence. The
//! combined `final_score` is the last attempt's score - where the
//! candidate ended up, not an average.

use crate::error::ScoringError;
use crate::evaluation::{Evaluation, EvaluationKind};
use crate::scoring::gaps::GapTracker;
use crate::types::EvaluationId;

/// Parent similarity weight in the combined score.
const PARENT_WEIGHT: f64 = 0.7;
/// Follow-up average weight in the combined score.
const FOLLOW_UP_WEIGHT: f64 = 0.3;

/// Merge a PARENT evaluation with zero to two FOLLOW_UP evaluations.
pub fn combine(
    parent: &Evaluation,
    follow_ups: &[Evaluation],
) -> Result<Evaluation, ScoringError> {
    if parent.kind != EvaluationKind::Parent {
        return Err(ScoringError::WrongKind {
            expected: "parent",
            actual: parent.kind.as_str(),
        });
    }
    if follow_ups.len() > 2 {
        return Err(ScoringError::TooManyFollowUps(follow_ups.len()));
    }
    for follow_up in follow_ups {
        if follow_up.kind != EvaluationKind::FollowUp {
            return Err(ScoringError::WrongKind {
                expected: "follow_up",
                actual: follow_up.kind.as_str(),
            });
        }
        if follow_up.question_id != parent.question_id {
            return Err(ScoringError::QuestionMismatch);
        }
    }

    let mut ordered: Vec<&Evaluation> = follow_ups.iter().collect();
    ordered.sort_by_key(|e| e.attempt_number);

    let combined_similarity = parent.similarity_score.map(|parent_sim| {
        let follow_up_sims: Vec<f64> =
            ordered.iter().filter_map(|e| e.similarity_score).collect();
        if follow_up_sims.is_empty() {
            parent_sim
        } else {
            let avg = follow_up_sims.iter().sum::<f64>() / follow_up_sims.len() as f64;
            PARENT_WEIGHT * parent_sim + FOLLOW_UP_WEIGHT * avg
        }
    });

    let last = ordered.last().copied().unwrap_or(parent);

    let attempts: Vec<(u8, Vec<_>)> = std::iter::once(parent)
        .chain(ordered.iter().copied())
        .map(|e| (e.attempt_number, e.flagged_gaps()))
        .collect();
    let tracker = GapTracker::replay(
        attempts
            .iter()
            .map(|(attempt, flagged)| (*attempt, flagged.as_slice())),
    );
    let resolved = tracker.resolved_count();
    let persistent = tracker.unresolved_count();

    let voice_scores: Vec<f64> = std::iter::once(parent)
        .chain(ordered.iter().copied())
        .filter_map(|e| e.voice_score)
        .collect();
    let voice_score = if voice_scores.is_empty() {
        None
    } else {
        Some(voice_scores.iter().sum::<f64>() / voice_scores.len() as f64)
    };

    let attempt_count = 1 + ordered.len();
    let mean = |f: fn(&Evaluation) -> f64| {
        (f(parent) + ordered.iter().map(|e| f(e)).sum::<f64>()) / attempt_count as f64
    };

    Ok(Evaluation {
        id: EvaluationId::new(),
        answer_id: parent.answer_id,
        question_id: parent.question_id,
        attempt_number: last.attempt_number,
        kind: EvaluationKind::Combined,
        parent_evaluation_id: Some(parent.id),
        raw_score: last.raw_score,
        penalty: last.penalty,
        final_score: last.final_score,
        similarity_score: combined_similarity,
        voice_score,
        gaps: tracker.cumulative().to_vec(),
        completeness: mean(|e| e.completeness),
        relevance: mean(|e| e.relevance),
        feedback: format!(
            "{attempt_count} attempt(s): {resolved} gap(s) resolved, {persistent} persistent"
        ),
        created_at: chrono::Utc::now(),
    })
}
