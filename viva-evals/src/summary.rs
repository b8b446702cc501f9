//! Interview summary aggregation.
//!
//! Runs once, synchronously, when an interview completes. Walks the
//! evaluations per main question in sequence order, then derives the
//! interview-wide view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use viva_core::scoring::GapTracker;
use viva_core::{
    EngineConfig, Evaluation, EvaluationKind, GapSeverity, Interview, InterviewId, QuestionId,
};

use crate::trend::ScoreTrend;

/// Per-question analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBreakdown {
    pub question_id: QuestionId,
    /// Number of evaluated attempts (parent + follow-ups)
    pub attempts: u8,
    /// Final score per attempt, in attempt order
    pub score_progression: Vec<f64>,
    /// resolved / identified; 1.0 when no gaps were identified
    pub gap_resolution_rate: f64,
    pub score_trend: ScoreTrend,
    /// Combined similarity when follow-ups exist, else the parent's
    pub combined_similarity: Option<f64>,
}

/// A gap that was never resolved, ranked across the whole interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistentGap {
    pub concept: String,
    /// Highest severity the concept was flagged with
    pub severity: GapSeverity,
    /// Number of questions it stayed unresolved in
    pub occurrences: usize,
}

/// Averages over the evaluator's per-answer dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionAverages {
    pub completeness: f64,
    pub relevance: f64,
}

/// The derived, read-only interview report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSummary {
    pub interview_id: InterviewId,
    pub generated_at: DateTime<Utc>,
    /// Weighted blend of theory and voice components (0-100)
    pub overall_score: f64,
    /// Similarity-based theory component (0-100)
    pub theory_score: f64,
    /// Mean voice quality (0-100) when voice answers exist
    pub voice_score: Option<f64>,
    pub dimensions: Option<DimensionAverages>,
    pub questions: Vec<QuestionBreakdown>,
    pub persistent_gaps: Vec<PersistentGap>,
    pub recommendations: Vec<String>,
}

/// Builds an [`InterviewSummary`] from an interview's evaluations.
#[derive(Debug, Clone, Default)]
pub struct SummaryAggregator {
    config: EngineConfig,
}

impl SummaryAggregator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Walk all evaluations once and build the summary.
    ///
    /// `evaluations` may contain PARENT, FOLLOW_UP, and COMBINED
    /// records in any order; combined records are used for their
    /// similarity, attempts for everything else.
    pub fn build(&self, interview: &Interview, evaluations: &[Evaluation]) -> InterviewSummary {
        let mut questions = Vec::new();
        let mut unresolved_per_question: Vec<Vec<(String, GapSeverity)>> = Vec::new();

        for &question_id in interview.question_sequence() {
            let mut attempts: Vec<&Evaluation> = evaluations
                .iter()
                .filter(|e| e.question_id == question_id && e.kind != EvaluationKind::Combined)
                .collect();
            if attempts.is_empty() {
                continue;
            }
            attempts.sort_by_key(|e| e.attempt_number);

            let combined = evaluations
                .iter()
                .find(|e| e.question_id == question_id && e.kind == EvaluationKind::Combined);

            let score_progression: Vec<f64> = attempts.iter().map(|e| e.final_score).collect();

            let flagged: Vec<(u8, Vec<_>)> = attempts
                .iter()
                .map(|e| (e.attempt_number, e.flagged_gaps()))
                .collect();
            let tracker = GapTracker::replay(
                flagged.iter().map(|(attempt, f)| (*attempt, f.as_slice())),
            );
            let gap_resolution_rate = if tracker.is_empty() {
                1.0
            } else {
                tracker.resolved_count() as f64 / tracker.len() as f64
            };
            unresolved_per_question.push(
                tracker
                    .unresolved()
                    .map(|g| (g.concept.clone(), g.severity))
                    .collect(),
            );

            let combined_similarity = combined
                .and_then(|e| e.similarity_score)
                .or_else(|| attempts.first().and_then(|e| e.similarity_score));

            questions.push(QuestionBreakdown {
                question_id,
                attempts: attempts.len() as u8,
                score_progression: score_progression.clone(),
                gap_resolution_rate,
                score_trend: ScoreTrend::classify(&score_progression, self.config.trend_tolerance),
                combined_similarity,
            });
        }

        let theory_score = self.theory_score(&questions);
        let voice_score = Self::voice_score(evaluations);
        let overall_score = self.config.theory_weight * theory_score
            + self.config.voice_weight * voice_score.unwrap_or(self.config.neutral_voice_score);

        let persistent_gaps = self.rank_persistent_gaps(&unresolved_per_question);
        let recommendations = Self::recommendations(&questions, &persistent_gaps);

        tracing::info!(
            interview = %interview.id(),
            overall = overall_score,
            questions = questions.len(),
            persistent_gaps = persistent_gaps.len(),
            "summary built"
        );

        InterviewSummary {
            interview_id: interview.id(),
            generated_at: Utc::now(),
            overall_score,
            theory_score,
            voice_score,
            dimensions: Self::dimension_averages(evaluations),
            questions,
            persistent_gaps,
            recommendations,
        }
    }

    /// Per question: combined similarity scaled to 0-100, falling back
    /// to the last attempt's final score when similarity is absent.
    fn theory_score(&self, questions: &[QuestionBreakdown]) -> f64 {
        if questions.is_empty() {
            return 0.0;
        }
        let sum: f64 = questions
            .iter()
            .map(|q| {
                q.combined_similarity
                    .map(|s| s * 100.0)
                    .or_else(|| q.score_progression.last().copied())
                    .unwrap_or(0.0)
            })
            .sum();
        sum / questions.len() as f64
    }

    fn voice_score(evaluations: &[Evaluation]) -> Option<f64> {
        let scores: Vec<f64> = evaluations
            .iter()
            .filter(|e| e.kind != EvaluationKind::Combined)
            .filter_map(|e| e.voice_score)
            .collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64 * 100.0)
        }
    }

    fn dimension_averages(evaluations: &[Evaluation]) -> Option<DimensionAverages> {
        let attempts: Vec<&Evaluation> = evaluations
            .iter()
            .filter(|e| e.kind != EvaluationKind::Combined)
            .collect();
        if attempts.is_empty() {
            return None;
        }
        let n = attempts.len() as f64;
        Some(DimensionAverages {
            completeness: attempts.iter().map(|e| e.completeness).sum::<f64>() / n,
            relevance: attempts.iter().map(|e| e.relevance).sum::<f64>() / n,
        })
    }

    /// Rank never-resolved gaps by frequency, then severity, then name.
    fn rank_persistent_gaps(
        &self,
        unresolved_per_question: &[Vec<(String, GapSeverity)>],
    ) -> Vec<PersistentGap> {
        let mut ranked: Vec<PersistentGap> = Vec::new();
        for gaps in unresolved_per_question {
            for (concept, severity) in gaps {
                match ranked.iter_mut().find(|g| &g.concept == concept) {
                    Some(existing) => {
                        existing.occurrences += 1;
                        existing.severity = existing.severity.max(*severity);
                    }
                    None => ranked.push(PersistentGap {
                        concept: concept.clone(),
                        severity: *severity,
                        occurrences: 1,
                    }),
                }
            }
        }
        ranked.sort_by(|a, b| {
            b.occurrences
                .cmp(&a.occurrences)
                .then(b.severity.cmp(&a.severity))
                .then(a.concept.cmp(&b.concept))
        });
        ranked.truncate(self.config.top_gap_limit);
        ranked
    }

    fn recommendations(
        questions: &[QuestionBreakdown],
        persistent_gaps: &[PersistentGap],
    ) -> Vec<String> {
        let mut recs: Vec<String> = persistent_gaps
            .iter()
            .map(|g| {
                format!(
                    "Review {}: {} gap left unresolved across {} question(s)",
                    g.concept, g.severity, g.occurrences
                )
            })
            .collect();

        let declining = questions
            .iter()
            .filter(|q| q.score_trend == ScoreTrend::Declining)
            .count();
        if declining > 0 {
            recs.push(format!(
                "Scores declined under probing on {declining} question(s); practice defending answers in depth"
            ));
        }
        if recs.is_empty() {
            recs.push("Strong performance; no persistent gaps detected".to_string());
        }
        recs
    }
}
