//! Evaluation records and the validated evaluator-boundary schema.
//!
//! [`AnswerAssessment`] is what an external evaluator reports for one
//! answer; it is range-checked before the engine builds an immutable
//! [`Evaluation`] from it. COMBINED evaluations are derived by the
//! combiner, never edited.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::scoring::gaps::{ConceptGap, FlaggedGap};
use crate::scoring::penalty::{final_score, penalty_for_attempt};
use crate::types::{AnswerId, EvaluationId, QuestionId};

/// Discriminator for the three evaluation variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationKind {
    /// Evaluation of the answer to a main question (attempt 1)
    Parent,
    /// Evaluation of a follow-up answer (attempts 2-3)
    FollowUp,
    /// Derived merge of a parent and its follow-up evaluations
    Combined,
}

impl EvaluationKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::FollowUp => "follow_up",
            Self::Combined => "combined",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "parent" => Some(Self::Parent),
            "follow_up" => Some(Self::FollowUp),
            "combined" => Some(Self::Combined),
            _ => None,
        }
    }
}

impl fmt::Display for EvaluationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured result of one external evaluator call.
///
/// The engine never constructs prompts; this is the schema it consumes,
/// validated at the boundary so core logic never sees out-of-range data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerAssessment {
    /// Raw score before any attempt penalty (0-100)
    pub raw_score: f64,
    /// Semantic similarity to the exemplar answer (0-1), when available
    #[serde(default)]
    pub similarity_score: Option<f64>,
    /// Voice-delivery quality (0-1) for spoken answers
    #[serde(default)]
    pub voice_score: Option<f64>,
    /// Coverage of the expected answer (0-1)
    pub completeness: f64,
    /// Relevance to the question asked (0-1)
    pub relevance: f64,
    /// Gaps the evaluator flagged in this answer
    #[serde(default)]
    pub gaps: Vec<FlaggedGap>,
    /// Narrative feedback for the candidate
    #[serde(default)]
    pub feedback: String,
}

impl AnswerAssessment {
    /// Range-check every numeric field.
    pub fn validate(&self) -> Result<(), ScoringError> {
        fn check(field: &'static str, value: f64, max: f64) -> Result<(), ScoringError> {
            if value.is_finite() && (0.0..=max).contains(&value) {
                Ok(())
            } else {
                Err(ScoringError::OutOfRange { field, value })
            }
        }
        check("raw_score", self.raw_score, 100.0)?;
        check("completeness", self.completeness, 1.0)?;
        check("relevance", self.relevance, 1.0)?;
        if let Some(s) = self.similarity_score {
            check("similarity_score", s, 1.0)?;
        }
        if let Some(v) = self.voice_score {
            check("voice_score", v, 1.0)?;
        }
        Ok(())
    }
}

/// One immutable evaluation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub answer_id: AnswerId,
    /// The parent question this attempt belongs to.
    pub question_id: QuestionId,
    /// 1 for the parent answer, 2-3 for follow-ups.
    pub attempt_number: u8,
    pub kind: EvaluationKind,
    pub parent_evaluation_id: Option<EvaluationId>,
    pub raw_score: f64,
    pub penalty: f64,
    /// `clamp(raw_score + penalty, 0, 100)`
    pub final_score: f64,
    pub similarity_score: Option<f64>,
    pub voice_score: Option<f64>,
    pub gaps: Vec<ConceptGap>,
    pub completeness: f64,
    pub relevance: f64,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

impl Evaluation {
    /// Build a PARENT or FOLLOW_UP evaluation from a validated assessment.
    ///
    /// Applies the attempt penalty and score clamp; attempt 1 yields a
    /// PARENT record, attempts 2-3 FOLLOW_UP records referencing the
    /// parent evaluation.
    pub fn from_assessment(
        answer_id: AnswerId,
        question_id: QuestionId,
        attempt_number: u8,
        parent_evaluation_id: Option<EvaluationId>,
        assessment: &AnswerAssessment,
    ) -> Result<Self, ScoringError> {
        assessment.validate()?;
        let penalty = penalty_for_attempt(attempt_number)?;
        let kind = if attempt_number == 1 {
            EvaluationKind::Parent
        } else {
            EvaluationKind::FollowUp
        };
        let gaps = assessment
            .gaps
            .iter()
            .map(|f| ConceptGap::identified(f.concept.clone(), f.severity, attempt_number))
            .collect();
        Ok(Self {
            id: EvaluationId::new(),
            answer_id,
            question_id,
            attempt_number,
            kind,
            parent_evaluation_id,
            raw_score: assessment.raw_score,
            penalty,
            final_score: final_score(assessment.raw_score, penalty),
            similarity_score: assessment.similarity_score,
            voice_score: assessment.voice_score,
            gaps,
            completeness: assessment.completeness,
            relevance: assessment.relevance,
            feedback: assessment.feedback.clone(),
            created_at: Utc::now(),
        })
    }

    /// This attempt's gaps as the evaluator flagged them.
    pub fn flagged_gaps(&self) -> Vec<FlaggedGap> {
        self.gaps
            .iter()
            .map(|g| FlaggedGap::new(g.concept.clone(), g.severity))
            .collect()
    }

    /// (resolved, persistent) counts over this record's gap set.
    pub fn gap_stats(&self) -> (usize, usize) {
        let resolved = self.gaps.iter().filter(|g| g.resolved).count();
        (resolved, self.gaps.len() - resolved)
    }
}
