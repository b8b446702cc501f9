//! Question types: planned main questions and generated follow-ups.

use serde::{Deserialize, Serialize};

use crate::types::QuestionId;

/// A main interview question from the planned sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    /// Free-form topic label from planning (e.g. "databases").
    #[serde(default)]
    pub category: Option<String>,
}

impl Question {
    pub fn new(id: QuestionId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            category: None,
        }
    }
}

/// A follow-up question generated to probe specific gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpQuestion {
    pub id: QuestionId,
    pub parent_question_id: QuestionId,
    /// Position within the parent's follow-up sub-sequence (1-3).
    pub order_in_sequence: u8,
    pub text: String,
    /// Concepts this follow-up is meant to address.
    pub targeted_gaps: Vec<String>,
}
