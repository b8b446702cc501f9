//! Deterministic collaborator implementations for tests and demos.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use viva_core::{AnswerAssessment, ConceptGap, Question};

use crate::error::CollaboratorError;

use super::traits::{EvaluationRequest, Evaluator, FollowUpGenerator};

/// Evaluator that replays a scripted sequence of results.
///
/// Each call pops the next scripted entry; an exhausted script fails
/// non-retryably so a test that over-calls fails loudly.
pub struct ScriptedEvaluator {
    script: Mutex<VecDeque<Result<AnswerAssessment, CollaboratorError>>>,
}

impl ScriptedEvaluator {
    pub fn new(
        script: impl IntoIterator<Item = Result<AnswerAssessment, CollaboratorError>>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    /// Number of scripted results not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().expect("script lock poisoned").len()
    }
}

#[async_trait]
impl Evaluator for ScriptedEvaluator {
    async fn evaluate(
        &self,
        _request: EvaluationRequest<'_>,
    ) -> Result<AnswerAssessment, CollaboratorError> {
        self.script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(CollaboratorError::Failed {
                    collaborator: "evaluator",
                    message: "script exhausted".into(),
                    retryable: false,
                })
            })
    }
}

/// Generator producing predictable follow-up text from the gap list.
#[derive(Debug, Default)]
pub struct CannedGenerator;

#[async_trait]
impl FollowUpGenerator for CannedGenerator {
    async fn generate(
        &self,
        parent: &Question,
        cumulative_gaps: &[ConceptGap],
        attempt_order: u8,
    ) -> Result<String, CollaboratorError> {
        let concepts: Vec<&str> = cumulative_gaps.iter().map(|g| g.concept.as_str()).collect();
        Ok(format!(
            "Follow-up {attempt_order} on '{}': tell me more about {}",
            parent.text,
            concepts.join(", ")
        ))
    }
}
