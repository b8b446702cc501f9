//! Score trend classification across the attempts of one question.

use serde::{Deserialize, Serialize};

/// Direction of a question's score progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTrend {
    /// Every consecutive delta exceeds the tolerance
    Improving,
    /// Every consecutive delta falls below the negative tolerance
    Declining,
    /// Everything else, including single-attempt questions
    Stable,
}

impl ScoreTrend {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        }
    }

    /// Classify an ordered score progression.
    ///
    /// Deltas within `tolerance` points count as flat, so a strictly
    /// increasing sequence still classifies as stable when its steps
    /// are small.
    #[must_use]
    pub fn classify(progression: &[f64], tolerance: f64) -> Self {
        if progression.len() < 2 {
            return Self::Stable;
        }
        let deltas: Vec<f64> = progression.windows(2).map(|w| w[1] - w[0]).collect();
        if deltas.iter().all(|d| *d > tolerance) {
            Self::Improving
        } else if deltas.iter().all(|d| *d < -tolerance) {
            Self::Declining
        } else {
            Self::Stable
        }
    }
}
