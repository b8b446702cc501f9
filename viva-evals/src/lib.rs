//! viva-evals: post-completion analytics for viva interviews.
//!
//! When an interview reaches its terminal COMPLETE state, the
//! [`SummaryAggregator`] walks every evaluation once and derives a
//! read-only [`InterviewSummary`]: per-question score progressions and
//! trends, gap resolution rates, dimension averages, a weighted
//! overall score, and the persistent gaps worth revisiting. Nothing
//! here is persisted as a mutable entity - a summary can always be
//! recomputed from the evaluations.

pub mod summary;
pub mod trend;

pub use summary::{
    DimensionAverages, InterviewSummary, PersistentGap, QuestionBreakdown, SummaryAggregator,
};
pub use trend::ScoreTrend;
