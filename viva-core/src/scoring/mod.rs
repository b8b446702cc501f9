//! Scoring building blocks: penalties, gap tracking, and the combiner.

pub mod combine;
pub mod gaps;
pub mod penalty;

pub use combine::combine;
pub use gaps::{ConceptGap, FlaggedGap, GapSeverity, GapTracker};
pub use penalty::{MAX_ATTEMPTS, final_score, penalty_for_attempt};
