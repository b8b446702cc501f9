//! Attempt penalty table and score clamping.
//!
//! Attempt 1 carries no penalty (no prior context), attempt 2 a
//! moderate one (the candidate had a hint), attempt 3 a severe one
//! (the gap persisted despite two chances). The decision engine
//! guarantees no fourth attempt is ever requested, so anything past 3
//! is a contract violation rather than a lookup miss.

use crate::error::ScoringError;

/// Maximum evaluated attempts per parent question (1 parent + 2 follow-ups).
pub const MAX_ATTEMPTS: u8 = 3;

/// Score penalty applied to the given attempt number.
pub fn penalty_for_attempt(attempt_number: u8) -> Result<f64, ScoringError> {
    match attempt_number {
        1 => Ok(0.0),
        2 => Ok(-5.0),
        3 => Ok(-15.0),
        other => Err(ScoringError::InvalidAttempt(other)),
    }
}

/// Final score after penalty, clamped to the 0-100 band.
#[must_use]
pub fn final_score(raw_score: f64, penalty: f64) -> f64 {
    (raw_score + penalty).clamp(0.0, 100.0)
}
