//! Follow-up decision engine.

mod decision;

pub use decision::{DecisionEngine, FollowUpDecision};
