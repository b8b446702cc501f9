//! Interview aggregate and its state machine.

mod state;

pub use state::{Interview, InterviewStatus, MAX_FOLLOW_UPS, Progress};
