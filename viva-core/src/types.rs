//! Identifier newtypes shared across the engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new ID with a UUIDv7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_type!(
    /// Unique identifier for an interview.
    InterviewId
);
id_type!(
    /// Unique identifier for a question (main or follow-up).
    QuestionId
);
id_type!(
    /// Unique identifier for a submitted answer.
    ///
    /// Supplied by the caller so a retried submission of the same
    /// answer can be deduplicated instead of re-evaluated.
    AnswerId
);
id_type!(
    /// Unique identifier for an evaluation record.
    EvaluationId
);
