//! Per-interview serialization locks.
//!
//! Events for one interview are handled to completion before the next
//! is accepted; events for different interviews share nothing and run
//! independently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use viva_core::InterviewId;

/// Hands out one async mutex per interview id.
#[derive(Default)]
pub struct InterviewLocks {
    locks: Mutex<HashMap<InterviewId, Arc<Mutex<()>>>>,
}

impl InterviewLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the lock for one interview.
    ///
    /// The guard is owned so it can be held across await points for
    /// the duration of one event.
    pub async fn acquire(&self, id: InterviewId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(id).or_default())
        };
        lock.lock_owned().await
    }
}
