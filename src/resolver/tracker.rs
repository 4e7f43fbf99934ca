//! Completion counter for dispatched work.
//!
//! Every dispatched record holds one unit of outstanding work. Units are
//! retired by dropping a [`WorkUnit`], so a record is accounted for whether it
//! produced an outcome, was skipped, or was dropped unprocessed.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct WorkTracker {
    outstanding: AtomicUsize,
    idle: Notify,
}

impl WorkTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers one unit of outstanding work.
    pub fn unit(self: &Arc<Self>) -> WorkUnit {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        WorkUnit {
            tracker: Arc::clone(self),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    fn retire(&self) {
        let previous = self.outstanding.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "retired more work units than registered");
        if previous == 1 {
            self.idle.notify_waiters();
        }
    }

    /// Waits until every registered unit has been retired.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a retire in between is not missed
            notified.as_mut().enable();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// One unit of outstanding work, retired on drop.
#[derive(Debug)]
pub struct WorkUnit {
    tracker: Arc<WorkTracker>,
}

impl Drop for WorkUnit {
    fn drop(&mut self) {
        self.tracker.retire();
    }
}
