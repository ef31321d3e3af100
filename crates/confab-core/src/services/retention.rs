//! Bounded retention for the conversation log.

use crate::storage::Storage;
use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Summary of one retention pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct RetentionReport {
    /// Record count observed at the start of the pass.
    pub examined: usize,
    pub deleted: usize,
    pub remaining: usize,
}

/// Trims the conversation log back down to `max_records`, oldest first.
///
/// At most one pass runs at a time; a trigger that lands while a pass is
/// in flight is dropped rather than queued. Appends racing a pass are
/// picked up by the next scheduled run.
pub struct RetentionPolicy {
    storage: Arc<Storage>,
    max_records: usize,
    running: AtomicBool,
}

impl RetentionPolicy {
    pub fn new(storage: Arc<Storage>, max_records: usize) -> Self {
        Self {
            storage,
            max_records,
            running: AtomicBool::new(false),
        }
    }

    /// Run one pass unless another is already in flight.
    ///
    /// Returns None when the in-flight guard rejected this trigger.
    pub fn try_run(&self) -> Option<Result<RetentionReport>> {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("Retention pass already running, skipping trigger");
            return None;
        }
        let _guard = scopeguard::guard((), |_| {
            self.running.store(false, Ordering::SeqCst);
        });

        Some(self.run())
    }

    fn run(&self) -> Result<RetentionReport> {
        let examined = self.storage.conversations.count()?;
        if examined <= self.max_records {
            return Ok(RetentionReport {
                examined,
                deleted: 0,
                remaining: examined,
            });
        }

        let excess = examined - self.max_records;
        let deleted = self.storage.conversations.delete_oldest(excess)?;
        let remaining = examined - deleted;
        info!(deleted, remaining, "Removed oldest conversation records");

        Ok(RetentionReport {
            examined,
            deleted,
            remaining,
        })
    }
}
