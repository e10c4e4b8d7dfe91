//! Request tagging so that late responses cannot clobber newer state

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag for a request about to be sent; tags strictly increase
    pub fn next(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Claim the right to apply the response to request `tag`.
    /// False when a response to a newer request was already applied.
    pub fn accept(&self, tag: u64) -> bool {
        let previous = self.applied.fetch_max(tag, Ordering::SeqCst);
        if previous >= tag {
            warn!(
                "Discarding stale response to request {} (already applied {})",
                tag, previous
            );
            return false;
        }
        true
    }

    pub fn last_applied(&self) -> u64 {
        self.applied.load(Ordering::SeqCst)
    }
}
