//! Operation counters for the verification engine.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Thread-safe counters, bumped at operation boundaries.
#[derive(Debug, Default)]
pub struct EngineStats {
    submissions: AtomicU64,
    votes: AtomicU64,
    resolutions: AtomicU64,
    rejections: AtomicU64,
}

/// A point-in-time copy of [`EngineStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub submissions: u64,
    pub votes: u64,
    pub resolutions: u64,
    pub rejections: u64,
}

impl EngineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submission(&self) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_vote(&self) {
        self.votes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_resolution(&self) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    /// Any operation that returned an error.
    pub fn record_rejection(&self) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            submissions: self.submissions.load(Ordering::Relaxed),
            votes: self.votes.load(Ordering::Relaxed),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
        }
    }
}
