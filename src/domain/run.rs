//! Per-run counters.

use serde::Serialize;

/// Counters accumulated while one run walks the contest list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Contests returned by the backend.
    pub contests_seen: usize,
    /// Contests the loop finished working on.
    pub contests_processed: usize,
    pub boosts_applied: usize,
    pub vote_batches: usize,
    pub votes_cast: usize,
    /// Contests where a due action was skipped (empty pool, rejected boost).
    pub contests_skipped: usize,
    /// Contests abandoned after a backend failure.
    pub contests_failed: usize,
}

impl RunSummary {
    /// True when the run submitted anything to the backend.
    #[must_use]
    pub const fn took_action(&self) -> bool {
        self.boosts_applied > 0 || self.vote_batches > 0
    }
}
