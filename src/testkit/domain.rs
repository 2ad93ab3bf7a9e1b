//! Builders for domain primitives used across tests.
//!
//! Contests are described relative to a reference `now` so tests read in
//! terms of "starts in", "closes in" and "boost deadline in".

use crate::domain::{BoostState, Contest, ContestId, Entry, VotableItem};

/// Fluent builder for [`Contest`].
///
/// Defaults: started an hour before `now`, closes a day after, no exposure,
/// no boost and a single unboosted entry.
#[derive(Debug, Clone)]
pub struct ContestBuilder {
    now: i64,
    contest: Contest,
}

/// Start building contest `id` relative to `now`.
pub fn contest(id: &str, now: i64) -> ContestBuilder {
    ContestBuilder {
        now,
        contest: Contest {
            id: ContestId::new(id),
            title: format!("Contest {id}"),
            start_time: now - 3_600,
            close_time: now + 86_400,
            boost: BoostState::Unavailable,
            exposure_factor: 0.0,
            entries: vec![Entry::new(format!("{id}-e1"), false)],
        },
    }
}

impl ContestBuilder {
    pub fn title(mut self, title: &str) -> Self {
        self.contest.title = title.to_string();
        self
    }

    pub fn exposure(mut self, exposure: f64) -> Self {
        self.contest.exposure_factor = exposure;
        self
    }

    /// Negative values put the start in the past.
    pub fn starts_in(mut self, secs: i64) -> Self {
        self.contest.start_time = self.now + secs;
        self
    }

    pub fn closes_in(mut self, secs: i64) -> Self {
        self.contest.close_time = self.now + secs;
        self
    }

    /// Boost available with its deadline `secs` from now.
    pub fn boost_in(mut self, secs: i64) -> Self {
        self.contest.boost = BoostState::Available {
            deadline: self.now + secs,
        };
        self
    }

    pub fn boost_used(mut self) -> Self {
        self.contest.boost = BoostState::Used;
        self
    }

    pub fn no_entries(mut self) -> Self {
        self.contest.entries.clear();
        self
    }

    pub fn build(self) -> Contest {
        self.contest
    }
}

/// Vote pool items named `{prefix}-0`, `{prefix}-1`, ... with the given ratios.
pub fn items(prefix: &str, ratios: &[f64]) -> Vec<VotableItem> {
    ratios
        .iter()
        .enumerate()
        .map(|(i, ratio)| VotableItem::new(format!("{prefix}-{i}"), *ratio))
        .collect()
}
