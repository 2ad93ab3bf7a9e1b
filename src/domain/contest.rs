//! Contest snapshots and the items that can be voted on.
//!
//! Snapshots are rebuilt on every poll and never mutated by the engine; a
//! backend returns fresh values on each call.

use serde::{Deserialize, Serialize};

use super::id::{ContestId, EntryId, ItemId};

/// Highest exposure factor a contest can report.
pub const MAX_EXPOSURE: f64 = 100.0;

/// Boost availability for a contest.
///
/// The deadline only exists while the boost can still be applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BoostState {
    /// Boost can be applied until `deadline` (Unix seconds).
    Available { deadline: i64 },
    /// Boost was already spent in this contest.
    Used,
    /// Contest offers no boost right now.
    Unavailable,
}

impl BoostState {
    /// Deadline of an available boost.
    #[must_use]
    pub const fn deadline(&self) -> Option<i64> {
        match self {
            Self::Available { deadline } => Some(*deadline),
            Self::Used | Self::Unavailable => None,
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Short lowercase label for logs and tables.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Available { .. } => "available",
            Self::Used => "used",
            Self::Unavailable => "unavailable",
        }
    }
}

/// One of the user's own entries in a contest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub boosted: bool,
}

impl Entry {
    pub fn new(id: impl Into<String>, boosted: bool) -> Self {
        Self {
            id: EntryId::new(id),
            boosted,
        }
    }
}

/// Read-only view of one active contest at poll time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contest {
    pub id: ContestId,
    pub title: String,
    /// Opening time, Unix seconds.
    pub start_time: i64,
    /// Closing time, Unix seconds.
    pub close_time: i64,
    pub boost: BoostState,
    /// Current visibility of the user's entries, 0 to 100.
    pub exposure_factor: f64,
    pub entries: Vec<Entry>,
}

impl Contest {
    /// Seconds until the contest closes (negative once closed).
    #[must_use]
    pub const fn remaining(&self, now: i64) -> i64 {
        self.close_time.saturating_sub(now)
    }

    /// True once the contest has opened.
    #[must_use]
    pub const fn has_started(&self, now: i64) -> bool {
        self.start_time <= now
    }

    /// Seconds until the contest opens (negative once open).
    #[must_use]
    pub const fn starts_in(&self, now: i64) -> i64 {
        self.start_time.saturating_sub(now)
    }

    /// First entry that has not been boosted yet.
    #[must_use]
    pub fn boost_target(&self) -> Option<&Entry> {
        self.entries.iter().find(|entry| !entry.boosted)
    }
}

/// A candidate that a vote can be cast toward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotableItem {
    pub id: ItemId,
    /// Exposure increment granted by voting for this item.
    pub exposure_ratio: f64,
}

impl VotableItem {
    pub fn new(id: impl Into<String>, exposure_ratio: f64) -> Self {
        Self {
            id: ItemId::new(id),
            exposure_ratio,
        }
    }
}

/// Items available for voting in one contest, plus the exposure they start from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VotePool {
    pub items: Vec<VotableItem>,
    pub starting_exposure: f64,
}

impl VotePool {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
