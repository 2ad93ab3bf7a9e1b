//! Random vote selection.
//!
//! Items are drawn uniformly at random, each at most once, until the running
//! exposure reaches the target or the pool runs out. Random draws spread votes
//! across the pool instead of piling them on the highest-ratio items, so the
//! selection is deliberately not greedy.

use rand::Rng;

use crate::domain::VotableItem;

/// How a selection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    /// Running exposure reached the target.
    TargetReached,
    /// Every item was selected before the target was reached.
    PoolExhausted,
    /// The pool was empty.
    NoItems,
}

/// Items picked for one vote batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub items: Vec<VotableItem>,
    /// Starting exposure plus the ratios of every picked item.
    pub projected_exposure: f64,
    pub status: SelectionStatus,
}

impl Selection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Select items with the thread-local RNG.
#[must_use]
pub fn select(items: &[VotableItem], starting_exposure: f64, target: f64) -> Selection {
    select_with(&mut rand::thread_rng(), items, starting_exposure, target)
}

/// Select items with a caller-supplied RNG.
///
/// Performs at most `items.len()` successful draws. Each draw is uniform over
/// the items not yet selected, which is the distribution of redrawing on a
/// repeat without the wasted draws.
pub fn select_with<R: Rng + ?Sized>(
    rng: &mut R,
    items: &[VotableItem],
    starting_exposure: f64,
    target: f64,
) -> Selection {
    if items.is_empty() {
        return Selection {
            items: Vec::new(),
            projected_exposure: starting_exposure,
            status: SelectionStatus::NoItems,
        };
    }

    let mut remaining: Vec<usize> = (0..items.len()).collect();
    let mut picked = Vec::new();
    let mut exposure = starting_exposure;

    while exposure < target {
        if remaining.is_empty() {
            return Selection {
                items: picked,
                projected_exposure: exposure,
                status: SelectionStatus::PoolExhausted,
            };
        }
        let slot = rng.gen_range(0..remaining.len());
        let item = &items[remaining.swap_remove(slot)];
        exposure += item.exposure_ratio;
        picked.push(item.clone());
    }

    Selection {
        items: picked,
        projected_exposure: exposure,
        status: SelectionStatus::TargetReached,
    }
}
