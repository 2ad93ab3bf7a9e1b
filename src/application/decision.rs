//! Vote and boost decision for one contest snapshot.
//!
//! [`evaluate`] is pure: the caller supplies `now`, and identical inputs always
//! produce an identical [`Decision`].

use crate::domain::{BoostReason, BoostState, Contest, Decision, EffectiveSettings, VoteReason};

/// Decide whether to vote and whether to boost.
///
/// Boost and vote are evaluated independently. The exposure target counts as
/// satisfied once `exposure_factor >= exposure_target`.
#[must_use]
pub fn evaluate(contest: &Contest, settings: &EffectiveSettings, now: i64) -> Decision {
    let boost_reason = boost_reason(contest, settings, now);
    let vote_reason = vote_reason(contest, settings, now);

    Decision {
        should_vote: matches!(vote_reason, VoteReason::BelowTarget { .. }),
        should_boost: matches!(boost_reason, BoostReason::WithinLeadTime { .. }),
        vote_reason,
        boost_reason,
    }
}

fn boost_reason(contest: &Contest, settings: &EffectiveSettings, now: i64) -> BoostReason {
    let BoostState::Available { deadline } = contest.boost else {
        return BoostReason::NotAvailable;
    };

    let deadline_in = deadline.saturating_sub(now);
    if deadline_in <= 0 {
        BoostReason::DeadlinePassed
    } else if deadline_in <= settings.boost_lead_time {
        BoostReason::WithinLeadTime { deadline_in }
    } else {
        BoostReason::TooEarly {
            deadline_in,
            lead_time: settings.boost_lead_time,
        }
    }
}

fn vote_reason(contest: &Contest, settings: &EffectiveSettings, now: i64) -> VoteReason {
    let exposure = contest.exposure_factor;
    let target = settings.exposure_target;

    if settings.only_boost {
        return VoteReason::OnlyBoost;
    }
    if exposure >= target {
        return VoteReason::TargetReached { exposure, target };
    }
    if !contest.has_started(now) {
        return VoteReason::NotStarted {
            starts_in: contest.starts_in(now),
        };
    }
    let remaining = contest.remaining(now);
    if settings.vote_only_in_final_window && remaining > settings.final_window_threshold {
        return VoteReason::OutsideFinalWindow {
            remaining,
            threshold: settings.final_window_threshold,
        };
    }
    VoteReason::BelowTarget { exposure, target }
}
