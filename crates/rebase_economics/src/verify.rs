use crate::engine::{grow_multiplier, MAX_TX_RATIO, MIN_TX_RATIO};
use crate::params::RebaseParams;
use crate::types::{EpochTransition, Multiplier, RebaseInfo};
use serde::{Deserialize, Serialize};

/// Fold a sequence of successful epoch ratios into the resulting multiplier,
/// starting from `start`. Ratios below the success threshold are skipped and
/// ratios above the ceiling are clamped, as the engine does.
pub fn projected_multiplier<I>(params: &RebaseParams, start: Multiplier, ratios: I) -> Multiplier
where
    I: IntoIterator<Item = u64>,
{
    ratios
        .into_iter()
        .filter(|ratio| *ratio >= MIN_TX_RATIO)
        .fold(start, |rbx, ratio| {
            let interest = params.interest_for_ratio(ratio.min(MAX_TX_RATIO));
            grow_multiplier(rbx, u64::try_from(interest).unwrap_or(u64::MAX))
        })
}

/// A broken monotonicity rule between two consecutive states
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvariantViolation {
    MultiplierDecreased { before: Multiplier, after: Multiplier },
    EpochDecreased { before: u64, after: u64 },
    EpochSkipped { before: u64, after: u64 },
    RebaseEpochDecreased { before: u64, after: u64 },
    PerksWithoutSuccess,
}

/// Check `next` against the state it was derived from.
///
/// Returns every violated rule; an empty vector means the transition is sound.
pub fn check_invariants(prev: &RebaseInfo, next: &EpochTransition) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if next.rbx < prev.rbx {
        violations.push(InvariantViolation::MultiplierDecreased {
            before: prev.rbx,
            after: next.rbx,
        });
    }
    if next.epoch < prev.epoch {
        violations.push(InvariantViolation::EpochDecreased {
            before: prev.epoch,
            after: next.epoch,
        });
    } else if next.epoch > prev.epoch.saturating_add(1) {
        violations.push(InvariantViolation::EpochSkipped {
            before: prev.epoch,
            after: next.epoch,
        });
    }
    if next.rbx_epoch < prev.rbx_epoch {
        violations.push(InvariantViolation::RebaseEpochDecreased {
            before: prev.rbx_epoch,
            after: next.rbx_epoch,
        });
    }
    if next.has_perks() && !next.outcome.is_success() {
        violations.push(InvariantViolation::PerksWithoutSuccess);
    }

    violations
}
