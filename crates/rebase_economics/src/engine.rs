//! Epoch transition engine for the elastic-supply rebase.
//!
//! Invoked by consensus once per finalized block with the last persisted
//! [`RebaseInfo`] and the block's observed transaction count. Every block
//! either accumulates transactions into the running epoch or, on an epoch
//! boundary, scores the closed epoch against its goal:
//!
//! ```text
//! goal     = start_tx_goal + rbx_epoch * epoch_tx_increment
//! ratio    = floor(epoch_tx * 100 / goal)               (fails below 75, capped at 125)
//! interest = floor((interest_per_epoch - 10^8) * ratio / 100) + 10^8
//! rbx'     = floor(rbx * interest / 10^8)
//! ```
//!
//! Boundaries reached while the rebased supply sits at or above `max_supply`
//! are treated as ordinary blocks, which freezes the multiplier for good.

use crate::errors::RebaseError;
use crate::fixed_point::{is_valid_multiplier, rebased_amount, SCALE};
use crate::params::RebaseParams;
use crate::source::TxCountSource;
use crate::types::{Amount, BlockNumber, EpochOutcome, EpochTransition, Multiplier, RebaseInfo};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Lowest activity ratio (percent of goal) that still counts as a successful epoch
pub const MIN_TX_RATIO: u64 = 75;

/// Activity ratio ceiling applied before computing interest
pub const MAX_TX_RATIO: u64 = 125;

/// Deterministic per-block rebase state machine
#[derive(Debug, Clone)]
pub struct RebaseEngine {
    params: RebaseParams,
    blocks_per_epoch: BigUint,
}

impl RebaseEngine {
    /// Create an engine for validated parameters.
    pub fn new(params: RebaseParams) -> Result<Self, RebaseError> {
        params.validate()?;
        let blocks_per_epoch = BigUint::from(params.blocks_per_epoch);
        Ok(Self {
            params,
            blocks_per_epoch,
        })
    }

    pub fn params(&self) -> &RebaseParams {
        &self.params
    }

    /// Snapshot preceding the first block.
    pub fn genesis(&self) -> RebaseInfo {
        RebaseInfo::genesis(&self.params)
    }

    pub fn is_epoch_boundary(&self, block_number: &BlockNumber) -> bool {
        (block_number % &self.blocks_per_epoch).is_zero()
    }

    /// Transaction goal for the epoch following `rbx_epoch` successful ones.
    pub fn tx_goal(&self, rbx_epoch: u64) -> u64 {
        self.params.tx_goal(rbx_epoch)
    }

    /// Interest applied for a successful epoch at `ratio`, clamped to [`MAX_TX_RATIO`].
    pub fn interest_for_ratio(&self, ratio: u64) -> Multiplier {
        let interest = self.params.interest_for_ratio(ratio.min(MAX_TX_RATIO));
        // Bounded by validate(); saturate rather than wrap if it ever is not.
        u64::try_from(interest).unwrap_or(u64::MAX)
    }

    /// Rebased total supply implied by a multiplier.
    pub fn supply_for(&self, rbx: Multiplier) -> Amount {
        rebased_amount(&self.params.initial_supply, rbx)
    }

    /// Compute the next rebase scalars for `block_number`.
    ///
    /// `current` only contributes its `tx` field. The returned supply is derived
    /// from `last.rbx`, i.e. the multiplier in force when the block started.
    /// `last.rbx` must be positive; states from [`genesis`](Self::genesis),
    /// `RebaseInfo::default()` or earlier transitions always are.
    pub fn process_epoch(
        &self,
        block_number: &BlockNumber,
        last: &RebaseInfo,
        current: &RebaseInfo,
    ) -> EpochTransition {
        debug_assert!(
            is_valid_multiplier(last.rbx),
            "rebase multiplier must be positive"
        );
        let mut epoch = last.epoch;
        let mut epoch_tx = last.epoch_tx;
        let mut rbx = last.rbx;
        let mut rbx_epoch = last.rbx_epoch;
        let supply = self.supply_for(last.rbx);
        let mut perks = Amount::zero();

        let outcome = if !self.is_epoch_boundary(block_number) {
            epoch_tx = epoch_tx.saturating_add(current.tx);
            EpochOutcome::MidEpoch
        } else if supply >= self.params.max_supply {
            debug!(
                block = %block_number,
                supply = %supply,
                "supply ceiling reached, epoch boundary ignored"
            );
            epoch_tx = epoch_tx.saturating_add(current.tx);
            EpochOutcome::SupplyCapped
        } else {
            let goal = self.tx_goal(rbx_epoch);
            let ratio = tx_ratio(epoch_tx, goal);

            let outcome = if ratio >= MIN_TX_RATIO {
                let ratio = ratio.min(MAX_TX_RATIO);
                rbx_epoch = rbx_epoch.saturating_add(1);
                let interest = self.interest_for_ratio(ratio);
                rbx = grow_multiplier(rbx, interest);
                perks = self.params.perks_epoch_coins.clone();

                info!(
                    "Rebase epoch {} succeeded: rbx_epoch={}, rbx={}, ratio={}%",
                    epoch, rbx_epoch, rbx, ratio
                );
                EpochOutcome::Succeeded {
                    goal,
                    ratio,
                    interest,
                }
            } else {
                warn!(
                    "Rebase epoch {} skipped: goal={}, tx={}, ratio={}%",
                    epoch, goal, epoch_tx, ratio
                );
                EpochOutcome::Skipped { goal, ratio }
            };

            // The boundary block seeds the next epoch.
            epoch_tx = current.tx;
            epoch = epoch.saturating_add(1);
            outcome
        };

        EpochTransition {
            epoch,
            epoch_tx,
            rbx,
            rbx_epoch,
            supply,
            perks,
            outcome,
        }
    }

    /// Like [`process_epoch`](Self::process_epoch), reading the block's
    /// transaction count from `source`.
    pub fn process_block<S>(
        &self,
        block_number: &BlockNumber,
        last: &RebaseInfo,
        source: &S,
    ) -> EpochTransition
    where
        S: TxCountSource + ?Sized,
    {
        let current = RebaseInfo::observed(source.tx_count(block_number));
        self.process_epoch(block_number, last, &current)
    }

    /// Apply blocks `first..=last_block` in height order starting from `start`.
    pub fn replay<S>(
        &self,
        first: u64,
        last_block: u64,
        start: RebaseInfo,
        source: &S,
    ) -> ReplaySummary
    where
        S: TxCountSource + ?Sized,
    {
        let mut summary = ReplaySummary {
            state: start,
            blocks: 0,
            succeeded: 0,
            skipped: 0,
            capped: 0,
            perks_signalled: Amount::zero(),
        };

        for height in first..=last_block {
            let block = BlockNumber::from(height);
            let transition = self.process_block(&block, &summary.state, source);
            match transition.outcome {
                EpochOutcome::Succeeded { .. } => summary.succeeded += 1,
                EpochOutcome::Skipped { .. } => summary.skipped += 1,
                EpochOutcome::SupplyCapped => summary.capped += 1,
                EpochOutcome::MidEpoch => {}
            }
            summary.perks_signalled += &transition.perks;
            summary.blocks += 1;
            summary.state = transition.into_state();
        }

        debug!(
            "Replayed {} blocks: {} succeeded, {} skipped, {} capped",
            summary.blocks, summary.succeeded, summary.skipped, summary.capped
        );
        summary
    }
}

/// Aggregate result of [`RebaseEngine::replay`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// State after the last replayed block
    pub state: RebaseInfo,
    pub blocks: u64,
    pub succeeded: u64,
    pub skipped: u64,
    /// Epoch boundaries ignored because of the supply ceiling
    pub capped: u64,
    #[serde(with = "crate::types::decimal_string")]
    pub perks_signalled: Amount,
}

/// `floor(epoch_tx * 100 / goal)`; `goal` is never zero for validated params.
pub fn tx_ratio(epoch_tx: u64, goal: u64) -> u64 {
    if goal == 0 {
        return u64::MAX;
    }
    let ratio = u128::from(epoch_tx) * 100 / u128::from(goal);
    u64::try_from(ratio).unwrap_or(u64::MAX)
}

/// `floor(rbx * interest / SCALE)`
pub fn grow_multiplier(rbx: Multiplier, interest: Multiplier) -> Multiplier {
    let grown = u128::from(rbx) * u128::from(interest) / u128::from(SCALE);
    u64::try_from(grown).unwrap_or(u64::MAX)
}
