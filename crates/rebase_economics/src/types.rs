//! Core types for the IPPAN rebase engine
//!
//! Defines the persisted per-block rebase snapshot, the output of a single
//! epoch transition, and the monetary aliases used across the crate.

use crate::fixed_point::SCALE;
use crate::params::RebaseParams;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Block height, kept unbounded so the caller can pass chain heights directly
pub type BlockNumber = BigUint;

/// Token amount in the smallest indivisible unit
pub type Amount = BigUint;

/// Rebase multiplier, fixed-point with implicit scale `10^8`
pub type Multiplier = u64;

/// Persisted economic snapshot, read once per block and written back by the
/// consensus layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebaseInfo {
    /// Completed epochs
    pub epoch: u64,
    /// Transactions accumulated toward the current epoch's goal
    pub epoch_tx: u64,
    /// Rebase multiplier (`10^8` = 1.0)
    pub rbx: Multiplier,
    /// Successful epochs, drives the next transaction goal
    pub rbx_epoch: u64,
    /// Rebased total supply derived from `rbx`
    #[serde(with = "decimal_string")]
    pub supply: Amount,
    /// Bonus coins signalled for issuance at this block
    #[serde(with = "decimal_string")]
    pub perks: Amount,
    /// Transactions observed in the current block only; never persisted
    #[serde(default, skip_serializing)]
    pub tx: u64,
}

impl Default for RebaseInfo {
    /// Neutral multiplier with empty counters. Supply is left at zero until the
    /// first block derives it; use [`RebaseInfo::genesis`] when params are at hand.
    fn default() -> Self {
        Self {
            epoch: 0,
            epoch_tx: 0,
            rbx: SCALE,
            rbx_epoch: 0,
            supply: Amount::zero(),
            perks: Amount::zero(),
            tx: 0,
        }
    }
}

impl RebaseInfo {
    /// State before the first block: neutral multiplier, supply at its initial value.
    pub fn genesis(params: &RebaseParams) -> Self {
        Self {
            epoch: 0,
            epoch_tx: 0,
            rbx: SCALE,
            rbx_epoch: 0,
            supply: params.initial_supply.clone(),
            perks: Amount::zero(),
            tx: 0,
        }
    }

    /// Snapshot for the block being finalized; only `tx` is meaningful.
    pub fn observed(tx: u64) -> Self {
        Self {
            epoch: 0,
            epoch_tx: 0,
            rbx: SCALE,
            rbx_epoch: 0,
            supply: Amount::zero(),
            perks: Amount::zero(),
            tx,
        }
    }

    /// Overwrite this snapshot with the scalars of `transition`, clearing `tx`.
    pub fn apply(&mut self, transition: &EpochTransition) {
        self.epoch = transition.epoch;
        self.epoch_tx = transition.epoch_tx;
        self.rbx = transition.rbx;
        self.rbx_epoch = transition.rbx_epoch;
        self.supply = transition.supply.clone();
        self.perks = transition.perks.clone();
        self.tx = 0;
    }
}

/// Which branch of the epoch state machine a block took
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpochOutcome {
    /// Block inside an epoch; transactions were accumulated
    MidEpoch,
    /// Epoch boundary reached with supply at or above the ceiling; treated as mid-epoch
    SupplyCapped,
    /// Epoch closed with at least 75% of its goal; multiplier grew
    Succeeded { goal: u64, ratio: u64, interest: u64 },
    /// Epoch closed below 75% of its goal
    Skipped { goal: u64, ratio: u64 },
}

impl EpochOutcome {
    /// True when the block closed an epoch (successful or not)
    pub fn closed_epoch(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Skipped { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Scalars produced for one block by the epoch engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochTransition {
    pub epoch: u64,
    pub epoch_tx: u64,
    pub rbx: Multiplier,
    pub rbx_epoch: u64,
    #[serde(with = "decimal_string")]
    pub supply: Amount,
    #[serde(with = "decimal_string")]
    pub perks: Amount,
    pub outcome: EpochOutcome,
}

impl EpochTransition {
    /// Convert into the snapshot the caller persists for the next block.
    pub fn into_state(self) -> RebaseInfo {
        RebaseInfo {
            epoch: self.epoch,
            epoch_tx: self.epoch_tx,
            rbx: self.rbx,
            rbx_epoch: self.rbx_epoch,
            supply: self.supply,
            perks: self.perks,
            tx: 0,
        }
    }

    /// True when this block signals perks issuance
    pub fn has_perks(&self) -> bool {
        !self.perks.is_zero()
    }
}

/// Serializes big integers as base-10 strings so persisted state and config
/// files stay readable and language-neutral.
pub(crate) mod decimal_string {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let digits: String = raw.chars().filter(|c| *c != '_').collect();
        BigUint::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid decimal amount: {raw}")))
    }
}
