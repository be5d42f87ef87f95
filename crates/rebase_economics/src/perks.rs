//! Perks issuance gating.
//!
//! The engine only signals that a successful epoch wants perks issued. The
//! caller asks a [`PerksGate`] how much of that intent may actually be
//! credited to the perks pool: nothing once the perks programme has run for
//! `perks_max_epochs` successful epochs, and never more than the headroom left
//! under `max_supply`.

use crate::errors::RebaseError;
use crate::params::RebaseParams;
use crate::types::{Amount, EpochTransition};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Amount to credit and where to credit it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerksIssuance {
    #[serde(with = "crate::types::decimal_string")]
    pub amount: Amount,
    pub pool: [u8; 20],
}

/// Decides the creditable amount of a signalled perks intent
#[derive(Clone, Debug)]
pub struct PerksGate {
    pool: [u8; 20],
    max_epochs: u64,
    max_supply: Amount,
}

impl PerksGate {
    pub fn new(params: &RebaseParams) -> Result<Self, RebaseError> {
        Ok(Self {
            pool: params.perks_pool_address()?,
            max_epochs: params.perks_max_epochs,
            max_supply: params.max_supply.clone(),
        })
    }

    pub fn pool(&self) -> [u8; 20] {
        self.pool
    }

    /// Clamp `requested` to the supply headroom.
    /// Returns `(allowed, remaining_after)`.
    pub fn clamp_to_cap(&self, requested: &Amount, supply: &Amount) -> (Amount, Amount) {
        let remaining = if supply >= &self.max_supply {
            Amount::zero()
        } else {
            &self.max_supply - supply
        };
        let allowed = requested.min(&remaining).clone();
        let after = &remaining - &allowed;
        (allowed, after)
    }

    /// Issuance for a transition, or `None` when nothing should be credited.
    ///
    /// `supply` is the total supply at issuance time, which may be higher than
    /// the transition's supply if other issuance already happened this block.
    pub fn issuance(&self, transition: &EpochTransition, supply: &Amount) -> Option<PerksIssuance> {
        if transition.perks.is_zero() {
            return None;
        }
        if transition.rbx_epoch > self.max_epochs {
            debug!(
                "Perks programme finished after {} epochs, skipping rebase epoch {}",
                self.max_epochs, transition.rbx_epoch
            );
            return None;
        }

        let (amount, _) = self.clamp_to_cap(&transition.perks, supply);
        if amount.is_zero() {
            warn!("Perks intent dropped: supply {} at ceiling {}", supply, self.max_supply);
            return None;
        }
        if amount < transition.perks {
            warn!(
                "Perks clamped to supply headroom: requested={}, allowed={}",
                transition.perks, amount
            );
        }

        Some(PerksIssuance {
            amount,
            pool: self.pool,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EpochOutcome;
    use num_bigint::BigUint;

    fn successful(rbx_epoch: u64, params: &RebaseParams) -> EpochTransition {
        EpochTransition {
            epoch: rbx_epoch,
            epoch_tx: 0,
            rbx: 100_087_671,
            rbx_epoch,
            supply: params.initial_supply.clone(),
            perks: params.perks_epoch_coins.clone(),
            outcome: EpochOutcome::Succeeded {
                goal: 10_000,
                ratio: 100,
                interest: 100_087_671,
            },
        }
    }

    #[test]
    fn full_perks_with_headroom() {
        let params = RebaseParams::mainnet();
        let gate = PerksGate::new(&params).unwrap();
        let t = successful(1, &params);
        let issuance = gate.issuance(&t, &params.initial_supply).unwrap();
        assert_eq!(issuance.amount, params.perks_epoch_coins);
        assert_eq!(issuance.pool, params.perks_pool_address().unwrap());
    }

    #[test]
    fn no_intent_no_issuance() {
        let params = RebaseParams::mainnet();
        let gate = PerksGate::new(&params).unwrap();
        let mut t = successful(1, &params);
        t.perks = Amount::zero();
        t.outcome = EpochOutcome::MidEpoch;
        assert!(gate.issuance(&t, &params.initial_supply).is_none());
    }

    #[test]
    fn stops_after_max_epochs() {
        let params = RebaseParams::mainnet();
        let gate = PerksGate::new(&params).unwrap();
        assert!(gate.issuance(&successful(720, &params), &params.initial_supply).is_some());
        assert!(gate.issuance(&successful(721, &params), &params.initial_supply).is_none());
    }

    #[test]
    fn clamps_to_headroom() {
        let params = RebaseParams::mainnet();
        let gate = PerksGate::new(&params).unwrap();
        let supply = &params.max_supply - BigUint::from(1_000u32);
        let issuance = gate.issuance(&successful(3, &params), &supply).unwrap();
        assert_eq!(issuance.amount, BigUint::from(1_000u32));

        assert!(gate.issuance(&successful(3, &params), &params.max_supply).is_none());
    }

    #[test]
    fn clamp_reports_remaining() {
        let params = RebaseParams {
            max_supply: BigUint::from(10_000u32),
            initial_supply: BigUint::from(5_000u32),
            ..RebaseParams::devnet()
        };
        let gate = PerksGate::new(&params).unwrap();
        let (allowed, remaining) = gate.clamp_to_cap(&BigUint::from(2_000u32), &BigUint::from(9_000u32));
        assert_eq!(allowed, BigUint::from(1_000u32));
        assert!(remaining.is_zero());

        let (allowed, remaining) = gate.clamp_to_cap(&BigUint::from(500u32), &BigUint::from(9_000u32));
        assert_eq!(allowed, BigUint::from(500u32));
        assert_eq!(remaining, BigUint::from(500u32));
    }

    #[test]
    fn rejects_malformed_pool() {
        let params = RebaseParams {
            perks_pool: "0xzz".into(),
            ..RebaseParams::mainnet()
        };
        assert!(PerksGate::new(&params).is_err());
    }
}
