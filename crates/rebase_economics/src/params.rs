use crate::engine::MAX_TX_RATIO;
use crate::errors::RebaseError;
use crate::fixed_point::SCALE;
use crate::types::{decimal_string, Amount, Multiplier};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Smallest units per whole token (18 decimals)
pub const UNITS_PER_TOKEN: u64 = 1_000_000_000_000_000_000;

/// Deployment constants controlling epoch goals, interest and supply.
///
/// Every node must run with an identical set; they are loaded once at startup
/// and never changed at runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebaseParams {
    /// Epoch length in blocks
    pub blocks_per_epoch: u64,
    /// Transaction goal of the very first epoch
    pub start_tx_goal: u64,
    /// Goal increase per successful epoch
    pub epoch_tx_increment: u64,
    /// Maximum per-epoch interest, fixed-point (`10^8` = no growth)
    pub interest_per_epoch: Multiplier,
    /// Real total supply at genesis
    #[serde(with = "decimal_string")]
    pub initial_supply: Amount,
    /// Rebased supply ceiling; growth freezes once reached
    #[serde(with = "decimal_string")]
    pub max_supply: Amount,
    /// Bonus coins signalled per successful epoch
    #[serde(with = "decimal_string")]
    pub perks_epoch_coins: Amount,
    /// Successful epochs for which perks may be credited
    pub perks_max_epochs: u64,
    /// Hex address (`0x` + 40 digits) receiving perks
    pub perks_pool: String,
}

impl Default for RebaseParams {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl RebaseParams {
    /// Production schedule: one epoch per 17280 blocks (~1 day at 5s blocks).
    pub fn mainnet() -> Self {
        let unit = BigUint::from(UNITS_PER_TOKEN);
        Self {
            blocks_per_epoch: 17_280,
            start_tx_goal: 10_000,
            epoch_tx_increment: 500,
            // 1.00087671 per epoch, ~37.7% a year at full activity
            interest_per_epoch: 100_087_671,
            initial_supply: BigUint::from(50_000_000u64) * &unit,
            max_supply: BigUint::from(250_000_000u64) * &unit,
            // 10M tokens spread over 720 epochs
            perks_epoch_coins: BigUint::from(13_888_888_888_888_888_889_000u128),
            perks_max_epochs: 720,
            perks_pool: "0xbc1fBEbE0184446C9aac772E58A085b7cf13B543".to_string(),
        }
    }

    /// Short epochs and tiny goals for local networks.
    pub fn devnet() -> Self {
        Self {
            blocks_per_epoch: 10,
            start_tx_goal: 3,
            epoch_tx_increment: 1,
            ..Self::mainnet()
        }
    }

    /// Parse and validate parameters from JSON.
    pub fn from_json_str(raw: &str) -> Result<Self, RebaseError> {
        let params: Self =
            serde_json::from_str(raw).map_err(|e| RebaseError::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Parse and validate parameters from TOML.
    pub fn from_toml_str(raw: &str) -> Result<Self, RebaseError> {
        let params: Self = toml::from_str(raw).map_err(|e| RebaseError::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Reject parameter sets that would make any per-block computation divide
    /// by zero, underflow, or overflow the multiplier.
    pub fn validate(&self) -> Result<(), RebaseError> {
        if self.blocks_per_epoch == 0 {
            return Err(RebaseError::InvalidParameter("blocks_per_epoch must be > 0"));
        }
        if self.start_tx_goal == 0 {
            return Err(RebaseError::InvalidParameter("start_tx_goal must be > 0"));
        }
        if self.interest_per_epoch < SCALE {
            return Err(RebaseError::InvalidParameter(
                "interest_per_epoch must be >= 100000000",
            ));
        }
        if self.initial_supply.is_zero() {
            return Err(RebaseError::InvalidParameter("initial_supply must be > 0"));
        }
        if self.max_supply < self.initial_supply {
            return Err(RebaseError::InvalidParameter(
                "max_supply must be >= initial_supply",
            ));
        }
        self.perks_pool_address()?;

        // Largest multiplier that still passes the supply gate, grown once at full rate.
        let scale = BigUint::from(SCALE);
        let gate = (&self.max_supply * &scale + &self.initial_supply - 1u32) / &self.initial_supply;
        let grown = gate * BigUint::from(self.interest_for_ratio(MAX_TX_RATIO)) / scale;
        if grown > BigUint::from(u64::MAX) {
            return Err(RebaseError::InvalidParameter(
                "max_supply / initial_supply ratio overflows the multiplier",
            ));
        }
        Ok(())
    }

    /// Decoded 20-byte perks pool address.
    pub fn perks_pool_address(&self) -> Result<[u8; 20], RebaseError> {
        let digits = self
            .perks_pool
            .strip_prefix("0x")
            .or_else(|| self.perks_pool.strip_prefix("0X"))
            .ok_or_else(|| RebaseError::InvalidPerksPool(self.perks_pool.clone()))?;
        let bytes =
            hex::decode(digits).map_err(|_| RebaseError::InvalidPerksPool(self.perks_pool.clone()))?;
        bytes
            .try_into()
            .map_err(|_| RebaseError::InvalidPerksPool(self.perks_pool.clone()))
    }

    /// Transaction goal for an epoch given the number of prior successful epochs.
    pub fn tx_goal(&self, rbx_epoch: u64) -> u64 {
        self.start_tx_goal
            .saturating_add(rbx_epoch.saturating_mul(self.epoch_tx_increment))
    }

    /// Per-epoch interest for an activity ratio (percent of goal):
    /// `(interest_per_epoch - SCALE) * ratio / 100 + SCALE`.
    ///
    /// A ratio of 100 yields exactly `interest_per_epoch`.
    pub fn interest_for_ratio(&self, ratio: u64) -> u128 {
        let excess = u128::from(self.interest_per_epoch.saturating_sub(SCALE));
        excess * u128::from(ratio) / 100 + u128::from(SCALE)
    }
}
