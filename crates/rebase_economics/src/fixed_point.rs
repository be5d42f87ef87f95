//! Fixed-point conversion between real (stored) and rebased (displayed) amounts.
//!
//! The multiplier carries an implicit scale of `10^8`. Both directions floor,
//! so a round trip can lose at most one unit.

use crate::errors::RebaseError;
use crate::types::{Amount, Multiplier};
use num_bigint::BigUint;
use num_traits::Zero;
use rust_decimal::Decimal;

/// Fixed-point precision of the rebase multiplier (`10^8` = 1.0)
pub const SCALE: Multiplier = 100_000_000;

/// Decimal places encoded by [`SCALE`]
pub const SCALE_DECIMALS: u32 = 8;

/// `floor(real * rbx / SCALE)`
pub fn rebased_amount(real: &Amount, rbx: Multiplier) -> Amount {
    real * BigUint::from(rbx) / BigUint::from(SCALE)
}

/// `floor(rebased * SCALE / rbx)`
pub fn real_amount(rebased: &Amount, rbx: Multiplier) -> Result<Amount, RebaseError> {
    if !is_valid_multiplier(rbx) {
        return Err(RebaseError::ZeroMultiplier);
    }
    Ok(rebased * BigUint::from(SCALE) / BigUint::from(rbx))
}

/// Balance shown to holders for a stored balance.
pub fn get_rebased_amount(amount: &Amount, rbx: Multiplier) -> Amount {
    rebased_amount(amount, rbx)
}

/// Stored amount to debit when a holder sends `amount` rebased units.
pub fn get_transfer_amount(amount: &Amount, rbx: Multiplier) -> Result<Amount, RebaseError> {
    real_amount(amount, rbx)
}

/// Multiplier as a human-readable decimal, e.g. `1.00087671`.
pub fn multiplier_as_decimal(rbx: Multiplier) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(rbx), SCALE_DECIMALS)
}

/// True when the multiplier is usable as a divisor
pub fn is_valid_multiplier(rbx: Multiplier) -> bool {
    !rbx.is_zero()
}
