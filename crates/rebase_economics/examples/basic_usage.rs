//! Basic usage example for the IPPAN rebase economics crate
//!
//! Runs a devnet engine over a few epochs with varying activity and prints
//! how the multiplier, supply and a holder's displayed balance evolve.

use ippan_rebase_economics::prelude::*;
use ippan_rebase_economics::multiplier_as_decimal;
use num_bigint::BigUint;

fn main() -> anyhow::Result<()> {
    let params = RebaseParams::devnet();
    let engine = RebaseEngine::new(params.clone())?;
    let gate = PerksGate::new(&params)?;

    println!("IPPAN Rebase Economics - Basic Usage Example\n");
    println!("  Blocks per epoch: {}", params.blocks_per_epoch);
    println!("  Initial supply:   {}", params.initial_supply);
    println!("  Max supply:       {}", params.max_supply);
    println!();

    // Busy first epochs, then activity dries up
    let activity = |block: &BlockNumber| -> u64 {
        if block < &BlockNumber::from(30u32) {
            2
        } else {
            0
        }
    };

    let holder_real = BigUint::from(1_000u64) * BigUint::from(10u64).pow(18);
    let mut state = engine.genesis();

    for height in 1u64..=60 {
        let block = BlockNumber::from(height);
        let transition = engine.process_block(&block, &state, &activity);

        if transition.outcome.closed_epoch() {
            println!(
                "Block {:>3}: {:?}, rbx={} ({})",
                height,
                transition.outcome,
                transition.rbx,
                multiplier_as_decimal(transition.rbx)
            );
            // Perks are credited against the supply after this block's growth
            let supply_now = engine.supply_for(transition.rbx);
            if let Some(issuance) = gate.issuance(&transition, &supply_now) {
                println!(
                    "           perks {} -> 0x{}",
                    issuance.amount,
                    hex::encode(issuance.pool)
                );
            }
        }
        state = transition.into_state();
    }

    println!();
    println!("Final multiplier: {}", multiplier_as_decimal(state.rbx));
    println!("Rebased supply:   {}", engine.supply_for(state.rbx));
    println!(
        "Holder balance:   {} stored -> {} displayed",
        holder_real,
        get_rebased_amount(&holder_real, state.rbx)
    );
    Ok(())
}
