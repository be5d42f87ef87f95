use ippan_rebase_economics::*;
use num_bigint::BigUint;
use num_traits::Zero;

#[test]
fn test_rebased_amount_neutral() {
    let amount = BigUint::from(60_000_000u64) * BigUint::from(SCALE);
    assert_eq!(get_rebased_amount(&amount, SCALE), amount);
}

#[test]
fn test_transfer_amount_inverse() {
    let rbx = 100_087_671;
    // Sending 1000 rebased units debits floor(1000 * 10^8 / rbx) stored units
    let real = get_transfer_amount(&BigUint::from(1_000u32), rbx).unwrap();
    assert_eq!(real, BigUint::from(999u32));
    assert!(get_transfer_amount(&BigUint::from(1_000u32), 0).is_err());
}

#[test]
fn test_epoch_success_threshold() {
    let engine = RebaseEngine::new(RebaseParams {
        blocks_per_epoch: 17_280,
        start_tx_goal: 10_000,
        ..RebaseParams::default()
    })
    .unwrap();
    let boundary = BlockNumber::from(17_280u32);

    let at = RebaseInfo {
        epoch_tx: 7_500,
        ..engine.genesis()
    };
    let below = RebaseInfo {
        epoch_tx: 7_499,
        ..engine.genesis()
    };

    let ok = engine.process_epoch(&boundary, &at, &RebaseInfo::observed(0));
    let bad = engine.process_epoch(&boundary, &below, &RebaseInfo::observed(0));

    assert!(ok.outcome.is_success());
    assert!(!bad.outcome.is_success());
    assert!(bad.outcome.closed_epoch());
    assert_eq!(ok.rbx_epoch, 1);
    assert_eq!(bad.rbx_epoch, 0);
}

#[test]
fn test_perks_signalled_only_on_success() {
    let engine = RebaseEngine::new(RebaseParams::devnet()).unwrap();
    let mut state = engine.genesis();
    for height in 1u64..=10 {
        let t = engine.process_block(&BlockNumber::from(height), &state, &FixedTxCount(1));
        if height == 10 {
            assert_eq!(t.perks, engine.params().perks_epoch_coins);
        } else {
            assert!(t.perks.is_zero());
        }
        state = t.into_state();
    }
}

#[test]
fn test_apply_clears_tx() {
    let engine = RebaseEngine::new(RebaseParams::devnet()).unwrap();
    let mut state = engine.genesis();
    let t = engine.process_epoch(&BlockNumber::from(1u32), &state, &RebaseInfo::observed(5));
    state.apply(&t);
    assert_eq!(state.epoch_tx, 5);
    assert_eq!(state.tx, 0);
}

#[test]
fn test_default_state_starts_neutral() {
    let engine = RebaseEngine::new(RebaseParams::devnet()).unwrap();
    assert_eq!(RebaseInfo::default().rbx, SCALE);

    let summary = engine.replay(1, 30, RebaseInfo::default(), &FixedTxCount(5));
    assert!(summary.state.rbx > SCALE);
    assert!(!summary.state.supply.is_zero());
    assert!(get_transfer_amount(&BigUint::from(1_000u32), summary.state.rbx).is_ok());
}

#[test]
fn test_multiplier_display() {
    assert_eq!(multiplier_as_decimal(100_087_671).to_string(), "1.00087671");
}
