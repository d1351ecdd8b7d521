//! Property-based tests using `proptest` for the ledger invariants.
//!
//! Covers the conservation and rounding-safety properties of the bin
//! ledger under randomized inputs:
//!
//! 1. **Swap conservation** — reserves move by exactly `in` and `out`,
//!    and pool value never drops by more than rounding tolerance beyond
//!    the extracted fee.
//! 2. **LP-supply invariance** — swaps never mint or burn shares.
//! 3. **Input capping** — oversized swap requests are capped, never
//!    over-drained.
//! 4. **Round-trip bound** — add then fully withdraw returns at most the
//!    deposit.
//! 5. **Share conservation** — per-bin share sums equal the bin supply
//!    after any add/withdraw/move.
//! 6. **Directional rule** — misdirected deposits always fail.

#![allow(clippy::panic)]

use proptest::prelude::*;

use crate::domain::{Amount, BinId, Shares, PRICE_SCALE};
use crate::error::AmmError;

use super::test_support::*;
use super::BURN_ACCOUNT;

fn pool_value(core: &crate::engine::DlmmCore, pool_id: crate::pool::PoolId) -> u128 {
    let Ok(pool) = core.pool(pool_id) else {
        panic!("pool exists");
    };
    let mut total = 0u128;
    for bin_id in pool.touched_bins() {
        let Ok(price) = core.bin_price_of(pool_id, bin_id) else {
            panic!("priced bin");
        };
        let bin = pool.bin(bin_id);
        total += bin.x_balance().get() * price.get() / PRICE_SCALE + bin.y_balance().get();
    }
    total
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn swap_conserves_reserves(amount in 1u128..10_000_000_000_000) {
        let (mut core, mut ledger, pool_id) = setup();
        let before = {
            let Ok(pool) = core.pool(pool_id) else { panic!("pool exists"); };
            pool.bin(BinId::ZERO)
        };
        let Ok(outcome) = core.swap_x_for_y(
            pool_id, X_TOKEN, Y_TOKEN, BinId::ZERO, Amount::new(amount), ALICE, &mut ledger,
        ) else {
            panic!("swap succeeds");
        };
        let after = {
            let Ok(pool) = core.pool(pool_id) else { panic!("pool exists"); };
            pool.bin(BinId::ZERO)
        };
        prop_assert_eq!(
            after.x_balance().get() - before.x_balance().get(),
            outcome.amount_in().get()
        );
        prop_assert_eq!(
            before.y_balance().get() - after.y_balance().get(),
            outcome.amount_out().get()
        );
        prop_assert!(outcome.amount_in().get() <= amount);
        prop_assert!(outcome.amount_out() <= before.y_balance());
    }

    #[test]
    fn swap_never_leaks_pool_value(amount in 1u128..10_000_000_000_000) {
        let (mut core, mut ledger, pool_id) = setup();
        let value_before = pool_value(&core, pool_id);
        let Ok(_) = core.swap_x_for_y(
            pool_id, X_TOKEN, Y_TOKEN, BinId::ZERO, Amount::new(amount), ALICE, &mut ledger,
        ) else {
            panic!("swap succeeds");
        };
        let value_after = pool_value(&core, pool_id);
        // Rounding favours the pool: value may only grow (fees stay in),
        // or shrink by at most one unit of rounding slack.
        prop_assert!(value_after + 1 >= value_before);
    }

    #[test]
    fn swap_preserves_lp_supply(amount in 1u128..10_000_000_000_000) {
        let (mut core, mut ledger, pool_id) = setup();
        let supply_before = {
            let Ok(pool) = core.pool(pool_id) else { panic!("pool exists"); };
            pool.bin(BinId::ZERO).total_supply()
        };
        let Ok(_) = core.swap_x_for_y(
            pool_id, X_TOKEN, Y_TOKEN, BinId::ZERO, Amount::new(amount), ALICE, &mut ledger,
        ) else {
            panic!("swap succeeds");
        };
        let supply_after = {
            let Ok(pool) = core.pool(pool_id) else { panic!("pool exists"); };
            pool.bin(BinId::ZERO).total_supply()
        };
        prop_assert_eq!(supply_before, supply_after);
    }

    #[test]
    fn add_withdraw_round_trip_is_bounded(deposit in 1_000u128..1_000_000_000_000) {
        let (mut core, mut ledger, pool_id) = setup();
        let Ok(shares) = core.add_liquidity(
            pool_id, X_TOKEN, Y_TOKEN, bin(-1),
            Amount::ZERO, Amount::new(deposit),
            Shares::new(1), Amount::new(u128::MAX), Amount::new(u128::MAX),
            ALICE, &mut ledger,
        ) else {
            panic!("add succeeds");
        };
        let Ok(paid) = core.withdraw_liquidity(
            pool_id, X_TOKEN, Y_TOKEN, bin(-1),
            shares, Amount::ZERO, Amount::ZERO, ALICE, &mut ledger,
        ) else {
            panic!("withdraw succeeds");
        };
        prop_assert!(paid.y_amount().get() <= deposit);
        prop_assert!(deposit - paid.y_amount().get() <= 2);
        prop_assert!(paid.x_amount().is_zero());
    }

    #[test]
    fn share_sums_match_supply(
        deposit_a in 1_000u128..1_000_000_000,
        deposit_b in 1_000u128..1_000_000_000,
        withdraw_num in 1u128..100,
    ) {
        let (mut core, mut ledger, pool_id) = setup();
        let Ok(a) = core.add_liquidity(
            pool_id, X_TOKEN, Y_TOKEN, bin(-1),
            Amount::ZERO, Amount::new(deposit_a),
            Shares::new(1), Amount::new(u128::MAX), Amount::new(u128::MAX),
            ALICE, &mut ledger,
        ) else {
            panic!("alice add succeeds");
        };
        let Ok(_) = core.add_liquidity(
            pool_id, X_TOKEN, Y_TOKEN, bin(-1),
            Amount::ZERO, Amount::new(deposit_b),
            Shares::new(1), Amount::new(u128::MAX), Amount::new(u128::MAX),
            BOB, &mut ledger,
        ) else {
            panic!("bob add succeeds");
        };
        let part = Shares::new((a.get() * withdraw_num / 100).max(1));
        let Ok(_) = core.withdraw_liquidity(
            pool_id, X_TOKEN, Y_TOKEN, bin(-1),
            part, Amount::ZERO, Amount::ZERO, ALICE, &mut ledger,
        ) else {
            panic!("withdraw succeeds");
        };
        let Ok(pool) = core.pool(pool_id) else { panic!("pool exists"); };
        let sum: u128 = [ALICE, BOB, ADMIN, BURN_ACCOUNT]
            .iter()
            .map(|account| pool.user_shares(bin(-1), *account).get())
            .sum();
        prop_assert_eq!(sum, pool.bin(bin(-1)).total_supply().get());
    }

    #[test]
    fn directional_rule_always_rejects(
        offset in 1i32..400,
        x in 1u128..1_000_000_000,
        y in 1u128..1_000_000_000,
    ) {
        let (mut core, mut ledger, pool_id) = setup();
        // X into a bin below the active bin.
        let below = core.add_liquidity(
            pool_id, X_TOKEN, Y_TOKEN, bin(-offset),
            Amount::new(x), Amount::ZERO,
            Shares::new(1), Amount::new(u128::MAX), Amount::new(u128::MAX),
            ALICE, &mut ledger,
        );
        prop_assert_eq!(
            below.err().map(|e| core::mem::discriminant(&e)),
            Some(core::mem::discriminant(&AmmError::InvalidXAmount("")))
        );
        // Y into a bin above the active bin.
        let above = core.add_liquidity(
            pool_id, X_TOKEN, Y_TOKEN, bin(offset),
            Amount::ZERO, Amount::new(y),
            Shares::new(1), Amount::new(u128::MAX), Amount::new(u128::MAX),
            ALICE, &mut ledger,
        );
        prop_assert_eq!(
            above.err().map(|e| core::mem::discriminant(&e)),
            Some(core::mem::discriminant(&AmmError::InvalidYAmount("")))
        );
    }

    #[test]
    fn fee_cap_is_monotone_under_setters(
        protocol in 0u32..=10_000,
        provider in 0u32..=10_000,
        variable in 0u32..=10_000,
    ) {
        let (mut core, _ledger, pool_id) = setup();
        let _ = core.set_x_fees(
            pool_id, ADMIN,
            crate::domain::BasisPoints::new(protocol),
            crate::domain::BasisPoints::new(provider),
        );
        let _ = core.set_variable_fees(
            pool_id, ADMIN,
            crate::domain::BasisPoints::new(variable),
            crate::domain::BasisPoints::new(variable),
            1_000_000,
        );
        // Whatever succeeded, the cap holds afterwards.
        let Ok(pool) = core.pool(pool_id) else { panic!("pool exists"); };
        prop_assert!(pool.x_fees().total().get() <= 10_000);
        prop_assert!(pool.y_fees().total().get() <= 10_000);
    }
}
