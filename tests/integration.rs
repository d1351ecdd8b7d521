//! Integration tests exercising the full system through the public API:
//! pool creation, multi-bin liquidity, swaps with bin crossing, fee
//! accrual and claiming, and the documented end-to-end scenarios.

#![allow(clippy::panic)]

use lattice_amm::domain::{AccountId, Amount, BasisPoints, BinId, Shares, TokenId, PRICE_SCALE};
use lattice_amm::engine::{DlmmCore, BURN_ACCOUNT};
use lattice_amm::error::AmmError;
use lattice_amm::ledger::{InMemoryLedger, TokenLedger};
use lattice_amm::pool::{PoolId, PoolParams};
use lattice_amm::registry::FactorTable;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const ADMIN: AccountId = AccountId::from_bytes([1u8; 32]);
const ALICE: AccountId = AccountId::from_bytes([2u8; 32]);
const BOB: AccountId = AccountId::from_bytes([3u8; 32]);
const FEE_SINK: AccountId = AccountId::from_bytes([4u8; 32]);
const X_TOKEN: TokenId = TokenId::from_bytes([10u8; 32]);
const Y_TOKEN: TokenId = TokenId::from_bytes([11u8; 32]);

/// 0.1 X (8 decimals) against 5 000 Y (6 decimals): raw price 500 Y/X.
const X_SEED: u128 = 10_000_000;
const Y_SEED: u128 = 5_000_000_000;

fn bin(id: i32) -> BinId {
    let Ok(b) = BinId::new(id) else {
        panic!("valid bin id");
    };
    b
}

fn base_params() -> PoolParams {
    PoolParams {
        x_token: X_TOKEN,
        y_token: Y_TOKEN,
        x_seed: Amount::new(X_SEED),
        y_seed: Amount::new(Y_SEED),
        burn_amount: Shares::new(1_000),
        x_protocol_fee: 1_000,
        x_provider_fee: 3_000,
        y_protocol_fee: 1_000,
        y_provider_fee: 3_000,
        bin_step: 25,
        variable_fees_cooldown: 900,
        freeze_variable_fees_manager: false,
        fee_address: FEE_SINK,
        enabled: true,
    }
}

fn setup_with(params: PoolParams) -> (DlmmCore, InMemoryLedger, PoolId) {
    let mut core = DlmmCore::new(ADMIN);
    let Ok(table) = FactorTable::uniform_step(params.bin_step) else {
        panic!("valid bin step");
    };
    let Ok(()) = core
        .registry_mut()
        .add_bin_step(ADMIN, params.bin_step, table)
    else {
        panic!("step registered");
    };
    let mut ledger = InMemoryLedger::new();
    for account in [ADMIN, ALICE, BOB] {
        ledger.mint(X_TOKEN, account, Amount::new(u128::MAX / 8));
        ledger.mint(Y_TOKEN, account, Amount::new(u128::MAX / 8));
    }
    let Ok(pool_id) = core.create_pool(ADMIN, params, 0, &mut ledger) else {
        panic!("pool created");
    };
    (core, ledger, pool_id)
}

fn setup() -> (DlmmCore, InMemoryLedger, PoolId) {
    setup_with(base_params())
}

fn setup_no_fees() -> (DlmmCore, InMemoryLedger, PoolId) {
    setup_with(PoolParams {
        x_protocol_fee: 0,
        x_provider_fee: 0,
        y_protocol_fee: 0,
        y_provider_fee: 0,
        ..base_params()
    })
}

#[allow(clippy::too_many_arguments)]
fn add(
    core: &mut DlmmCore,
    ledger: &mut InMemoryLedger,
    pool_id: PoolId,
    bin_id: BinId,
    x: u128,
    y: u128,
    caller: AccountId,
) -> Shares {
    let Ok(shares) = core.add_liquidity(
        pool_id,
        X_TOKEN,
        Y_TOKEN,
        bin_id,
        Amount::new(x),
        Amount::new(y),
        Shares::new(1),
        Amount::new(u128::MAX),
        Amount::new(u128::MAX),
        caller,
        ledger,
    ) else {
        panic!("add succeeds");
    };
    shares
}

// ---------------------------------------------------------------------------
// Full lifecycle
// ---------------------------------------------------------------------------

#[test]
fn full_trading_lifecycle() {
    let (mut core, mut ledger, pool_id) = setup();

    // Provide a ranged position: Y below, both at active, X above.
    add(&mut core, &mut ledger, pool_id, bin(-2), 0, 1_000_000_000, ALICE);
    add(&mut core, &mut ledger, pool_id, bin(-1), 0, 1_000_000_000, ALICE);
    add(
        &mut core,
        &mut ledger,
        pool_id,
        bin(0),
        2_000_000,
        1_000_000_000,
        ALICE,
    );
    add(&mut core, &mut ledger, pool_id, bin(1), 2_000_000, 0, ALICE);
    add(&mut core, &mut ledger, pool_id, bin(2), 2_000_000, 0, ALICE);

    // Trade through the active bin.
    let Ok(outcome) = core.swap_x_for_y(
        pool_id,
        X_TOKEN,
        Y_TOKEN,
        bin(0),
        Amount::new(3_000_000),
        BOB,
        &mut ledger,
    ) else {
        panic!("swap succeeds");
    };
    assert!(outcome.amount_out().get() > 0);

    // Protocol fees accrued and are claimable by anyone, paid to the
    // configured sink.
    let Ok(pool) = core.pool(pool_id) else {
        panic!("pool exists");
    };
    let expected = pool.unclaimed_fees().x_fee();
    assert!(!expected.is_zero());
    let sink_before = ledger.balance_of(X_TOKEN, FEE_SINK);
    let Ok(claimed) = core.claim_protocol_fees(pool_id, X_TOKEN, Y_TOKEN, &mut ledger) else {
        panic!("claim succeeds");
    };
    assert!(claimed);
    assert_eq!(
        ledger.balance_of(X_TOKEN, FEE_SINK).get(),
        sink_before.get() + expected.get()
    );
    // Second claim is a no-op.
    let Ok(claimed_again) = core.claim_protocol_fees(pool_id, X_TOKEN, Y_TOKEN, &mut ledger)
    else {
        panic!("claim succeeds");
    };
    assert!(!claimed_again);

    // Providers can exit every bin they funded.
    let Ok(pool) = core.pool(pool_id) else {
        panic!("pool exists");
    };
    let held = pool.user_shares(bin(-2), ALICE);
    let Ok(paid) = core.withdraw_liquidity(
        pool_id,
        X_TOKEN,
        Y_TOKEN,
        bin(-2),
        held,
        Amount::ZERO,
        Amount::ZERO,
        ALICE,
        &mut ledger,
    ) else {
        panic!("withdraw succeeds");
    };
    assert!(paid.y_amount().get() > 0);
}

#[test]
fn multi_bin_traversal_by_reinvocation() {
    let (mut core, mut ledger, pool_id) = setup();
    // Y liquidity waits below the active bin.
    add(&mut core, &mut ledger, pool_id, bin(-1), 0, 1_000_000_000, ALICE);
    add(&mut core, &mut ledger, pool_id, bin(-2), 0, 1_000_000_000, ALICE);

    // A router-style loop: swap at the active bin, re-read the pointer,
    // re-invoke. Three bins' worth of Y gets consumed one call at a time.
    let mut total_out = 0u128;
    let mut crossings = 0;
    loop {
        let Ok(pool) = core.pool(pool_id) else {
            panic!("pool exists");
        };
        let active = pool.active_bin_id();
        if active < bin(-2) || crossings > 3 {
            break;
        }
        let Ok(outcome) = core.swap_x_for_y(
            pool_id,
            X_TOKEN,
            Y_TOKEN,
            active,
            Amount::new(u128::MAX / 16),
            BOB,
            &mut ledger,
        ) else {
            panic!("swap succeeds");
        };
        total_out += outcome.amount_out().get();
        crossings += 1;
    }
    assert!(total_out > Y_SEED + 1_500_000_000);
    let Ok(pool) = core.pool(pool_id) else {
        panic!("pool exists");
    };
    assert_eq!(pool.bin_change_count(), 3);
    // Calls against a stale bin id fail cleanly.
    assert!(matches!(
        core.swap_x_for_y(
            pool_id,
            X_TOKEN,
            Y_TOKEN,
            bin(0),
            Amount::new(1_000),
            BOB,
            &mut ledger
        ),
        Err(AmmError::NotActiveBin(_))
    ));
}

// ---------------------------------------------------------------------------
// Documented scenarios
// ---------------------------------------------------------------------------

/// Bin step 25, active bin 0: two identical deposits against a
/// proportionally grown bin mint identical share amounts.
#[test]
fn scenario_identical_deposits() {
    let (mut core, mut ledger, pool_id) = setup_no_fees();
    let lp1 = add(
        &mut core,
        &mut ledger,
        pool_id,
        bin(0),
        1_000_000,
        500_000_000,
        ALICE,
    );
    assert!(lp1.get() > 0);
    let lp2 = add(
        &mut core,
        &mut ledger,
        pool_id,
        bin(0),
        1_000_000,
        500_000_000,
        ALICE,
    );
    assert_eq!(lp2, lp1);
    let Ok(pool) = core.pool(pool_id) else {
        panic!("pool exists");
    };
    assert_eq!(
        pool.user_shares(bin(0), ALICE).get(),
        lp1.get() + lp2.get()
    );
}

/// A swap far exceeding bin capacity is capped, pays out at most the
/// pre-swap reserve, and still returns a positive fill.
#[test]
fn scenario_oversized_swap_is_capped() {
    let (mut core, mut ledger, pool_id) = setup();
    let request = Amount::new(999_999_999_999);
    let Ok(before) = core.pool(pool_id).map(|p| p.bin(bin(0))) else {
        panic!("pool exists");
    };
    let Ok(outcome) = core.swap_x_for_y(
        pool_id,
        X_TOKEN,
        Y_TOKEN,
        bin(0),
        request,
        ALICE,
        &mut ledger,
    ) else {
        panic!("swap succeeds");
    };
    assert!(outcome.amount_in() < request);
    assert!(outcome.amount_in().get() > 0);
    assert!(outcome.amount_out().get() > 0);
    assert!(outcome.amount_out() <= before.y_balance());
}

/// The only LP of a bin withdrawing everything leaves the bin exactly
/// zeroed: supply, X, and Y.
#[test]
fn scenario_full_exit_leaves_no_dust() {
    let (mut core, mut ledger, pool_id) = setup();
    let shares = add(&mut core, &mut ledger, pool_id, bin(3), 7_777_777, 0, ALICE);
    let Ok(_) = core.withdraw_liquidity(
        pool_id,
        X_TOKEN,
        Y_TOKEN,
        bin(3),
        shares,
        Amount::ZERO,
        Amount::ZERO,
        ALICE,
        &mut ledger,
    ) else {
        panic!("withdraw succeeds");
    };
    let Ok(pool) = core.pool(pool_id) else {
        panic!("pool exists");
    };
    let emptied = pool.bin(bin(3));
    assert_eq!(emptied.total_supply(), Shares::ZERO);
    assert_eq!(emptied.x_balance(), Amount::ZERO);
    assert_eq!(emptied.y_balance(), Amount::ZERO);
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[test]
fn bin_prices_follow_the_step_geometry() {
    let (core, _ledger, pool_id) = setup();
    let Ok(center) = core.bin_price_of(pool_id, bin(0)) else {
        panic!("priced");
    };
    // Seed composition prices bin 0 at 500 Y per X.
    assert_eq!(center.get(), 500 * PRICE_SCALE);
    let Ok(above) = core.bin_price_of(pool_id, bin(1)) else {
        panic!("priced");
    };
    let Ok(below) = core.bin_price_of(pool_id, bin(-1)) else {
        panic!("priced");
    };
    assert!(above > center);
    assert!(below < center);
    // One bin step is 25 basis points.
    assert_eq!(above.get(), center.get() * 10_025 / 10_000);
}

// ---------------------------------------------------------------------------
// Fee governance end to end
// ---------------------------------------------------------------------------

#[test]
fn variable_fee_lifecycle_with_cooldown_and_freeze() {
    let (mut core, mut ledger, pool_id) = setup();
    let Ok(()) = core.set_variable_fees_manager(pool_id, ADMIN, BOB) else {
        panic!("manager set");
    };

    // Manager raises variable fees once the cooldown allows.
    assert!(matches!(
        core.set_variable_fees(pool_id, BOB, BasisPoints::new(200), BasisPoints::new(150), 10),
        Err(AmmError::VariableFeesCooldown(_))
    ));
    let Ok(()) =
        core.set_variable_fees(pool_id, BOB, BasisPoints::new(200), BasisPoints::new(150), 900)
    else {
        panic!("fees set");
    };

    // The raised rate is charged on swaps: total X rate is now 42%.
    let Ok(outcome) = core.swap_x_for_y(
        pool_id,
        X_TOKEN,
        Y_TOKEN,
        bin(0),
        Amount::new(1_000_000),
        ALICE,
        &mut ledger,
    ) else {
        panic!("swap succeeds");
    };
    assert_eq!(outcome.fee(), Amount::new(420_000));

    // Unauthorized resets are rejected; the admin can reset after the
    // cooldown, and freezing removes the manager's rights for good.
    assert!(matches!(
        core.reset_variable_fees(pool_id, ALICE, 5_000),
        Err(AmmError::NotAuthorized(_))
    ));
    let Ok(()) = core.reset_variable_fees(pool_id, ADMIN, 5_000) else {
        panic!("reset succeeds");
    };
    let Ok(()) = core.freeze_variable_fees_manager(pool_id, ADMIN) else {
        panic!("freeze succeeds");
    };
    assert!(matches!(
        core.set_variable_fees(pool_id, BOB, BasisPoints::new(1), BasisPoints::new(1), 50_000),
        Err(AmmError::VariableFeesManagerFrozen(_))
    ));
}

#[test]
fn fee_exemption_spans_swaps_and_active_bin_adds() {
    let (mut core, mut ledger, pool_id) = setup();
    let Ok(()) = core.set_swap_fee_exemption(pool_id, ADMIN, ALICE, true) else {
        panic!("exemption set");
    };
    let Ok(outcome) = core.swap_x_for_y(
        pool_id,
        X_TOKEN,
        Y_TOKEN,
        bin(0),
        Amount::new(1_000_000),
        ALICE,
        &mut ledger,
    ) else {
        panic!("swap succeeds");
    };
    assert!(outcome.fee().is_zero());

    // The exemption also waives the active-bin liquidity fee.
    let Ok(fees_before) = core.pool(pool_id).map(|p| p.unclaimed_fees()) else {
        panic!("pool exists");
    };
    add(&mut core, &mut ledger, pool_id, bin(0), 100_000, 50_000_000, ALICE);
    let Ok(fees_after) = core.pool(pool_id).map(|p| p.unclaimed_fees()) else {
        panic!("pool exists");
    };
    assert_eq!(fees_before, fees_after);
}

// ---------------------------------------------------------------------------
// Conservation across a mixed session
// ---------------------------------------------------------------------------

#[test]
fn custody_always_covers_reserves_and_fees() {
    let (mut core, mut ledger, pool_id) = setup();
    add(&mut core, &mut ledger, pool_id, bin(-1), 0, 800_000_000, ALICE);
    add(&mut core, &mut ledger, pool_id, bin(1), 1_500_000, 0, BOB);
    let Ok(_) = core.swap_x_for_y(
        pool_id,
        X_TOKEN,
        Y_TOKEN,
        bin(0),
        Amount::new(4_000_000),
        BOB,
        &mut ledger,
    ) else {
        panic!("swap succeeds");
    };
    let Ok(pool) = core.pool(pool_id) else {
        panic!("pool exists");
    };
    let custody = pool.account();
    let mut x_reserves = 0u128;
    let mut y_reserves = 0u128;
    for bin_id in pool.touched_bins() {
        let b = pool.bin(bin_id);
        x_reserves += b.x_balance().get();
        y_reserves += b.y_balance().get();
    }
    // Custody holds at least the ledgered reserves plus unclaimed fees.
    assert!(
        ledger.balance_of(X_TOKEN, custody).get()
            >= x_reserves + pool.unclaimed_fees().x_fee().get()
    );
    assert!(
        ledger.balance_of(Y_TOKEN, custody).get()
            >= y_reserves + pool.unclaimed_fees().y_fee().get()
    );
}

// ---------------------------------------------------------------------------
// Registry wiring
// ---------------------------------------------------------------------------

#[test]
fn pool_creation_burns_seed_shares() {
    let (core, _ledger, pool_id) = setup();
    let Ok(pool) = core.pool(pool_id) else {
        panic!("pool exists");
    };
    let burnt = pool.user_shares(bin(0), BURN_ACCOUNT);
    assert_eq!(burnt, Shares::new(1_000));
    // Burnt shares count toward supply but belong to nobody reachable.
    assert!(pool.bin(bin(0)).total_supply() > burnt);
}

#[test]
fn several_pools_share_one_registry() {
    let (mut core, mut ledger, first) = setup();
    let second_params = PoolParams {
        x_token: TokenId::from_bytes([20u8; 32]),
        y_token: TokenId::from_bytes([21u8; 32]),
        ..base_params()
    };
    ledger.mint(second_params.x_token, ADMIN, Amount::new(X_SEED));
    ledger.mint(second_params.y_token, ADMIN, Amount::new(Y_SEED));
    let Ok(second) = core.create_pool(ADMIN, second_params, 0, &mut ledger) else {
        panic!("second pool created");
    };
    assert_ne!(first, second);
    // Both pools price off the same registered factor table.
    let Ok(a) = core.bin_price_of(first, bin(5)) else {
        panic!("priced");
    };
    let Ok(b) = core.bin_price_of(second, bin(5)) else {
        panic!("priced");
    };
    assert_eq!(a, b);
}
