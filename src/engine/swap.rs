//! Single-bin swap execution.
//!
//! A swap call operates only at the bin the caller names, which must be
//! the pool's current active bin. The engine caps the input at what the
//! bin's outbound reserve can absorb, deducts the fee from the input, and
//! pays out at the bin price. Bin crossing is a *consequence*: when the
//! outbound reserve hits zero the active-bin pointer steps exactly one
//! bin toward the depleted side, and the caller re-invokes against the
//! new active bin to continue. The engine never traverses bins itself.
//!
//! # Algorithm (x→y; y→x is the mirror)
//!
//! 1. `max_in = ceil(y_reserve × PRICE_SCALE / price)` — the largest
//!    input the reserve fully absorbs.
//! 2. Scale the cap up for the input-side fee:
//!    `ceil(max_in × FEE_SCALE / (FEE_SCALE − fee_bps))`.
//! 3. `effective_in = min(requested, cap)`.
//! 4. `fee = floor(effective_in × fee_bps / FEE_SCALE)`.
//! 5. `out = min(floor((effective_in − fee) × price / PRICE_SCALE),
//!    y_reserve)`.
//!
//! Ceilings sit on capacity caps and floors on fees and outputs; the
//! bias always favours the pool.

use crate::domain::{
    AccountId, Amount, BasisPoints, BinId, BinPrice, Rounding, SwapOutcome, TokenId, FEE_SCALE,
    PRICE_SCALE,
};
use crate::error::AmmError;
use crate::ledger::TokenLedger;
use crate::math::{bin_price, mul_div};
use crate::pool::{Bin, FeeComponents, Pool, PoolId};

use super::{check_enabled, check_tokens, DlmmCore};

/// Which asset enters the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    XForY,
    YForX,
}

/// A fully validated swap, ready to commit. All post-state values are
/// precomputed so the commit itself cannot fail.
#[derive(Debug, Clone, Copy)]
struct SwapPlan {
    effective_in: Amount,
    amount_out: Amount,
    fee_total: Amount,
    fee_protocol: Amount,
    new_in_reserve: Amount,
    new_out_reserve: Amount,
}

fn plan_swap(
    direction: Direction,
    bin: &Bin,
    price: BinPrice,
    fees: &FeeComponents,
    exempt: bool,
    requested: Amount,
) -> crate::error::Result<SwapPlan> {
    let (in_reserve, out_reserve) = match direction {
        Direction::XForY => (bin.x_balance(), bin.y_balance()),
        Direction::YForX => (bin.y_balance(), bin.x_balance()),
    };

    // Largest input the outbound reserve can fully absorb, rounded up so
    // the reserve side of the cap is never understated.
    let max_in = match direction {
        Direction::XForY => mul_div(out_reserve.get(), PRICE_SCALE, price.get(), Rounding::Up),
        Direction::YForX => mul_div(out_reserve.get(), price.get(), PRICE_SCALE, Rounding::Up),
    }
    .ok_or(AmmError::Overflow("swap capacity"))?;

    let fee_bps = if exempt { BasisPoints::ZERO } else { fees.total() };

    // The fee comes out of the input, so the cap must admit enough gross
    // input that the post-fee amount still reaches max_in.
    let capped = if fee_bps.is_zero() {
        max_in
    } else {
        mul_div(
            max_in,
            FEE_SCALE as u128,
            (FEE_SCALE - fee_bps.get()) as u128,
            Rounding::Up,
        )
        .ok_or(AmmError::Overflow("swap fee adjustment"))?
    };

    let effective_in = requested.min(Amount::new(capped));
    let fee_total = fee_bps.apply(effective_in, Rounding::Down)?;
    let fee_protocol = if exempt {
        Amount::ZERO
    } else {
        fees.protocol().apply(effective_in, Rounding::Down)?
    };
    let net_in = effective_in
        .checked_sub(fee_total)
        .ok_or(AmmError::Overflow("net swap input"))?;

    let out_raw = match direction {
        Direction::XForY => mul_div(net_in.get(), price.get(), PRICE_SCALE, Rounding::Down),
        Direction::YForX => mul_div(net_in.get(), PRICE_SCALE, price.get(), Rounding::Down),
    }
    .ok_or(AmmError::Overflow("swap output"))?;
    let amount_out = Amount::new(out_raw).min(out_reserve);

    let new_in_reserve = in_reserve
        .checked_add(effective_in)
        .ok_or(AmmError::Overflow("inbound reserve"))?;
    let new_out_reserve = out_reserve
        .checked_sub(amount_out)
        .ok_or(AmmError::Overflow("outbound reserve"))?;

    Ok(SwapPlan {
        effective_in,
        amount_out,
        fee_total,
        fee_protocol,
        new_in_reserve,
        new_out_reserve,
    })
}

impl DlmmCore {
    /// Swaps X into the pool for Y out of the active bin.
    ///
    /// The returned outcome's `amount_in` may be less than `x_amount`:
    /// the engine caps the input at what the bin's Y reserve can pay
    /// for. When the Y reserve is exhausted by the swap the active-bin
    /// pointer steps one bin down and the call still succeeds; re-invoke
    /// against the new active bin to keep trading.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NoPoolData`] / [`AmmError::PoolDisabled`] on pool
    ///   lookup or status.
    /// - [`AmmError::InvalidXToken`] / [`AmmError::InvalidYToken`] on
    ///   mismatched asset refs.
    /// - [`AmmError::NotActiveBin`] if `bin_id` is not the active bin.
    /// - [`AmmError::InvalidAmount`] if `x_amount` is zero.
    /// - [`AmmError::InsufficientTokenBalance`] if the caller cannot
    ///   fund the effective input.
    /// - [`AmmError::Overflow`] on arithmetic overflow.
    pub fn swap_x_for_y<L: TokenLedger>(
        &mut self,
        id: PoolId,
        x_token: TokenId,
        y_token: TokenId,
        bin_id: BinId,
        x_amount: Amount,
        caller: AccountId,
        ledger: &mut L,
    ) -> crate::error::Result<SwapOutcome> {
        self.swap(
            Direction::XForY,
            id,
            x_token,
            y_token,
            bin_id,
            x_amount,
            caller,
            ledger,
        )
    }

    /// Swaps Y into the pool for X out of the active bin.
    ///
    /// The exact mirror of [`swap_x_for_y`](Self::swap_x_for_y): the
    /// input cap derives from the X reserve, the output is capped at the
    /// X reserve, and exhausting it steps the active-bin pointer one bin
    /// up.
    ///
    /// # Errors
    ///
    /// Same conditions as [`swap_x_for_y`](Self::swap_x_for_y).
    pub fn swap_y_for_x<L: TokenLedger>(
        &mut self,
        id: PoolId,
        x_token: TokenId,
        y_token: TokenId,
        bin_id: BinId,
        y_amount: Amount,
        caller: AccountId,
        ledger: &mut L,
    ) -> crate::error::Result<SwapOutcome> {
        self.swap(
            Direction::YForX,
            id,
            x_token,
            y_token,
            bin_id,
            y_amount,
            caller,
            ledger,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn swap<L: TokenLedger>(
        &mut self,
        direction: Direction,
        id: PoolId,
        x_token: TokenId,
        y_token: TokenId,
        bin_id: BinId,
        amount: Amount,
        caller: AccountId,
        ledger: &mut L,
    ) -> crate::error::Result<SwapOutcome> {
        let pool = self.pool(id)?;
        check_enabled(pool)?;
        check_tokens(pool, x_token, y_token)?;
        if bin_id != pool.active_bin_id() {
            return Err(AmmError::NotActiveBin("named bin is not the active bin"));
        }
        if amount.is_zero() {
            return Err(AmmError::InvalidAmount("swap input must be positive"));
        }

        let table = self.registry().factors(pool.bin_step())?;
        let price = bin_price(pool.initial_price(), table, bin_id)?;
        let bin = pool.bin(bin_id);
        let fees = match direction {
            Direction::XForY => pool.x_fees(),
            Direction::YForX => pool.y_fees(),
        };
        let exempt = pool.is_fee_exempt(caller);
        let plan = plan_swap(direction, &bin, price, &fees, exempt, amount)?;
        let unclaimed_side = match direction {
            Direction::XForY => pool.unclaimed_fees().x_fee(),
            Direction::YForX => pool.unclaimed_fees().y_fee(),
        };
        let new_unclaimed = unclaimed_side
            .checked_add(plan.fee_protocol)
            .ok_or(AmmError::Overflow("unclaimed fee accumulator"))?;

        let custody = pool.account();
        let (in_token, out_token) = match direction {
            Direction::XForY => (x_token, y_token),
            Direction::YForX => (y_token, x_token),
        };
        // Pre-flight both legs so the two transfers below cannot fail
        // half-way.
        if ledger.balance_of(in_token, caller) < plan.effective_in {
            return Err(AmmError::InsufficientTokenBalance(
                "caller cannot fund swap input",
            ));
        }
        if ledger.balance_of(out_token, custody) < plan.amount_out {
            return Err(AmmError::InsufficientTokenBalance(
                "pool custody cannot fund swap output",
            ));
        }
        ledger.transfer(in_token, caller, custody, plan.effective_in)?;
        ledger.transfer(out_token, custody, caller, plan.amount_out)?;

        let pool = self.pool_mut(id)?;
        commit_swap(pool, direction, bin_id, &plan, new_unclaimed);
        Ok(SwapOutcome::new(
            plan.effective_in,
            plan.amount_out,
            plan.fee_total,
        ))
    }
}

fn commit_swap(
    pool: &mut Pool,
    direction: Direction,
    bin_id: BinId,
    plan: &SwapPlan,
    new_unclaimed: Amount,
) {
    {
        let bin = pool.bin_mut(bin_id);
        match direction {
            Direction::XForY => {
                bin.x_balance = plan.new_in_reserve;
                bin.y_balance = plan.new_out_reserve;
            }
            Direction::YForX => {
                bin.y_balance = plan.new_in_reserve;
                bin.x_balance = plan.new_out_reserve;
            }
        }
    }
    match direction {
        Direction::XForY => pool.unclaimed_fees.x_fee = new_unclaimed,
        Direction::YForX => pool.unclaimed_fees.y_fee = new_unclaimed,
    }
    if plan.new_out_reserve.is_zero() {
        // Bin exhausted: the next reserve of the outbound asset sits one
        // bin toward the depleted side.
        match direction {
            Direction::XForY => pool.step_active_bin(-1),
            Direction::YForX => pool.step_active_bin(1),
        }
    }
}
