//! Liquidity provision: add, withdraw, and move.
//!
//! Deposits target arbitrary bins, each with a position-dependent
//! token-acceptance rule resolved once per operation into a
//! [`BinPosition`]: bins below the active bin take only Y, bins above
//! take only X, the active bin takes both. Minting is proportional to
//! the deposit's *liquidity value* — X valued in Y terms at the bin
//! price plus Y — against the bin's current reserve value, floored.
//! Withdrawals pay out pro rata, floored, and a full-supply withdrawal
//! drains the bin to exactly zero.
//!
//! Adding to the active bin pays a liquidity fee at the side's swap-fee
//! rate: an active-bin deposit shifts the composition tradable at the
//! current price, so it is priced like the swap it displaces. The
//! protocol share of that fee accrues to the unclaimed accumulator; the
//! rest stays in the bin for existing holders.
//!
//! Every operation computes a complete plan against current state before
//! touching the ledger or the pool, so a failure at any validation step
//! leaves no trace.

use crate::domain::{
    AccountId, Amount, BinId, BinPosition, BinPrice, Rounding, Shares, TokenId, Withdrawal,
};
use crate::error::AmmError;
use crate::ledger::TokenLedger;
use crate::math::{bin_price, liquidity_value, mul_div};
use crate::pool::{Pool, PoolId};

use super::{check_enabled, check_tokens, DlmmCore};

/// A fully validated deposit, ready to commit.
#[derive(Debug, Clone, Copy)]
struct AddPlan {
    shares: Shares,
    gross_x: Amount,
    gross_y: Amount,
    new_x_balance: Amount,
    new_y_balance: Amount,
    new_total_supply: Shares,
    new_unclaimed_x: Amount,
    new_unclaimed_y: Amount,
}

/// A fully validated withdrawal, ready to commit.
#[derive(Debug, Clone, Copy)]
struct WithdrawPlan {
    x_out: Amount,
    y_out: Amount,
    new_x_balance: Amount,
    new_y_balance: Amount,
    new_total_supply: Shares,
}

#[allow(clippy::too_many_arguments)]
fn plan_add(
    pool: &Pool,
    bin_id: BinId,
    price: BinPrice,
    x_amount: Amount,
    y_amount: Amount,
    min_lp: Shares,
    max_x_fee: Amount,
    max_y_fee: Amount,
    caller: AccountId,
) -> crate::error::Result<AddPlan> {
    let position = BinPosition::of(bin_id, pool.active_bin_id());
    if !x_amount.is_zero() && !position.accepts_x() {
        return Err(AmmError::InvalidXAmount(
            "bins below the active bin accept only y",
        ));
    }
    if !y_amount.is_zero() && !position.accepts_y() {
        return Err(AmmError::InvalidYAmount(
            "bins above the active bin accept only x",
        ));
    }
    if x_amount.is_zero() && y_amount.is_zero() {
        return Err(AmmError::InvalidAmount(
            "deposit must include at least one asset",
        ));
    }
    if min_lp.is_zero() {
        return Err(AmmError::InvalidMinLpAmount(
            "minimum lp must be at least one share",
        ));
    }

    let exempt = pool.is_fee_exempt(caller);
    let charge_fee = position.is_active() && !exempt;
    let (x_fee_total, x_fee_protocol) = if charge_fee {
        (
            pool.x_fees().total().apply(x_amount, Rounding::Down)?,
            pool.x_fees().protocol().apply(x_amount, Rounding::Down)?,
        )
    } else {
        (Amount::ZERO, Amount::ZERO)
    };
    let (y_fee_total, y_fee_protocol) = if charge_fee {
        (
            pool.y_fees().total().apply(y_amount, Rounding::Down)?,
            pool.y_fees().protocol().apply(y_amount, Rounding::Down)?,
        )
    } else {
        (Amount::ZERO, Amount::ZERO)
    };
    if x_fee_total > max_x_fee {
        return Err(AmmError::MaximumXLiquidityFee(
            "x liquidity fee above caller bound",
        ));
    }
    if y_fee_total > max_y_fee {
        return Err(AmmError::MaximumYLiquidityFee(
            "y liquidity fee above caller bound",
        ));
    }

    // Floored fees never exceed the amounts they were taken from.
    let net_x = x_amount
        .checked_sub(x_fee_total)
        .ok_or(AmmError::Overflow("net x deposit"))?;
    let net_y = y_amount
        .checked_sub(y_fee_total)
        .ok_or(AmmError::Overflow("net y deposit"))?;

    let value = liquidity_value(net_x, net_y, price)?;
    if value.is_zero() {
        return Err(AmmError::InvalidLiquidityValue(
            "deposit values to zero at the bin price",
        ));
    }

    let bin = pool.bin(bin_id);
    let shares = if bin.total_supply().is_zero() {
        Shares::new(value.get())
    } else {
        let reserve_value = liquidity_value(bin.x_balance(), bin.y_balance(), price)?;
        if reserve_value.is_zero() {
            Shares::new(value.get())
        } else {
            Shares::new(
                mul_div(
                    value.get(),
                    bin.total_supply().get(),
                    reserve_value.get(),
                    Rounding::Down,
                )
                .ok_or(AmmError::Overflow("share mint"))?,
            )
        }
    };
    if shares < min_lp {
        return Err(AmmError::MinimumLpAmount(
            "minted shares below caller minimum",
        ));
    }

    // Everything except the protocol share stays in the bin's reserves.
    let x_credit = x_amount
        .checked_sub(x_fee_protocol)
        .ok_or(AmmError::Overflow("x reserve credit"))?;
    let y_credit = y_amount
        .checked_sub(y_fee_protocol)
        .ok_or(AmmError::Overflow("y reserve credit"))?;

    Ok(AddPlan {
        shares,
        gross_x: x_amount,
        gross_y: y_amount,
        new_x_balance: bin
            .x_balance()
            .checked_add(x_credit)
            .ok_or(AmmError::Overflow("x reserve"))?,
        new_y_balance: bin
            .y_balance()
            .checked_add(y_credit)
            .ok_or(AmmError::Overflow("y reserve"))?,
        new_total_supply: bin
            .total_supply()
            .checked_add(shares)
            .ok_or(AmmError::Overflow("share supply"))?,
        new_unclaimed_x: pool
            .unclaimed_fees()
            .x_fee()
            .checked_add(x_fee_protocol)
            .ok_or(AmmError::Overflow("unclaimed x fees"))?,
        new_unclaimed_y: pool
            .unclaimed_fees()
            .y_fee()
            .checked_add(y_fee_protocol)
            .ok_or(AmmError::Overflow("unclaimed y fees"))?,
    })
}

fn plan_withdraw(
    pool: &Pool,
    bin_id: BinId,
    lp_amount: Shares,
    min_x: Amount,
    min_y: Amount,
    caller: AccountId,
) -> crate::error::Result<WithdrawPlan> {
    if lp_amount.is_zero() {
        return Err(AmmError::InvalidAmount("withdraw amount must be positive"));
    }
    let held = pool.user_shares(bin_id, caller);
    if held < lp_amount {
        return Err(AmmError::NoBinShares(
            "caller holds fewer shares than requested",
        ));
    }
    let bin = pool.bin(bin_id);
    let supply = bin.total_supply();
    // supply >= held >= lp_amount > 0, so the divisions are well-formed.
    let x_out = Amount::new(
        mul_div(
            bin.x_balance().get(),
            lp_amount.get(),
            supply.get(),
            Rounding::Down,
        )
        .ok_or(AmmError::Overflow("x payout"))?,
    );
    let y_out = Amount::new(
        mul_div(
            bin.y_balance().get(),
            lp_amount.get(),
            supply.get(),
            Rounding::Down,
        )
        .ok_or(AmmError::Overflow("y payout"))?,
    );
    if x_out < min_x {
        return Err(AmmError::MinimumXAmount("x payout below caller minimum"));
    }
    if y_out < min_y {
        return Err(AmmError::MinimumYAmount("y payout below caller minimum"));
    }
    Ok(WithdrawPlan {
        x_out,
        y_out,
        new_x_balance: bin
            .x_balance()
            .checked_sub(x_out)
            .ok_or(AmmError::Overflow("x reserve underflow"))?,
        new_y_balance: bin
            .y_balance()
            .checked_sub(y_out)
            .ok_or(AmmError::Overflow("y reserve underflow"))?,
        new_total_supply: supply
            .checked_sub(lp_amount)
            .ok_or(AmmError::Overflow("share supply underflow"))?,
    })
}

fn commit_add(pool: &mut Pool, bin_id: BinId, caller: AccountId, plan: &AddPlan) {
    {
        let bin = pool.bin_mut(bin_id);
        bin.x_balance = plan.new_x_balance;
        bin.y_balance = plan.new_y_balance;
        bin.total_supply = plan.new_total_supply;
    }
    pool.credit_shares(bin_id, caller, plan.shares);
    pool.unclaimed_fees.x_fee = plan.new_unclaimed_x;
    pool.unclaimed_fees.y_fee = plan.new_unclaimed_y;
}

fn commit_withdraw(
    pool: &mut Pool,
    bin_id: BinId,
    caller: AccountId,
    lp: Shares,
    plan: &WithdrawPlan,
) {
    {
        let bin = pool.bin_mut(bin_id);
        bin.x_balance = plan.new_x_balance;
        bin.y_balance = plan.new_y_balance;
        bin.total_supply = plan.new_total_supply;
    }
    pool.debit_shares(bin_id, caller, lp);
}

impl DlmmCore {
    /// Deposits into `bin_id` and mints LP shares for the caller.
    ///
    /// The deposit must respect the bin's directional rule, and `min_lp`
    /// guards the caller against mint slippage. The gross amounts are
    /// debited from the caller on the external ledger; at the active bin
    /// a liquidity fee is deducted before minting (see the module docs).
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidXAmount`] / [`AmmError::InvalidYAmount`] on a
    ///   directional-rule violation.
    /// - [`AmmError::InvalidAmount`] if both amounts are zero.
    /// - [`AmmError::InvalidMinLpAmount`] if `min_lp` is zero.
    /// - [`AmmError::MaximumXLiquidityFee`] /
    ///   [`AmmError::MaximumYLiquidityFee`] if the active-bin fee
    ///   exceeds the caller's bound.
    /// - [`AmmError::InvalidLiquidityValue`] if the net deposit values
    ///   to zero.
    /// - [`AmmError::MinimumLpAmount`] if the mint falls below `min_lp`.
    /// - Pool lookup, status, token-ref, and overflow failures as in
    ///   the swap operations.
    #[allow(clippy::too_many_arguments)]
    pub fn add_liquidity<L: TokenLedger>(
        &mut self,
        id: PoolId,
        x_token: TokenId,
        y_token: TokenId,
        bin_id: BinId,
        x_amount: Amount,
        y_amount: Amount,
        min_lp: Shares,
        max_x_fee: Amount,
        max_y_fee: Amount,
        caller: AccountId,
        ledger: &mut L,
    ) -> crate::error::Result<Shares> {
        let pool = self.pool(id)?;
        check_enabled(pool)?;
        check_tokens(pool, x_token, y_token)?;
        let table = self.registry().factors(pool.bin_step())?;
        let price = bin_price(pool.initial_price(), table, bin_id)?;
        let plan = plan_add(
            pool, bin_id, price, x_amount, y_amount, min_lp, max_x_fee, max_y_fee, caller,
        )?;

        let custody = pool.account();
        if ledger.balance_of(x_token, caller) < plan.gross_x
            || ledger.balance_of(y_token, caller) < plan.gross_y
        {
            return Err(AmmError::InsufficientTokenBalance(
                "caller cannot fund deposit",
            ));
        }
        ledger.transfer(x_token, caller, custody, plan.gross_x)?;
        ledger.transfer(y_token, caller, custody, plan.gross_y)?;

        let pool = self.pool_mut(id)?;
        commit_add(pool, bin_id, caller, &plan);
        Ok(plan.shares)
    }

    /// Burns `lp_amount` of the caller's shares in `bin_id` and pays out
    /// the pro-rata reserves.
    ///
    /// Available on disabled pools: providers can always exit. A
    /// withdrawal of the bin's entire supply drains its reserves to
    /// exactly zero.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidAmount`] if `lp_amount` is zero.
    /// - [`AmmError::NoBinShares`] if the caller holds less than
    ///   `lp_amount`.
    /// - [`AmmError::MinimumXAmount`] / [`AmmError::MinimumYAmount`] on
    ///   payout slippage.
    /// - Pool lookup, token-ref, and overflow failures as above.
    #[allow(clippy::too_many_arguments)]
    pub fn withdraw_liquidity<L: TokenLedger>(
        &mut self,
        id: PoolId,
        x_token: TokenId,
        y_token: TokenId,
        bin_id: BinId,
        lp_amount: Shares,
        min_x: Amount,
        min_y: Amount,
        caller: AccountId,
        ledger: &mut L,
    ) -> crate::error::Result<Withdrawal> {
        let pool = self.pool(id)?;
        check_tokens(pool, x_token, y_token)?;
        let plan = plan_withdraw(pool, bin_id, lp_amount, min_x, min_y, caller)?;

        let custody = pool.account();
        if ledger.balance_of(x_token, custody) < plan.x_out
            || ledger.balance_of(y_token, custody) < plan.y_out
        {
            return Err(AmmError::InsufficientTokenBalance(
                "pool custody cannot fund payout",
            ));
        }
        ledger.transfer(x_token, custody, caller, plan.x_out)?;
        ledger.transfer(y_token, custody, caller, plan.y_out)?;

        let pool = self.pool_mut(id)?;
        commit_withdraw(pool, bin_id, caller, lp_amount, &plan);
        Ok(Withdrawal::new(plan.x_out, plan.y_out))
    }

    /// Atomically withdraws `amount` shares from `from_bin` and deposits
    /// the withdrawn tokens into `to_bin`.
    ///
    /// The destination's directional rule is validated against the
    /// *current* active bin: a withdrawn composition the destination
    /// does not accept (for example X+Y out of the active bin into a
    /// Y-only bin) is an explicit error, never silently truncated. No
    /// tokens move on the external ledger — they stay in pool custody.
    ///
    /// # Errors
    ///
    /// - [`AmmError::MatchingBinId`] if `from_bin == to_bin`.
    /// - Every withdraw-plan and add-plan failure listed on
    ///   [`withdraw_liquidity`](Self::withdraw_liquidity) and
    ///   [`add_liquidity`](Self::add_liquidity).
    #[allow(clippy::too_many_arguments)]
    pub fn move_liquidity(
        &mut self,
        id: PoolId,
        x_token: TokenId,
        y_token: TokenId,
        from_bin: BinId,
        to_bin: BinId,
        amount: Shares,
        min_lp: Shares,
        max_x_fee: Amount,
        max_y_fee: Amount,
        caller: AccountId,
    ) -> crate::error::Result<Shares> {
        if from_bin == to_bin {
            return Err(AmmError::MatchingBinId(
                "source and destination bins must differ",
            ));
        }
        let pool = self.pool(id)?;
        check_enabled(pool)?;
        check_tokens(pool, x_token, y_token)?;
        let table = self.registry().factors(pool.bin_step())?;
        let price_to = bin_price(pool.initial_price(), table, to_bin)?;

        let wplan = plan_withdraw(pool, from_bin, amount, Amount::ZERO, Amount::ZERO, caller)?;
        let aplan = plan_add(
            pool,
            to_bin,
            price_to,
            wplan.x_out,
            wplan.y_out,
            min_lp,
            max_x_fee,
            max_y_fee,
            caller,
        )?;

        let pool = self.pool_mut(id)?;
        commit_withdraw(pool, from_bin, caller, amount, &wplan);
        commit_add(pool, to_bin, caller, &aplan);
        Ok(aplan.shares)
    }
}
