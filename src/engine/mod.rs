//! The DLMM engine: pool lifecycle, fee accounting, and configuration.
//!
//! [`DlmmCore`] owns the shared [`Registry`] and every [`Pool`] created
//! through it, and exposes the public state-transition operations. The
//! swap and liquidity engines live in sibling modules and are surfaced as
//! methods on `DlmmCore`; this module holds pool creation, the fee
//! accountant, and the read-only views.
//!
//! # Execution model
//!
//! Every operation is a single synchronous call that either fully commits
//! or returns an error with no state changed. Operations validate and
//! compute against *current* state first, move tokens through the
//! caller-supplied [`TokenLedger`], and only then write the bin ledger —
//! there is no suspension point in between, and no partial effect is ever
//! observable. Cooldowns compare against a caller-supplied monotonic
//! logical clock (`now`); the engine schedules nothing itself.

mod liquidity;
mod swap;

#[cfg(test)]
mod proptest_properties;

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    AccountId, Amount, BasisPoints, BinId, BinPrice, Rounding, Shares, TokenId, PRICE_SCALE,
};
use crate::error::AmmError;
use crate::ledger::TokenLedger;
use crate::math::{bin_price, liquidity_value, mul_div};
use crate::pool::{Bin, FeeComponents, Pool, PoolId, PoolParams, UnclaimedFees};
use crate::registry::Registry;

/// The share-burn principal: seed shares assigned here at pool creation
/// are locked forever, keeping a floor under every pool's first bin.
pub const BURN_ACCOUNT: AccountId = AccountId::from_bytes([0xFF; 32]);

/// The engine: one registry, many pools, and every public operation.
///
/// # Examples
///
/// ```
/// use lattice_amm::domain::{AccountId, Amount, Shares, TokenId};
/// use lattice_amm::engine::DlmmCore;
/// use lattice_amm::ledger::InMemoryLedger;
/// use lattice_amm::pool::PoolParams;
/// use lattice_amm::registry::FactorTable;
///
/// let admin = AccountId::from_bytes([1u8; 32]);
/// let x = TokenId::from_bytes([10u8; 32]);
/// let y = TokenId::from_bytes([11u8; 32]);
///
/// let mut core = DlmmCore::new(admin);
/// let table = FactorTable::uniform_step(25).expect("valid step");
/// core.registry_mut().add_bin_step(admin, 25, table).expect("registered");
///
/// let mut ledger = InMemoryLedger::new();
/// ledger.mint(x, admin, Amount::new(10_000_000));
/// ledger.mint(y, admin, Amount::new(5_000_000_000));
///
/// let params = PoolParams {
///     x_token: x,
///     y_token: y,
///     x_seed: Amount::new(10_000_000),
///     y_seed: Amount::new(5_000_000_000),
///     burn_amount: Shares::new(1_000),
///     x_protocol_fee: 1_000,
///     x_provider_fee: 3_000,
///     y_protocol_fee: 1_000,
///     y_provider_fee: 3_000,
///     bin_step: 25,
///     variable_fees_cooldown: 900,
///     freeze_variable_fees_manager: false,
///     fee_address: admin,
///     enabled: true,
/// };
/// let pool_id = core.create_pool(admin, params, 0, &mut ledger).expect("created");
/// assert!(core.pool(pool_id).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct DlmmCore {
    registry: Registry,
    pools: BTreeMap<PoolId, Pool>,
    next_pool_id: u64,
}

impl DlmmCore {
    /// Creates an engine whose registry is owned by `creator`.
    #[must_use]
    pub fn new(creator: AccountId) -> Self {
        Self {
            registry: Registry::new(creator),
            pools: BTreeMap::new(),
            next_pool_id: 1,
        }
    }

    /// Read access to the shared registry.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to the shared registry (admin operations live on
    /// [`Registry`] itself).
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Looks up a pool.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NoPoolData`] for an unknown id.
    pub fn pool(&self, id: PoolId) -> crate::error::Result<&Pool> {
        self.pools
            .get(&id)
            .ok_or(AmmError::NoPoolData("unknown pool id"))
    }

    /// The id the next created pool will receive.
    #[must_use]
    pub const fn next_pool_id(&self) -> PoolId {
        PoolId::new(self.next_pool_id)
    }

    pub(crate) fn pool_mut(&mut self, id: PoolId) -> crate::error::Result<&mut Pool> {
        self.pools
            .get_mut(&id)
            .ok_or(AmmError::NoPoolData("unknown pool id"))
    }

    fn custody_account(id: PoolId) -> AccountId {
        // Derived custody principal: tag byte pattern plus the pool id in
        // the trailing eight bytes.
        let mut bytes = [0xA0u8; 32];
        bytes[24..32].copy_from_slice(&id.get().to_be_bytes());
        AccountId::from_bytes(bytes)
    }

    // -- pool lifecycle -----------------------------------------------------

    /// Creates a pool, seeding its active bin (bin 0) from the caller.
    ///
    /// The initial price is derived from the seed composition:
    /// `y_seed × PRICE_SCALE / x_seed`, floored. Seed shares equal the
    /// liquidity value of the seed at that price; `burn_amount` of them
    /// is assigned to [`BURN_ACCOUNT`] and locked forever, the remainder
    /// goes to the caller.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PublicPoolCreationDisabled`] if creation is
    ///   admin-only and the caller is not an admin.
    /// - [`AmmError::MatchingTokenContracts`] if both token refs match.
    /// - [`AmmError::NoBinFactors`] if the bin step is unregistered.
    /// - [`AmmError::InvalidAmount`] if either seed amount is zero, or
    ///   the burn exceeds the seed shares.
    /// - [`AmmError::InvalidInitialPrice`] if the derived price floors
    ///   to zero.
    /// - [`AmmError::InvalidFee`] if a side's fee rates break the cap.
    /// - [`AmmError::MinimumBurnAmount`] if `burn_amount` is below the
    ///   registry minimum.
    /// - [`AmmError::MinimumLpAmount`] if the seed shares are below the
    ///   registry bin minimum.
    /// - [`AmmError::InsufficientTokenBalance`] if the caller cannot
    ///   fund the seed.
    pub fn create_pool<L: TokenLedger>(
        &mut self,
        caller: AccountId,
        params: PoolParams,
        now: u64,
        ledger: &mut L,
    ) -> crate::error::Result<PoolId> {
        if !self.registry.public_pool_creation() && !self.registry.is_admin(caller) {
            return Err(AmmError::PublicPoolCreationDisabled(
                "pool creation is restricted to admins",
            ));
        }
        if params.x_token == params.y_token {
            return Err(AmmError::MatchingTokenContracts(
                "pool requires two distinct assets",
            ));
        }
        self.registry.factors(params.bin_step)?;
        if params.x_seed.is_zero() || params.y_seed.is_zero() {
            return Err(AmmError::InvalidAmount("both seed amounts must be positive"));
        }

        let raw_price = mul_div(
            params.y_seed.get(),
            PRICE_SCALE,
            params.x_seed.get(),
            Rounding::Down,
        )
        .ok_or(AmmError::Overflow("initial price derivation"))?;
        let initial_price = BinPrice::new(raw_price)
            .map_err(|_| AmmError::InvalidInitialPrice("seed composition prices to zero"))?;

        let x_fees = FeeComponents::new(
            BasisPoints::new(params.x_protocol_fee),
            BasisPoints::new(params.x_provider_fee),
        )?;
        let y_fees = FeeComponents::new(
            BasisPoints::new(params.y_protocol_fee),
            BasisPoints::new(params.y_provider_fee),
        )?;

        // Bin 0 carries the centre factor, so its price is the initial
        // price exactly.
        let seed_value = liquidity_value(params.x_seed, params.y_seed, initial_price)?;
        let seed_shares = Shares::new(seed_value.get());
        if params.burn_amount < self.registry.minimum_burnt_shares() {
            return Err(AmmError::MinimumBurnAmount(
                "burn amount below registry minimum",
            ));
        }
        if seed_shares < self.registry.minimum_bin_shares() {
            return Err(AmmError::MinimumLpAmount(
                "seed shares below registry bin minimum",
            ));
        }
        let creator_shares = seed_shares
            .checked_sub(params.burn_amount)
            .ok_or(AmmError::InvalidAmount("burn amount exceeds seed shares"))?;

        let id = PoolId::new(self.next_pool_id);
        let account = Self::custody_account(id);

        // Pre-flight both legs so the two transfers cannot fail half-way.
        if ledger.balance_of(params.x_token, caller) < params.x_seed
            || ledger.balance_of(params.y_token, caller) < params.y_seed
        {
            return Err(AmmError::InsufficientTokenBalance(
                "caller cannot fund pool seed",
            ));
        }
        ledger.transfer(params.x_token, caller, account, params.x_seed)?;
        ledger.transfer(params.y_token, caller, account, params.y_seed)?;

        let mut bins = BTreeMap::new();
        bins.insert(
            BinId::ZERO,
            Bin {
                x_balance: params.x_seed,
                y_balance: params.y_seed,
                total_supply: seed_shares,
            },
        );
        let mut positions = BTreeMap::new();
        if !params.burn_amount.is_zero() {
            positions.insert((BinId::ZERO, BURN_ACCOUNT), params.burn_amount);
        }
        if !creator_shares.is_zero() {
            positions.insert((BinId::ZERO, caller), creator_shares);
        }

        self.pools.insert(
            id,
            Pool {
                id,
                account,
                x_token: params.x_token,
                y_token: params.y_token,
                bin_step: params.bin_step,
                initial_price,
                x_fees,
                y_fees,
                fee_address: params.fee_address,
                variable_fees_manager: caller,
                variable_fees_frozen: params.freeze_variable_fees_manager,
                variable_fees_cooldown: params.variable_fees_cooldown,
                last_variable_fees_update: now,
                enabled: params.enabled,
                active_bin_id: BinId::ZERO,
                bin_change_count: 0,
                bins,
                positions,
                unclaimed_fees: UnclaimedFees::default(),
                fee_exemptions: BTreeSet::new(),
            },
        );
        self.next_pool_id += 1;
        Ok(id)
    }

    // -- fee accountant -----------------------------------------------------

    /// Sets the X-side protocol and provider fee rates.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NotAuthorized`] if the caller is not an admin.
    /// - [`AmmError::InvalidFee`] if the new base plus the current
    ///   variable rate exceeds `FEE_SCALE`.
    pub fn set_x_fees(
        &mut self,
        id: PoolId,
        caller: AccountId,
        protocol: BasisPoints,
        provider: BasisPoints,
    ) -> crate::error::Result<()> {
        self.registry.require_admin(caller)?;
        let pool = self.pool_mut(id)?;
        pool.x_fees.set_base(protocol, provider)
    }

    /// Sets the Y-side protocol and provider fee rates.
    ///
    /// # Errors
    ///
    /// Same conditions as [`set_x_fees`](Self::set_x_fees).
    pub fn set_y_fees(
        &mut self,
        id: PoolId,
        caller: AccountId,
        protocol: BasisPoints,
        provider: BasisPoints,
    ) -> crate::error::Result<()> {
        self.registry.require_admin(caller)?;
        let pool = self.pool_mut(id)?;
        pool.y_fees.set_base(protocol, provider)
    }

    /// Sets both variable fee rates.
    ///
    /// Authorized for admins and the pool's variable-fees manager, and
    /// throttled by the pool's cooldown against the supplied logical
    /// clock.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NotAuthorized`] if the caller is neither admin nor
    ///   manager.
    /// - [`AmmError::VariableFeesManagerFrozen`] if the caller is the
    ///   (non-admin) manager and the manager is frozen.
    /// - [`AmmError::VariableFeesCooldown`] if the cooldown has not
    ///   lapsed.
    /// - [`AmmError::InvalidFee`] if either side's cap would break.
    pub fn set_variable_fees(
        &mut self,
        id: PoolId,
        caller: AccountId,
        x_fee: BasisPoints,
        y_fee: BasisPoints,
        now: u64,
    ) -> crate::error::Result<()> {
        self.update_variable_fees(id, caller, x_fee, y_fee, now)
    }

    /// Zeroes both variable fee rates.
    ///
    /// Gated exactly like [`set_variable_fees`](Self::set_variable_fees):
    /// resetting is a variable-fee change and demands the same
    /// authorization and cooldown.
    ///
    /// # Errors
    ///
    /// Same conditions as [`set_variable_fees`](Self::set_variable_fees).
    pub fn reset_variable_fees(
        &mut self,
        id: PoolId,
        caller: AccountId,
        now: u64,
    ) -> crate::error::Result<()> {
        self.update_variable_fees(id, caller, BasisPoints::ZERO, BasisPoints::ZERO, now)
    }

    fn update_variable_fees(
        &mut self,
        id: PoolId,
        caller: AccountId,
        x_fee: BasisPoints,
        y_fee: BasisPoints,
        now: u64,
    ) -> crate::error::Result<()> {
        let is_admin = self.registry.is_admin(caller);
        let pool = self.pool_mut(id)?;
        if !is_admin {
            if caller != pool.variable_fees_manager {
                return Err(AmmError::NotAuthorized(
                    "caller is neither admin nor variable-fees manager",
                ));
            }
            if pool.variable_fees_frozen {
                return Err(AmmError::VariableFeesManagerFrozen(
                    "manager rights have been revoked",
                ));
            }
        }
        let elapsed = now.checked_sub(pool.last_variable_fees_update);
        match elapsed {
            Some(e) if e >= pool.variable_fees_cooldown => {}
            _ => {
                return Err(AmmError::VariableFeesCooldown(
                    "cooldown since last update has not lapsed",
                ))
            }
        }
        // Validate both sides before committing either.
        let mut x_fees = pool.x_fees;
        x_fees.set_variable(x_fee)?;
        let mut y_fees = pool.y_fees;
        y_fees.set_variable(y_fee)?;
        pool.x_fees = x_fees;
        pool.y_fees = y_fees;
        pool.last_variable_fees_update = now;
        Ok(())
    }

    /// Appoints a new variable-fees manager.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NotAuthorized`] if the caller is not an admin.
    /// - [`AmmError::VariableFeesManagerFrozen`] if the manager slot has
    ///   been frozen.
    pub fn set_variable_fees_manager(
        &mut self,
        id: PoolId,
        caller: AccountId,
        manager: AccountId,
    ) -> crate::error::Result<()> {
        self.registry.require_admin(caller)?;
        let pool = self.pool_mut(id)?;
        if pool.variable_fees_frozen {
            return Err(AmmError::VariableFeesManagerFrozen(
                "manager slot is frozen",
            ));
        }
        pool.variable_fees_manager = manager;
        Ok(())
    }

    /// Sets the variable-fee update cooldown.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAuthorized`] if the caller is not an admin.
    pub fn set_variable_fees_cooldown(
        &mut self,
        id: PoolId,
        caller: AccountId,
        cooldown: u64,
    ) -> crate::error::Result<()> {
        self.registry.require_admin(caller)?;
        let pool = self.pool_mut(id)?;
        pool.variable_fees_cooldown = cooldown;
        Ok(())
    }

    /// Permanently freezes the variable-fees manager. Idempotent and
    /// one-way.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAuthorized`] if the caller is not an admin.
    pub fn freeze_variable_fees_manager(
        &mut self,
        id: PoolId,
        caller: AccountId,
    ) -> crate::error::Result<()> {
        self.registry.require_admin(caller)?;
        let pool = self.pool_mut(id)?;
        pool.variable_fees_frozen = true;
        Ok(())
    }

    /// Sets or clears a per-(address, pool) swap-fee exemption.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAuthorized`] if the caller is not an admin.
    pub fn set_swap_fee_exemption(
        &mut self,
        id: PoolId,
        caller: AccountId,
        address: AccountId,
        exempt: bool,
    ) -> crate::error::Result<()> {
        self.registry.require_admin(caller)?;
        let pool = self.pool_mut(id)?;
        if exempt {
            pool.fee_exemptions.insert(address);
        } else {
            pool.fee_exemptions.remove(&address);
        }
        Ok(())
    }

    /// Redirects future protocol-fee claims.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAuthorized`] if the caller is not an admin.
    pub fn set_fee_address(
        &mut self,
        id: PoolId,
        caller: AccountId,
        address: AccountId,
    ) -> crate::error::Result<()> {
        self.registry.require_admin(caller)?;
        let pool = self.pool_mut(id)?;
        pool.fee_address = address;
        Ok(())
    }

    /// Enables or disables the pool for swaps and deposits. Withdrawals
    /// stay available on a disabled pool so providers can always exit.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAuthorized`] if the caller is not an admin.
    pub fn set_pool_status(
        &mut self,
        id: PoolId,
        caller: AccountId,
        enabled: bool,
    ) -> crate::error::Result<()> {
        self.registry.require_admin(caller)?;
        let pool = self.pool_mut(id)?;
        pool.enabled = enabled;
        Ok(())
    }

    /// Drains the pool's unclaimed protocol fees to its fee address.
    ///
    /// Permissionless: anyone may trigger the claim, the destination is
    /// fixed. Returns `Ok(false)` when there was nothing to claim.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NoPoolData`] for an unknown pool.
    /// - [`AmmError::InvalidXToken`] / [`AmmError::InvalidYToken`] if the
    ///   token refs do not match the pool.
    /// - [`AmmError::InsufficientTokenBalance`] if pool custody cannot
    ///   cover the accumulators (ledger corruption; never expected).
    pub fn claim_protocol_fees<L: TokenLedger>(
        &mut self,
        id: PoolId,
        x_token: TokenId,
        y_token: TokenId,
        ledger: &mut L,
    ) -> crate::error::Result<bool> {
        let pool = self.pool(id)?;
        check_tokens(pool, x_token, y_token)?;
        let fees = pool.unclaimed_fees;
        if fees.is_empty() {
            return Ok(false);
        }
        let account = pool.account;
        let fee_address = pool.fee_address;
        if ledger.balance_of(x_token, account) < fees.x_fee()
            || ledger.balance_of(y_token, account) < fees.y_fee()
        {
            return Err(AmmError::InsufficientTokenBalance(
                "pool custody cannot cover unclaimed fees",
            ));
        }
        ledger.transfer(x_token, account, fee_address, fees.x_fee())?;
        ledger.transfer(y_token, account, fee_address, fees.y_fee())?;
        let pool = self.pool_mut(id)?;
        pool.unclaimed_fees = UnclaimedFees::default();
        Ok(true)
    }

    // -- views --------------------------------------------------------------

    /// Computes the price of `bin_id` in `id`'s pool from its registered
    /// factor table.
    ///
    /// # Errors
    ///
    /// Propagates pool lookup, factor lookup, and price computation
    /// failures.
    pub fn bin_price_of(&self, id: PoolId, bin_id: BinId) -> crate::error::Result<BinPrice> {
        let pool = self.pool(id)?;
        let table = self.registry.factors(pool.bin_step)?;
        bin_price(pool.initial_price, table, bin_id)
    }

    /// Values a deposit at a bin's price, exactly as the liquidity engine
    /// will.
    ///
    /// # Errors
    ///
    /// Propagates the same failures as
    /// [`bin_price_of`](Self::bin_price_of) plus valuation overflow.
    pub fn liquidity_value_at(
        &self,
        id: PoolId,
        bin_id: BinId,
        x: Amount,
        y: Amount,
    ) -> crate::error::Result<Amount> {
        let price = self.bin_price_of(id, bin_id)?;
        liquidity_value(x, y, price)
    }
}

pub(crate) fn check_tokens(
    pool: &Pool,
    x_token: TokenId,
    y_token: TokenId,
) -> crate::error::Result<()> {
    if x_token != pool.x_token {
        return Err(AmmError::InvalidXToken("x token does not match pool"));
    }
    if y_token != pool.y_token {
        return Err(AmmError::InvalidYToken("y token does not match pool"));
    }
    Ok(())
}

pub(crate) fn check_enabled(pool: &Pool) -> crate::error::Result<()> {
    if pool.enabled {
        Ok(())
    } else {
        Err(AmmError::PoolDisabled("pool status is disabled"))
    }
}
