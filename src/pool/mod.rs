//! The bin ledger: per-pool reserves, LP shares, and fee state.
//!
//! A [`Pool`] is the storage engine behind one traded pair. It keeps
//!
//! - per-bin X/Y reserves and total LP-share supply,
//! - per-(bin, account) LP-share balances,
//! - the active-bin pointer and its change counter,
//! - the fee configuration of both asset sides,
//! - the unclaimed protocol-fee accumulator and the fee-exemption set.
//!
//! Bins and positions spring into existence lazily on first deposit and
//! are never explicitly deleted; a bin with zero supply is an all-zero
//! record. The state-transition logic that mutates a pool lives in
//! [`engine`](crate::engine) — this module only provides the storage and
//! its small invariant-preserving accessors.

mod fees;

pub use fees::FeeComponents;

use core::fmt;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{AccountId, Amount, BinId, BinPrice, Shares, TokenId};

/// Identifier of one pool within an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PoolId(u64);

impl PoolId {
    /// Creates a pool id from a raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool {}", self.0)
    }
}

/// One price bin's reserves and share supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bin {
    pub(crate) x_balance: Amount,
    pub(crate) y_balance: Amount,
    pub(crate) total_supply: Shares,
}

impl Bin {
    /// X reserve of the bin.
    #[must_use]
    pub const fn x_balance(&self) -> Amount {
        self.x_balance
    }

    /// Y reserve of the bin.
    #[must_use]
    pub const fn y_balance(&self) -> Amount {
        self.y_balance
    }

    /// Total LP shares outstanding for the bin.
    #[must_use]
    pub const fn total_supply(&self) -> Shares {
        self.total_supply
    }

    /// Returns `true` if the bin holds nothing and has no supply.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x_balance.is_zero() && self.y_balance.is_zero() && self.total_supply.is_zero()
    }
}

/// Unclaimed protocol fees for one pool, per asset side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnclaimedFees {
    pub(crate) x_fee: Amount,
    pub(crate) y_fee: Amount,
}

impl UnclaimedFees {
    /// Unclaimed X-side protocol fees.
    #[must_use]
    pub const fn x_fee(&self) -> Amount {
        self.x_fee
    }

    /// Unclaimed Y-side protocol fees.
    #[must_use]
    pub const fn y_fee(&self) -> Amount {
        self.y_fee
    }

    /// Returns `true` if both accumulators are empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x_fee.is_zero() && self.y_fee.is_zero()
    }
}

/// Creation parameters for a new pool, bundled so that the engine's
/// `create_pool` signature stays readable.
#[derive(Debug, Clone, Copy)]
pub struct PoolParams {
    /// X-side asset contract.
    pub x_token: TokenId,
    /// Y-side asset contract.
    pub y_token: TokenId,
    /// X seeded into the active bin.
    pub x_seed: Amount,
    /// Y seeded into the active bin.
    pub y_seed: Amount,
    /// Seed shares assigned to the burn account and locked forever.
    pub burn_amount: Shares,
    /// X-side protocol and provider fee rates, in basis points.
    pub x_protocol_fee: u32,
    /// See [`PoolParams::x_protocol_fee`].
    pub x_provider_fee: u32,
    /// Y-side protocol fee rate.
    pub y_protocol_fee: u32,
    /// Y-side provider fee rate.
    pub y_provider_fee: u32,
    /// Bin step in basis points; must be registered in the registry.
    pub bin_step: u32,
    /// Minimum logical-clock distance between variable-fee updates.
    pub variable_fees_cooldown: u64,
    /// Permanently freezes the variable-fees manager from the start.
    pub freeze_variable_fees_manager: bool,
    /// Destination of claimed protocol fees.
    pub fee_address: AccountId,
    /// Whether the pool accepts operations immediately.
    pub enabled: bool,
}

/// The full state of one pool.
///
/// All fields are reachable through read accessors; mutation goes through
/// the engine operations so that every transition preserves the ledger
/// invariants (share conservation, fee caps, reserve non-negativity).
#[derive(Debug, Clone)]
pub struct Pool {
    pub(crate) id: PoolId,
    pub(crate) account: AccountId,
    pub(crate) x_token: TokenId,
    pub(crate) y_token: TokenId,
    pub(crate) bin_step: u32,
    pub(crate) initial_price: BinPrice,
    pub(crate) x_fees: FeeComponents,
    pub(crate) y_fees: FeeComponents,
    pub(crate) fee_address: AccountId,
    pub(crate) variable_fees_manager: AccountId,
    pub(crate) variable_fees_frozen: bool,
    pub(crate) variable_fees_cooldown: u64,
    pub(crate) last_variable_fees_update: u64,
    pub(crate) enabled: bool,
    pub(crate) active_bin_id: BinId,
    pub(crate) bin_change_count: u64,
    pub(crate) bins: BTreeMap<BinId, Bin>,
    pub(crate) positions: BTreeMap<(BinId, AccountId), Shares>,
    pub(crate) unclaimed_fees: UnclaimedFees,
    pub(crate) fee_exemptions: BTreeSet<AccountId>,
}

impl Pool {
    /// The pool's id.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// The pool's custody account on the external token ledger.
    #[must_use]
    pub const fn account(&self) -> AccountId {
        self.account
    }

    /// The X-side asset contract.
    #[must_use]
    pub const fn x_token(&self) -> TokenId {
        self.x_token
    }

    /// The Y-side asset contract.
    #[must_use]
    pub const fn y_token(&self) -> TokenId {
        self.y_token
    }

    /// The pool's bin step in basis points.
    #[must_use]
    pub const fn bin_step(&self) -> u32 {
        self.bin_step
    }

    /// The price anchored at bin 0.
    #[must_use]
    pub const fn initial_price(&self) -> BinPrice {
        self.initial_price
    }

    /// X-side fee configuration.
    #[must_use]
    pub const fn x_fees(&self) -> FeeComponents {
        self.x_fees
    }

    /// Y-side fee configuration.
    #[must_use]
    pub const fn y_fees(&self) -> FeeComponents {
        self.y_fees
    }

    /// Destination of protocol-fee claims.
    #[must_use]
    pub const fn fee_address(&self) -> AccountId {
        self.fee_address
    }

    /// The variable-fees manager principal.
    #[must_use]
    pub const fn variable_fees_manager(&self) -> AccountId {
        self.variable_fees_manager
    }

    /// Whether the variable-fees manager is permanently frozen.
    #[must_use]
    pub const fn variable_fees_frozen(&self) -> bool {
        self.variable_fees_frozen
    }

    /// The variable-fee update cooldown, in logical-clock units.
    #[must_use]
    pub const fn variable_fees_cooldown(&self) -> u64 {
        self.variable_fees_cooldown
    }

    /// Logical time of the last variable-fee update.
    #[must_use]
    pub const fn last_variable_fees_update(&self) -> u64 {
        self.last_variable_fees_update
    }

    /// Whether the pool accepts swaps and deposits.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The bin swaps currently execute at.
    #[must_use]
    pub const fn active_bin_id(&self) -> BinId {
        self.active_bin_id
    }

    /// How many times the active-bin pointer has moved.
    #[must_use]
    pub const fn bin_change_count(&self) -> u64 {
        self.bin_change_count
    }

    /// Returns the bin record for `bin_id`, all-zero if untouched.
    #[must_use]
    pub fn bin(&self, bin_id: BinId) -> Bin {
        self.bins.get(&bin_id).copied().unwrap_or_default()
    }

    /// Returns `account`'s LP shares in `bin_id`, zero if absent.
    #[must_use]
    pub fn user_shares(&self, bin_id: BinId, account: AccountId) -> Shares {
        self.positions
            .get(&(bin_id, account))
            .copied()
            .unwrap_or(Shares::ZERO)
    }

    /// The unclaimed protocol-fee accumulator.
    #[must_use]
    pub const fn unclaimed_fees(&self) -> UnclaimedFees {
        self.unclaimed_fees
    }

    /// Returns `true` if `account` is exempt from swap fees in this pool.
    #[must_use]
    pub fn is_fee_exempt(&self, account: AccountId) -> bool {
        self.fee_exemptions.contains(&account)
    }

    /// Bins that currently hold state, in ascending id order.
    #[must_use]
    pub fn touched_bins(&self) -> Vec<BinId> {
        self.bins.keys().copied().collect()
    }

    pub(crate) fn bin_mut(&mut self, bin_id: BinId) -> &mut Bin {
        self.bins.entry(bin_id).or_default()
    }

    pub(crate) fn credit_shares(&mut self, bin_id: BinId, account: AccountId, shares: Shares) {
        let entry = self
            .positions
            .entry((bin_id, account))
            .or_insert(Shares::ZERO);
        // Supply is bounded by the same u128 as the entry; the engine
        // checks the supply addition first, so this cannot wrap.
        *entry = Shares::new(entry.get() + shares.get());
    }

    pub(crate) fn debit_shares(&mut self, bin_id: BinId, account: AccountId, shares: Shares) {
        let key = (bin_id, account);
        let held = self.positions.get(&key).copied().unwrap_or(Shares::ZERO);
        let remaining = held.checked_sub(shares).unwrap_or(Shares::ZERO);
        if remaining.is_zero() {
            self.positions.remove(&key);
        } else {
            self.positions.insert(key, remaining);
        }
    }

    pub(crate) fn step_active_bin(&mut self, delta: i32) {
        if let Some(next) = self.active_bin_id.checked_offset(delta) {
            self.active_bin_id = next;
            self.bin_change_count += 1;
        }
    }
}
