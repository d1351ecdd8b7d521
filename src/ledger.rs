//! External token-ledger seam.
//!
//! The engine never moves tokens itself: the underlying assets and their
//! balances live in an external fungible-token ledger that the host
//! environment supplies. [`TokenLedger`] is the trait at that seam; the
//! engine calls it exactly once per token movement, after all validation
//! has passed, so a ledger failure aborts the operation before any bin
//! state has been committed.
//!
//! [`InMemoryLedger`] is a straightforward map-backed implementation used
//! by the test suites and suitable for simulation harnesses.

use std::collections::BTreeMap;

use crate::domain::{AccountId, Amount, TokenId};
use crate::error::AmmError;

/// Atomic external ledger for the pool's underlying assets.
///
/// Implementations must apply each transfer atomically: either the full
/// amount moves or the call returns an error and nothing changed.
pub trait TokenLedger {
    /// Moves `amount` of `token` from `from` to `to`.
    ///
    /// A zero-amount transfer is a no-op and must succeed.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientTokenBalance`] if `from` holds
    /// less than `amount`.
    fn transfer(
        &mut self,
        token: TokenId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> crate::error::Result<()>;

    /// Returns the balance of `account` in `token`.
    fn balance_of(&self, token: TokenId, account: AccountId) -> Amount;
}

/// Map-backed [`TokenLedger`] for tests and simulation.
///
/// # Examples
///
/// ```
/// use lattice_amm::domain::{AccountId, Amount, TokenId};
/// use lattice_amm::ledger::{InMemoryLedger, TokenLedger};
///
/// let token = TokenId::from_bytes([9u8; 32]);
/// let alice = AccountId::from_bytes([1u8; 32]);
/// let bob = AccountId::from_bytes([2u8; 32]);
///
/// let mut ledger = InMemoryLedger::new();
/// ledger.mint(token, alice, Amount::new(100));
/// ledger.transfer(token, alice, bob, Amount::new(40)).expect("funded");
/// assert_eq!(ledger.balance_of(token, alice), Amount::new(60));
/// assert_eq!(ledger.balance_of(token, bob), Amount::new(40));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: BTreeMap<(TokenId, AccountId), u128>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` of `token` to `account` out of thin air.
    pub fn mint(&mut self, token: TokenId, account: AccountId, amount: Amount) {
        let entry = self.balances.entry((token, account)).or_insert(0);
        *entry = entry.saturating_add(amount.get());
    }
}

impl TokenLedger for InMemoryLedger {
    fn transfer(
        &mut self,
        token: TokenId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> crate::error::Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let from_balance = self.balance_of(token, from);
        let remaining = from_balance
            .checked_sub(amount)
            .ok_or(AmmError::InsufficientTokenBalance(
                "transfer exceeds sender balance",
            ))?;
        self.balances.insert((token, from), remaining.get());
        let entry = self.balances.entry((token, to)).or_insert(0);
        *entry = entry.saturating_add(amount.get());
        Ok(())
    }

    fn balance_of(&self, token: TokenId, account: AccountId) -> Amount {
        Amount::new(
            self.balances
                .get(&(token, account))
                .copied()
                .unwrap_or_default(),
        )
    }
}
