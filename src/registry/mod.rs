//! Shared registry: bin-step factor tables, admins, and creation policy.
//!
//! The registry is the mutable global state of the original system made
//! explicit: an owned value passed into the engine, never ambient. It
//! holds the data every pool shares — the per-step factor tables, the
//! admin list that gates configuration setters, the share minimums that
//! guard pool creation, and the public-creation toggle.

mod factor_table;

pub use factor_table::FactorTable;

use std::collections::BTreeMap;

use crate::domain::{AccountId, Shares, FEE_SCALE};
use crate::error::AmmError;

/// Maximum number of admins besides the creator.
pub const MAX_ADMINS: usize = 5;

/// Shared mutable state for all pools managed by one engine.
///
/// The creator is always an admin and can never be removed; further
/// admins (up to [`MAX_ADMINS`]) can be added and removed by any admin.
///
/// # Examples
///
/// ```
/// use lattice_amm::domain::AccountId;
/// use lattice_amm::registry::{FactorTable, Registry};
///
/// let creator = AccountId::from_bytes([1u8; 32]);
/// let mut registry = Registry::new(creator);
/// let table = FactorTable::uniform_step(25).expect("valid step");
/// registry.add_bin_step(creator, 25, table).expect("registered");
/// assert!(registry.factors(25).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    creator: AccountId,
    admins: Vec<AccountId>,
    bin_steps: BTreeMap<u32, FactorTable>,
    minimum_bin_shares: Shares,
    minimum_burnt_shares: Shares,
    public_pool_creation: bool,
}

impl Registry {
    /// Creates a registry owned by `creator`.
    ///
    /// Pool creation starts admin-only and the share minimums start at
    /// zero; both are adjusted through the admin setters.
    #[must_use]
    pub fn new(creator: AccountId) -> Self {
        Self {
            creator,
            admins: Vec::new(),
            bin_steps: BTreeMap::new(),
            minimum_bin_shares: Shares::ZERO,
            minimum_burnt_shares: Shares::ZERO,
            public_pool_creation: false,
        }
    }

    /// Returns `true` if `account` is the creator or a listed admin.
    #[must_use]
    pub fn is_admin(&self, account: AccountId) -> bool {
        account == self.creator || self.admins.contains(&account)
    }

    /// Returns the registry creator.
    #[must_use]
    pub const fn creator(&self) -> AccountId {
        self.creator
    }

    /// Adds `admin` to the admin list.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NotAuthorized`] if `caller` is not an admin.
    /// - [`AmmError::AlreadyAdmin`] if `admin` is already listed (or is
    ///   the creator).
    /// - [`AmmError::AdminLimitReached`] if the list is full.
    pub fn add_admin(&mut self, caller: AccountId, admin: AccountId) -> crate::error::Result<()> {
        self.require_admin(caller)?;
        if self.is_admin(admin) {
            return Err(AmmError::AlreadyAdmin("principal already has admin rights"));
        }
        if self.admins.len() >= MAX_ADMINS {
            return Err(AmmError::AdminLimitReached("admin list is full"));
        }
        self.admins.push(admin);
        Ok(())
    }

    /// Removes `admin` from the admin list.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NotAuthorized`] if `caller` is not an admin.
    /// - [`AmmError::CannotRemoveCreator`] if `admin` is the creator.
    /// - [`AmmError::AdminNotInList`] if `admin` is not listed.
    pub fn remove_admin(
        &mut self,
        caller: AccountId,
        admin: AccountId,
    ) -> crate::error::Result<()> {
        self.require_admin(caller)?;
        if admin == self.creator {
            return Err(AmmError::CannotRemoveCreator(
                "creator admin rights are permanent",
            ));
        }
        let index = self
            .admins
            .iter()
            .position(|a| *a == admin)
            .ok_or(AmmError::AdminNotInList("principal is not an admin"))?;
        self.admins.remove(index);
        Ok(())
    }

    /// Registers the factor table for a bin step. Tables are write-once:
    /// a registered step can never be replaced.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NotAuthorized`] if `caller` is not an admin.
    /// - [`AmmError::InvalidBinStep`] if `step` is zero or above
    ///   `FEE_SCALE`.
    /// - [`AmmError::AlreadyBinStep`] if the step is already registered.
    pub fn add_bin_step(
        &mut self,
        caller: AccountId,
        step: u32,
        table: FactorTable,
    ) -> crate::error::Result<()> {
        self.require_admin(caller)?;
        if step == 0 || step > FEE_SCALE {
            return Err(AmmError::InvalidBinStep("bin step must be in 1..=10000"));
        }
        if self.bin_steps.contains_key(&step) {
            return Err(AmmError::AlreadyBinStep("factor table already registered"));
        }
        self.bin_steps.insert(step, table);
        Ok(())
    }

    /// Returns the factor table registered for `step`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NoBinFactors`] if the step is unregistered.
    pub fn factors(&self, step: u32) -> crate::error::Result<&FactorTable> {
        self.bin_steps
            .get(&step)
            .ok_or(AmmError::NoBinFactors("no factor table for bin step"))
    }

    /// Returns the registered bin steps in ascending order.
    #[must_use]
    pub fn bin_steps(&self) -> Vec<u32> {
        self.bin_steps.keys().copied().collect()
    }

    /// Sets the pool-creation share minimums.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAuthorized`] if `caller` is not an admin.
    pub fn set_minimum_shares(
        &mut self,
        caller: AccountId,
        minimum_bin: Shares,
        minimum_burnt: Shares,
    ) -> crate::error::Result<()> {
        self.require_admin(caller)?;
        self.minimum_bin_shares = minimum_bin;
        self.minimum_burnt_shares = minimum_burnt;
        Ok(())
    }

    /// Minimum shares a freshly created bin must retain beyond the burn.
    #[must_use]
    pub const fn minimum_bin_shares(&self) -> Shares {
        self.minimum_bin_shares
    }

    /// Minimum shares pool creation must burn.
    #[must_use]
    pub const fn minimum_burnt_shares(&self) -> Shares {
        self.minimum_burnt_shares
    }

    /// Enables or disables permissionless pool creation.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NotAuthorized`] if `caller` is not an admin.
    pub fn set_public_pool_creation(
        &mut self,
        caller: AccountId,
        enabled: bool,
    ) -> crate::error::Result<()> {
        self.require_admin(caller)?;
        self.public_pool_creation = enabled;
        Ok(())
    }

    /// Returns `true` if anyone may create pools.
    #[must_use]
    pub const fn public_pool_creation(&self) -> bool {
        self.public_pool_creation
    }

    pub(crate) fn require_admin(&self, caller: AccountId) -> crate::error::Result<()> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(AmmError::NotAuthorized("caller is not an admin"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn account(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 32])
    }

    fn table() -> FactorTable {
        let Ok(t) = FactorTable::uniform_step(25) else {
            panic!("valid step");
        };
        t
    }

    #[test]
    fn creator_is_admin() {
        let registry = Registry::new(account(1));
        assert!(registry.is_admin(account(1)));
        assert!(!registry.is_admin(account(2)));
    }

    #[test]
    fn add_and_remove_admin() {
        let mut registry = Registry::new(account(1));
        assert!(registry.add_admin(account(1), account(2)).is_ok());
        assert!(registry.is_admin(account(2)));
        assert!(registry.remove_admin(account(2), account(2)).is_ok());
        assert!(!registry.is_admin(account(2)));
    }

    #[test]
    fn non_admin_cannot_add() {
        let mut registry = Registry::new(account(1));
        assert!(matches!(
            registry.add_admin(account(2), account(3)),
            Err(AmmError::NotAuthorized(_))
        ));
    }

    #[test]
    fn creator_cannot_be_removed() {
        let mut registry = Registry::new(account(1));
        assert!(matches!(
            registry.remove_admin(account(1), account(1)),
            Err(AmmError::CannotRemoveCreator(_))
        ));
    }

    #[test]
    fn admin_limit_enforced() {
        let mut registry = Registry::new(account(1));
        for byte in 2..2 + MAX_ADMINS as u8 {
            assert!(registry.add_admin(account(1), account(byte)).is_ok());
        }
        assert!(matches!(
            registry.add_admin(account(1), account(100)),
            Err(AmmError::AdminLimitReached(_))
        ));
    }

    #[test]
    fn bin_step_registration_is_write_once() {
        let mut registry = Registry::new(account(1));
        assert!(registry.add_bin_step(account(1), 25, table()).is_ok());
        assert!(matches!(
            registry.add_bin_step(account(1), 25, table()),
            Err(AmmError::AlreadyBinStep(_))
        ));
        assert_eq!(registry.bin_steps(), vec![25]);
    }

    #[test]
    fn unregistered_step_has_no_factors() {
        let registry = Registry::new(account(1));
        assert!(matches!(
            registry.factors(25),
            Err(AmmError::NoBinFactors(_))
        ));
    }

    #[test]
    fn minimum_shares_setter() {
        let mut registry = Registry::new(account(1));
        assert!(registry
            .set_minimum_shares(account(1), Shares::new(100), Shares::new(10))
            .is_ok());
        assert_eq!(registry.minimum_bin_shares(), Shares::new(100));
        assert_eq!(registry.minimum_burnt_shares(), Shares::new(10));
    }
}
