//! Convenience re-exports for common types and traits.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use lattice_amm::prelude::*;
//! ```

pub use crate::domain::{
    AccountId, Amount, BasisPoints, BinId, BinPosition, BinPrice, Rounding, Shares, SwapOutcome,
    TokenId, Withdrawal, FEE_SCALE, PRICE_SCALE,
};

pub use crate::engine::{DlmmCore, BURN_ACCOUNT};

pub use crate::error::{AmmError, Result};

pub use crate::ledger::{InMemoryLedger, TokenLedger};

pub use crate::pool::{Bin, FeeComponents, Pool, PoolId, PoolParams, UnclaimedFees};

pub use crate::registry::{FactorTable, Registry};
