//! Fundamental domain value types used throughout the engine.
//!
//! This module contains the core value types that model the bin ledger:
//! amounts, LP shares, bin ids and prices, fee rates, principals, and the
//! result objects of the public operations. All types are newtypes with
//! validated constructors, checked arithmetic, and explicit rounding.

mod account;
mod amount;
mod basis_points;
mod bin_id;
mod bin_position;
mod bin_price;
mod rounding;
mod shares;
mod swap_outcome;

pub use account::{AccountId, TokenId};
pub use amount::Amount;
pub use basis_points::{BasisPoints, FEE_SCALE};
pub use bin_id::{BinId, CENTER_BIN_ID, MAX_BIN_ID, MIN_BIN_ID, NUM_OF_BINS};
pub use bin_position::BinPosition;
pub use bin_price::{BinPrice, PRICE_SCALE};
pub use rounding::Rounding;
pub use shares::Shares;
pub use swap_outcome::{SwapOutcome, Withdrawal};
