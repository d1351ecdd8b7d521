//! Arithmetic utilities for bin calculations.
//!
//! This module provides rounding-aware integer division ([`div_round`],
//! [`mul_div`]) and the two bin formulas built on top of them
//! ([`bin_price`], [`liquidity_value`]). All helpers are checked: they
//! surface overflow and zero denominators as values, never panics.

mod bin_math;
mod rounding;

pub use bin_math::{bin_price, liquidity_value};
pub use rounding::{div_round, mul_div};
