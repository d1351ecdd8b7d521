//! Bin-price lookup and liquidity valuation.
//!
//! These helpers implement the two formulas every bin operation rests on:
//!
//! - [`bin_price`] — `initial_price × factor / PRICE_SCALE`, where the
//!   factor comes from the precomputed, strictly ascending table for the
//!   pool's bin step. The price is therefore strictly increasing in the
//!   signed bin id: bins above the active bin are the higher-price,
//!   X-rich side.
//! - [`liquidity_value`] — `x × price / PRICE_SCALE + y`, the bin's
//!   fungible unit of value, with X valued in Y terms at the bin price.
//!
//! Both floor their division: valuations and prices never round in a
//! depositor's favour.

use crate::domain::{Amount, BinId, BinPrice, Rounding, PRICE_SCALE};
use crate::error::AmmError;
use crate::math::mul_div;
use crate::registry::FactorTable;

/// Computes the price of `bin_id` from the pool's initial price and the
/// factor table registered for its bin step.
///
/// # Errors
///
/// - [`AmmError::InvalidBinFactor`] if the table holds a zero factor at
///   the bin's index (tables are validated at registration, so this
///   indicates a corrupted store).
/// - [`AmmError::Overflow`] if `initial_price × factor` overflows.
/// - [`AmmError::InvalidBinPrice`] if the scaled price floors to zero.
///
/// # Examples
///
/// ```
/// use lattice_amm::domain::{BinId, BinPrice, PRICE_SCALE};
/// use lattice_amm::math::bin_price;
/// use lattice_amm::registry::FactorTable;
///
/// let table = FactorTable::uniform_step(25).expect("valid step");
/// let initial = BinPrice::new(5 * PRICE_SCALE).expect("positive");
/// let center = bin_price(initial, &table, BinId::ZERO).expect("valid bin");
/// assert_eq!(center, initial);
/// let above = bin_price(initial, &table, BinId::new(1).expect("in range"))
///     .expect("valid bin");
/// assert!(above > center);
/// ```
pub fn bin_price(
    initial_price: BinPrice,
    factors: &FactorTable,
    bin_id: BinId,
) -> crate::error::Result<BinPrice> {
    let factor = factors.get(bin_id);
    if factor == 0 {
        return Err(AmmError::InvalidBinFactor("zero factor in registered table"));
    }
    let raw = mul_div(initial_price.get(), factor, PRICE_SCALE, Rounding::Down)
        .ok_or(AmmError::Overflow("bin price multiplication"))?;
    BinPrice::new(raw)
}

/// Values a deposit of `x` and `y` in the bin's fungible unit:
/// `x × price / PRICE_SCALE + y`, floored.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the X valuation or the sum
/// overflows.
///
/// # Examples
///
/// ```
/// use lattice_amm::domain::{Amount, BinPrice, PRICE_SCALE};
/// use lattice_amm::math::liquidity_value;
///
/// let price = BinPrice::new(5 * PRICE_SCALE).expect("positive");
/// let value = liquidity_value(Amount::new(100), Amount::new(40), price)
///     .expect("no overflow");
/// assert_eq!(value.get(), 540);
/// ```
pub fn liquidity_value(x: Amount, y: Amount, price: BinPrice) -> crate::error::Result<Amount> {
    let x_in_y = mul_div(x.get(), price.get(), PRICE_SCALE, Rounding::Down)
        .ok_or(AmmError::Overflow("liquidity value of x side"))?;
    Amount::new(x_in_y)
        .checked_add(y)
        .ok_or(AmmError::Overflow("liquidity value sum"))
}
