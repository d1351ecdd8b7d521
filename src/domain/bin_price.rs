//! Fixed-point bin price.

use core::fmt;

use crate::error::AmmError;

/// Fixed-point price denominator: a raw price of `PRICE_SCALE` is 1.0.
pub const PRICE_SCALE: u128 = 100_000_000;

/// A bin price in units of Y per unit of X, scaled by [`PRICE_SCALE`].
///
/// Prices are strictly positive: a zero price would let swap output
/// computations divide by zero and is rejected at construction. All price
/// arithmetic happens through [`mul_div`](crate::math::mul_div) with an
/// explicit rounding direction.
///
/// # Examples
///
/// ```
/// use lattice_amm::domain::{BinPrice, PRICE_SCALE};
///
/// // A price of 5.0 Y per X.
/// let price = BinPrice::new(5 * PRICE_SCALE).unwrap_or(BinPrice::ONE);
/// assert_eq!(price.get(), 500_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinPrice(u128);

impl BinPrice {
    /// Price of exactly 1.0 (`PRICE_SCALE` raw).
    pub const ONE: Self = Self(PRICE_SCALE);

    /// Creates a new `BinPrice` from a raw scaled value.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidBinPrice`] if `value` is zero.
    pub const fn new(value: u128) -> crate::error::Result<Self> {
        if value == 0 {
            return Err(AmmError::InvalidBinPrice("price must be strictly positive"));
        }
        Ok(Self(value))
    }

    /// Returns the raw scaled value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for BinPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:08}", self.0 / PRICE_SCALE, self.0 % PRICE_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero() {
        assert!(BinPrice::new(0).is_err());
    }

    #[test]
    fn new_accepts_positive() {
        assert_eq!(BinPrice::new(1).map(|p| p.get()), Ok(1));
        assert_eq!(BinPrice::ONE.get(), PRICE_SCALE);
    }

    #[test]
    fn display_fixed_point() {
        assert_eq!(format!("{}", BinPrice::ONE), "1.00000000");
        let p = BinPrice::new(5 * PRICE_SCALE + 2_500_000).unwrap_or(BinPrice::ONE);
        assert_eq!(format!("{p}"), "5.02500000");
    }

    #[test]
    fn ordering_is_by_raw_value() {
        let low = BinPrice::new(PRICE_SCALE).unwrap_or(BinPrice::ONE);
        let high = BinPrice::new(2 * PRICE_SCALE).unwrap_or(BinPrice::ONE);
        assert!(low < high);
    }
}
