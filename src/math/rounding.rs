//! Rounding-aware integer division helpers.
//!
//! [`div_round`] and [`mul_div`] are the low-level building blocks for
//! every price, fee, and share computation in the engine. Both take an
//! explicit [`Rounding`] direction; there is no unannotated division
//! anywhere in the bin arithmetic.
//!
//! # Convention
//!
//! Rounding always favours the pool (see [`Rounding`] for the placement
//! table): floor on payouts, fees, and share mints; ceiling on capacity
//! caps.
//!
//! # Examples
//!
//! ```
//! use lattice_amm::domain::Rounding;
//! use lattice_amm::math::{div_round, mul_div};
//!
//! assert_eq!(div_round(10, 3, Rounding::Down), Some(3));
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! assert_eq!(mul_div(7, 9, 4, Rounding::Down), Some(15));
//! assert_eq!(mul_div(7, 9, 4, Rounding::Up), Some(16));
//! assert_eq!(div_round(10, 0, Rounding::Down), None);
//! ```

use crate::domain::Rounding;

/// Integer division of `u128` values with explicit rounding direction.
///
/// - [`Rounding::Down`]: floor division (round towards zero).
/// - [`Rounding::Up`]: ceiling division — the smallest integer ≥ the
///   exact quotient.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    match rounding {
        Rounding::Down => Some(numerator / denominator),
        Rounding::Up => {
            // Ceiling division: (n + d - 1) / d, guarding the adjustment
            // against overflow.
            match numerator.checked_add(denominator - 1) {
                Some(adjusted) => Some(adjusted / denominator),
                None => {
                    let q = numerator / denominator;
                    let r = numerator % denominator;
                    if r != 0 {
                        // q + 1 cannot overflow: if n == u128::MAX and
                        // d == 1 then r == 0, so this branch is never hit
                        // with q == u128::MAX.
                        Some(q + 1)
                    } else {
                        Some(q)
                    }
                }
            }
        }
    }
}

/// Computes `a × b / denominator` with explicit rounding direction.
///
/// The multiplication is checked: the engine's scales (`PRICE_SCALE` =
/// 1e8, `FEE_SCALE` = 1e4) leave ample headroom for realistic reserves,
/// and a genuine overflow surfaces as [`None`] rather than a wrapped
/// result.
///
/// Returns [`None`] if the product overflows `u128` or `denominator` is
/// zero.
#[must_use]
pub const fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    match a.checked_mul(b) {
        Some(product) => div_round(product, denominator, rounding),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- div_round ----------------------------------------------------------

    #[test]
    fn div_by_zero_returns_none() {
        assert_eq!(div_round(100, 0, Rounding::Down), None);
        assert_eq!(div_round(100, 0, Rounding::Up), None);
    }

    #[test]
    fn zero_numerator() {
        assert_eq!(div_round(0, 5, Rounding::Down), Some(0));
        assert_eq!(div_round(0, 5, Rounding::Up), Some(0));
    }

    #[test]
    fn exact_division_agrees() {
        assert_eq!(div_round(100, 10, Rounding::Down), Some(10));
        assert_eq!(div_round(100, 10, Rounding::Up), Some(10));
    }

    #[test]
    fn remainder_splits_directions() {
        assert_eq!(div_round(10, 3, Rounding::Down), Some(3));
        assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
        assert_eq!(div_round(9, 10, Rounding::Down), Some(0));
        assert_eq!(div_round(9, 10, Rounding::Up), Some(1));
    }

    #[test]
    fn ceiling_overflow_fallback() {
        // (MAX + d - 1) overflows, forcing the remainder-based fallback.
        let d = u128::MAX / 2;
        assert_eq!(div_round(u128::MAX, d, Rounding::Down), Some(2));
        assert_eq!(div_round(u128::MAX, d, Rounding::Up), Some(3));
    }

    #[test]
    fn max_divided_by_one() {
        assert_eq!(div_round(u128::MAX, 1, Rounding::Down), Some(u128::MAX));
        assert_eq!(div_round(u128::MAX, 1, Rounding::Up), Some(u128::MAX));
    }

    // -- mul_div ------------------------------------------------------------

    #[test]
    fn mul_div_basic() {
        assert_eq!(mul_div(6, 7, 2, Rounding::Down), Some(21));
        assert_eq!(mul_div(7, 9, 4, Rounding::Down), Some(15));
        assert_eq!(mul_div(7, 9, 4, Rounding::Up), Some(16));
    }

    #[test]
    fn mul_div_overflow_is_none() {
        assert_eq!(mul_div(u128::MAX, 2, 1, Rounding::Down), None);
    }

    #[test]
    fn mul_div_zero_denominator_is_none() {
        assert_eq!(mul_div(6, 7, 0, Rounding::Down), None);
    }

    #[test]
    fn mul_div_zero_factor() {
        assert_eq!(mul_div(0, 7, 3, Rounding::Up), Some(0));
    }
}
