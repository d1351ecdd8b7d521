//! Validated bin-price factor tables.

use crate::domain::{BinId, FEE_SCALE, NUM_OF_BINS, PRICE_SCALE};
use crate::error::AmmError;

/// A precomputed price-factor table for one bin step.
///
/// One entry per possible bin, indexed by the unsigned bin index. The
/// table is registered once per bin step and is immutable afterwards;
/// every pool with that step shares it. A valid table is:
///
/// - exactly [`NUM_OF_BINS`] entries long,
/// - strictly ascending (so the bin price is strictly increasing in the
///   signed bin id),
/// - anchored at the centre: the entry for bin 0 equals [`PRICE_SCALE`],
/// - strictly positive everywhere (implied by the first entry being
///   positive plus strict ascent, both checked).
///
/// # Examples
///
/// ```
/// use lattice_amm::domain::{BinId, PRICE_SCALE};
/// use lattice_amm::registry::FactorTable;
///
/// let table = FactorTable::uniform_step(25).expect("valid step");
/// assert_eq!(table.get(BinId::ZERO), PRICE_SCALE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorTable {
    factors: Vec<u128>,
}

impl FactorTable {
    /// Creates a table from raw factors, validating every invariant.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidBinFactorsLength`] if there are not exactly
    ///   [`NUM_OF_BINS`] entries.
    /// - [`AmmError::InvalidBinFactor`] if the first entry is zero.
    /// - [`AmmError::UnsortedBinFactors`] if the entries are not strictly
    ///   ascending.
    /// - [`AmmError::InvalidCenterBinFactor`] if the centre entry is not
    ///   [`PRICE_SCALE`].
    pub fn new(factors: Vec<u128>) -> crate::error::Result<Self> {
        if factors.len() != NUM_OF_BINS {
            return Err(AmmError::InvalidBinFactorsLength(
                "factor table must hold one entry per bin",
            ));
        }
        if factors[0] == 0 {
            return Err(AmmError::InvalidBinFactor("first factor must be positive"));
        }
        for pair in factors.windows(2) {
            if pair[1] <= pair[0] {
                return Err(AmmError::UnsortedBinFactors(
                    "factors must be strictly ascending",
                ));
            }
        }
        if factors[BinId::ZERO.to_unsigned() as usize] != PRICE_SCALE {
            return Err(AmmError::InvalidCenterBinFactor(
                "center factor must equal PRICE_SCALE",
            ));
        }
        Ok(Self { factors })
    }

    /// Builds the geometric table for a uniform bin step of `step` basis
    /// points: each bin up multiplies the factor by
    /// `(FEE_SCALE + step) / FEE_SCALE`, each bin down divides by it,
    /// flooring once per step.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidBinStep`] if `step` is zero or above
    ///   `FEE_SCALE`.
    /// - Any validation error from [`FactorTable::new`] if the geometric
    ///   series degenerates (e.g. a very large step underflows the deep
    ///   bins to equal values).
    /// - [`AmmError::Overflow`] if the top bins overflow `u128`.
    pub fn uniform_step(step: u32) -> crate::error::Result<Self> {
        if step == 0 || step > FEE_SCALE {
            return Err(AmmError::InvalidBinStep("bin step must be in 1..=10000"));
        }
        let num = (FEE_SCALE + step) as u128;
        let den = FEE_SCALE as u128;
        let center = BinId::ZERO.to_unsigned() as usize;

        let mut factors = vec![0u128; NUM_OF_BINS];
        factors[center] = PRICE_SCALE;
        for i in (0..center).rev() {
            factors[i] = factors[i + 1] * den / num;
        }
        for i in center + 1..NUM_OF_BINS {
            factors[i] = factors[i - 1]
                .checked_mul(num)
                .ok_or(AmmError::Overflow("factor table growth"))?
                / den;
        }
        Self::new(factors)
    }

    /// Returns the factor for a signed bin id.
    #[must_use]
    pub fn get(&self, bin_id: BinId) -> u128 {
        self.factors[bin_id.to_unsigned() as usize]
    }

    /// Returns the raw factor slice, ordered by unsigned index.
    #[must_use]
    pub fn factors(&self) -> &[u128] {
        &self.factors
    }
}
