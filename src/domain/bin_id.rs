//! Signed, zero-centered bin index and its unsigned storage codec.

use core::fmt;

use crate::error::AmmError;

/// Minimum valid signed bin id.
pub const MIN_BIN_ID: i32 = -500;

/// Maximum valid signed bin id.
pub const MAX_BIN_ID: i32 = 500;

/// Unsigned storage index of signed bin 0.
pub const CENTER_BIN_ID: u32 = 500;

/// Total number of bins, and the required factor-table length.
pub const NUM_OF_BINS: usize = 1_001;

/// A discrete price slot index, signed and centered on zero.
///
/// Bin ids are symmetric around the center: signed id `i` is stored at
/// unsigned index `CENTER_BIN_ID + i`, so the full range `[-500, 500]`
/// maps onto `[0, 1000]`. Bins above the active bin are the higher-price,
/// X-rich side; bins below hold the quote token Y.
///
/// # Examples
///
/// ```
/// use lattice_amm::domain::BinId;
///
/// let bin = BinId::new(-3).unwrap_or(BinId::ZERO);
/// assert_eq!(bin.get(), -3);
/// assert_eq!(bin.to_unsigned(), 497);
/// assert_eq!(BinId::from_unsigned(497), Ok(bin));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinId(i32);

impl BinId {
    /// Minimum valid bin (`-500`).
    pub const MIN: Self = Self(MIN_BIN_ID);

    /// Maximum valid bin (`500`).
    pub const MAX: Self = Self(MAX_BIN_ID);

    /// The center bin, where the initial price applies unscaled.
    pub const ZERO: Self = Self(0);

    /// Creates a new `BinId` with range validation.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidBinId`] if `value` is outside
    /// `[-500, 500]`.
    pub const fn new(value: i32) -> crate::error::Result<Self> {
        if value < MIN_BIN_ID || value > MAX_BIN_ID {
            return Err(AmmError::InvalidBinId("bin id out of range [-500, 500]"));
        }
        Ok(Self(value))
    }

    /// Returns the underlying signed index.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Converts to the unsigned storage index: `CENTER_BIN_ID + id`.
    #[must_use]
    pub const fn to_unsigned(&self) -> u32 {
        // Cannot wrap: self.0 >= -500 and CENTER_BIN_ID == 500.
        (CENTER_BIN_ID as i64 + self.0 as i64) as u32
    }

    /// Converts an unsigned storage index back to a signed `BinId`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidBinId`] if `index` maps outside the
    /// valid signed range.
    pub const fn from_unsigned(index: u32) -> crate::error::Result<Self> {
        Self::new(index as i32 - CENTER_BIN_ID as i32)
    }

    /// Checked addition of a signed offset, staying within the valid
    /// range.
    ///
    /// Returns `None` if the result would leave `[-500, 500]`.
    #[must_use]
    pub const fn checked_offset(&self, delta: i32) -> Option<Self> {
        match self.0.checked_add(delta) {
            Some(v) if v >= MIN_BIN_ID && v <= MAX_BIN_ID => Some(Self(v)),
            _ => None,
        }
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bin {}", self.0)
    }
}
