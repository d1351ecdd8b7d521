//! Per-side fee configuration with a hard cap invariant.

use core::fmt;

use crate::domain::{BasisPoints, FEE_SCALE};
use crate::error::AmmError;

/// One asset side's fee configuration: protocol, provider, and variable
/// components, each in basis points.
///
/// The cap `protocol + provider + variable ≤ FEE_SCALE` is enforced at
/// construction and at *every* setter, so a `FeeComponents` value in hand
/// always satisfies it and [`total`](Self::total) can never exceed 100%.
///
/// # Examples
///
/// ```
/// use lattice_amm::domain::BasisPoints;
/// use lattice_amm::pool::FeeComponents;
///
/// let mut fees = FeeComponents::new(BasisPoints::new(1_000), BasisPoints::new(3_000))
///     .expect("within cap");
/// assert_eq!(fees.total().get(), 4_000);
/// fees.set_variable(BasisPoints::new(500)).expect("still within cap");
/// assert_eq!(fees.total().get(), 4_500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeComponents {
    protocol: BasisPoints,
    provider: BasisPoints,
    variable: BasisPoints,
}

impl FeeComponents {
    /// Creates a configuration with the given base rates and a zero
    /// variable component.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if `protocol + provider` exceeds
    /// `FEE_SCALE`.
    pub fn new(protocol: BasisPoints, provider: BasisPoints) -> crate::error::Result<Self> {
        let fees = Self {
            protocol,
            provider,
            variable: BasisPoints::ZERO,
        };
        fees.check_cap()?;
        Ok(fees)
    }

    /// The protocol component.
    #[must_use]
    pub const fn protocol(&self) -> BasisPoints {
        self.protocol
    }

    /// The provider component.
    #[must_use]
    pub const fn provider(&self) -> BasisPoints {
        self.provider
    }

    /// The variable component.
    #[must_use]
    pub const fn variable(&self) -> BasisPoints {
        self.variable
    }

    /// The combined rate. Guaranteed ≤ `FEE_SCALE` by the cap invariant.
    #[must_use]
    pub fn total(&self) -> BasisPoints {
        // Cannot overflow: each component is ≤ FEE_SCALE by the cap.
        BasisPoints::new(self.protocol.get() + self.provider.get() + self.variable.get())
    }

    /// Replaces the protocol and provider components.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if the new base plus the current
    /// variable component exceeds `FEE_SCALE`.
    pub fn set_base(
        &mut self,
        protocol: BasisPoints,
        provider: BasisPoints,
    ) -> crate::error::Result<()> {
        let candidate = Self {
            protocol,
            provider,
            variable: self.variable,
        };
        candidate.check_cap()?;
        *self = candidate;
        Ok(())
    }

    /// Replaces the variable component.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if the current base plus the new
    /// variable component exceeds `FEE_SCALE`.
    pub fn set_variable(&mut self, variable: BasisPoints) -> crate::error::Result<()> {
        let candidate = Self { variable, ..*self };
        candidate.check_cap()?;
        *self = candidate;
        Ok(())
    }

    fn check_cap(&self) -> crate::error::Result<()> {
        let sum = self
            .protocol
            .checked_add(self.provider)
            .and_then(|s| s.checked_add(self.variable))
            .ok_or(AmmError::InvalidFee("fee component sum overflows"))?;
        if sum.get() > FEE_SCALE {
            return Err(AmmError::InvalidFee(
                "protocol + provider + variable exceeds FEE_SCALE",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for FeeComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "protocol {} provider {} variable {}",
            self.protocol, self.provider, self.variable
        )
    }
}
