//! Opaque principal identifiers for accounts and asset contracts.

use core::fmt;

/// An opaque account principal.
///
/// Wraps a fixed-size `[u8; 32]` byte array. The engine never interprets
/// the bytes — equality is the only operation it needs. Hosts map their
/// own address format into this space.
///
/// # Examples
///
/// ```
/// use lattice_amm::domain::AccountId;
///
/// let alice = AccountId::from_bytes([1u8; 32]);
/// let bob = AccountId::from_bytes([2u8; 32]);
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Creates an `AccountId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying byte array.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First four bytes are enough to tell principals apart in logs.
        write!(
            f,
            "account:{:02x}{:02x}{:02x}{:02x}…",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// An opaque asset-contract principal.
///
/// Distinct from [`AccountId`] at the type level so that a token
/// reference can never be passed where a user account is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId([u8; 32]);

impl TokenId {
    /// Creates a `TokenId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying byte array.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "token:{:02x}{:02x}{:02x}{:02x}…",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_bytes() {
        assert_eq!(
            AccountId::from_bytes([7u8; 32]),
            AccountId::from_bytes([7u8; 32])
        );
        assert_ne!(
            AccountId::from_bytes([7u8; 32]),
            AccountId::from_bytes([8u8; 32])
        );
    }

    #[test]
    fn display_prefixes() {
        let a = AccountId::from_bytes([0xab; 32]);
        assert!(format!("{a}").starts_with("account:abab"));
        let t = TokenId::from_bytes([0xcd; 32]);
        assert!(format!("{t}").starts_with("token:cdcd"));
    }
}
