//! Unified error types for the lattice AMM engine.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type. Every variant carries a short static context string so that
//! callers (and test assertions) can distinguish *why* a given class of
//! error fired without allocating.
//!
//! Errors are terminal for the operation that raised them: the engine
//! validates and computes before it mutates, so a returned error implies
//! that no state was changed.

use core::fmt;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Unified error enum for all engine operations.
///
/// Grouped by the class of failure:
///
/// - **Validation** — malformed inputs: zero amounts, out-of-range bin
///   ids, mismatched token references, matching bin ids on a move.
/// - **Authorization** — the caller lacks the admin or manager capability
///   required by a gated setter.
/// - **State preconditions** — the named bin is not active, the caller
///   holds no shares, a cooldown has not lapsed, the manager is frozen.
/// - **Slippage** — a caller-supplied minimum or maximum bound was
///   violated by the freshly computed result.
/// - **Arithmetic** — checked integer arithmetic overflowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    /// Caller is not an admin (or not the required manager) for a gated
    /// operation.
    NotAuthorized(&'static str),
    /// An amount argument is zero or otherwise unusable.
    InvalidAmount(&'static str),
    /// A signed bin id lies outside `[MIN_BIN_ID, MAX_BIN_ID]`.
    InvalidBinId(&'static str),
    /// The named bin is not the pool's current active bin.
    NotActiveBin(&'static str),
    /// The pool id resolved to no pool record.
    NoPoolData(&'static str),
    /// The pool exists but its status flag disables operations.
    PoolDisabled(&'static str),
    /// Public pool creation is disabled and the caller is not an admin.
    PublicPoolCreationDisabled(&'static str),
    /// The supplied X token reference does not match the pool.
    InvalidXToken(&'static str),
    /// The supplied Y token reference does not match the pool.
    InvalidYToken(&'static str),
    /// The two token references denote the same contract.
    MatchingTokenContracts(&'static str),
    /// X was supplied to a bin that only accepts Y.
    InvalidXAmount(&'static str),
    /// Y was supplied to a bin that only accepts X.
    InvalidYAmount(&'static str),
    /// Withdrawn X fell below the caller's minimum.
    MinimumXAmount(&'static str),
    /// Withdrawn Y fell below the caller's minimum.
    MinimumYAmount(&'static str),
    /// Minted LP shares fell below the caller's minimum.
    MinimumLpAmount(&'static str),
    /// The caller's `min_lp` bound itself is invalid (zero).
    InvalidMinLpAmount(&'static str),
    /// The deposit values out to zero at the bin price.
    InvalidLiquidityValue(&'static str),
    /// The X-side liquidity fee exceeded the caller's bound.
    MaximumXLiquidityFee(&'static str),
    /// The Y-side liquidity fee exceeded the caller's bound.
    MaximumYLiquidityFee(&'static str),
    /// Source and destination bins of a move are identical.
    MatchingBinId(&'static str),
    /// The caller holds fewer shares in the bin than requested.
    NoBinShares(&'static str),
    /// A fee configuration would push a side's total over `FEE_SCALE`.
    InvalidFee(&'static str),
    /// The variable-fee cooldown has not lapsed since the last update.
    VariableFeesCooldown(&'static str),
    /// The variable-fees manager has been permanently frozen.
    VariableFeesManagerFrozen(&'static str),
    /// The bin step is zero or above `FEE_SCALE`.
    InvalidBinStep(&'static str),
    /// A factor table is already registered for this bin step.
    AlreadyBinStep(&'static str),
    /// No factor table is registered for this bin step.
    NoBinFactors(&'static str),
    /// A factor in the table is zero.
    InvalidBinFactor(&'static str),
    /// The centre factor does not equal `PRICE_SCALE`.
    InvalidCenterBinFactor(&'static str),
    /// The factor table is not strictly ascending.
    UnsortedBinFactors(&'static str),
    /// The factor table length is not `NUM_OF_BINS`.
    InvalidBinFactorsLength(&'static str),
    /// The initial price is zero.
    InvalidInitialPrice(&'static str),
    /// The computed bin price is zero.
    InvalidBinPrice(&'static str),
    /// The pool-creation burn amount violates the registry minimums.
    MinimumBurnAmount(&'static str),
    /// The admin list is already at capacity.
    AdminLimitReached(&'static str),
    /// The principal is already an admin.
    AlreadyAdmin(&'static str),
    /// The principal is not in the admin list.
    AdminNotInList(&'static str),
    /// The registry creator cannot be removed from the admin list.
    CannotRemoveCreator(&'static str),
    /// The external token ledger reported insufficient balance.
    InsufficientTokenBalance(&'static str),
    /// Checked integer arithmetic overflowed.
    Overflow(&'static str),
}

impl AmmError {
    /// Returns the static context string attached to this error.
    #[must_use]
    pub const fn context(&self) -> &'static str {
        match self {
            Self::NotAuthorized(c)
            | Self::InvalidAmount(c)
            | Self::InvalidBinId(c)
            | Self::NotActiveBin(c)
            | Self::NoPoolData(c)
            | Self::PoolDisabled(c)
            | Self::PublicPoolCreationDisabled(c)
            | Self::InvalidXToken(c)
            | Self::InvalidYToken(c)
            | Self::MatchingTokenContracts(c)
            | Self::InvalidXAmount(c)
            | Self::InvalidYAmount(c)
            | Self::MinimumXAmount(c)
            | Self::MinimumYAmount(c)
            | Self::MinimumLpAmount(c)
            | Self::InvalidMinLpAmount(c)
            | Self::InvalidLiquidityValue(c)
            | Self::MaximumXLiquidityFee(c)
            | Self::MaximumYLiquidityFee(c)
            | Self::MatchingBinId(c)
            | Self::NoBinShares(c)
            | Self::InvalidFee(c)
            | Self::VariableFeesCooldown(c)
            | Self::VariableFeesManagerFrozen(c)
            | Self::InvalidBinStep(c)
            | Self::AlreadyBinStep(c)
            | Self::NoBinFactors(c)
            | Self::InvalidBinFactor(c)
            | Self::InvalidCenterBinFactor(c)
            | Self::UnsortedBinFactors(c)
            | Self::InvalidBinFactorsLength(c)
            | Self::InvalidInitialPrice(c)
            | Self::InvalidBinPrice(c)
            | Self::MinimumBurnAmount(c)
            | Self::AdminLimitReached(c)
            | Self::AlreadyAdmin(c)
            | Self::AdminNotInList(c)
            | Self::CannotRemoveCreator(c)
            | Self::InsufficientTokenBalance(c)
            | Self::Overflow(c) => c,
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::NotAuthorized(_) => "not authorized",
            Self::InvalidAmount(_) => "invalid amount",
            Self::InvalidBinId(_) => "invalid bin id",
            Self::NotActiveBin(_) => "not the active bin",
            Self::NoPoolData(_) => "no pool data",
            Self::PoolDisabled(_) => "pool disabled",
            Self::PublicPoolCreationDisabled(_) => "public pool creation disabled",
            Self::InvalidXToken(_) => "invalid x token",
            Self::InvalidYToken(_) => "invalid y token",
            Self::MatchingTokenContracts(_) => "matching token contracts",
            Self::InvalidXAmount(_) => "invalid x amount",
            Self::InvalidYAmount(_) => "invalid y amount",
            Self::MinimumXAmount(_) => "minimum x amount not met",
            Self::MinimumYAmount(_) => "minimum y amount not met",
            Self::MinimumLpAmount(_) => "minimum lp amount not met",
            Self::InvalidMinLpAmount(_) => "invalid minimum lp amount",
            Self::InvalidLiquidityValue(_) => "invalid liquidity value",
            Self::MaximumXLiquidityFee(_) => "maximum x liquidity fee exceeded",
            Self::MaximumYLiquidityFee(_) => "maximum y liquidity fee exceeded",
            Self::MatchingBinId(_) => "matching bin ids",
            Self::NoBinShares(_) => "no bin shares",
            Self::InvalidFee(_) => "invalid fee",
            Self::VariableFeesCooldown(_) => "variable fees cooldown active",
            Self::VariableFeesManagerFrozen(_) => "variable fees manager frozen",
            Self::InvalidBinStep(_) => "invalid bin step",
            Self::AlreadyBinStep(_) => "bin step already registered",
            Self::NoBinFactors(_) => "no bin factors",
            Self::InvalidBinFactor(_) => "invalid bin factor",
            Self::InvalidCenterBinFactor(_) => "invalid center bin factor",
            Self::UnsortedBinFactors(_) => "unsorted bin factors",
            Self::InvalidBinFactorsLength(_) => "invalid bin factors length",
            Self::InvalidInitialPrice(_) => "invalid initial price",
            Self::InvalidBinPrice(_) => "invalid bin price",
            Self::MinimumBurnAmount(_) => "minimum burn amount not met",
            Self::AdminLimitReached(_) => "admin limit reached",
            Self::AlreadyAdmin(_) => "already an admin",
            Self::AdminNotInList(_) => "admin not in list",
            Self::CannotRemoveCreator(_) => "cannot remove creator",
            Self::InsufficientTokenBalance(_) => "insufficient token balance",
            Self::Overflow(_) => "arithmetic overflow",
        }
    }
}

impl fmt::Display for AmmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.context())
    }
}

impl std::error::Error for AmmError {}
