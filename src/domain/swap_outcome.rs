//! Result value objects for swap and withdrawal operations.

use core::fmt;

use super::Amount;

/// The outcome of a single-bin swap.
///
/// `amount_in` is the *effective* input after capacity capping — it may
/// be less than the amount the caller offered when the active bin could
/// not absorb the full request. `fee` is the portion of `amount_in`
/// retained by the pool; `amount_out` is what the caller received.
///
/// # Examples
///
/// ```
/// use lattice_amm::domain::{Amount, SwapOutcome};
///
/// let outcome = SwapOutcome::new(Amount::new(100), Amount::new(495), Amount::new(1));
/// assert_eq!(outcome.amount_in().get(), 100);
/// assert_eq!(outcome.amount_out().get(), 495);
/// assert_eq!(outcome.fee().get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SwapOutcome {
    amount_in: Amount,
    amount_out: Amount,
    fee: Amount,
}

impl SwapOutcome {
    /// Creates a new `SwapOutcome`.
    pub const fn new(amount_in: Amount, amount_out: Amount, fee: Amount) -> Self {
        Self {
            amount_in,
            amount_out,
            fee,
        }
    }

    /// The effective input amount charged to the caller.
    #[must_use]
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// The output amount paid to the caller.
    #[must_use]
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// The total fee retained by the pool, already included in
    /// [`amount_in`](Self::amount_in).
    #[must_use]
    pub const fn fee(&self) -> Amount {
        self.fee
    }
}

impl fmt::Display for SwapOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "in {} out {} (fee {})",
            self.amount_in, self.amount_out, self.fee
        )
    }
}

/// The token amounts paid out by a liquidity withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Withdrawal {
    x_amount: Amount,
    y_amount: Amount,
}

impl Withdrawal {
    /// Creates a new `Withdrawal`.
    pub const fn new(x_amount: Amount, y_amount: Amount) -> Self {
        Self { x_amount, y_amount }
    }

    /// X tokens paid out.
    #[must_use]
    pub const fn x_amount(&self) -> Amount {
        self.x_amount
    }

    /// Y tokens paid out.
    #[must_use]
    pub const fn y_amount(&self) -> Amount {
        self.y_amount
    }
}

impl fmt::Display for Withdrawal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x {} y {}", self.x_amount, self.y_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let o = SwapOutcome::new(Amount::new(10), Amount::new(9), Amount::new(1));
        assert_eq!(o.amount_in(), Amount::new(10));
        assert_eq!(o.amount_out(), Amount::new(9));
        assert_eq!(o.fee(), Amount::new(1));
    }

    #[test]
    fn withdrawal_accessors() {
        let w = Withdrawal::new(Amount::new(3), Amount::new(4));
        assert_eq!(w.x_amount(), Amount::new(3));
        assert_eq!(w.y_amount(), Amount::new(4));
    }

    #[test]
    fn display() {
        let o = SwapOutcome::new(Amount::new(10), Amount::new(9), Amount::new(1));
        assert_eq!(format!("{o}"), "in 10 out 9 (fee 1)");
    }
}
