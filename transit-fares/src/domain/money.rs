//! Integer money amounts.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// Error returned when a currency amount cannot be represented as cents.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidAmount {
    /// The amount was NaN or infinite
    #[error("amount {0} is not finite")]
    NotFinite(f64),

    /// The amount was below zero
    #[error("amount {0} is negative")]
    Negative(f64),

    /// The amount exceeds [`Cents::MAX`]
    #[error("amount {0} is out of range")]
    OutOfRange(f64),
}

/// A money amount in integer cents.
///
/// Every fare in the crate is carried as `Cents`. Floating-point amounts are
/// converted exactly once, with [`Cents::from_currency`].
///
/// # Examples
///
/// ```
/// use transit_fares::domain::Cents;
///
/// let fare = Cents::from_currency(2.75).unwrap();
/// assert_eq!(fare, Cents(275));
/// assert_eq!(fare.to_string(), "2.75");
///
/// // Half a cent rounds up
/// assert_eq!(Cents::from_currency(0.125).unwrap(), Cents(13));
///
/// // Negative amounts are rejected
/// assert!(Cents::from_currency(-1.0).is_err());
/// ```
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    /// Zero cents.
    pub const ZERO: Cents = Cents(0);

    /// Largest accepted amount: ten billion currency units.
    ///
    /// Sums of a few million such amounts still fit in an `i64`.
    pub const MAX: Cents = Cents(1_000_000_000_000);

    /// Converts a decimal currency amount (e.g. `2.75`) to cents.
    ///
    /// Scales by 100 and rounds half up. Representation noise below a
    /// millionth of a cent is discarded first, so `1.005` becomes 101.
    pub fn from_currency(amount: f64) -> Result<Self, InvalidAmount> {
        if !amount.is_finite() {
            return Err(InvalidAmount::NotFinite(amount));
        }
        if amount < 0.0 {
            return Err(InvalidAmount::Negative(amount));
        }

        let scaled = (amount * 100.0 * 1e6).round() / 1e6;
        let cents = (scaled + 0.5).floor();
        if cents > Cents::MAX.0 as f64 {
            return Err(InvalidAmount::OutOfRange(amount));
        }

        Ok(Cents(cents as i64))
    }

    /// Checks that an amount lies in `0..=Cents::MAX`.
    pub fn validated(self) -> Result<Cents, InvalidAmount> {
        if self.is_negative() {
            Err(InvalidAmount::Negative(self.to_currency()))
        } else if self > Cents::MAX {
            Err(InvalidAmount::OutOfRange(self.to_currency()))
        } else {
            Ok(self)
        }
    }

    /// Converts back to a decimal currency amount for serialization.
    pub fn to_currency(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns true if the amount is below zero.
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Subtracts, flooring the result at zero.
    pub fn saturating_sub(self, rhs: Cents) -> Cents {
        Cents((self.0 - rhs.0).max(0))
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0 + rhs.0)
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        self.0 += rhs.0;
    }
}

impl Sub for Cents {
    type Output = Cents;

    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0 - rhs.0)
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, Add::add)
    }
}

impl fmt::Debug for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cents({})", self.0)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
