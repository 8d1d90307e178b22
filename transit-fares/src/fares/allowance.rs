//! Transfer allowances and their dominance order.
//!
//! An allowance summarises how much a rider could still save by continuing
//! a trip: "while the clock is before `expiration` and `number_remaining`
//! discounts are left on a ticket of `fare_type`, continuing is worth up to
//! `value`". The search compares allowances to discard itineraries that
//! cannot end up cheaper than a competitor.

use std::cmp::Ordering;

use crate::domain::{Cents, ClockTime};

use super::fare_type::FareTypeIndex;

/// Remaining discount potential of a partially priced path.
///
/// Allowances are values: every adjustment returns a new allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferAllowance {
    fare_type: Option<FareTypeIndex>,
    value: Cents,
    number_remaining: u32,
    expiration: ClockTime,
}

impl TransferAllowance {
    /// Create an allowance for a ticket of `fare_type`.
    pub fn new(
        fare_type: FareTypeIndex,
        value: Cents,
        number_remaining: u32,
        expiration: ClockTime,
    ) -> Self {
        Self {
            fare_type: Some(fare_type),
            value,
            number_remaining,
            expiration,
        }
    }

    /// An allowance with no remaining benefit.
    pub const fn empty() -> Self {
        Self {
            fare_type: None,
            value: Cents::ZERO,
            number_remaining: 0,
            expiration: ClockTime::MIDNIGHT,
        }
    }

    /// Fare type of the ticket the allowance applies to, `None` when empty.
    pub fn fare_type(&self) -> Option<FareTypeIndex> {
        self.fare_type
    }

    /// Maximum saving still obtainable.
    pub fn value(&self) -> Cents {
        self.value
    }

    /// Discounted transfers left.
    pub fn number_remaining(&self) -> u32 {
        self.number_remaining
    }

    /// Last clock time at which the allowance can be used.
    pub fn expiration(&self) -> ClockTime {
        self.expiration
    }

    /// Returns true if the allowance offers nothing.
    pub fn is_empty(&self) -> bool {
        self.value == Cents::ZERO && self.number_remaining == 0
    }

    /// Returns true if `self` is at least as valuable as `other` in every
    /// dimension. Allowances for different fare types are never comparable.
    pub fn at_least_as_good_as(&self, other: &TransferAllowance) -> bool {
        self.fare_type == other.fare_type
            && self.value >= other.value
            && self.expiration >= other.expiration
            && self.number_remaining >= other.number_remaining
    }

    /// Compare under the dominance partial order.
    ///
    /// Returns `None` when neither allowance dominates the other.
    pub fn dominance(&self, other: &TransferAllowance) -> Option<Ordering> {
        match (self.at_least_as_good_as(other), other.at_least_as_good_as(self)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Greater),
            (false, true) => Some(Ordering::Less),
            (false, false) => None,
        }
    }

    /// Returns a copy expiring no later than `bound`.
    pub fn tighten_expiration(&self, bound: ClockTime) -> TransferAllowance {
        TransferAllowance {
            expiration: self.expiration.min(bound),
            ..*self
        }
    }
}

impl Default for TransferAllowance {
    fn default() -> Self {
        Self::empty()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_allowance() -> impl Strategy<Value = TransferAllowance> {
        (0usize..3, 0i64..500, 0u32..4, 0i32..20_000).prop_map(|(tag, value, remaining, exp)| {
            TransferAllowance::new(
                FareTypeIndex(tag),
                Cents(value),
                remaining,
                ClockTime::from_seconds(exp),
            )
        })
    }

    proptest! {
        /// Every allowance dominates itself.
        #[test]
        fn reflexive(a in arb_allowance()) {
            prop_assert!(a.at_least_as_good_as(&a));
        }

        /// Dominance chains compose.
        #[test]
        fn transitive(a in arb_allowance(), b in arb_allowance(), c in arb_allowance()) {
            if a.at_least_as_good_as(&b) && b.at_least_as_good_as(&c) {
                prop_assert!(a.at_least_as_good_as(&c));
            }
        }

        /// Mutual dominance means equality.
        #[test]
        fn antisymmetric(a in arb_allowance(), b in arb_allowance()) {
            if a.at_least_as_good_as(&b) && b.at_least_as_good_as(&a) {
                prop_assert_eq!(a, b);
            }
        }

        /// Allowances on different tickets never dominate each other.
        #[test]
        fn different_tags_never_comparable(a in arb_allowance(), b in arb_allowance()) {
            if a.fare_type() != b.fare_type() {
                prop_assert!(!a.at_least_as_good_as(&b));
                prop_assert!(!b.at_least_as_good_as(&a));
            }
        }

        /// Tightening never extends expiration and keeps everything else.
        #[test]
        fn tighten_is_monotone(a in arb_allowance(), bound in 0i32..20_000) {
            let t = a.tighten_expiration(ClockTime::from_seconds(bound));
            prop_assert!(t.expiration() <= a.expiration());
            prop_assert!(t.expiration() <= ClockTime::from_seconds(bound));
            prop_assert_eq!(t.value(), a.value());
            prop_assert_eq!(t.number_remaining(), a.number_remaining());
            prop_assert_eq!(t.fare_type(), a.fare_type());
            prop_assert!(a.at_least_as_good_as(&t));
        }
    }
}
