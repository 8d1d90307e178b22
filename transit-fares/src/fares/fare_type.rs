//! Fare types: the pricing classes routes are assigned to.

use std::fmt;

use crate::domain::Cents;

/// Index of a fare type in [`FareStructure::types`](super::FareStructure::types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FareTypeIndex(pub usize);

impl fmt::Display for FareTypeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A pricing class, such as "BUS", an agency, or "GENERIC".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareType {
    /// Label used to reference the type from routes and transfer rules.
    pub label: String,

    /// Consecutive legs of this type after the first ride free, without
    /// spending the discount budget.
    pub unlimited_transfers: bool,

    /// Transfers between two legs of this type on the same route may be
    /// discounted.
    pub allow_same_route_transfer: bool,

    /// Routes of this type charge their own route fare instead of `flat_fare`.
    pub use_route_fare: bool,

    /// Default fare for one boarding of this type.
    pub flat_fare: Cents,
}

impl FareType {
    /// Create a type with the given flat fare and no special policies.
    pub fn new(label: impl Into<String>, flat_fare: Cents) -> Self {
        Self {
            label: label.into(),
            unlimited_transfers: false,
            allow_same_route_transfer: false,
            use_route_fare: false,
            flat_fare,
        }
    }

    /// Builder-style setter for `unlimited_transfers`.
    pub fn with_unlimited_transfers(mut self, value: bool) -> Self {
        self.unlimited_transfers = value;
        self
    }

    /// Builder-style setter for `allow_same_route_transfer`.
    pub fn with_same_route_transfer(mut self, value: bool) -> Self {
        self.allow_same_route_transfer = value;
        self
    }

    /// Builder-style setter for `use_route_fare`.
    pub fn with_route_fare(mut self, value: bool) -> Self {
        self.use_route_fare = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_type_has_no_policies() {
        let t = FareType::new("BUS", Cents(250));

        assert_eq!(t.label, "BUS");
        assert_eq!(t.flat_fare, Cents(250));
        assert!(!t.unlimited_transfers);
        assert!(!t.allow_same_route_transfer);
        assert!(!t.use_route_fare);
    }

    #[test]
    fn builder_setters() {
        let t = FareType::new("SUBWAY", Cents(275))
            .with_unlimited_transfers(true)
            .with_same_route_transfer(true)
            .with_route_fare(true);

        assert!(t.unlimited_transfers);
        assert!(t.allow_same_route_transfer);
        assert!(t.use_route_fare);
    }

    #[test]
    fn index_display() {
        assert_eq!(FareTypeIndex(3).to_string(), "#3");
    }
}
