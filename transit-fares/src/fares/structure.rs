//! Immutable fare configuration.
//!
//! A `FareStructure` holds global parameters plus three tables: fare types,
//! per-route fare assignments, and a dense transfer matrix keyed by ordered
//! pairs of fare types.

use tracing::info;

use crate::domain::{Cents, InvalidAmount};

use super::error::FareError;
use super::fare_type::{FareType, FareTypeIndex};

/// Default number of discounted transfers per trip.
pub const DEFAULT_MAX_DISCOUNTED_TRANSFERS: u32 = 1;

/// Default transfer window (two hours).
pub const DEFAULT_TRANSFER_TIME_ALLOWANCE_SECS: i32 = 2 * 60 * 60;

/// Upper bound on the total fare of an itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FareCap {
    /// No cap.
    #[default]
    Unbounded,
    /// Totals are clamped to this amount.
    Limit(Cents),
}

impl FareCap {
    /// Clamp a total to the cap.
    pub fn apply(self, total: Cents) -> Cents {
        match self {
            FareCap::Unbounded => total,
            FareCap::Limit(cap) => total.min(cap),
        }
    }

    /// Returns true if `total` has reached a finite cap.
    pub fn is_reached_by(self, total: Cents) -> bool {
        match self {
            FareCap::Unbounded => false,
            FareCap::Limit(cap) => total >= cap,
        }
    }
}

/// Global pricing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FareParameters {
    /// Default fare for newly created fare types.
    pub base_fare: Cents,
    /// Number of transfers per trip eligible for a discount.
    pub max_discounted_transfers: u32,
    /// Maximum time between two boardings for a discounted transfer.
    pub transfer_time_allowance_secs: i32,
    /// Cap on the total fare.
    pub fare_cap: FareCap,
}

impl FareParameters {
    /// Parameters with the given base fare and default transfer policy.
    pub fn with_base_fare(base_fare: Cents) -> Self {
        Self {
            base_fare,
            max_discounted_transfers: DEFAULT_MAX_DISCOUNTED_TRANSFERS,
            transfer_time_allowance_secs: DEFAULT_TRANSFER_TIME_ALLOWANCE_SECS,
            fare_cap: FareCap::Unbounded,
        }
    }
}

/// Fare assignment for one route of the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteFare {
    pub route_id: String,
    pub agency_id: String,
    pub fare_type: FareTypeIndex,
    /// Route-specific fare, used when the owning type has `use_route_fare`.
    pub route_fare: Option<Cents>,
}

/// Total price of riding a leg of one type followed by a leg of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRule {
    pub combined_fare: Cents,
}

/// Dense square matrix of transfer rules, indexed `[from][to]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransferMatrix {
    size: usize,
    cells: Vec<Option<TransferRule>>,
}

impl TransferMatrix {
    /// Create an empty `size` x `size` matrix.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Number of fare types along each side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Look up the rule for a transfer from `from` to `to`.
    #[inline]
    pub fn get(&self, from: FareTypeIndex, to: FareTypeIndex) -> Option<TransferRule> {
        if from.0 >= self.size || to.0 >= self.size {
            return None;
        }
        self.cells[from.0 * self.size + to.0]
    }

    /// Set or clear the rule for a transfer from `from` to `to`.
    ///
    /// Out-of-range indices are ignored.
    pub fn set(&mut self, from: FareTypeIndex, to: FareTypeIndex, rule: Option<TransferRule>) {
        if from.0 < self.size && to.0 < self.size {
            self.cells[from.0 * self.size + to.0] = rule;
        }
    }

    /// All rules out of `from`, as `(to, rule)` pairs.
    pub fn row(&self, from: FareTypeIndex) -> impl Iterator<Item = (FareTypeIndex, TransferRule)> + '_ {
        let start = (from.0 * self.size).min(self.cells.len());
        let end = if from.0 < self.size {
            start + self.size
        } else {
            start
        };
        self.cells[start..end]
            .iter()
            .enumerate()
            .filter_map(|(to, cell)| cell.map(|rule| (FareTypeIndex(to), rule)))
    }

    /// Returns a copy grown to `new_size`, keeping existing cells.
    pub fn grown(&self, new_size: usize) -> Self {
        let mut grown = TransferMatrix::new(new_size.max(self.size));
        for from in 0..self.size {
            for to in 0..self.size {
                grown.set(
                    FareTypeIndex(from),
                    FareTypeIndex(to),
                    self.get(FareTypeIndex(from), FareTypeIndex(to)),
                );
            }
        }
        grown
    }

    /// Number of populated cells.
    pub fn populated(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Complete, validated fare configuration of a network.
///
/// # Invariants
///
/// - No fare, route fare, transfer fare or cap is negative
/// - Every route's fare type index refers to a defined type
/// - The transfer matrix is square with one row per fare type
/// - The transfer window is not negative
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareStructure {
    params: FareParameters,
    types: Vec<FareType>,
    routes: Vec<RouteFare>,
    transfers: TransferMatrix,
}

/// Largest combined fare of a transfer: two legs at [`Cents::MAX`].
const MAX_COMBINED_FARE: Cents = Cents(2 * Cents::MAX.0);

/// Rejects a configured amount that is negative or above [`Cents::MAX`].
pub(crate) fn check_amount(field: impl Into<String>, amount: Cents) -> Result<(), FareError> {
    amount
        .validated()
        .map(drop)
        .map_err(|e| FareError::amount(field, e))
}

impl FareStructure {
    /// Assemble a fare structure, validating every invariant.
    pub fn new(
        params: FareParameters,
        types: Vec<FareType>,
        routes: Vec<RouteFare>,
        transfers: TransferMatrix,
    ) -> Result<Self, FareError> {
        let structure = Self {
            params,
            types,
            routes,
            transfers,
        };
        structure.validate()?;

        info!(
            types = structure.types.len(),
            routes = structure.routes.len(),
            transfer_rules = structure.transfers.populated(),
            "fare structure assembled"
        );

        Ok(structure)
    }

    fn validate(&self) -> Result<(), FareError> {
        check_amount("base_fare", self.params.base_fare)?;
        if self.params.transfer_time_allowance_secs < 0 {
            return Err(FareError::InvalidTransferWindow(
                self.params.transfer_time_allowance_secs as i64,
            ));
        }
        if let FareCap::Limit(cap) = self.params.fare_cap {
            check_amount("fare_cap", cap)?;
        }

        for t in &self.types {
            check_amount(format!("fare_per_type[{}]", t.label), t.flat_fare)?;
        }

        for route in &self.routes {
            if route.fare_type.0 >= self.types.len() {
                return Err(FareError::Inconsistent(format!(
                    "route {} has fare type {} but only {} types exist",
                    route.route_id,
                    route.fare_type,
                    self.types.len()
                )));
            }
            if let Some(fare) = route.route_fare {
                check_amount(format!("fare_per_route[{}]", route.route_id), fare)?;
            }
        }

        if self.transfers.size() != self.types.len() {
            return Err(FareError::Inconsistent(format!(
                "transfer matrix is {0}x{0} but there are {1} fare types",
                self.transfers.size(),
                self.types.len()
            )));
        }
        for from in 0..self.types.len() {
            for (to, rule) in self.transfers.row(FareTypeIndex(from)) {
                let field = format!(
                    "fare_per_transfer[{} -> {}]",
                    self.types[from].label, self.types[to.0].label
                );
                if rule.combined_fare > MAX_COMBINED_FARE {
                    return Err(FareError::InvalidAmount {
                        field,
                        source: InvalidAmount::OutOfRange(rule.combined_fare.to_currency()),
                    });
                }
                if rule.combined_fare.is_negative() {
                    return Err(FareError::NegativeFare { field });
                }
            }
        }

        Ok(())
    }

    /// Global pricing parameters.
    pub fn params(&self) -> &FareParameters {
        &self.params
    }

    /// Default fare for newly created fare types.
    pub fn base_fare(&self) -> Cents {
        self.params.base_fare
    }

    /// Number of transfers per trip eligible for a discount.
    pub fn max_discounted_transfers(&self) -> u32 {
        self.params.max_discounted_transfers
    }

    /// Transfer window in seconds.
    pub fn transfer_time_allowance_secs(&self) -> i32 {
        self.params.transfer_time_allowance_secs
    }

    /// Cap on the total fare.
    pub fn fare_cap(&self) -> FareCap {
        self.params.fare_cap
    }

    /// All fare types in index order.
    pub fn types(&self) -> &[FareType] {
        &self.types
    }

    /// Get a fare type by index.
    pub fn fare_type(&self, index: FareTypeIndex) -> Option<&FareType> {
        self.types.get(index.0)
    }

    /// Find a fare type by label.
    pub fn find_type(&self, label: &str) -> Option<FareTypeIndex> {
        self.types
            .iter()
            .position(|t| t.label == label)
            .map(FareTypeIndex)
    }

    /// All route fare assignments.
    pub fn routes(&self) -> &[RouteFare] {
        &self.routes
    }

    /// Find the fare assignment of a route by route id.
    pub fn find_route(&self, route_id: &str) -> Option<&RouteFare> {
        self.routes.iter().find(|r| r.route_id == route_id)
    }

    /// The transfer matrix.
    pub fn transfers(&self) -> &TransferMatrix {
        &self.transfers
    }

    /// Fare charged for boarding a route, honouring `use_route_fare`.
    pub fn resolve_route_fare(&self, route: &RouteFare) -> Option<Cents> {
        let fare_type = self.fare_type(route.fare_type)?;
        if fare_type.use_route_fare {
            Some(route.route_fare.unwrap_or(fare_type.flat_fare))
        } else {
            Some(fare_type.flat_fare)
        }
    }

    /// Decompose into parts, for building a modified structure.
    pub(crate) fn into_parts(self) -> (FareParameters, Vec<FareType>, Vec<RouteFare>, TransferMatrix) {
        (self.params, self.types, self.routes, self.transfers)
    }
}
