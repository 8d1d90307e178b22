//! Fare computation for transit itineraries.
//!
//! A [`FareStructure`] is generated for a network by [`FareStructureBuilder`]
//! and optionally overlaid with a [`FareDocument`]. A [`FareCalculator`]
//! turns the rides of a search path into a fare and a [`TransferAllowance`]
//! the search uses to prune dominated itineraries.

mod allowance;
mod builder;
mod calculator;
mod document;
mod error;
mod fare_type;
mod fixed;
mod path;
mod rule_based;
mod structure;

pub use allowance::TransferAllowance;
pub use builder::{FareStructureBuilder, GENERIC_FARE_TYPE, GroupingKey};
pub use calculator::{
    CalculatorOptions, FareBounds, FareBreakdown, FareCalculator, FarePolicy, FarePolicyConfig,
    FaresSource, LegFare,
};
pub use document::{
    FareCapToken, FareDocument, RouteEntry, TransferEntry, TypeEntry, UNBOUNDED_TOKEN,
};
pub use error::FareError;
pub use fare_type::{FareType, FareTypeIndex};
pub use fixed::{
    AgencyDiscount, AgencyFare, AgencyPairConfig, AgencyPairFareCalculator, SimpleFareCalculator,
};
pub use path::{PathState, SearchState, StateKind, TransitLeg, transit_legs};
pub use rule_based::RuleBasedFareCalculator;
pub use structure::{
    DEFAULT_MAX_DISCOUNTED_TRANSFERS, DEFAULT_TRANSFER_TIME_ALLOWANCE_SECS, FareCap,
    FareParameters, FareStructure, RouteFare, TransferMatrix, TransferRule,
};
