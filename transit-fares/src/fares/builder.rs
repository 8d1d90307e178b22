//! Skeleton fare structure generation.
//!
//! Classifies every route of a network into a fare type bucket and fills the
//! transfer matrix with undiscounted defaults, so an operator only has to
//! overwrite the cells that carry real discounts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Cents;
use crate::network::{RouteInfo, TransitNetwork};

use super::error::FareError;
use super::fare_type::{FareType, FareTypeIndex};
use super::structure::{
    FareParameters, FareStructure, RouteFare, TransferMatrix, TransferRule, check_amount,
};

/// Label of the single bucket used by [`GroupingKey::Generic`].
pub const GENERIC_FARE_TYPE: &str = "GENERIC";

/// Route attribute used to group routes into fare types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingKey {
    /// One type per transit mode.
    Mode,
    /// One type per agency id.
    AgencyId,
    /// One type per agency name.
    AgencyName,
    /// A single type for every route.
    #[default]
    Generic,
}

impl GroupingKey {
    /// The fare type label a route falls into.
    pub fn label_for(self, route: &RouteInfo) -> String {
        match self {
            GroupingKey::Mode => route.mode.label().to_string(),
            GroupingKey::AgencyId => route.agency_id.clone(),
            GroupingKey::AgencyName => route.agency_name.clone(),
            GroupingKey::Generic => GENERIC_FARE_TYPE.to_string(),
        }
    }
}

/// Builds a skeleton [`FareStructure`] from a network's route catalogue.
///
/// # Examples
///
/// ```
/// use transit_fares::domain::{Cents, TransitMode};
/// use transit_fares::fares::{FareStructureBuilder, GroupingKey};
/// use transit_fares::network::{RouteInfo, TransitNetwork};
///
/// let network = TransitNetwork::with_one_pattern_per_route(vec![
///     RouteInfo::new("1", "A", "Agency A", TransitMode::Bus),
///     RouteInfo::new("2", "A", "Agency A", TransitMode::Rail),
/// ]);
///
/// let structure = FareStructureBuilder::new(&network)
///     .build(Cents(250), GroupingKey::Mode)
///     .unwrap();
///
/// assert_eq!(structure.types().len(), 2);
/// // Every ordered pair of types gets an undiscounted default
/// assert_eq!(structure.transfers().populated(), 4);
/// ```
#[derive(Debug)]
pub struct FareStructureBuilder<'a> {
    network: &'a TransitNetwork,
    max_discounted_transfers: Option<u32>,
    transfer_time_allowance_secs: Option<i32>,
}

impl<'a> FareStructureBuilder<'a> {
    /// Create a builder over the routes of `network`.
    pub fn new(network: &'a TransitNetwork) -> Self {
        Self {
            network,
            max_discounted_transfers: None,
            transfer_time_allowance_secs: None,
        }
    }

    /// Override the default discount budget.
    pub fn max_discounted_transfers(mut self, count: u32) -> Self {
        self.max_discounted_transfers = Some(count);
        self
    }

    /// Override the default transfer window.
    pub fn transfer_time_allowance_secs(mut self, secs: i32) -> Self {
        self.transfer_time_allowance_secs = Some(secs);
        self
    }

    /// Classify every route and generate default transfer entries.
    pub fn build(self, default_base_fare: Cents, grouping: GroupingKey) -> Result<FareStructure, FareError> {
        check_amount("base_fare", default_base_fare)?;

        let mut types: Vec<FareType> = Vec::new();
        let mut buckets: HashMap<String, FareTypeIndex> = HashMap::new();
        let mut routes = Vec::with_capacity(self.network.routes().len());

        for route in self.network.routes() {
            let label = grouping.label_for(route);
            let fare_type = *buckets.entry(label.clone()).or_insert_with(|| {
                types.push(FareType::new(label, default_base_fare));
                FareTypeIndex(types.len() - 1)
            });

            routes.push(RouteFare {
                route_id: route.route_id.clone(),
                agency_id: route.agency_id.clone(),
                fare_type,
                route_fare: None,
            });
        }

        let transfers = undiscounted_transfers(&types);

        let mut params = FareParameters::with_base_fare(default_base_fare);
        if let Some(count) = self.max_discounted_transfers {
            params.max_discounted_transfers = count;
        }
        if let Some(secs) = self.transfer_time_allowance_secs {
            params.transfer_time_allowance_secs = secs;
        }

        debug!(
            ?grouping,
            types = types.len(),
            routes = routes.len(),
            "generated fare structure skeleton"
        );

        FareStructure::new(params, types, routes, transfers)
    }
}

/// Combined price of two legs bought separately, at full fare.
pub(crate) fn undiscounted_rule(from: &FareType, to: &FareType) -> TransferRule {
    TransferRule {
        combined_fare: from.flat_fare + to.flat_fare,
    }
}

/// A matrix where every ordered pair of types costs the sum of both fares.
pub(crate) fn undiscounted_transfers(types: &[FareType]) -> TransferMatrix {
    let mut transfers = TransferMatrix::new(types.len());
    for (i, from) in types.iter().enumerate() {
        for (j, to) in types.iter().enumerate() {
            transfers.set(
                FareTypeIndex(i),
                FareTypeIndex(j),
                Some(undiscounted_rule(from, to)),
            );
        }
    }
    transfers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransitMode;

    fn network() -> TransitNetwork {
        TransitNetwork::with_one_pattern_per_route(vec![
            RouteInfo::new("B1", "MTA", "Metro", TransitMode::Bus),
            RouteInfo::new("S1", "MTA", "Metro", TransitMode::Subway),
            RouteInfo::new("B2", "LI", "Island Bus", TransitMode::Bus),
            RouteInfo::new("R1", "LIRR", "Island Bus", TransitMode::Rail),
        ])
    }

    fn labels(structure: &FareStructure) -> Vec<&str> {
        structure.types().iter().map(|t| t.label.as_str()).collect()
    }

    #[test]
    fn group_by_mode() {
        let net = network();
        let s = FareStructureBuilder::new(&net)
            .build(Cents(275), GroupingKey::Mode)
            .unwrap();

        assert_eq!(labels(&s), vec!["BUS", "SUBWAY", "RAIL"]);
        assert_eq!(s.find_route("B2").unwrap().fare_type, FareTypeIndex(0));
        assert_eq!(s.find_route("R1").unwrap().fare_type, FareTypeIndex(2));
    }

    #[test]
    fn group_by_agency_id() {
        let net = network();
        let s = FareStructureBuilder::new(&net)
            .build(Cents(275), GroupingKey::AgencyId)
            .unwrap();

        assert_eq!(labels(&s), vec!["MTA", "LI", "LIRR"]);
    }

    #[test]
    fn group_by_agency_name() {
        let net = network();
        let s = FareStructureBuilder::new(&net)
            .build(Cents(275), GroupingKey::AgencyName)
            .unwrap();

        assert_eq!(labels(&s), vec!["Metro", "Island Bus"]);
        assert_eq!(s.find_route("R1").unwrap().fare_type, FareTypeIndex(1));
    }

    #[test]
    fn generic_grouping_single_type() {
        let net = network();
        let s = FareStructureBuilder::new(&net)
            .build(Cents(275), GroupingKey::Generic)
            .unwrap();

        assert_eq!(labels(&s), vec![GENERIC_FARE_TYPE]);
        assert!(s.routes().iter().all(|r| r.fare_type == FareTypeIndex(0)));
    }

    #[test]
    fn types_default_to_base_fare() {
        let net = network();
        let s = FareStructureBuilder::new(&net)
            .build(Cents(300), GroupingKey::Mode)
            .unwrap();

        assert!(s.types().iter().all(|t| t.flat_fare == Cents(300)));
        assert_eq!(s.base_fare(), Cents(300));
    }

    #[test]
    fn transfer_defaults_are_undiscounted() {
        let net = network();
        let s = FareStructureBuilder::new(&net)
            .build(Cents(300), GroupingKey::Mode)
            .unwrap();

        let n = s.types().len();
        assert_eq!(s.transfers().populated(), n * n);
        for from in 0..n {
            for to in 0..n {
                let rule = s
                    .transfers()
                    .get(FareTypeIndex(from), FareTypeIndex(to))
                    .unwrap();
                assert_eq!(rule.combined_fare, Cents(600));
            }
        }
    }

    #[test]
    fn builder_overrides() {
        let net = network();
        let s = FareStructureBuilder::new(&net)
            .max_discounted_transfers(3)
            .transfer_time_allowance_secs(5400)
            .build(Cents(100), GroupingKey::Generic)
            .unwrap();

        assert_eq!(s.max_discounted_transfers(), 3);
        assert_eq!(s.transfer_time_allowance_secs(), 5400);
    }

    #[test]
    fn empty_network() {
        let net = TransitNetwork::default();
        let s = FareStructureBuilder::new(&net)
            .build(Cents(100), GroupingKey::Mode)
            .unwrap();

        assert!(s.types().is_empty());
        assert_eq!(s.transfers().size(), 0);
    }

    #[test]
    fn negative_base_fare_rejected() {
        let net = network();
        let result = FareStructureBuilder::new(&net).build(Cents(-1), GroupingKey::Mode);
        assert!(matches!(result, Err(FareError::NegativeFare { .. })));
    }

    #[test]
    fn oversized_base_fare_rejected() {
        let net = network();
        let result = FareStructureBuilder::new(&net).build(Cents(i64::MAX), GroupingKey::Mode);
        assert!(matches!(
            result,
            Err(FareError::InvalidAmount { field, .. }) if field == "base_fare"
        ));
        assert!(FareStructureBuilder::new(&net)
            .build(Cents::MAX, GroupingKey::Mode)
            .is_ok());
    }

    #[test]
    fn grouping_key_serde() {
        let key: GroupingKey = serde_json::from_str("\"agency-name\"").unwrap();
        assert_eq!(key, GroupingKey::AgencyName);
        assert_eq!(serde_json::to_string(&GroupingKey::Mode).unwrap(), "\"mode\"");
    }
}
