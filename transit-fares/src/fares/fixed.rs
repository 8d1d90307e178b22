//! Fixed-function fare calculators.
//!
//! Small deployments often price trips from a hand-written table rather than
//! a full fare structure. These calculators cover the two common shapes: a
//! single flat fare, and per-agency fares with a few agency-pair transfer
//! discounts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::Cents;
use crate::network::TransitNetwork;

use super::allowance::TransferAllowance;
use super::calculator::{FareBounds, FareCalculator};
use super::error::FareError;
use super::fare_type::FareTypeIndex;
use super::path::TransitLeg;
use super::structure::DEFAULT_TRANSFER_TIME_ALLOWANCE_SECS;

/// Flat fare for every boarding, no transfer discounts.
#[derive(Debug, Clone)]
pub struct SimpleFareCalculator {
    base_fare: Cents,
    pattern_count: usize,
}

impl SimpleFareCalculator {
    /// Policy name reported to the search.
    pub const POLICY_NAME: &'static str = "simple";

    pub fn new(network: &TransitNetwork, base_fare: Cents) -> Self {
        Self {
            base_fare,
            pattern_count: network.patterns().len(),
        }
    }

    /// Fare charged per boarding.
    pub fn base_fare(&self) -> Cents {
        self.base_fare
    }
}

impl FareCalculator for SimpleFareCalculator {
    fn policy_name(&self) -> &str {
        Self::POLICY_NAME
    }

    fn price_legs(&self, legs: &[TransitLeg]) -> Result<FareBounds, FareError> {
        let mut fare = Cents::ZERO;
        for leg in legs {
            if leg.pattern.0 >= self.pattern_count {
                return Err(FareError::UnresolvedPattern(leg.pattern.0));
            }
            fare += self.base_fare;
        }
        Ok(FareBounds {
            fare,
            allowance: TransferAllowance::empty(),
        })
    }
}

fn default_agency_transfer_window() -> i64 {
    DEFAULT_TRANSFER_TIME_ALLOWANCE_SECS as i64
}

/// Boarding fare of one agency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgencyFare {
    pub agency_id: String,
    pub fare: f64,
}

/// Price of the second leg when transferring between two agencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgencyDiscount {
    pub from_agency: String,
    pub to_agency: String,
    pub second_leg_fare: f64,
}

/// Fare table of an agency-pair policy.
///
/// # Examples
///
/// ```
/// use transit_fares::fares::AgencyPairConfig;
///
/// let table: AgencyPairConfig = serde_json::from_str(r#"{
///     "agency_fares": [
///         {"agency_id": "BUS", "fare": 2.0},
///         {"agency_id": "RAIL", "fare": 3.0}
///     ],
///     "discounts": [{"from_agency": "BUS", "to_agency": "RAIL", "second_leg_fare": 1.0}]
/// }"#).unwrap();
///
/// assert_eq!(table.transfer_time_allowance, 7200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgencyPairConfig {
    #[serde(default)]
    pub agency_fares: Vec<AgencyFare>,
    #[serde(default)]
    pub discounts: Vec<AgencyDiscount>,
    /// Seconds between boardings for a discounted transfer.
    #[serde(default = "default_agency_transfer_window")]
    pub transfer_time_allowance: i64,
}

/// Per-agency fares with at most one agency-pair discount per trip.
///
/// Agencies are numbered in order of first appearance in the network and
/// play the role of fare types in the allowances this calculator reports.
#[derive(Debug, Clone)]
pub struct AgencyPairFareCalculator {
    /// Agency of each pattern, `None` when the agency has no fare.
    pattern_agency: Vec<Option<usize>>,
    agency_fares: Vec<Cents>,
    /// Second-leg fares indexed `[from * agency_count + to]`.
    discounts: Vec<Option<Cents>>,
    /// Largest saving from a discount out of each agency.
    best_saving: Vec<Cents>,
    transfer_time_allowance_secs: i32,
}

impl AgencyPairFareCalculator {
    /// Policy name reported to the search.
    pub const POLICY_NAME: &'static str = "agency-pair";

    /// Resolve `table` against the agencies of `network`.
    pub fn new(network: &TransitNetwork, table: &AgencyPairConfig) -> Result<Self, FareError> {
        let mut agency_ids: HashMap<&str, usize> = HashMap::new();
        for route in network.routes() {
            let next = agency_ids.len();
            agency_ids.entry(route.agency_id.as_str()).or_insert(next);
        }
        let agency_count = agency_ids.len();
        let lookup = |id: &str| {
            agency_ids
                .get(id)
                .copied()
                .ok_or_else(|| FareError::UnknownAgency(id.to_string()))
        };

        let transfer_time_allowance_secs = i32::try_from(table.transfer_time_allowance)
            .ok()
            .filter(|secs| *secs >= 0)
            .ok_or(FareError::InvalidTransferWindow(table.transfer_time_allowance))?;

        let mut agency_fares: Vec<Option<Cents>> = vec![None; agency_count];
        for entry in &table.agency_fares {
            let agency = lookup(&entry.agency_id)?;
            let fare = Cents::from_currency(entry.fare).map_err(|e| {
                FareError::amount(format!("agency_fares[{}]", entry.agency_id), e)
            })?;
            agency_fares[agency] = Some(fare);
        }

        let mut discounts = vec![None; agency_count * agency_count];
        for entry in &table.discounts {
            let from = lookup(&entry.from_agency)?;
            let to = lookup(&entry.to_agency)?;
            let fare = Cents::from_currency(entry.second_leg_fare).map_err(|e| {
                FareError::amount(
                    format!("discounts[{} -> {}]", entry.from_agency, entry.to_agency),
                    e,
                )
            })?;
            discounts[from * agency_count + to] = Some(fare);
        }

        let mut unresolved = 0usize;
        let pattern_agency: Vec<Option<usize>> = network
            .patterns()
            .iter()
            .map(|pattern| {
                let agency = network
                    .route(pattern.route_index)
                    .and_then(|route| agency_ids.get(route.agency_id.as_str()).copied())
                    .filter(|a| agency_fares[*a].is_some());
                if agency.is_none() {
                    unresolved += 1;
                }
                agency
            })
            .collect();
        if unresolved > 0 {
            warn!(unresolved, "trip patterns whose agency has no fare");
        }

        let agency_fares: Vec<Cents> = agency_fares
            .into_iter()
            .map(|f| f.unwrap_or(Cents::ZERO))
            .collect();

        let best_saving = (0..agency_count)
            .map(|from| {
                (0..agency_count)
                    .filter_map(|to| {
                        discounts[from * agency_count + to]
                            .map(|second| agency_fares[to].saturating_sub(second))
                    })
                    .fold(Cents::ZERO, Cents::max)
            })
            .collect();

        debug!(
            agencies = agency_count,
            discounts = table.discounts.len(),
            "resolved agency-pair fare table"
        );

        Ok(Self {
            pattern_agency,
            agency_fares,
            discounts,
            best_saving,
            transfer_time_allowance_secs,
        })
    }

    #[inline]
    fn agency(&self, leg: &TransitLeg) -> Result<usize, FareError> {
        self.pattern_agency
            .get(leg.pattern.0)
            .copied()
            .flatten()
            .ok_or(FareError::UnresolvedPattern(leg.pattern.0))
    }

    #[inline]
    fn discount(&self, from: usize, to: usize) -> Option<Cents> {
        self.discounts[from * self.agency_fares.len() + to]
    }
}

impl FareCalculator for AgencyPairFareCalculator {
    fn policy_name(&self) -> &str {
        Self::POLICY_NAME
    }

    fn price_legs(&self, legs: &[TransitLeg]) -> Result<FareBounds, FareError> {
        let Some((first, rest)) = legs.split_first() else {
            return Ok(FareBounds::free());
        };

        let mut previous = self.agency(first)?;
        let mut previous_board_time = first.board_time;
        let mut fare = self.agency_fares[previous];
        let mut discount_used = false;

        for leg in rest {
            let current = self.agency(leg)?;
            let in_window = leg.board_time.seconds_since(previous_board_time)
                <= self.transfer_time_allowance_secs as i64;

            fare += match self.discount(previous, current) {
                Some(second_leg_fare) if !discount_used && in_window => {
                    discount_used = true;
                    second_leg_fare
                }
                _ => self.agency_fares[current],
            };
            previous = current;
            previous_board_time = leg.board_time;
        }

        let allowance = if discount_used {
            TransferAllowance::empty()
        } else {
            TransferAllowance::new(
                FareTypeIndex(previous),
                self.best_saving[previous],
                1,
                previous_board_time.plus_seconds(self.transfer_time_allowance_secs),
            )
        };

        Ok(FareBounds { fare, allowance })
    }
}
