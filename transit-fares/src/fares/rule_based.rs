//! General rule-based fare calculator.
//!
//! Prices a ride sequence from a [`FareStructure`]: the first ride pays its
//! full fare, and each later ride is priced as a free continuation, a
//! discounted transfer, or a new full fare, depending on the pair of fare
//! types involved, the time since the previous boarding and the discount
//! budget left.
//!
//! All lookups are resolved into dense arrays at construction, so pricing a
//! leg is a handful of index operations.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::domain::{Cents, ClockTime};
use crate::network::{RouteIndex, TransitNetwork};

use super::allowance::TransferAllowance;
use super::calculator::{CalculatorOptions, FareBounds, FareBreakdown, FareCalculator, LegFare};
use super::error::FareError;
use super::fare_type::FareTypeIndex;
use super::path::TransitLeg;
use super::structure::{FareCap, FareStructure, RouteFare, TransferMatrix, TransferRule};

/// Fare attributes of one trip pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResolvedPattern {
    fare_type: FareTypeIndex,
    route: RouteIndex,
    fare: Cents,
}

/// Pricing policy of one fare type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TypePolicy {
    full_fare: Cents,
    unlimited_transfers: bool,
    allow_same_route_transfer: bool,
    /// Largest saving obtainable from one more discounted transfer out of
    /// this type.
    best_next_saving: Cents,
}

/// Outcome of walking a ride sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Priced {
    uncapped_total: Cents,
    discounts_applied: u32,
    last_type: FareTypeIndex,
    last_board_time: ClockTime,
}

/// Rule engine over an immutable [`FareStructure`].
#[derive(Debug, Clone)]
pub struct RuleBasedFareCalculator {
    patterns: Vec<Option<ResolvedPattern>>,
    types: Vec<TypePolicy>,
    transfers: TransferMatrix,
    max_discounted_transfers: u32,
    transfer_time_allowance_secs: i32,
    fare_cap: FareCap,
    options: CalculatorOptions,
}

impl RuleBasedFareCalculator {
    /// Policy name reported to the search.
    pub const POLICY_NAME: &'static str = "rule-based";

    /// Resolve every pattern of `network` against `structure`.
    ///
    /// Patterns whose route has no fare assignment stay unresolved; pricing a
    /// ride on one of them is an error.
    pub fn new(
        network: &TransitNetwork,
        structure: &FareStructure,
        options: CalculatorOptions,
    ) -> Result<Self, FareError> {
        let by_route_id: HashMap<&str, &RouteFare> = structure
            .routes()
            .iter()
            .map(|r| (r.route_id.as_str(), r))
            .collect();

        let mut unresolved = 0usize;
        let patterns: Vec<Option<ResolvedPattern>> = network
            .patterns()
            .iter()
            .map(|pattern| {
                let resolved = network.route(pattern.route_index).and_then(|route| {
                    let route_fare = by_route_id.get(route.route_id.as_str())?;
                    let fare = structure.resolve_route_fare(route_fare)?;
                    Some(ResolvedPattern {
                        fare_type: route_fare.fare_type,
                        route: pattern.route_index,
                        fare,
                    })
                });
                if resolved.is_none() {
                    unresolved += 1;
                }
                resolved
            })
            .collect();

        if unresolved > 0 {
            warn!(
                unresolved,
                patterns = patterns.len(),
                "trip patterns without a fare assignment"
            );
        }

        let transfers = structure.transfers().clone();
        let types = structure
            .types()
            .iter()
            .enumerate()
            .map(|(i, fare_type)| {
                let from = FareTypeIndex(i);
                let best_next_saving = transfers
                    .row(from)
                    .map(|(to, rule)| {
                        fare_type.flat_fare + structure.types()[to.0].flat_fare - rule.combined_fare
                    })
                    .fold(Cents::ZERO, Cents::max);
                TypePolicy {
                    full_fare: fare_type.flat_fare,
                    unlimited_transfers: fare_type.unlimited_transfers,
                    allow_same_route_transfer: fare_type.allow_same_route_transfer,
                    best_next_saving,
                }
            })
            .collect();

        debug!(
            patterns = patterns.len(),
            types = structure.types().len(),
            "resolved rule-based fare tables"
        );

        Ok(Self {
            patterns,
            types,
            transfers,
            max_discounted_transfers: structure.max_discounted_transfers(),
            transfer_time_allowance_secs: structure.transfer_time_allowance_secs(),
            fare_cap: structure.fare_cap(),
            options,
        })
    }

    #[inline]
    fn resolve(&self, leg: &TransitLeg) -> Result<ResolvedPattern, FareError> {
        self.patterns
            .get(leg.pattern.0)
            .copied()
            .flatten()
            .ok_or(FareError::UnresolvedPattern(leg.pattern.0))
    }

    /// The transfer rule to apply between two consecutive rides, if the
    /// transfer qualifies for a discount.
    #[inline]
    fn discount_rule(
        &self,
        previous: &ResolvedPattern,
        previous_board_time: ClockTime,
        current: &ResolvedPattern,
        board_time: ClockTime,
    ) -> Option<TransferRule> {
        let rule = self.transfers.get(previous.fare_type, current.fare_type)?;

        let allowed = previous.fare_type != current.fare_type
            || self.types[previous.fare_type.0].allow_same_route_transfer
            || previous.route != current.route;
        let in_window = board_time.seconds_since(previous_board_time)
            <= self.transfer_time_allowance_secs as i64;

        (allowed && in_window).then_some(rule)
    }

    /// Price `legs`, reporting each leg's charge to `on_leg`.
    ///
    /// A discounted transfer charges the combined fare less the previous
    /// type's full fare. The charge is negative when the combined fare is
    /// below that full fare, so the pair always totals its combined fare.
    fn walk<F>(&self, legs: &[TransitLeg], mut on_leg: F) -> Result<Option<Priced>, FareError>
    where
        F: FnMut(&TransitLeg, Cents),
    {
        let trace_legs = self.options.trace_legs;
        let mut report = |leg: &TransitLeg, charge: Cents| {
            if trace_legs {
                trace!(
                    pattern = leg.pattern.0,
                    board_time = %leg.board_time,
                    charge = charge.0,
                    "priced leg"
                );
            }
            on_leg(leg, charge);
        };

        let Some((first, rest)) = legs.split_first() else {
            return Ok(None);
        };

        let mut previous = self.resolve(first)?;
        let mut previous_board_time = first.board_time;
        let mut total = previous.fare;
        let mut discounts_applied = 0u32;
        report(first, previous.fare);

        for leg in rest {
            let current = self.resolve(leg)?;
            let previous_policy = &self.types[previous.fare_type.0];

            // Unlimited continuations are not checked against the transfer
            // window and do not spend the discount budget.
            let charge = if current.fare_type == previous.fare_type
                && previous_policy.unlimited_transfers
            {
                Cents::ZERO
            } else if discounts_applied >= self.max_discounted_transfers {
                current.fare
            } else if let Some(rule) =
                self.discount_rule(&previous, previous_board_time, &current, leg.board_time)
            {
                discounts_applied += 1;
                rule.combined_fare - previous_policy.full_fare
            } else {
                current.fare
            };

            total += charge;
            report(leg, charge);
            previous = current;
            previous_board_time = leg.board_time;
        }

        Ok(Some(Priced {
            uncapped_total: total,
            discounts_applied,
            last_type: previous.fare_type,
            last_board_time: previous_board_time,
        }))
    }

    fn bounds(&self, priced: Option<Priced>) -> FareBounds {
        match priced {
            None => FareBounds::free(),
            Some(priced) => FareBounds {
                fare: self.fare_cap.apply(priced.uncapped_total),
                allowance: self.allowance(&priced),
            },
        }
    }

    fn allowance(&self, priced: &Priced) -> TransferAllowance {
        if priced.discounts_applied >= self.max_discounted_transfers {
            return TransferAllowance::empty();
        }

        let policy = &self.types[priced.last_type.0];
        let value = if self.fare_cap.is_reached_by(priced.uncapped_total) {
            policy.full_fare
        } else {
            policy.best_next_saving
        };

        TransferAllowance::new(
            priced.last_type,
            value,
            self.max_discounted_transfers - priced.discounts_applied,
            priced
                .last_board_time
                .plus_seconds(self.transfer_time_allowance_secs),
        )
    }
}

impl FareCalculator for RuleBasedFareCalculator {
    fn policy_name(&self) -> &str {
        Self::POLICY_NAME
    }

    fn price_legs(&self, legs: &[TransitLeg]) -> Result<FareBounds, FareError> {
        let priced = self.walk(legs, |_, _| {})?;
        Ok(self.bounds(priced))
    }

    /// Single walk: each prefix total is the running sum under the cap.
    fn fare_breakdown(
        &self,
        legs: &[TransitLeg],
        search_horizon: ClockTime,
    ) -> Result<FareBreakdown, FareError> {
        let mut leg_fares = Vec::with_capacity(legs.len());
        let mut running = Cents::ZERO;
        let priced = self.walk(legs, |leg, charge| {
            running += charge;
            leg_fares.push(LegFare {
                leg: *leg,
                cumulative_fare: self.fare_cap.apply(running),
            });
        })?;

        let bounds = self.bounds(priced);
        Ok(FareBreakdown {
            legs: leg_fares,
            total_fare: bounds.fare,
            allowance: bounds.allowance.tighten_expiration(search_horizon),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransitMode;
    use crate::fares::{FareDocument, FareStructureBuilder, GroupingKey, SearchState};
    use crate::network::{PatternIndex, RouteInfo, TripPattern};

    fn t(secs: i32) -> ClockTime {
        ClockTime::from_seconds(secs)
    }

    fn leg(pattern: usize, board: i32) -> TransitLeg {
        TransitLeg::new(PatternIndex(pattern), t(board))
    }

    /// Patterns 0 and 1 run on route A1 and A2 (type A), pattern 2 on
    /// route B1 (type B). Pattern 3 runs on A1 again.
    fn network() -> TransitNetwork {
        TransitNetwork::new(
            vec![
                RouteInfo::new("A1", "A", "Agency A", TransitMode::Bus),
                RouteInfo::new("A2", "A", "Agency A", TransitMode::Bus),
                RouteInfo::new("B1", "B", "Agency B", TransitMode::Rail),
            ],
            vec![
                TripPattern {
                    route_index: RouteIndex(0),
                },
                TripPattern {
                    route_index: RouteIndex(1),
                },
                TripPattern {
                    route_index: RouteIndex(2),
                },
                TripPattern {
                    route_index: RouteIndex(0),
                },
            ],
        )
        .unwrap()
    }

    fn calculator_with(json: &str) -> RuleBasedFareCalculator {
        let net = network();
        let structure = FareStructureBuilder::new(&net)
            .build(Cents(100), GroupingKey::AgencyId)
            .unwrap()
            .with_document(&net, &FareDocument::from_json(json).unwrap())
            .unwrap();
        RuleBasedFareCalculator::new(&net, &structure, CalculatorOptions::default()).unwrap()
    }

    /// The reference configuration: A and B cost 100, A then B costs 150
    /// combined, one discount per trip, one hour to transfer.
    fn reference(extra: &str) -> RuleBasedFareCalculator {
        calculator_with(&format!(
            r#"{{
                "base_fare": 1.0,
                "max_discounted_transfers": 1,
                "transfer_time_allowance": 3600,
                "fare_per_transfer": [{{"leg1": "A", "leg2": "B", "fare": 1.5}}]
                {extra}
            }}"#
        ))
    }

    fn leg_charges(calc: &RuleBasedFareCalculator, legs: &[TransitLeg]) -> (Vec<Cents>, Priced) {
        let mut charges = Vec::new();
        let priced = calc
            .walk(legs, |_, charge| charges.push(charge))
            .unwrap()
            .unwrap();
        (charges, priced)
    }

    #[test]
    fn no_legs_is_free() {
        let calc = reference("");
        let bounds = calc.price_legs(&[]).unwrap();

        assert_eq!(bounds.fare, Cents::ZERO);
        assert!(bounds.allowance.is_empty());
    }

    #[test]
    fn single_leg_full_fare() {
        let calc = reference("");
        let (charges, priced) = leg_charges(&calc, &[leg(2, 0)]);

        assert_eq!(charges, vec![Cents(100)]);
        assert_eq!(priced.discounts_applied, 0);
        assert_eq!(calc.price_legs(&[leg(2, 0)]).unwrap().fare, Cents(100));
    }

    #[test]
    fn discounted_transfer_within_window() {
        let calc = reference("");
        let legs = [leg(0, 0), leg(2, 1800)];
        let (charges, priced) = leg_charges(&calc, &legs);

        // Second leg pays 150 - 100
        assert_eq!(charges, vec![Cents(100), Cents(50)]);
        assert_eq!(priced.discounts_applied, 1);
        assert_eq!(calc.price_legs(&legs).unwrap().fare, Cents(150));
    }

    #[test]
    fn transfer_outside_window_pays_full() {
        let calc = reference("");
        let legs = [leg(0, 0), leg(2, 4000)];
        let (charges, priced) = leg_charges(&calc, &legs);

        assert_eq!(charges, vec![Cents(100), Cents(100)]);
        assert_eq!(priced.discounts_applied, 0);
        assert_eq!(calc.price_legs(&legs).unwrap().fare, Cents(200));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let calc = reference("");
        let (_, priced) = leg_charges(&calc, &[leg(0, 0), leg(2, 3600)]);
        assert_eq!(priced.discounts_applied, 1);
    }

    #[test]
    fn fare_cap_binds() {
        let calc = reference(r#", "fare_cap": 0.4"#);
        let bounds = calc.price_legs(&[leg(0, 0), leg(2, 1800)]).unwrap();
        assert_eq!(bounds.fare, Cents(40));
    }

    #[test]
    fn fare_cap_does_not_bind() {
        let calc = reference(r#", "fare_cap": 10"#);
        let bounds = calc.price_legs(&[leg(0, 0), leg(2, 1800)]).unwrap();
        assert_eq!(bounds.fare, Cents(150));
    }

    #[test]
    fn transfer_rules_are_directional() {
        let calc = reference("");
        // B then A has only the undiscounted default
        let (charges, priced) = leg_charges(&calc, &[leg(2, 0), leg(0, 600)]);

        assert_eq!(charges, vec![Cents(100), Cents(100)]);
        // The undiscounted default still counts as an applied transfer rule
        assert_eq!(priced.discounts_applied, 1);
    }

    #[test]
    fn missing_rule_pays_full_without_spending_budget() {
        let net = network();
        let skeleton = FareStructureBuilder::new(&net)
            .build(Cents(100), GroupingKey::AgencyId)
            .unwrap();
        let (params, types, routes, mut transfers) = skeleton.into_parts();
        transfers.set(FareTypeIndex(0), FareTypeIndex(1), None);
        let structure = FareStructure::new(params, types, routes, transfers).unwrap();
        let calc =
            RuleBasedFareCalculator::new(&net, &structure, CalculatorOptions::default()).unwrap();

        let (charges, priced) = leg_charges(&calc, &[leg(0, 0), leg(2, 60)]);
        assert_eq!(charges, vec![Cents(100), Cents(100)]);
        assert_eq!(priced.discounts_applied, 0);
    }

    #[test]
    fn discount_budget_limits_discounts() {
        let calc = calculator_with(
            r#"{
                "max_discounted_transfers": 1,
                "transfer_time_allowance": 3600,
                "fare_per_transfer": [
                    {"leg1": "A", "leg2": "B", "fare": 1.5},
                    {"leg1": "B", "leg2": "A", "fare": 1.5}
                ]
            }"#,
        );
        let (charges, priced) = leg_charges(&calc, &[leg(0, 0), leg(2, 600), leg(1, 1200)]);

        assert_eq!(charges, vec![Cents(100), Cents(50), Cents(100)]);
        assert_eq!(priced.discounts_applied, 1);
    }

    #[test]
    fn larger_budget_allows_chained_discounts() {
        let calc = calculator_with(
            r#"{
                "max_discounted_transfers": 2,
                "transfer_time_allowance": 3600,
                "fare_per_transfer": [
                    {"leg1": "A", "leg2": "B", "fare": 1.5},
                    {"leg1": "B", "leg2": "A", "fare": 1.25}
                ]
            }"#,
        );
        let (charges, priced) = leg_charges(&calc, &[leg(0, 0), leg(2, 600), leg(1, 1200)]);

        assert_eq!(charges, vec![Cents(100), Cents(50), Cents(25)]);
        assert_eq!(priced.discounts_applied, 2);
    }

    #[test]
    fn same_route_transfer_not_discounted_by_default() {
        let calc = calculator_with(
            r#"{
                "transfer_time_allowance": 3600,
                "fare_per_transfer": [{"leg1": "A", "leg2": "A", "fare": 1.2}]
            }"#,
        );

        // Patterns 0 and 3 are both route A1
        let (same_route, priced) = leg_charges(&calc, &[leg(0, 0), leg(3, 600)]);
        assert_eq!(same_route, vec![Cents(100), Cents(100)]);
        assert_eq!(priced.discounts_applied, 0);

        // Patterns 0 and 1 are different routes of type A
        let (other_route, priced) = leg_charges(&calc, &[leg(0, 0), leg(1, 600)]);
        assert_eq!(other_route, vec![Cents(100), Cents(20)]);
        assert_eq!(priced.discounts_applied, 1);
    }

    #[test]
    fn combined_fare_below_first_leg_lowers_total() {
        let calc = calculator_with(
            r#"{
                "transfer_time_allowance": 3600,
                "fare_per_type": [
                    {"type": "A", "fare": 2.0},
                    {"type": "B", "fare": 1.0}
                ],
                "fare_per_transfer": [{"leg1": "A", "leg2": "B", "fare": 1.5}]
            }"#,
        );
        let legs = [leg(0, 0), leg(2, 60)];
        let (charges, priced) = leg_charges(&calc, &legs);

        assert_eq!(charges, vec![Cents(200), Cents(-50)]);
        assert_eq!(priced.discounts_applied, 1);
        assert_eq!(calc.price_legs(&legs).unwrap().fare, Cents(150));
    }

    #[test]
    fn breakdown_matches_prefix_prices() {
        let calc = reference(r#", "fare_cap": 1.75"#);
        let legs = [leg(0, 0), leg(2, 600), leg(1, 1200), leg(2, 9000)];
        let breakdown = calc.fare_breakdown(&legs, t(86_400)).unwrap();

        let cumulative: Vec<Cents> = breakdown.legs.iter().map(|l| l.cumulative_fare).collect();
        let prefixes: Vec<Cents> = (1..=legs.len())
            .map(|end| calc.price_legs(&legs[..end]).unwrap().fare)
            .collect();
        assert_eq!(cumulative, prefixes);
        assert_eq!(cumulative, vec![Cents(100), Cents(150), Cents(175), Cents(175)]);
        assert_eq!(breakdown.total_fare, Cents(175));
        assert_eq!(breakdown.legs[3].leg, legs[3]);
    }

    #[test]
    fn breakdown_tightens_allowance() {
        let calc = reference("");
        let breakdown = calc.fare_breakdown(&[leg(0, 1000)], t(2000)).unwrap();

        assert_eq!(breakdown.total_fare, Cents(100));
        assert_eq!(breakdown.allowance.expiration(), t(2000));
        assert!(calc.fare_breakdown(&[], t(2000)).unwrap().legs.is_empty());
    }

    #[test]
    fn same_route_transfer_when_allowed() {
        let calc = calculator_with(
            r#"{
                "transfer_time_allowance": 3600,
                "fare_per_type": [{"type": "A", "fare": 1.0, "allow_same_route_transfer": true}],
                "fare_per_transfer": [{"leg1": "A", "leg2": "A", "fare": 1.2}]
            }"#,
        );

        let (charges, _) = leg_charges(&calc, &[leg(0, 0), leg(3, 600)]);
        assert_eq!(charges, vec![Cents(100), Cents(20)]);
    }

    #[test]
    fn unlimited_transfers_chain() {
        let calc = calculator_with(
            r#"{
                "max_discounted_transfers": 1,
                "transfer_time_allowance": 600,
                "fare_per_type": [{"type": "A", "fare": 2.0, "unlimited_transfers": true}]
            }"#,
        );

        // Far outside the window, still free
        let legs = [leg(0, 0), leg(1, 5000), leg(3, 20000), leg(0, 40000)];
        let (charges, priced) = leg_charges(&calc, &legs);

        assert_eq!(charges, vec![Cents(200), Cents::ZERO, Cents::ZERO, Cents::ZERO]);
        assert_eq!(priced.discounts_applied, 0);
        assert_eq!(priced.last_board_time, t(40000));

        let bounds = calc.price_legs(&legs).unwrap();
        assert_eq!(bounds.fare, Cents(200));
        assert_eq!(bounds.allowance.number_remaining(), 1);
    }

    #[test]
    fn route_fare_used_for_full_fare_legs() {
        let calc = calculator_with(
            r#"{
                "fare_per_type": [{"type": "B", "fare": 1.0, "use_route_fare": true}],
                "fare_per_route": [{"route_id": "B1", "fare_type": "B", "route_fare": 3.5}],
                "max_discounted_transfers": 0
            }"#,
        );

        let (charges, _) = leg_charges(&calc, &[leg(0, 0), leg(2, 60)]);
        assert_eq!(charges, vec![Cents(100), Cents(350)]);
    }

    #[test]
    fn allowance_reports_best_next_saving() {
        let calc = reference("");
        let bounds = calc.price_legs(&[leg(0, 1000)]).unwrap();

        let allowance = bounds.allowance;
        assert_eq!(allowance.fare_type(), Some(FareTypeIndex(0)));
        assert_eq!(allowance.value(), Cents(50));
        assert_eq!(allowance.number_remaining(), 1);
        assert_eq!(allowance.expiration(), t(4600));
    }

    #[test]
    fn allowance_empty_when_budget_spent() {
        let calc = reference("");
        let bounds = calc.price_legs(&[leg(0, 0), leg(2, 1800)]).unwrap();
        assert_eq!(bounds.allowance, TransferAllowance::empty());
    }

    #[test]
    fn allowance_zero_value_without_discounts() {
        let calc = reference("");
        // From B nothing is discounted
        let bounds = calc.price_legs(&[leg(2, 0)]).unwrap();

        assert_eq!(bounds.allowance.fare_type(), Some(FareTypeIndex(1)));
        assert_eq!(bounds.allowance.value(), Cents::ZERO);
        assert_eq!(bounds.allowance.number_remaining(), 1);
    }

    #[test]
    fn allowance_when_cap_reached() {
        let calc = calculator_with(
            r#"{
                "max_discounted_transfers": 3,
                "transfer_time_allowance": 3600,
                "fare_cap": 1.5
            }"#,
        );
        let bounds = calc.price_legs(&[leg(0, 0), leg(2, 7200)]).unwrap();

        assert_eq!(bounds.fare, Cents(150));
        assert_eq!(bounds.allowance.fare_type(), Some(FareTypeIndex(1)));
        assert_eq!(bounds.allowance.value(), Cents(100));
        assert_eq!(bounds.allowance.expiration(), t(10800));
    }

    #[test]
    fn unresolved_pattern_fails_loudly() {
        let calc = reference("");
        let result = calc.price_legs(&[leg(0, 0), leg(42, 60)]);
        assert!(matches!(result, Err(FareError::UnresolvedPattern(42))));
    }

    #[test]
    fn pattern_without_route_fare_is_unresolved() {
        let net = network();
        let other = TransitNetwork::with_one_pattern_per_route(vec![RouteInfo::new(
            "A1",
            "A",
            "Agency A",
            TransitMode::Bus,
        )]);
        // Structure only knows route A1
        let structure = FareStructureBuilder::new(&other)
            .build(Cents(100), GroupingKey::Generic)
            .unwrap();
        let calc =
            RuleBasedFareCalculator::new(&net, &structure, CalculatorOptions::default()).unwrap();

        assert_eq!(calc.price_legs(&[leg(3, 0)]).unwrap().fare, Cents(100));
        assert!(matches!(
            calc.price_legs(&[leg(2, 0)]),
            Err(FareError::UnresolvedPattern(2))
        ));
    }

    #[test]
    fn calculate_fare_from_search_state() {
        let calc = reference("");
        let path = SearchState::origin(t(0))
            .ride(PatternIndex(0), t(0), t(900))
            .transfer(t(1200))
            .ride(PatternIndex(2), t(1800), t(2400));

        let bounds = calc.calculate_fare(path.as_ref(), t(86_400)).unwrap();
        assert_eq!(bounds.fare, Cents(150));
    }

    #[test]
    fn trace_option_does_not_change_result() {
        let net = network();
        let structure = FareStructureBuilder::new(&net)
            .build(Cents(100), GroupingKey::AgencyId)
            .unwrap();
        let quiet =
            RuleBasedFareCalculator::new(&net, &structure, CalculatorOptions::default()).unwrap();
        let traced = RuleBasedFareCalculator::new(
            &net,
            &structure,
            CalculatorOptions { trace_legs: true },
        )
        .unwrap();

        let legs = [leg(0, 0), leg(2, 100), leg(1, 200)];
        assert_eq!(quiet.price_legs(&legs).unwrap(), traced.price_legs(&legs).unwrap());
    }

    #[test]
    fn policy_name() {
        assert_eq!(reference("").policy_name(), "rule-based");
    }
}
