//! The fare calculator capability and policy selection.
//!
//! Every fare policy prices a path the same way from the search's point of
//! view: a fare in cents plus a transfer allowance. Which policy a network
//! uses is chosen from configuration at load time.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Cents, ClockTime};
use crate::network::TransitNetwork;

use super::allowance::TransferAllowance;
use super::builder::{FareStructureBuilder, GroupingKey};
use super::document::FareDocument;
use super::error::FareError;
use super::fixed::{AgencyPairConfig, AgencyPairFareCalculator, SimpleFareCalculator};
use super::path::{PathState, TransitLeg, transit_legs};
use super::rule_based::RuleBasedFareCalculator;

/// Fare of a path and the discount potential it carries forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FareBounds {
    pub fare: Cents,
    pub allowance: TransferAllowance,
}

impl FareBounds {
    /// The bounds of a path with no rides.
    pub const fn free() -> Self {
        Self {
            fare: Cents::ZERO,
            allowance: TransferAllowance::empty(),
        }
    }
}

/// Fare paid after riding a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegFare {
    pub leg: TransitLeg,
    pub cumulative_fare: Cents,
}

/// Per-leg cumulative fares of a complete trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareBreakdown {
    pub legs: Vec<LegFare>,
    pub total_fare: Cents,
    pub allowance: TransferAllowance,
}

/// Diagnostics switches fixed at calculator construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorOptions {
    /// Emit a `trace!` event for every priced leg.
    #[serde(default)]
    pub trace_legs: bool,
}

/// Prices transit paths for the search.
///
/// Implementations hold only immutable lookup tables. Pricing takes `&self`,
/// never blocks, and may run on any number of search threads at once.
pub trait FareCalculator: Send + Sync {
    /// Short identifier of the pricing policy.
    fn policy_name(&self) -> &str;

    /// Price a sequence of rides in travel order.
    fn price_legs(&self, legs: &[TransitLeg]) -> Result<FareBounds, FareError>;

    /// Price the path ending at `path`, capping the allowance's usefulness
    /// at the search horizon.
    fn calculate_fare<S: PathState>(
        &self,
        path: &S,
        search_horizon: ClockTime,
    ) -> Result<FareBounds, FareError>
    where
        Self: Sized,
    {
        let legs = transit_legs(path);
        let bounds = self.price_legs(&legs)?;
        Ok(FareBounds {
            fare: bounds.fare,
            allowance: bounds.allowance.tighten_expiration(search_horizon),
        })
    }

    /// Cumulative fare after each leg, plus the trip total.
    fn fare_breakdown(
        &self,
        legs: &[TransitLeg],
        search_horizon: ClockTime,
    ) -> Result<FareBreakdown, FareError> {
        let mut leg_fares = Vec::with_capacity(legs.len());
        for end in 1..=legs.len() {
            let prefix = self.price_legs(&legs[..end])?;
            leg_fares.push(LegFare {
                leg: legs[end - 1],
                cumulative_fare: prefix.fare,
            });
        }

        let full = self.price_legs(legs)?;
        Ok(FareBreakdown {
            legs: leg_fares,
            total_fare: full.fare,
            allowance: full.allowance.tighten_expiration(search_horizon),
        })
    }
}

/// Where a rule-based policy gets its fare document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FaresSource {
    /// Path to a document file, relative to the policy file.
    Path(PathBuf),
    /// Document embedded in the policy file.
    Inline(FareDocument),
}

/// Fare policy configuration, tagged by `type`.
///
/// # Examples
///
/// ```
/// use transit_fares::fares::FarePolicyConfig;
///
/// let config: FarePolicyConfig = serde_json::from_str(
///     r#"{"type": "simple", "base_fare": 2.5}"#,
/// ).unwrap();
/// assert!(matches!(config, FarePolicyConfig::Simple { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FarePolicyConfig {
    /// General rule engine over a fare structure.
    RuleBased {
        default_base_fare: f64,
        #[serde(default)]
        grouping: GroupingKey,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fares: Option<FaresSource>,
        #[serde(default)]
        trace_legs: bool,
    },
    /// Flat fare for every boarding.
    Simple { base_fare: f64 },
    /// Fixed per-agency fares with agency-pair transfer discounts.
    AgencyPair(AgencyPairConfig),
}

/// A configured fare policy.
#[derive(Debug)]
pub enum FarePolicy {
    RuleBased(RuleBasedFareCalculator),
    Simple(SimpleFareCalculator),
    AgencyPair(AgencyPairFareCalculator),
}

impl FarePolicy {
    /// Read a policy configuration file and build the policy for `network`.
    pub fn load(network: &TransitNetwork, path: &Path) -> Result<FarePolicy, FareError> {
        let contents = std::fs::read_to_string(path).map_err(|source| FareError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: FarePolicyConfig = serde_json::from_str(&contents)?;
        Self::from_config(network, &config, path.parent())
    }

    /// Build the policy described by `config`.
    ///
    /// Relative document paths are resolved against `base_dir`.
    pub fn from_config(
        network: &TransitNetwork,
        config: &FarePolicyConfig,
        base_dir: Option<&Path>,
    ) -> Result<FarePolicy, FareError> {
        let policy = match config {
            FarePolicyConfig::RuleBased {
                default_base_fare,
                grouping,
                fares,
                trace_legs,
            } => {
                let base = Cents::from_currency(*default_base_fare)
                    .map_err(|e| FareError::amount("default_base_fare", e))?;
                let skeleton = FareStructureBuilder::new(network).build(base, *grouping)?;
                let structure = match fares {
                    None => skeleton,
                    Some(FaresSource::Inline(document)) => {
                        skeleton.with_document(network, document)?
                    }
                    Some(FaresSource::Path(file)) => {
                        let file = match base_dir {
                            Some(dir) if file.is_relative() => dir.join(file),
                            _ => file.clone(),
                        };
                        skeleton.with_document(network, &FareDocument::load(&file)?)?
                    }
                };
                let options = CalculatorOptions {
                    trace_legs: *trace_legs,
                };
                FarePolicy::RuleBased(RuleBasedFareCalculator::new(network, &structure, options)?)
            }
            FarePolicyConfig::Simple { base_fare } => {
                let base = Cents::from_currency(*base_fare)
                    .map_err(|e| FareError::amount("base_fare", e))?;
                FarePolicy::Simple(SimpleFareCalculator::new(network, base))
            }
            FarePolicyConfig::AgencyPair(table) => {
                FarePolicy::AgencyPair(AgencyPairFareCalculator::new(network, table)?)
            }
        };

        info!(policy = policy.policy_name(), "fare policy configured");
        Ok(policy)
    }
}

impl FareCalculator for FarePolicy {
    fn policy_name(&self) -> &str {
        match self {
            FarePolicy::RuleBased(c) => c.policy_name(),
            FarePolicy::Simple(c) => c.policy_name(),
            FarePolicy::AgencyPair(c) => c.policy_name(),
        }
    }

    fn price_legs(&self, legs: &[TransitLeg]) -> Result<FareBounds, FareError> {
        match self {
            FarePolicy::RuleBased(c) => c.price_legs(legs),
            FarePolicy::Simple(c) => c.price_legs(legs),
            FarePolicy::AgencyPair(c) => c.price_legs(legs),
        }
    }

    fn fare_breakdown(
        &self,
        legs: &[TransitLeg],
        search_horizon: ClockTime,
    ) -> Result<FareBreakdown, FareError> {
        match self {
            FarePolicy::RuleBased(c) => c.fare_breakdown(legs, search_horizon),
            FarePolicy::Simple(c) => c.fare_breakdown(legs, search_horizon),
            FarePolicy::AgencyPair(c) => c.fare_breakdown(legs, search_horizon),
        }
    }
}
