//! Declarative fare configuration documents.
//!
//! A document can be overlaid onto a generated skeleton: anything it omits
//! keeps the generated default. Amounts are decimal currency values and are
//! converted to cents once, on ingestion.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Cents;
use crate::network::TransitNetwork;

use super::builder::{FareStructureBuilder, GroupingKey, undiscounted_rule};
use super::error::FareError;
use super::fare_type::{FareType, FareTypeIndex};
use super::structure::{FareCap, FareStructure, TransferMatrix, TransferRule};

/// Token accepted for an uncapped fare.
pub const UNBOUNDED_TOKEN: &str = "unbounded";

/// Fare cap as written in a document: an amount or `"unbounded"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FareCapToken {
    Amount(f64),
    Token(String),
}

impl FareCapToken {
    fn resolve(&self) -> Result<FareCap, FareError> {
        match self {
            FareCapToken::Amount(amount) => Cents::from_currency(*amount)
                .map(FareCap::Limit)
                .map_err(|e| FareError::amount("fare_cap", e)),
            FareCapToken::Token(token) if token.eq_ignore_ascii_case(UNBOUNDED_TOKEN) => {
                Ok(FareCap::Unbounded)
            }
            FareCapToken::Token(token) => Err(FareError::InvalidFareCap(token.clone())),
        }
    }

    fn from_cap(cap: FareCap) -> Self {
        match cap {
            FareCap::Unbounded => FareCapToken::Token(UNBOUNDED_TOKEN.to_string()),
            FareCap::Limit(cents) => FareCapToken::Amount(cents.to_currency()),
        }
    }
}

/// Fare type entry of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeEntry {
    #[serde(rename = "type")]
    pub fare_type: String,
    #[serde(default)]
    pub unlimited_transfers: bool,
    #[serde(default)]
    pub allow_same_route_transfer: bool,
    #[serde(default)]
    pub use_route_fare: bool,
    pub fare: f64,
}

/// Route entry of a document. Descriptive fields are informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEntry {
    #[serde(default)]
    pub agency_id: String,
    #[serde(default)]
    pub agency_name: String,
    pub route_id: String,
    #[serde(default)]
    pub route_short_name: String,
    #[serde(default)]
    pub route_long_name: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_fare: Option<f64>,
    pub fare_type: String,
}

/// Transfer entry of a document: combined price of `leg1` then `leg2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferEntry {
    pub leg1: String,
    pub leg2: String,
    pub fare: f64,
}

/// A fare configuration document.
///
/// Every amount (`base_fare`, `fare_cap`, type, route and transfer fares) is
/// written in decimal currency units, not cents: `2.75` becomes
/// `Cents(275)` and `100` becomes `Cents(10000)`. Amounts above
/// [`Cents::MAX`] are rejected.
///
/// # Examples
///
/// ```
/// use transit_fares::fares::FareDocument;
///
/// let doc = FareDocument::from_json(r#"{
///     "base_fare": 2.75,
///     "fare_cap": "unbounded",
///     "fare_per_transfer": [{"leg1": "BUS", "leg2": "SUBWAY", "fare": 2.75}]
/// }"#).unwrap();
///
/// assert_eq!(doc.base_fare, Some(2.75));
/// assert_eq!(doc.fare_per_transfer.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FareDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fare: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discounted_transfers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_time_allowance: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fare_cap: Option<FareCapToken>,
    #[serde(default)]
    pub fare_per_type: Vec<TypeEntry>,
    #[serde(default)]
    pub fare_per_route: Vec<RouteEntry>,
    #[serde(default)]
    pub fare_per_transfer: Vec<TransferEntry>,
}

impl FareDocument {
    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, FareError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, FareError> {
        let contents = std::fs::read_to_string(path).map_err(|source| FareError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Write the document as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), FareError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| FareError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

fn cents(field: impl Into<String>, amount: f64) -> Result<Cents, FareError> {
    Cents::from_currency(amount).map_err(|e| FareError::amount(field, e))
}

/// Change a type's flat fare, refreshing any transfer cells that still hold
/// the undiscounted default for the old fare.
fn reprice_type(
    types: &mut [FareType],
    transfers: &mut TransferMatrix,
    index: FareTypeIndex,
    new_fare: Cents,
) {
    let old_types = types.to_vec();
    types[index.0].flat_fare = new_fare;

    for other in 0..types.len() {
        let other = FareTypeIndex(other);
        for (from, to) in [(index, other), (other, index)] {
            let old_default = undiscounted_rule(&old_types[from.0], &old_types[to.0]);
            if transfers.get(from, to) == Some(old_default) {
                transfers.set(from, to, Some(undiscounted_rule(&types[from.0], &types[to.0])));
            }
        }
    }
}

impl FareStructure {
    /// Generate a skeleton for `network` and overlay the document at `path`.
    pub fn load(
        network: &TransitNetwork,
        path: &Path,
        default_base_fare: Cents,
        grouping: GroupingKey,
    ) -> Result<FareStructure, FareError> {
        let document = FareDocument::load(path)?;
        FareStructureBuilder::new(network)
            .build(default_base_fare, grouping)?
            .with_document(network, &document)
    }

    /// Overlay a document, producing a new structure.
    ///
    /// Scalars present in the document replace the current values. Type
    /// entries update the type with the same label or append a new one.
    /// Route entries reassign routes by id. Transfer entries overwrite
    /// matrix cells. Unknown labels or route ids are errors.
    pub fn with_document(
        self,
        network: &TransitNetwork,
        document: &FareDocument,
    ) -> Result<FareStructure, FareError> {
        let (mut params, mut types, mut routes, mut transfers) = self.into_parts();

        if let Some(base) = document.base_fare {
            let new_base = cents("base_fare", base)?;
            // Types still on the old base follow it unless listed explicitly
            let old_base = params.base_fare;
            for i in 0..types.len() {
                let listed = document
                    .fare_per_type
                    .iter()
                    .any(|e| e.fare_type == types[i].label);
                if !listed && types[i].flat_fare == old_base {
                    reprice_type(&mut types, &mut transfers, FareTypeIndex(i), new_base);
                }
            }
            params.base_fare = new_base;
        }
        if let Some(count) = document.max_discounted_transfers {
            params.max_discounted_transfers = count;
        }
        if let Some(secs) = document.transfer_time_allowance {
            params.transfer_time_allowance_secs =
                i32::try_from(secs).map_err(|_| FareError::InvalidTransferWindow(secs))?;
        }
        if let Some(cap) = &document.fare_cap {
            params.fare_cap = cap.resolve()?;
        }

        for entry in &document.fare_per_type {
            let fare = cents(format!("fare_per_type[{}]", entry.fare_type), entry.fare)?;
            let index = match types.iter().position(|t| t.label == entry.fare_type) {
                Some(i) => FareTypeIndex(i),
                None => {
                    types.push(FareType::new(entry.fare_type.clone(), fare));
                    let index = FareTypeIndex(types.len() - 1);
                    transfers = transfers.grown(types.len());
                    for other in 0..types.len() {
                        let other = FareTypeIndex(other);
                        for (from, to) in [(index, other), (other, index)] {
                            transfers.set(
                                from,
                                to,
                                Some(undiscounted_rule(&types[from.0], &types[to.0])),
                            );
                        }
                    }
                    debug!(label = %entry.fare_type, "added fare type from document");
                    index
                }
            };

            reprice_type(&mut types, &mut transfers, index, fare);
            let t = &mut types[index.0];
            t.unlimited_transfers = entry.unlimited_transfers;
            t.allow_same_route_transfer = entry.allow_same_route_transfer;
            t.use_route_fare = entry.use_route_fare;
        }

        let find_type = |types: &[FareType], label: &str| {
            types
                .iter()
                .position(|t| t.label == label)
                .map(FareTypeIndex)
                .ok_or_else(|| FareError::UnknownFareType(label.to_string()))
        };

        for entry in &document.fare_per_route {
            let fare_type = find_type(&types, &entry.fare_type)?;
            let route_fare = entry
                .route_fare
                .map(|f| cents(format!("fare_per_route[{}]", entry.route_id), f))
                .transpose()?;

            let route = routes
                .iter_mut()
                .find(|r| r.route_id == entry.route_id)
                .ok_or_else(|| FareError::UnknownRoute(entry.route_id.clone()))?;
            route.fare_type = fare_type;
            route.route_fare = route_fare;
        }

        for entry in &document.fare_per_transfer {
            let from = find_type(&types, &entry.leg1)?;
            let to = find_type(&types, &entry.leg2)?;
            let combined_fare = cents(
                format!("fare_per_transfer[{} -> {}]", entry.leg1, entry.leg2),
                entry.fare,
            )?;
            transfers.set(from, to, Some(TransferRule { combined_fare }));
        }

        debug!(
            types = document.fare_per_type.len(),
            routes = document.fare_per_route.len(),
            transfers = document.fare_per_transfer.len(),
            routes_in_network = network.routes().len(),
            "applied fare document"
        );

        FareStructure::new(params, types, routes, transfers)
    }

    /// Render the structure as a complete document.
    ///
    /// Route descriptive fields are filled from `network` where the route id
    /// is known to it.
    pub fn to_document(&self, network: &TransitNetwork) -> FareDocument {
        let fare_per_type = self
            .types()
            .iter()
            .map(|t| TypeEntry {
                fare_type: t.label.clone(),
                unlimited_transfers: t.unlimited_transfers,
                allow_same_route_transfer: t.allow_same_route_transfer,
                use_route_fare: t.use_route_fare,
                fare: t.flat_fare.to_currency(),
            })
            .collect();

        let fare_per_route = self
            .routes()
            .iter()
            .map(|r| {
                let info = network.find_route(&r.route_id).and_then(|i| network.route(i));
                RouteEntry {
                    agency_id: r.agency_id.clone(),
                    agency_name: info.map(|i| i.agency_name.clone()).unwrap_or_default(),
                    route_id: r.route_id.clone(),
                    route_short_name: info
                        .map(|i| i.route_short_name.clone())
                        .unwrap_or_default(),
                    route_long_name: info.map(|i| i.route_long_name.clone()).unwrap_or_default(),
                    mode: info.map(|i| i.mode.label().to_string()).unwrap_or_default(),
                    route_fare: r.route_fare.map(Cents::to_currency),
                    fare_type: self.types()[r.fare_type.0].label.clone(),
                }
            })
            .collect();

        let mut fare_per_transfer = Vec::new();
        for (i, from) in self.types().iter().enumerate() {
            for (to, rule) in self.transfers().row(FareTypeIndex(i)) {
                fare_per_transfer.push(TransferEntry {
                    leg1: from.label.clone(),
                    leg2: self.types()[to.0].label.clone(),
                    fare: rule.combined_fare.to_currency(),
                });
            }
        }

        FareDocument {
            base_fare: Some(self.base_fare().to_currency()),
            max_discounted_transfers: Some(self.max_discounted_transfers()),
            transfer_time_allowance: Some(self.transfer_time_allowance_secs() as i64),
            fare_cap: Some(FareCapToken::from_cap(self.fare_cap())),
            fare_per_type,
            fare_per_route,
            fare_per_transfer,
        }
    }

    /// Write the structure to `path` as a document.
    pub fn write_json(&self, network: &TransitNetwork, path: &Path) -> Result<(), FareError> {
        self.to_document(network).write_json(path)
    }
}
