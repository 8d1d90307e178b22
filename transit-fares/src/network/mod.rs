//! Route and pattern catalogue of a loaded transit network.
//!
//! Network construction (GTFS ingestion, graph building) happens elsewhere.
//! The fare module only needs to know which route each trip pattern runs on,
//! and the agency and mode of each route. This module holds exactly that.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::TransitMode;

/// Index of a route in [`TransitNetwork::routes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteIndex(pub usize);

/// Index of a trip pattern in [`TransitNetwork::patterns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternIndex(pub usize);

/// Errors from loading or validating a network catalogue.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Failed to read the catalogue file
    #[error("failed to read network file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catalogue JSON was malformed
    #[error("invalid network JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A pattern references a route that does not exist
    #[error("pattern {pattern} references unknown route index {route}")]
    DanglingPattern { pattern: usize, route: usize },
}

/// Descriptive attributes of a route, as found in GTFS `routes.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub route_id: String,
    pub agency_id: String,
    #[serde(default)]
    pub agency_name: String,
    #[serde(default)]
    pub route_short_name: String,
    #[serde(default)]
    pub route_long_name: String,
    pub mode: TransitMode,
}

impl RouteInfo {
    /// Create a route with empty display names.
    pub fn new(route_id: &str, agency_id: &str, agency_name: &str, mode: TransitMode) -> Self {
        Self {
            route_id: route_id.to_string(),
            agency_id: agency_id.to_string(),
            agency_name: agency_name.to_string(),
            route_short_name: String::new(),
            route_long_name: String::new(),
            mode,
        }
    }
}

/// A trip pattern: a sequence of stops served by trips of one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripPattern {
    pub route_index: RouteIndex,
}

/// The route catalogue and pattern-to-route mapping of a network.
///
/// # Invariants
///
/// - Every pattern's `route_index` is a valid index into `routes`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitNetwork {
    routes: Vec<RouteInfo>,
    patterns: Vec<TripPattern>,
}

impl TransitNetwork {
    /// Create a network, validating pattern references.
    pub fn new(routes: Vec<RouteInfo>, patterns: Vec<TripPattern>) -> Result<Self, NetworkError> {
        let network = Self { routes, patterns };
        network.validate()?;
        Ok(network)
    }

    /// Create a network with one pattern per route, in route order.
    pub fn with_one_pattern_per_route(routes: Vec<RouteInfo>) -> Self {
        let patterns = (0..routes.len())
            .map(|i| TripPattern {
                route_index: RouteIndex(i),
            })
            .collect();
        Self { routes, patterns }
    }

    /// Load a network catalogue from a JSON file.
    pub fn load(path: &Path) -> Result<Self, NetworkError> {
        let contents = std::fs::read_to_string(path).map_err(|source| NetworkError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse a network catalogue from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        let network: TransitNetwork = serde_json::from_str(json)?;
        network.validate()?;
        Ok(network)
    }

    fn validate(&self) -> Result<(), NetworkError> {
        for (i, pattern) in self.patterns.iter().enumerate() {
            if pattern.route_index.0 >= self.routes.len() {
                return Err(NetworkError::DanglingPattern {
                    pattern: i,
                    route: pattern.route_index.0,
                });
            }
        }
        Ok(())
    }

    /// All routes in index order.
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    /// All trip patterns in index order.
    pub fn patterns(&self) -> &[TripPattern] {
        &self.patterns
    }

    /// Get a route by index.
    pub fn route(&self, index: RouteIndex) -> Option<&RouteInfo> {
        self.routes.get(index.0)
    }

    /// Get a trip pattern by index.
    pub fn pattern(&self, index: PatternIndex) -> Option<&TripPattern> {
        self.patterns.get(index.0)
    }

    /// Find a route by its GTFS route id.
    pub fn find_route(&self, route_id: &str) -> Option<RouteIndex> {
        self.routes
            .iter()
            .position(|r| r.route_id == route_id)
            .map(RouteIndex)
    }

    /// Returns the route a pattern runs on.
    pub fn route_for_pattern(&self, index: PatternIndex) -> Option<(RouteIndex, &RouteInfo)> {
        let pattern = self.pattern(index)?;
        self.route(pattern.route_index)
            .map(|route| (pattern.route_index, route))
    }
}
