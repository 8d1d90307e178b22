//! Transit mode of a route.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown transit mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transit mode: {0}")]
pub struct InvalidMode(String);

/// The vehicle type serving a route, following the GTFS `route_type` classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitMode {
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
}

impl TransitMode {
    /// Every mode, in GTFS `route_type` order.
    pub const ALL: [TransitMode; 8] = [
        TransitMode::Tram,
        TransitMode::Subway,
        TransitMode::Rail,
        TransitMode::Bus,
        TransitMode::Ferry,
        TransitMode::CableCar,
        TransitMode::Gondola,
        TransitMode::Funicular,
    ];

    /// Upper-case label, used as the fare type label under mode grouping.
    pub fn label(self) -> &'static str {
        match self {
            TransitMode::Tram => "TRAM",
            TransitMode::Subway => "SUBWAY",
            TransitMode::Rail => "RAIL",
            TransitMode::Bus => "BUS",
            TransitMode::Ferry => "FERRY",
            TransitMode::CableCar => "CABLE_CAR",
            TransitMode::Gondola => "GONDOLA",
            TransitMode::Funicular => "FUNICULAR",
        }
    }

    /// Maps a basic GTFS `route_type` code.
    pub fn from_gtfs_route_type(code: u16) -> Option<Self> {
        match code {
            0 => Some(TransitMode::Tram),
            1 => Some(TransitMode::Subway),
            2 => Some(TransitMode::Rail),
            3 => Some(TransitMode::Bus),
            4 => Some(TransitMode::Ferry),
            5 => Some(TransitMode::CableCar),
            6 => Some(TransitMode::Gondola),
            7 => Some(TransitMode::Funicular),
            _ => None,
        }
    }
}

impl FromStr for TransitMode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        TransitMode::ALL
            .into_iter()
            .find(|m| m.label() == upper)
            .ok_or_else(|| InvalidMode(s.to_string()))
    }
}

impl fmt::Display for TransitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
