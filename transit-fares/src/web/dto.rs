//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::fares::{FareBreakdown, LegFare, TransferAllowance};

/// A ride to be priced.
#[derive(Debug, Deserialize)]
pub struct QuoteLegRequest {
    /// Trip pattern index in the loaded network
    pub pattern: usize,

    /// Boarding time in HH:MM[:SS] format
    pub board_time: String,
}

/// Request to price a sequence of rides.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    /// Rides in travel order
    pub legs: Vec<QuoteLegRequest>,

    /// Latest useful time of the trip, in HH:MM[:SS] format
    #[serde(default)]
    pub horizon: Option<String>,
}

/// A priced ride.
#[derive(Debug, Serialize)]
pub struct QuoteLegResult {
    pub pattern: usize,

    pub board_time: String,

    /// Fare of the trip up to and including this ride, in cents
    pub cumulative_fare: i64,
}

impl QuoteLegResult {
    pub fn from_leg_fare(leg: &LegFare) -> Self {
        Self {
            pattern: leg.leg.pattern.0,
            board_time: leg.leg.board_time.to_string(),
            cumulative_fare: leg.cumulative_fare.0,
        }
    }
}

/// Transfer allowance carried by a quoted trip.
#[derive(Debug, Serialize)]
pub struct AllowanceResult {
    /// Fare type index the allowance applies to
    pub fare_type: Option<usize>,

    /// Maximum remaining saving, in cents
    pub value: i64,

    pub number_remaining: u32,

    /// Last time the allowance can be used
    pub expiration: String,
}

impl AllowanceResult {
    pub fn from_allowance(allowance: &TransferAllowance) -> Self {
        Self {
            fare_type: allowance.fare_type().map(|t| t.0),
            value: allowance.value().0,
            number_remaining: allowance.number_remaining(),
            expiration: allowance.expiration().to_string(),
        }
    }
}

/// Response for a fare quote.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub legs: Vec<QuoteLegResult>,

    /// Total fare in cents
    pub total_fare: i64,

    pub allowance: AllowanceResult,
}

impl QuoteResponse {
    pub fn from_breakdown(breakdown: &FareBreakdown) -> Self {
        Self {
            legs: breakdown
                .legs
                .iter()
                .map(QuoteLegResult::from_leg_fare)
                .collect(),
            total_fare: breakdown.total_fare.0,
            allowance: AllowanceResult::from_allowance(&breakdown.allowance),
        }
    }
}

/// Response describing the configured policy.
#[derive(Debug, Serialize)]
pub struct PolicyResponse {
    pub policy: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
