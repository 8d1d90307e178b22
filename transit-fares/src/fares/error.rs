//! Fare module error types.
//!
//! Configuration errors abort fare structure construction. Runtime errors
//! abort the enclosing search rather than produce a wrong fare.

use crate::domain::InvalidAmount;
use crate::network::NetworkError;

/// Errors from building fare structures or pricing paths.
#[derive(Debug, thiserror::Error)]
pub enum FareError {
    /// Failed to read or write a fare document
    #[error("failed to access fare file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Fare document JSON was malformed
    #[error("invalid fare JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Network catalogue could not be loaded
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A money amount was negative
    #[error("negative fare in {field}")]
    NegativeFare { field: String },

    /// A money amount could not be converted to cents
    #[error("invalid amount in {field}: {source}")]
    InvalidAmount {
        field: String,
        #[source]
        source: InvalidAmount,
    },

    /// Fare cap was neither a finite amount nor "unbounded"
    #[error("invalid fare cap: {0}")]
    InvalidFareCap(String),

    /// A fare type label is not defined
    #[error("unknown fare type: {0}")]
    UnknownFareType(String),

    /// A route id is not in the network
    #[error("unknown route: {0}")]
    UnknownRoute(String),

    /// An agency id is not in the network
    #[error("unknown agency: {0}")]
    UnknownAgency(String),

    /// Transfer window was negative
    #[error("invalid transfer time allowance: {0} seconds")]
    InvalidTransferWindow(i64),

    /// Fare structure tables are inconsistent with each other
    #[error("inconsistent fare structure: {0}")]
    Inconsistent(String),

    /// A priced leg runs on a pattern with no resolved fare
    #[error("no fare resolved for pattern {0}")]
    UnresolvedPattern(usize),
}

impl FareError {
    pub(crate) fn amount(field: impl Into<String>, source: InvalidAmount) -> Self {
        let field = field.into();
        match source {
            InvalidAmount::Negative(_) => FareError::NegativeFare { field },
            other => FareError::InvalidAmount {
                field,
                source: other,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FareError::UnknownFareType("FERRY".into());
        assert_eq!(err.to_string(), "unknown fare type: FERRY");

        let err = FareError::UnresolvedPattern(12);
        assert_eq!(err.to_string(), "no fare resolved for pattern 12");

        let err = FareError::InvalidFareCap("lots".into());
        assert_eq!(err.to_string(), "invalid fare cap: lots");

        let err = FareError::InvalidTransferWindow(-5);
        assert_eq!(err.to_string(), "invalid transfer time allowance: -5 seconds");
    }

    #[test]
    fn negative_amount_maps_to_negative_fare() {
        let err = FareError::amount("base_fare", InvalidAmount::Negative(-1.0));
        assert!(matches!(err, FareError::NegativeFare { ref field } if field == "base_fare"));
        assert_eq!(err.to_string(), "negative fare in base_fare");

        let err = FareError::amount("fare_cap", InvalidAmount::NotFinite(f64::NAN));
        assert!(matches!(err, FareError::InvalidAmount { .. }));
    }
}
