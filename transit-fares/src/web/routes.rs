//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{debug, error, warn};

use crate::domain::{ClockTime, TimeError};
use crate::fares::{FareCalculator, FareError, TransitLeg};
use crate::network::PatternIndex;

use super::dto::*;
use super::state::AppState;

/// Horizon used when a quote does not name one.
const OPEN_HORIZON: ClockTime = ClockTime::from_seconds(i32::MAX);

/// Most rides accepted in one quote request.
pub const MAX_QUOTE_LEGS: usize = 64;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/fare/policy", get(policy))
        .route("/fare/quote", post(quote))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Name of the configured fare policy.
async fn policy(State(state): State<AppState>) -> Json<PolicyResponse> {
    Json(PolicyResponse {
        policy: state.policy.policy_name().to_string(),
    })
}

fn parse_time(field: &str, value: &str) -> Result<ClockTime, AppError> {
    ClockTime::parse_hms(value).map_err(|e: TimeError| AppError::BadRequest {
        message: format!("Invalid {field} {value:?}: {e}"),
    })
}

/// Price a sequence of rides.
async fn quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    if req.legs.len() > MAX_QUOTE_LEGS {
        return Err(AppError::BadRequest {
            message: format!(
                "Too many legs: {} (at most {MAX_QUOTE_LEGS})",
                req.legs.len()
            ),
        });
    }

    let legs = req
        .legs
        .iter()
        .map(|leg| {
            Ok(TransitLeg::new(
                PatternIndex(leg.pattern),
                parse_time("board_time", &leg.board_time)?,
            ))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let horizon = match &req.horizon {
        Some(h) => parse_time("horizon", h)?,
        None => OPEN_HORIZON,
    };

    let breakdown = state.policy.fare_breakdown(&legs, horizon)?;
    debug!(
        legs = legs.len(),
        total_fare = breakdown.total_fare.0,
        "quoted fare"
    );

    Ok(Json(QuoteResponse::from_breakdown(&breakdown)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<FareError> for AppError {
    fn from(e: FareError) -> Self {
        match e {
            FareError::UnresolvedPattern(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(%message, "rejected fare request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Internal { message } => {
                error!(%message, "fare request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
