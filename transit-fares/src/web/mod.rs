//! Web layer for the fare service.
//!
//! Provides HTTP endpoints for quoting fares of ride sequences outside a
//! search.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, MAX_QUOTE_LEGS, create_router};
pub use state::AppState;
