//! Application state for the web layer.

use std::sync::Arc;

use crate::fares::FarePolicy;

/// Shared application state.
///
/// The fare policy is immutable once built, so handlers share it without
/// locking.
#[derive(Clone)]
pub struct AppState {
    /// Configured fare policy
    pub policy: Arc<FarePolicy>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(policy: FarePolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }
}
