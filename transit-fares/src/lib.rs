//! Fare computation for a multimodal transit trip planner.
//!
//! Prices the transit rides of a search path under a configurable fare
//! policy and reports the transfer allowance the search uses to prune
//! dominated itineraries.

pub mod domain;
pub mod fares;
pub mod network;
pub mod web;
