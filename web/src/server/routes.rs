//! Router configuration for the booking service.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::{health_check, readiness_check};
use crate::api::{bookings, slots};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Build the complete Axum router.
///
/// Configures all routes:
/// - Health checks
/// - Slot availability query
/// - Slot booking
///
/// # Arguments
///
/// - `state`: Application state to share with handlers
///
/// # Returns
///
/// Configured Axum router ready to serve requests.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/slots", get(slots::list_slots))
        .route("/bookings", post(bookings::book_slot));

    Router::new()
        // Health checks
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // API routes under /api prefix
        .nest("/api", api_routes)
        .with_state(state)
}
