//! Application state for the booking HTTP server.

use slotwell_core::BookingService;

/// Application state shared across all HTTP handlers.
///
/// It's cloned (cheaply, the service holds its dependencies behind `Arc`)
/// for each request.
#[derive(Clone)]
pub struct AppState {
    /// The booking service handling queries and booking transitions.
    pub service: BookingService,
}

impl AppState {
    /// Create a new application state around a wired service.
    #[must_use]
    pub const fn new(service: BookingService) -> Self {
        Self { service }
    }
}
