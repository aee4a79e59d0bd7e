//! Slot booking endpoint.
//!
//! - POST /api/bookings atomically claims a slot and creates its booking
//!   record.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use slotwell_core::types::{BookingId, BookingRequest};

/// Response for a successful booking.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    /// Always `true` on the success path; errors use the shared error body.
    pub success: bool,
    /// Identifier of the committed booking.
    pub booking_id: BookingId,
}

/// Book a slot.
///
/// Claims the slot and creates the booking in one atomic store transaction,
/// conditional on the slot still being available. Notifications are
/// dispatched best-effort after the commit and never affect this response.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/bookings \
///   -H 'Content-Type: application/json' \
///   -d '{
///     "slot_id": "s1",
///     "guide_id": "g1",
///     "user_details": {"name": "A", "email": "a@x.com", "phone": "123"},
///     "session": {"title": "Morning flow"}
///   }'
/// ```
///
/// Response:
/// ```json
/// {"success": true, "booking_id": "7f9c0e9e-…"}
/// ```
///
/// # Errors
///
/// - 400 `MISSING_PARAMETER` when the slot id, guide id, or any contact
///   field is absent;
/// - 409 `SLOT_UNAVAILABLE` when a concurrent booking already claimed the
///   slot;
/// - 500 `BOOKING_FAILED` when the store transaction fails.
pub async fn book_slot(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let confirmation = state.service.book_slot(request).await?;
    Ok(Json(BookingResponse {
        success: true,
        booking_id: confirmation.booking_id,
    }))
}
