//! Slot availability query endpoint.
//!
//! - GET /api/slots?guide_id=&mode=&plan= lists a guide's matching slots
//!   in chronological order.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use slotwell_core::types::{SlotQuery, SlotView};

/// Response for the slot availability query.
#[derive(Debug, Serialize)]
pub struct SlotsResponse {
    /// Matching slots, ordered ascending by (date, time).
    pub slots: Vec<SlotView>,
}

/// List the slots matching the query parameters.
///
/// `guide_id` and `mode` are required; `plan` optionally narrows the result
/// to slots bookable under that plan. Mode matching is case-insensitive.
/// An empty list is a successful response, not an error.
///
/// # Example
///
/// ```bash
/// curl 'http://localhost:8080/api/slots?guide_id=g1&mode=online&plan=premium'
/// ```
///
/// Response:
/// ```json
/// {
///   "slots": [
///     {
///       "id": "s2",
///       "guide_id": "g1",
///       "mode": "online",
///       "date": "2024-04-30",
///       "time": "09:00:00",
///       "duration_minutes": 60,
///       "available": true,
///       "plans": [],
///       "booking_id": null
///     }
///   ]
/// }
/// ```
///
/// # Errors
///
/// - 400 `MISSING_PARAMETER` when `guide_id` or `mode` is absent;
/// - 500 `QUERY_FAILED` when the slot store read fails.
pub async fn list_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let slots = state.service.list_slots(query).await?;
    Ok(Json(SlotsResponse { slots }))
}
