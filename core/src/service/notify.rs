//! Best-effort notification dispatch for committed bookings.
//!
//! Runs strictly after the booking transaction has committed, outside its
//! consistency boundary: every assembly or delivery error is caught, logged,
//! and swallowed here, and the individual sends are independent of each
//! other. Content assembly reads the slot and guide records best-effort and
//! substitutes defaults when either is missing.

use crate::environment::{BookingEnvironment, Notification};
use crate::types::{Booking, Guide, Slot, DEFAULT_DURATION_MINUTES};
use futures::future::join_all;
use serde_json::json;

/// Session title used when the slot record cannot be read.
const DEFAULT_SESSION_TITLE: &str = "Wellness session";

/// Template rendered for the booking user.
const TEMPLATE_USER: &str = "booking-confirmation-user";
/// Template rendered for the guide's organizer.
const TEMPLATE_ORGANIZER: &str = "booking-confirmation-organizer";
/// Template rendered for the administrative copy.
const TEMPLATE_ADMIN: &str = "booking-confirmation-admin";

/// Delivers up to three notifications for a committed booking: user,
/// organizer (when the guide has one), and the configured admin address.
pub(crate) async fn dispatch(env: &BookingEnvironment, booking: &Booking) {
    let slot = read_slot(env, booking).await;
    let guide = read_guide(env, booking).await;
    let data = template_data(booking, slot.as_ref(), guide.as_ref());

    let guide_name = guide
        .as_ref()
        .map_or_else(|| booking.guide_id.to_string(), |g| g.display_name.clone());

    let mut outgoing = vec![
        Notification {
            to: booking.contact.email.clone(),
            subject: "Your session is booked".to_string(),
            template: TEMPLATE_USER.to_string(),
            data: data.clone(),
        },
        Notification {
            to: env.admin_email.clone(),
            subject: "New booking recorded".to_string(),
            template: TEMPLATE_ADMIN.to_string(),
            data: data.clone(),
        },
    ];
    if let Some(organizer) = guide.and_then(|g| g.organizer_email) {
        outgoing.push(Notification {
            to: organizer,
            subject: format!("New booking for {guide_name}"),
            template: TEMPLATE_ORGANIZER.to_string(),
            data,
        });
    }

    // Independent best-effort sends: one failure never prevents the others.
    join_all(outgoing.into_iter().map(|n| send_logged(env, n))).await;
}

/// Sends one notification, logging and swallowing any failure.
async fn send_logged(env: &BookingEnvironment, notification: Notification) {
    let to = notification.to.clone();
    let template = notification.template.clone();
    if let Err(err) = env.notifier.send(notification).await {
        tracing::warn!(to = %to, template = %template, error = %err, "notification delivery failed");
    }
}

/// Best-effort slot lookup for display content.
async fn read_slot(env: &BookingEnvironment, booking: &Booking) -> Option<Slot> {
    match env.store.get_slot(&booking.slot_id).await {
        Ok(slot) => slot,
        Err(err) => {
            tracing::warn!(slot_id = %booking.slot_id, error = %err, "slot lookup failed during dispatch");
            None
        }
    }
}

/// Best-effort guide lookup for display content.
async fn read_guide(env: &BookingEnvironment, booking: &Booking) -> Option<Guide> {
    match env.store.get_guide(&booking.guide_id).await {
        Ok(guide) => guide,
        Err(err) => {
            tracing::warn!(guide_id = %booking.guide_id, error = %err, "guide lookup failed during dispatch");
            None
        }
    }
}

/// Assembles the template substitution data, substituting documented
/// defaults for anything the best-effort lookups could not provide.
fn template_data(booking: &Booking, slot: Option<&Slot>, guide: Option<&Guide>) -> serde_json::Value {
    let session_title = booking
        .session
        .get("title")
        .and_then(serde_json::Value::as_str)
        .unwrap_or(DEFAULT_SESSION_TITLE);
    json!({
        "booking_id": booking.id.as_str(),
        "user_name": booking.contact.name,
        "guide_name": guide.map_or(booking.guide_id.as_str(), |g| g.display_name.as_str()),
        "session_title": session_title,
        "date": slot.and_then(|s| s.date),
        "time": slot.and_then(|s| s.time),
        "duration_minutes": slot.map_or(DEFAULT_DURATION_MINUTES, |s| s.duration_minutes),
        "mode": slot.map(|s| s.mode),
        "plan": booking.plan.as_ref().map(|p| p.as_str()),
    })
}
