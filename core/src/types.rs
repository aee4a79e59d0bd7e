//! Domain types for the slot booking service.
//!
//! This module contains the value objects and entities shared by the query,
//! booking, and notification paths: identifiers, the `Slot` and `Booking`
//! records held in the slot store, and the request/response types accepted
//! by the service operations.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default session length applied when a slot does not carry one.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque identifier of a bookable slot.
///
/// Slot identifiers are assigned by the external provisioning process that
/// creates slot documents; this service never generates them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(String);

impl SlotId {
    /// Wraps a raw slot identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the guide who owns a slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuideId(String);

impl GuideId {
    /// Wraps a raw guide identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a plan a slot may be restricted to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(String);

impl PlanId {
    /// Wraps a raw plan identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the requesting user. Optional on bookings: anonymous
/// bookings carry no user identifier, only contact details.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Wraps a raw user identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier of a booking record.
///
/// Booking identifiers are never supplied by callers. They come from the
/// slot store's identifier facility (`SlotStore::new_booking_id`) so the
/// same value can be embedded in both the slot and the booking before the
/// transaction commits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(String);

impl BookingId {
    /// Wraps a raw booking identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh globally-unique booking identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Value Objects
// ============================================================================

/// How a session is delivered. Stored lowercase; query input is compared
/// case-insensitively against the serialized form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Remote session.
    Online,
    /// In-person session.
    Offline,
}

impl DeliveryMode {
    /// Returns the canonical lowercase form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact details of the person making a booking. All three fields are
/// required; validation happens in the service before any store access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    /// Full name.
    pub name: String,
    /// Email address notifications are sent to.
    pub email: String,
    /// Phone number.
    pub phone: String,
}

impl ContactDetails {
    /// Returns the name of the first blank field, if any.
    ///
    /// Used by booking validation to surface a precise `MissingParameter`.
    #[must_use]
    pub fn first_blank_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("user_details.name")
        } else if self.email.trim().is_empty() {
            Some("user_details.email")
        } else if self.phone.trim().is_empty() {
            Some("user_details.phone")
        } else {
            None
        }
    }
}

/// Lifecycle status of a booking. Only `Confirmed` is in scope: bookings
/// are created confirmed and never transition afterwards in this service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// The slot was claimed and the booking committed.
    Confirmed,
}

// ============================================================================
// Entities
// ============================================================================

/// A bookable (guide, date, time) unit with an availability flag.
///
/// Slots are created by an external provisioning process and mutated exactly
/// once by the booking transition; `available` never returns to `true`
/// through this service. `date` and `time` are optional because provisioned
/// documents occasionally omit or corrupt them; the query layer defines a
/// total order in which missing values sort last.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Opaque slot identifier.
    pub id: SlotId,
    /// Owning guide.
    pub guide_id: GuideId,
    /// Delivery mode.
    pub mode: DeliveryMode,
    /// Calendar date of the session.
    pub date: Option<NaiveDate>,
    /// Time of day of the session.
    pub time: Option<NaiveTime>,
    /// Session length in minutes.
    pub duration_minutes: u32,
    /// Whether the slot can still be booked.
    pub available: bool,
    /// Plans this slot is restricted to. Empty means unrestricted.
    #[serde(default)]
    pub plans: Vec<PlanId>,
    /// Reference to the booking that claimed this slot, once booked.
    pub booking_id: Option<BookingId>,
}

impl Slot {
    /// Whether the slot may be booked under the given plan.
    ///
    /// A slot with no plan restriction accepts every plan; a restricted slot
    /// accepts only the plans in its list.
    #[must_use]
    pub fn allows_plan(&self, plan: &PlanId) -> bool {
        self.plans.is_empty() || self.plans.contains(plan)
    }
}

/// A confirmed reservation record produced by successfully claiming a slot.
///
/// Created if and only if the paired slot's availability transition commits;
/// immutable afterwards within this service's scope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Store-generated unique identifier.
    pub id: BookingId,
    /// The slot this booking claimed.
    pub slot_id: SlotId,
    /// The guide delivering the session.
    pub guide_id: GuideId,
    /// Requesting user, absent for anonymous bookings.
    pub user_id: Option<UserId>,
    /// Contact details supplied with the booking.
    pub contact: ContactDetails,
    /// Plan selected by the caller, if any.
    pub plan: Option<PlanId>,
    /// Arbitrary session metadata supplied by the caller, stored verbatim.
    pub session: serde_json::Value,
    /// Booking status, `Confirmed` on creation.
    pub status: BookingStatus,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Guide record, read best-effort for notification content only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guide {
    /// Guide identifier.
    pub id: GuideId,
    /// Name shown in notification content.
    pub display_name: String,
    /// Organizer contact, when the guide has one.
    pub organizer_email: Option<String>,
}

// ============================================================================
// Operation Inputs & Outputs
// ============================================================================

/// Parameters of the slot availability query.
///
/// `guide_id` and `mode` are required; blank values count as absent. `plan`
/// optionally narrows the result to slots bookable under that plan.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SlotQuery {
    /// Required owning-guide filter.
    pub guide_id: Option<String>,
    /// Required delivery-mode filter, compared case-insensitively.
    pub mode: Option<String>,
    /// Optional plan filter.
    pub plan: Option<String>,
}

/// A booking intent submitted by a caller.
#[derive(Clone, Debug, Deserialize)]
pub struct BookingRequest {
    /// Slot to claim.
    pub slot_id: Option<String>,
    /// Guide delivering the session.
    pub guide_id: Option<String>,
    /// Requesting user, absent for anonymous bookings.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Contact details, required.
    #[serde(default)]
    pub user_details: Option<ContactDetails>,
    /// Selected plan, if any.
    #[serde(default)]
    pub plan: Option<String>,
    /// Arbitrary session metadata, stored verbatim on the booking.
    #[serde(default)]
    pub session: serde_json::Value,
}

/// Successful outcome of the booking transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BookingConfirmation {
    /// Identifier of the committed booking.
    pub booking_id: BookingId,
}

/// A slot as returned by the availability query: the slot entity with its
/// date already normalized to a plain calendar date (`YYYY-MM-DD`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlotView {
    /// Slot identifier.
    pub id: SlotId,
    /// Owning guide.
    pub guide_id: GuideId,
    /// Delivery mode.
    pub mode: DeliveryMode,
    /// Calendar date, serialized as `YYYY-MM-DD`.
    pub date: Option<NaiveDate>,
    /// Time of day.
    pub time: Option<NaiveTime>,
    /// Session length in minutes.
    pub duration_minutes: u32,
    /// Whether the slot can still be booked.
    pub available: bool,
    /// Plan restriction list, empty when unrestricted.
    pub plans: Vec<PlanId>,
    /// Booking reference, populated once booked.
    pub booking_id: Option<BookingId>,
}

impl From<Slot> for SlotView {
    fn from(slot: Slot) -> Self {
        Self {
            id: slot.id,
            guide_id: slot.guide_id,
            mode: slot.mode,
            date: slot.date,
            time: slot.time,
            duration_minutes: slot.duration_minutes,
            available: slot.available,
            plans: slot.plans,
            booking_id: slot.booking_id,
        }
    }
}
