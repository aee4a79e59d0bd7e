//! Environment traits: the injected dependencies of the booking service.
//!
//! Every external collaborator is abstracted behind a trait and injected via
//! [`BookingEnvironment`], never reached through a process-wide singleton.
//! This keeps the service stateless between invocations (the slot store is
//! the only shared mutable resource) and lets tests substitute in-memory
//! implementations.
//!
//! # Dyn Compatibility
//!
//! The async traits here use explicit `Pin<Box<dyn Future>>` returns instead
//! of `async fn` so they can be held as trait objects (`Arc<dyn SlotStore>`)
//! and captured by detached notification tasks.

use crate::types::{Booking, BookingId, Guide, GuideId, Slot, SlotId};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Boxed future returned by environment trait methods.
pub type EnvFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ============================================================================
// Clock
// ============================================================================

/// Abstracts time so booking timestamps are testable.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ============================================================================
// Slot Store
// ============================================================================

/// Errors reported by a slot store implementation.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// The atomic write's availability condition failed: the slot was no
    /// longer available when the transaction ran. Exactly one of any set of
    /// concurrent booking attempts avoids this error.
    #[error("availability condition failed for slot {0}")]
    Conflict(SlotId),

    /// The store did not answer within the configured deadline.
    #[error("store operation timed out")]
    Timeout,

    /// Connection or backend failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// External document store holding slot, booking, and guide records.
///
/// The store must provide equality-filtered queries, per-document reads,
/// identifier generation, and a conditional atomic multi-document write.
/// Atomicity of the booking transition is delegated entirely to
/// [`commit_booking`](SlotStore::commit_booking); the service never layers
/// application-level locks on top.
///
/// # Implementations
///
/// - `InMemorySlotStore` (in `slotwell-testing`): deterministic testing and
///   the development server.
/// - A production document database adapter implements this trait out of
///   tree; only the contract matters here.
pub trait SlotStore: Send + Sync {
    /// Loads every slot owned by the given guide.
    ///
    /// Returns an empty vector when the guide has no slots; new guides
    /// start empty, that is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` when the read fails.
    fn query_slots(&self, guide_id: &GuideId) -> EnvFuture<'_, Result<Vec<Slot>, StoreError>>;

    /// Reads a single slot by identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` when the read fails. A missing slot is
    /// `Ok(None)`, not an error.
    fn get_slot(&self, id: &SlotId) -> EnvFuture<'_, Result<Option<Slot>, StoreError>>;

    /// Reads a single guide record by identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` when the read fails. A missing guide is
    /// `Ok(None)`, not an error.
    fn get_guide(&self, id: &GuideId) -> EnvFuture<'_, Result<Option<Guide>, StoreError>>;

    /// Generates a booking identifier without touching stored state.
    ///
    /// Called before the transaction commits so the same identifier can be
    /// embedded in both the slot's booking reference and the booking record.
    fn new_booking_id(&self) -> BookingId;

    /// Atomically claims `slot_id` and creates `booking`, conditional on the
    /// slot currently being available.
    ///
    /// In a single atomic unit the store must:
    ///
    /// 1. assert the slot exists and `available` is `true`;
    /// 2. set `available` to `false` and the slot's booking reference to
    ///    `booking.id`;
    /// 3. create the booking record.
    ///
    /// Either all three become visible to subsequent readers or none do.
    /// Under concurrent invocations for the same slot, at most one call
    /// succeeds.
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict` when the slot is missing or already claimed
    ///   (the availability condition failed);
    /// - `StoreError::Backend` when the transaction cannot be applied.
    fn commit_booking(
        &self,
        slot_id: SlotId,
        booking: Booking,
    ) -> EnvFuture<'_, Result<(), StoreError>>;
}

// ============================================================================
// Notification Sender
// ============================================================================

/// Delivery failure reported by a notification sender.
#[derive(Error, Debug, Clone)]
#[error("notification delivery failed: {0}")]
pub struct SendError(pub String);

/// A templated message addressed to a single recipient.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Notification {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Name of the template the sender renders.
    pub template: String,
    /// Template substitution data.
    pub data: serde_json::Value,
}

/// External best-effort message delivery service.
///
/// Delivery is asynchronous and opaque to this subsystem: a returned error
/// is logged and swallowed at the dispatch boundary, never surfaced to the
/// booking caller.
pub trait NotificationSender: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns `SendError` when delivery fails. Failures are tolerated; the
    /// caller treats each send independently.
    fn send(&self, notification: Notification) -> EnvFuture<'_, Result<(), SendError>>;
}

// ============================================================================
// Environment
// ============================================================================

/// Bundled dependencies and settings injected into the booking service.
///
/// Cloning is cheap (every dependency is behind an `Arc`), which lets the
/// notification dispatch task capture its own handle after the booking
/// transaction commits.
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Time source for booking timestamps.
    pub clock: Arc<dyn Clock>,
    /// The slot store, sole shared mutable resource.
    pub store: Arc<dyn SlotStore>,
    /// Best-effort notification delivery.
    pub notifier: Arc<dyn NotificationSender>,
    /// Administrative address copied on every booking notification.
    pub admin_email: String,
    /// Deadline applied to each store round-trip.
    pub store_timeout: Duration,
}

impl BookingEnvironment {
    /// Creates a new environment.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        store: Arc<dyn SlotStore>,
        notifier: Arc<dyn NotificationSender>,
        admin_email: impl Into<String>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            clock,
            store,
            notifier,
            admin_email: admin_email.into(),
            store_timeout,
        }
    }
}
