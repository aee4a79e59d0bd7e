//! # Slotwell Core
//!
//! Domain types, environment traits, and the booking service for the
//! slot booking system.
//!
//! The service composes two external collaborators, both injected behind
//! traits via [`environment::BookingEnvironment`]:
//!
//! - a **slot store**: a document database holding slot availability
//!   records, supporting equality-filtered queries, per-document reads,
//!   identifier generation, and a conditional atomic multi-document write;
//! - a **notification sender**: best-effort templated message delivery,
//!   explicitly outside the booking's consistency boundary.
//!
//! # Operations
//!
//! - [`service::BookingService::list_slots`]: validate, filter, and
//!   chronologically order a guide's available slots (read-only);
//! - [`service::BookingService::book_slot`]: atomically mark a slot
//!   unavailable and create its booking record, then detach best-effort
//!   notifications. The transaction is conditional on the slot's current
//!   availability, so concurrent attempts against the same slot resolve to
//!   exactly one winner.
//!
//! # Design Principles
//!
//! - Stateless invocations: no in-process shared mutable state; the slot
//!   store is the only shared resource.
//! - Dependency injection via the environment, never process-wide
//!   singletons, so tests substitute in-memory fakes.
//! - Atomicity delegated to the store's transactional primitive, never
//!   reimplemented with application-level locks.
//! - Side effects after commit are detached and best-effort; their failure
//!   never affects the committed booking.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod environment;
pub mod error;
pub mod service;
pub mod types;

pub use environment::{
    BookingEnvironment, Clock, Notification, NotificationSender, SendError, SlotStore, StoreError,
    SystemClock,
};
pub use error::Error;
pub use service::BookingService;
pub use types::{
    Booking, BookingConfirmation, BookingId, BookingRequest, BookingStatus, ContactDetails,
    DeliveryMode, Guide, GuideId, PlanId, Slot, SlotId, SlotQuery, SlotView, UserId,
};
