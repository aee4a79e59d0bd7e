//! # Slotwell Testing
//!
//! Testing utilities for the slot booking service.
//!
//! This crate provides in-memory implementations of the environment traits
//! so the service can be exercised without a real document store or
//! delivery service:
//!
//! - [`mocks::FixedClock`]: deterministic time
//! - [`mocks::InMemorySlotStore`]: slot store with the same conditional
//!   atomic commit a production store provides
//! - [`mocks::RecordingNotificationSender`]: captures delivered messages
//! - [`mocks::FailingNotificationSender`] / [`mocks::FailingSlotStore`]:
//!   switchable failure injection
//!
//! ## Example
//!
//! ```ignore
//! use slotwell_core::BookingService;
//! use slotwell_testing::{mocks::{InMemorySlotStore, RecordingNotificationSender}, test_environment};
//! use std::sync::Arc;
//!
//! #[tokio::test]
//! async fn books_a_slot() {
//!     let store = Arc::new(InMemorySlotStore::new());
//!     store.insert_slot(available_slot("s1", "g1"));
//!     let sender = Arc::new(RecordingNotificationSender::new());
//!     let service = BookingService::new(test_environment(store.clone(), sender));
//!
//!     let confirmation = service.book_slot(request("s1", "g1")).await.unwrap();
//!     assert_eq!(store.booking_count(), 1);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use slotwell_core::environment::BookingEnvironment;
use std::sync::Arc;
use std::time::Duration;

/// Mock implementations of the environment traits.
pub mod mocks {
    use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
    use slotwell_core::environment::{
        Clock, EnvFuture, Notification, NotificationSender, SendError, SlotStore, StoreError,
    };
    use slotwell_core::types::{
        Booking, BookingId, DeliveryMode, Guide, GuideId, Slot, SlotId, DEFAULT_DURATION_MINUTES,
    };
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    /// Fixed clock for deterministic tests.
    ///
    /// Always returns the same time, making booking timestamps reproducible.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC).
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which should never
    /// happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Records held by the in-memory store. A single mutex guards all three
    /// maps, which is exactly what makes `commit_booking` atomic: the
    /// availability check and both writes happen under one lock.
    #[derive(Debug, Default)]
    struct StoreRecords {
        slots: HashMap<SlotId, Slot>,
        guides: HashMap<GuideId, Guide>,
        bookings: HashMap<BookingId, Booking>,
    }

    /// In-memory slot store for fast, deterministic tests and the
    /// development server.
    ///
    /// Provides the same contract a production document store adapter
    /// would: equality-filtered queries, per-document reads, identifier
    /// generation, and the conditional atomic booking commit.
    #[derive(Debug, Default)]
    pub struct InMemorySlotStore {
        records: Mutex<StoreRecords>,
    }

    impl InMemorySlotStore {
        /// Creates an empty store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a store pre-populated with the given slots.
        #[must_use]
        pub fn with_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
            let store = Self::new();
            for slot in slots {
                store.insert_slot(slot);
            }
            store
        }

        fn lock(&self) -> MutexGuard<'_, StoreRecords> {
            #[allow(clippy::unwrap_used)] // poisoned lock means a test already failed
            self.records.lock().unwrap()
        }

        /// Inserts or replaces a slot document.
        pub fn insert_slot(&self, slot: Slot) {
            self.lock().slots.insert(slot.id.clone(), slot);
        }

        /// Inserts or replaces a guide document.
        pub fn insert_guide(&self, guide: Guide) {
            self.lock().guides.insert(guide.id.clone(), guide);
        }

        /// Reads back a slot for assertions.
        #[must_use]
        pub fn slot(&self, id: &SlotId) -> Option<Slot> {
            self.lock().slots.get(id).cloned()
        }

        /// Reads back a booking for assertions.
        #[must_use]
        pub fn booking(&self, id: &BookingId) -> Option<Booking> {
            self.lock().bookings.get(id).cloned()
        }

        /// Number of booking records created so far.
        #[must_use]
        pub fn booking_count(&self) -> usize {
            self.lock().bookings.len()
        }
    }

    impl SlotStore for InMemorySlotStore {
        fn query_slots(&self, guide_id: &GuideId) -> EnvFuture<'_, Result<Vec<Slot>, StoreError>> {
            let guide_id = guide_id.clone();
            Box::pin(async move {
                let records = self.lock();
                Ok(records
                    .slots
                    .values()
                    .filter(|slot| slot.guide_id == guide_id)
                    .cloned()
                    .collect())
            })
        }

        fn get_slot(&self, id: &SlotId) -> EnvFuture<'_, Result<Option<Slot>, StoreError>> {
            let id = id.clone();
            Box::pin(async move { Ok(self.lock().slots.get(&id).cloned()) })
        }

        fn get_guide(&self, id: &GuideId) -> EnvFuture<'_, Result<Option<Guide>, StoreError>> {
            let id = id.clone();
            Box::pin(async move { Ok(self.lock().guides.get(&id).cloned()) })
        }

        fn new_booking_id(&self) -> BookingId {
            BookingId::generate()
        }

        fn commit_booking(
            &self,
            slot_id: SlotId,
            booking: Booking,
        ) -> EnvFuture<'_, Result<(), StoreError>> {
            Box::pin(async move {
                let mut records = self.lock();
                let Some(slot) = records.slots.get_mut(&slot_id) else {
                    return Err(StoreError::Conflict(slot_id));
                };
                if !slot.available {
                    return Err(StoreError::Conflict(slot_id));
                }
                slot.available = false;
                slot.booking_id = Some(booking.id.clone());
                records.bookings.insert(booking.id.clone(), booking);
                Ok(())
            })
        }
    }

    /// Store whose every operation fails, for exercising the error paths.
    #[derive(Debug, Default)]
    pub struct FailingSlotStore;

    impl FailingSlotStore {
        fn backend_error() -> StoreError {
            StoreError::Backend("injected store failure".to_string())
        }
    }

    impl SlotStore for FailingSlotStore {
        fn query_slots(&self, _guide_id: &GuideId) -> EnvFuture<'_, Result<Vec<Slot>, StoreError>> {
            Box::pin(async { Err(Self::backend_error()) })
        }

        fn get_slot(&self, _id: &SlotId) -> EnvFuture<'_, Result<Option<Slot>, StoreError>> {
            Box::pin(async { Err(Self::backend_error()) })
        }

        fn get_guide(&self, _id: &GuideId) -> EnvFuture<'_, Result<Option<Guide>, StoreError>> {
            Box::pin(async { Err(Self::backend_error()) })
        }

        fn new_booking_id(&self) -> BookingId {
            BookingId::generate()
        }

        fn commit_booking(
            &self,
            _slot_id: SlotId,
            _booking: Booking,
        ) -> EnvFuture<'_, Result<(), StoreError>> {
            Box::pin(async { Err(Self::backend_error()) })
        }
    }

    /// Sender that records every notification instead of delivering it.
    ///
    /// Dispatch runs on a detached task after the booking response is
    /// returned, so assertions use [`wait_for_sends`](Self::wait_for_sends)
    /// rather than reading immediately.
    #[derive(Debug, Default)]
    pub struct RecordingNotificationSender {
        sent: Mutex<Vec<Notification>>,
    }

    impl RecordingNotificationSender {
        /// Creates an empty recorder.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of the notifications recorded so far.
        #[must_use]
        pub fn sent(&self) -> Vec<Notification> {
            #[allow(clippy::unwrap_used)] // poisoned lock means a test already failed
            self.sent.lock().unwrap().clone()
        }

        /// Waits until at least `count` notifications have been recorded.
        ///
        /// Dispatch runs detached, so this polls with a short interval
        /// instead of racing a wakeup primitive.
        ///
        /// # Panics
        ///
        /// Panics when the count is not reached within five seconds, which
        /// keeps a missed dispatch from hanging the test suite.
        pub async fn wait_for_sends(&self, count: usize) -> Vec<Notification> {
            #[allow(clippy::expect_used)]
            tokio::time::timeout(std::time::Duration::from_secs(5), async {
                loop {
                    let sent = self.sent();
                    if sent.len() >= count {
                        return sent;
                    }
                    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                }
            })
            .await
            .expect("expected notifications were never sent")
        }
    }

    impl NotificationSender for RecordingNotificationSender {
        fn send(&self, notification: Notification) -> EnvFuture<'_, Result<(), SendError>> {
            Box::pin(async move {
                #[allow(clippy::unwrap_used)]
                self.sent.lock().unwrap().push(notification);
                Ok(())
            })
        }
    }

    /// Sender that fails every delivery, for isolation tests.
    #[derive(Debug, Default)]
    pub struct FailingNotificationSender {
        attempts: Mutex<usize>,
    }

    impl FailingNotificationSender {
        /// Creates a sender that rejects everything.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of deliveries attempted so far.
        #[must_use]
        pub fn attempts(&self) -> usize {
            #[allow(clippy::unwrap_used)]
            *self.attempts.lock().unwrap()
        }

        /// Waits until at least `count` deliveries have been attempted.
        ///
        /// # Panics
        ///
        /// Panics when the count is not reached within five seconds.
        pub async fn wait_for_attempts(&self, count: usize) {
            #[allow(clippy::expect_used)]
            tokio::time::timeout(std::time::Duration::from_secs(5), async {
                while self.attempts() < count {
                    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                }
            })
            .await
            .expect("expected delivery attempts never happened");
        }
    }

    impl NotificationSender for FailingNotificationSender {
        fn send(&self, _notification: Notification) -> EnvFuture<'_, Result<(), SendError>> {
            Box::pin(async move {
                {
                    #[allow(clippy::unwrap_used)]
                    let mut attempts = self.attempts.lock().unwrap();
                    *attempts += 1;
                }
                Err(SendError("injected delivery failure".to_string()))
            })
        }
    }

    /// Builds an available online slot for tests.
    #[must_use]
    pub fn available_slot(id: &str, guide_id: &str, date: NaiveDate, time: NaiveTime) -> Slot {
        Slot {
            id: SlotId::new(id),
            guide_id: GuideId::new(guide_id),
            mode: DeliveryMode::Online,
            date: Some(date),
            time: Some(time),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            available: true,
            plans: Vec::new(),
            booking_id: None,
        }
    }
}

/// Builds a booking environment around the given mocks with a fixed clock,
/// a test admin address, and a generous store deadline.
#[must_use]
pub fn test_environment(
    store: Arc<dyn slotwell_core::environment::SlotStore>,
    notifier: Arc<dyn slotwell_core::environment::NotificationSender>,
) -> BookingEnvironment {
    BookingEnvironment::new(
        Arc::new(mocks::test_clock()),
        store,
        notifier,
        "admin@slotwell.test",
        Duration::from_secs(5),
    )
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock};
