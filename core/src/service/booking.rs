//! The slot booking transition.
//!
//! Atomically claims a slot and creates the booking record through the
//! store's conditional transaction, then detaches notification dispatch.
//! The transaction is conditional on the slot's current availability, so
//! two concurrent attempts against the same slot cannot both succeed.

use super::{notify, optional, required, BookingService};
use crate::environment::StoreError;
use crate::error::Error;
use crate::types::{
    Booking, BookingConfirmation, BookingRequest, BookingStatus, GuideId, PlanId, SlotId, UserId,
};

impl BookingService {
    /// Reserves the requested slot and creates its booking record.
    ///
    /// Validation happens before any store access or side effect. The
    /// booking identifier is generated before the transaction commits so it
    /// can be embedded in both the slot's booking reference and the booking
    /// record. On commit, notification dispatch is handed to a detached
    /// task and the confirmation is returned regardless of notification
    /// outcome.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingParameter`] when the slot identifier, guide
    ///   identifier, or any contact field is absent or blank;
    /// - [`Error::SlotUnavailable`] when a concurrent attempt already
    ///   claimed the slot (or the slot does not exist);
    /// - [`Error::BookingFailed`] when the store transaction fails or times
    ///   out; no partial state is visible.
    pub async fn book_slot(&self, request: BookingRequest) -> Result<BookingConfirmation, Error> {
        let slot_id = SlotId::new(required(request.slot_id, "slot_id")?);
        let guide_id = GuideId::new(required(request.guide_id, "guide_id")?);
        let contact = request
            .user_details
            .ok_or(Error::missing("user_details"))?;
        if let Some(field) = contact.first_blank_field() {
            return Err(Error::MissingParameter { name: field });
        }

        let booking_id = self.env.store.new_booking_id();
        let now = self.env.clock.now();
        let booking = Booking {
            id: booking_id.clone(),
            slot_id: slot_id.clone(),
            guide_id,
            user_id: optional(request.user_id).map(UserId::new),
            contact,
            plan: optional(request.plan).map(PlanId::new),
            session: request.session,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };

        match self
            .with_timeout(self.env.store.commit_booking(slot_id.clone(), booking.clone()))
            .await
        {
            Ok(()) => {}
            Err(StoreError::Conflict(_)) => {
                tracing::info!(slot_id = %slot_id, "booking lost availability race");
                return Err(Error::SlotUnavailable { slot_id });
            }
            Err(err) => return Err(Error::BookingFailed(err)),
        }

        tracing::info!(
            booking_id = %booking.id,
            slot_id = %booking.slot_id,
            guide_id = %booking.guide_id,
            "booking committed"
        );

        // Detached on purpose: delivery failures must never roll back or
        // delay the already-committed booking.
        let env = self.env.clone();
        let committed = booking.clone();
        tokio::spawn(async move {
            notify::dispatch(&env, &committed).await;
        });

        Ok(BookingConfirmation { booking_id })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::{environment, slot, StubSender, StubStore};
    use super::*;
    use crate::types::ContactDetails;
    use std::sync::atomic::Ordering as AtomicOrdering;
    use std::sync::Arc;

    fn request(slot_id: &str, guide_id: &str) -> BookingRequest {
        BookingRequest {
            slot_id: Some(slot_id.to_string()),
            guide_id: Some(guide_id.to_string()),
            user_id: Some("u1".to_string()),
            user_details: Some(ContactDetails {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                phone: "123".to_string(),
            }),
            plan: None,
            session: serde_json::json!({"topic": "breathwork"}),
        }
    }

    #[tokio::test]
    async fn booking_an_available_slot_returns_a_confirmation() {
        let store = Arc::new(StubStore::with_slots([slot(
            "s1",
            "g1",
            (2024, 5, 1),
            (10, 0),
        )]));
        let service = BookingService::new(environment(store.clone(), Arc::<StubSender>::default()));

        let confirmation = service.book_slot(request("s1", "g1")).await.unwrap();

        assert!(!confirmation.booking_id.as_str().is_empty());
        let slots = store.slots.lock().unwrap();
        let booked = slots.get(&SlotId::new("s1")).unwrap();
        assert!(!booked.available);
        assert_eq!(booked.booking_id.as_ref(), Some(&confirmation.booking_id));
        let bookings = store.bookings.lock().unwrap();
        assert_eq!(bookings.len(), 1);
        assert!(bookings.contains_key(&confirmation.booking_id));
    }

    #[tokio::test]
    async fn missing_slot_id_is_rejected_before_any_store_write() {
        let store = Arc::new(StubStore::with_slots([slot(
            "s1",
            "g1",
            (2024, 5, 1),
            (10, 0),
        )]));
        let service = BookingService::new(environment(store.clone(), Arc::<StubSender>::default()));

        let mut req = request("s1", "g1");
        req.slot_id = None;
        let result = service.book_slot(req).await;

        assert!(matches!(
            result,
            Err(Error::MissingParameter { name: "slot_id" })
        ));
        assert_eq!(store.commit_calls.load(AtomicOrdering::SeqCst), 0);
        assert!(store.bookings.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn absent_contact_details_are_rejected() {
        let store = Arc::new(StubStore::with_slots([slot(
            "s1",
            "g1",
            (2024, 5, 1),
            (10, 0),
        )]));
        let service = BookingService::new(environment(store.clone(), Arc::<StubSender>::default()));

        let mut req = request("s1", "g1");
        req.user_details = None;
        let result = service.book_slot(req).await;

        assert!(matches!(
            result,
            Err(Error::MissingParameter { name: "user_details" })
        ));
        assert_eq!(store.commit_calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_contact_field_is_rejected_with_its_name() {
        let store = Arc::new(StubStore::with_slots([slot(
            "s1",
            "g1",
            (2024, 5, 1),
            (10, 0),
        )]));
        let service = BookingService::new(environment(store.clone(), Arc::<StubSender>::default()));

        let mut req = request("s1", "g1");
        if let Some(contact) = req.user_details.as_mut() {
            contact.phone = String::new();
        }
        let result = service.book_slot(req).await;

        assert!(matches!(
            result,
            Err(Error::MissingParameter {
                name: "user_details.phone"
            })
        ));
        assert_eq!(store.commit_calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn booking_an_already_claimed_slot_fails_with_slot_unavailable() {
        let mut claimed = slot("s1", "g1", (2024, 5, 1), (10, 0));
        claimed.available = false;
        let store = Arc::new(StubStore::with_slots([claimed]));
        let service = BookingService::new(environment(store.clone(), Arc::<StubSender>::default()));

        let result = service.book_slot(request("s1", "g1")).await;

        assert!(matches!(result, Err(Error::SlotUnavailable { .. })));
        assert!(store.bookings.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_commit_failure_surfaces_as_booking_failed() {
        let store = Arc::new(StubStore {
            fail_commits: true,
            ..StubStore::with_slots([slot("s1", "g1", (2024, 5, 1), (10, 0))])
        });
        let service = BookingService::new(environment(store, Arc::<StubSender>::default()));

        let result = service.book_slot(request("s1", "g1")).await;

        assert!(matches!(result, Err(Error::BookingFailed(_))));
    }

    #[tokio::test]
    async fn anonymous_booking_without_user_id_succeeds() {
        let store = Arc::new(StubStore::with_slots([slot(
            "s1",
            "g1",
            (2024, 5, 1),
            (10, 0),
        )]));
        let service = BookingService::new(environment(store.clone(), Arc::<StubSender>::default()));

        let mut req = request("s1", "g1");
        req.user_id = None;
        let confirmation = service.book_slot(req).await.unwrap();

        let bookings = store.bookings.lock().unwrap();
        let booking = bookings.get(&confirmation.booking_id).unwrap();
        assert!(booking.user_id.is_none());
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }
}
