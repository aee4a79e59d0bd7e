//! Booking flow integration tests.
//!
//! Exercises the booking service end to end against the in-memory
//! environment: the full query → book → notify flow, the concurrency
//! guarantee of the conditional commit, and the isolation of notification
//! failures from the booking result.
//!
//! Run with: `cargo test --test booking_flow_test`

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, NaiveTime};
use slotwell_core::types::{BookingRequest, ContactDetails, Guide, GuideId, SlotId, SlotQuery};
use slotwell_core::{BookingService, Error};
use slotwell_testing::mocks::{
    available_slot, FailingNotificationSender, InMemorySlotStore, RecordingNotificationSender,
};
use slotwell_testing::test_environment;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn contact() -> ContactDetails {
    ContactDetails {
        name: "A".to_string(),
        email: "a@x.com".to_string(),
        phone: "123".to_string(),
    }
}

fn booking_request(slot_id: &str, guide_id: &str) -> BookingRequest {
    BookingRequest {
        slot_id: Some(slot_id.to_string()),
        guide_id: Some(guide_id.to_string()),
        user_id: Some("u1".to_string()),
        user_details: Some(contact()),
        plan: None,
        session: serde_json::json!({"title": "Evening meditation"}),
    }
}

/// The concrete query scenario: two online slots for g1 come back in
/// chronological order regardless of insertion order, with a mixed-case
/// mode input.
#[tokio::test]
async fn query_returns_slots_in_chronological_order() {
    let store = Arc::new(InMemorySlotStore::with_slots([
        available_slot("s1", "g1", date(2024, 5, 1), time(10, 0)),
        available_slot("s2", "g1", date(2024, 4, 30), time(9, 0)),
    ]));
    let service = BookingService::new(test_environment(
        store,
        Arc::new(RecordingNotificationSender::new()),
    ));

    let slots = service
        .list_slots(SlotQuery {
            guide_id: Some("g1".to_string()),
            mode: Some("Online".to_string()),
            plan: None,
        })
        .await
        .unwrap();

    let ids: Vec<&str> = slots.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["s2", "s1"]);
}

/// The concrete booking scenario: booking an available slot returns a
/// non-empty booking identifier, and the slot afterwards reads unavailable
/// with a populated booking reference.
#[tokio::test]
async fn booking_claims_the_slot_and_creates_the_record() {
    let store = Arc::new(InMemorySlotStore::with_slots([available_slot(
        "s1",
        "g1",
        date(2024, 5, 1),
        time(10, 0),
    )]));
    let service = BookingService::new(test_environment(
        store.clone(),
        Arc::new(RecordingNotificationSender::new()),
    ));

    let confirmation = service.book_slot(booking_request("s1", "g1")).await.unwrap();

    assert!(!confirmation.booking_id.as_str().is_empty());
    let slot = store.slot(&SlotId::new("s1")).unwrap();
    assert!(!slot.available);
    assert_eq!(slot.booking_id, Some(confirmation.booking_id.clone()));
    let booking = store.booking(&confirmation.booking_id).unwrap();
    assert_eq!(booking.slot_id, SlotId::new("s1"));
}

/// Two concurrent attempts on the same slot: exactly one succeeds, the
/// loser observes `SlotUnavailable`, and exactly one booking record exists
/// tied to the winning transition.
#[tokio::test]
async fn concurrent_bookings_of_one_slot_resolve_to_one_winner() {
    for _ in 0..25 {
        let store = Arc::new(InMemorySlotStore::with_slots([available_slot(
            "s1",
            "g1",
            date(2024, 5, 1),
            time(10, 0),
        )]));
        let service = BookingService::new(test_environment(
            store.clone(),
            Arc::new(RecordingNotificationSender::new()),
        ));

        let first = tokio::spawn({
            let service = service.clone();
            async move { service.book_slot(booking_request("s1", "g1")).await }
        });
        let second = tokio::spawn({
            let service = service.clone();
            async move { service.book_slot(booking_request("s1", "g1")).await }
        });

        let (first, second) = (first.await.unwrap(), second.await.unwrap());
        let wins = usize::from(first.is_ok()) + usize::from(second.is_ok());
        assert_eq!(wins, 1, "exactly one attempt must win");
        let loser = if first.is_ok() { second } else { first };
        assert!(matches!(loser, Err(Error::SlotUnavailable { .. })));

        assert_eq!(store.booking_count(), 1);
        let slot = store.slot(&SlotId::new("s1")).unwrap();
        assert!(!slot.available);
        assert!(slot.booking_id.is_some());
    }
}

/// Many contenders, one slot: the invariant holds beyond the pairwise case.
#[tokio::test]
async fn ten_contenders_produce_exactly_one_booking() {
    let store = Arc::new(InMemorySlotStore::with_slots([available_slot(
        "s1",
        "g1",
        date(2024, 5, 1),
        time(10, 0),
    )]));
    let service = BookingService::new(test_environment(
        store.clone(),
        Arc::new(RecordingNotificationSender::new()),
    ));

    let attempts: Vec<_> = (0..10)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.book_slot(booking_request("s1", "g1")).await })
        })
        .collect();

    let mut wins = 0;
    for attempt in attempts {
        if attempt.await.unwrap().is_ok() {
            wins += 1;
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(store.booking_count(), 1);
}

/// Notification dispatch failing for every recipient must not affect the
/// already-committed booking: the caller still gets its confirmation.
#[tokio::test]
async fn notification_failures_never_fail_the_booking() {
    let store = Arc::new(InMemorySlotStore::with_slots([available_slot(
        "s1",
        "g1",
        date(2024, 5, 1),
        time(10, 0),
    )]));
    let sender = Arc::new(FailingNotificationSender::new());
    let service = BookingService::new(test_environment(store.clone(), sender.clone()));

    let confirmation = service.book_slot(booking_request("s1", "g1")).await.unwrap();

    assert!(!confirmation.booking_id.as_str().is_empty());
    assert_eq!(store.booking_count(), 1);
    // The detached dispatch still attempted both best-effort sends.
    sender.wait_for_attempts(2).await;
}

/// A committed booking notifies the user, the admin address, and, when the
/// guide record carries an organizer contact, the organizer.
#[tokio::test]
async fn booking_notifies_user_admin_and_organizer() {
    let store = Arc::new(InMemorySlotStore::with_slots([available_slot(
        "s1",
        "g1",
        date(2024, 5, 1),
        time(10, 0),
    )]));
    store.insert_guide(Guide {
        id: GuideId::new("g1"),
        display_name: "Guide One".to_string(),
        organizer_email: Some("organizer@x.com".to_string()),
    });
    let sender = Arc::new(RecordingNotificationSender::new());
    let service = BookingService::new(test_environment(store, sender.clone()));

    let confirmation = service.book_slot(booking_request("s1", "g1")).await.unwrap();

    let sent = sender.wait_for_sends(3).await;
    let recipients: Vec<&str> = sent.iter().map(|n| n.to.as_str()).collect();
    assert!(recipients.contains(&"a@x.com"));
    assert!(recipients.contains(&"admin@slotwell.test"));
    assert!(recipients.contains(&"organizer@x.com"));
    for notification in &sent {
        assert_eq!(notification.data["booking_id"], confirmation.booking_id.as_str());
        assert_eq!(notification.data["guide_name"], "Guide One");
        assert_eq!(notification.data["date"], "2024-05-01");
    }
}

/// Booking a slot that was already claimed in a previous request fails with
/// `SlotUnavailable` and leaves the original booking untouched.
#[tokio::test]
async fn sequential_double_booking_fails_cleanly() {
    let store = Arc::new(InMemorySlotStore::with_slots([available_slot(
        "s1",
        "g1",
        date(2024, 5, 1),
        time(10, 0),
    )]));
    let service = BookingService::new(test_environment(
        store.clone(),
        Arc::new(RecordingNotificationSender::new()),
    ));

    let first = service.book_slot(booking_request("s1", "g1")).await.unwrap();
    let second = service.book_slot(booking_request("s1", "g1")).await;

    assert!(matches!(second, Err(Error::SlotUnavailable { .. })));
    assert_eq!(store.booking_count(), 1);
    let slot = store.slot(&SlotId::new("s1")).unwrap();
    assert_eq!(slot.booking_id, Some(first.booking_id));
}
