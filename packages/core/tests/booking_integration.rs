//! Integration tests for the appointment store's public contract.
//!
//! Each test builds an `AppointmentStore` the same way `main.rs` does (shops
//! plus a `ReminderScheduler`) and drives it only through `list_shops`,
//! `book_slot` and `add_review`. Reminder delivery is observed through an
//! `InMemoryNotifier`, or through a wiremocked webhook endpoint.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Utc};
use proptest::prelude::*;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use barber_booking::{
    error::{ErrorKind, StoreError},
    models::{Customer, NewReview, NotificationPermission, Review, Shop, Slot, SlotStatus},
    notify::{InMemoryNotifier, ReminderScheduler, ScheduleOutcome, WebhookNotifier},
    slots::generate_slots,
    store::AppointmentStore,
};

// ---- Helpers ----------------------------------------------------------------

fn fixed_day(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 14)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn review(id: u32, rating: u8) -> Review {
    Review {
        id,
        author: format!("Reviewer {}", id),
        rating,
        comment: "Solid".to_string(),
        date: Utc::now(),
    }
}

fn shop_from_generator(id: u32, count: u32, reviews: Vec<Review>) -> Shop {
    Shop::new(
        id,
        format!("Shop {}", id),
        "1 Test Street",
        "",
        generate_slots(count, id, fixed_day(6, 0)),
        reviews,
    )
}

fn store_with(shops: Vec<Shop>) -> AppointmentStore {
    AppointmentStore::new(shops, ReminderScheduler::default())
}

fn granted_store(notifier: &InMemoryNotifier, slot_time: NaiveDateTime) -> AppointmentStore {
    let shop = Shop::new(
        1,
        "The Dapper Den",
        "123 Main Street",
        "",
        vec![Slot::available(1, slot_time)],
        vec![],
    );
    AppointmentStore::new(
        vec![shop],
        ReminderScheduler::new(NotificationPermission::Granted, Arc::new(notifier.clone())),
    )
}

fn assert_invariants(store: &AppointmentStore) {
    for shop in store.list_shops() {
        let available = shop
            .slots()
            .iter()
            .filter(|s| s.status() == SlotStatus::Available)
            .count();
        assert_eq!(shop.available_slots(), available);
        assert_eq!(shop.total_ratings(), shop.reviews().len());
        for slot in shop.slots() {
            assert_eq!(slot.customer().is_some(), slot.status() == SlotStatus::Booked);
        }
    }
}

// ---- Scenarios --------------------------------------------------------------

#[test]
fn booking_slot_two_decrements_availability_by_one() {
    let mut store = store_with(vec![shop_from_generator(3, 6, vec![])]);
    let before = store.snapshot();

    let booking = store
        .book_slot(3, 2, Customer::new("A", "555", 30))
        .expect("slot 2 should be bookable");

    let shop = store.shop(3).unwrap();
    assert_eq!(booking.slot.status(), SlotStatus::Booked);
    assert_eq!(shop.slot(2).unwrap().customer().unwrap().phone, "555");
    assert_eq!(shop.available_slots(), before[0].available_slots() - 1);
    for slot in shop.slots().iter().filter(|s| s.id() != 2) {
        assert_eq!(Some(slot), before[0].slot(slot.id()));
    }
    assert_invariants(&store);
}

#[test]
fn review_rated_three_after_five_averages_to_four() {
    let mut store = store_with(vec![shop_from_generator(3, 6, vec![review(1, 5)])]);

    let added = store.add_review(3, NewReview::new("B", 3, "Okay")).unwrap();

    let shop = store.shop(3).unwrap();
    assert_eq!(shop.rating(), 4.0);
    assert_eq!(shop.total_ratings(), 2);
    assert_eq!(shop.reviews().first(), Some(&added));
}

#[test]
fn review_with_empty_author_leaves_reviews_untouched() {
    let mut store = store_with(vec![shop_from_generator(3, 6, vec![review(1, 5)])]);

    let err = store.add_review(3, NewReview::new("", 5, "x")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(store.shop(3).unwrap().reviews().len(), 1);
}

#[test]
fn second_booking_of_same_slot_fails_and_keeps_first_customer() {
    let mut store = store_with(vec![shop_from_generator(3, 6, vec![])]);
    store.book_slot(3, 4, Customer::new("First", "555-1", 15)).unwrap();

    let err = store
        .book_slot(3, 4, Customer::new("Second", "555-2", 60))
        .unwrap_err();

    assert_eq!(err, StoreError::AlreadyBooked { shop_id: 3, slot_id: 4 });
    let customer = store.shop(3).unwrap().slot(4).unwrap().customer().unwrap().clone();
    assert_eq!(customer, Customer::new("First", "555-1", 15));
}

#[test]
fn booking_missing_slot_leaves_every_shop_unchanged() {
    let mut store = store_with(vec![
        shop_from_generator(1, 8, vec![]),
        shop_from_generator(2, 12, vec![]),
    ]);
    let before = store.snapshot();

    let err = store.book_slot(2, 40, Customer::new("A", "555", 30)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(store.snapshot(), before);
}

#[test]
fn seeded_pre_bookings_cannot_be_rebooked() {
    let mut store = store_with(vec![shop_from_generator(1, 8, vec![])]);
    let pre_booked = store.shop(1).unwrap().slot(2).unwrap().customer().cloned();
    assert!(pre_booked.is_some());

    let err = store.book_slot(1, 2, Customer::new("A", "555", 30)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyBooked);
    assert_eq!(store.shop(1).unwrap().slot(2).unwrap().customer().cloned(), pre_booked);
}

#[test]
fn evening_store_has_empty_schedules() {
    let store = AppointmentStore::seeded(fixed_day(18, 0), ReminderScheduler::default());
    assert!(store.list_shops().iter().all(|s| s.slots().is_empty()));
    assert!(store.list_shops().iter().all(|s| s.available_slots() == 0));
}

// ---- Reminders --------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn granted_booking_delivers_reminder_before_the_slot() {
    let notifier = InMemoryNotifier::new();
    let slot_time = Local::now().naive_local() + Duration::hours(2);
    let mut store = granted_store(&notifier, slot_time);

    let booking = store.book_slot(1, 1, Customer::new("A", "555", 30)).unwrap();
    assert!(booking.reminder.is_scheduled());

    tokio::time::sleep(StdDuration::from_secs(60 * 60)).await;
    assert!(notifier.delivered().is_empty());

    tokio::time::sleep(StdDuration::from_secs(60 * 60)).await;
    let delivered = notifier.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(
        delivered[0].body,
        "Your appointment at The Dapper Den is in 30 minutes."
    );
}

#[tokio::test]
async fn reminder_already_due_is_skipped_but_booking_succeeds() {
    let notifier = InMemoryNotifier::new();
    let slot_time = Local::now().naive_local() + Duration::minutes(10);
    let mut store = granted_store(&notifier, slot_time);

    let booking = store.book_slot(1, 1, Customer::new("A", "555", 15)).unwrap();

    assert_eq!(booking.reminder, ScheduleOutcome::ReminderInPast);
    assert_eq!(store.shop(1).unwrap().available_slots(), 0);
}

#[tokio::test]
async fn denied_permission_books_without_reminder() {
    let notifier = InMemoryNotifier::new();
    let shop = Shop::new(
        1,
        "Den",
        "",
        "",
        vec![Slot::available(1, Local::now().naive_local() + Duration::hours(3))],
        vec![],
    );
    let mut store = AppointmentStore::new(
        vec![shop],
        ReminderScheduler::new(NotificationPermission::Denied, Arc::new(notifier.clone())),
    );

    let booking = store.book_slot(1, 1, Customer::new("A", "555", 30)).unwrap();

    assert_eq!(
        booking.reminder,
        ScheduleOutcome::PermissionNotGranted(NotificationPermission::Denied)
    );
    assert_eq!(store.notification_permission(), NotificationPermission::Denied);
}

#[tokio::test]
async fn webhook_receives_fired_reminder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/remind"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let shop = Shop::new(
        1,
        "Clipper Kings",
        "",
        "",
        vec![Slot::available(
            1,
            Local::now().naive_local() + Duration::minutes(15) + Duration::milliseconds(500),
        )],
        vec![],
    );
    let notifier = WebhookNotifier::new(format!("{}/remind", server.uri()));
    let mut store = AppointmentStore::new(
        vec![shop],
        ReminderScheduler::new(NotificationPermission::Granted, Arc::new(notifier)),
    );

    let booking = store.book_slot(1, 1, Customer::new("A", "555", 15)).unwrap();
    assert!(booking.reminder.is_scheduled());

    let mut received = Vec::new();
    for _ in 0..50 {
        tokio::time::sleep(StdDuration::from_millis(100)).await;
        received = server.received_requests().await.unwrap_or_default();
        if !received.is_empty() {
            break;
        }
    }

    assert_eq!(received.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["shop_name"], "Clipper Kings");
    assert_eq!(body["lead_minutes"], 15);
}

// ---- Properties -------------------------------------------------------------

#[derive(Debug, Clone)]
enum Op {
    Book { shop: u32, slot: u32, name: String },
    Review { shop: u32, rating: u8, author: String },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..4, 0u32..14, "[a-z ]{0,6}").prop_map(|(shop, slot, name)| Op::Book {
            shop,
            slot,
            name
        }),
        (0u32..4, 0u8..7, "[a-z ]{0,6}").prop_map(|(shop, rating, author)| Op::Review {
            shop,
            rating,
            author
        }),
    ]
}

proptest! {
    #[test]
    fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut store = store_with(vec![
            shop_from_generator(1, 8, vec![review(1, 5), review(2, 4)]),
            shop_from_generator(2, 12, vec![review(1, 5)]),
            shop_from_generator(3, 6, vec![]),
        ]);

        for op in ops {
            let before = store.snapshot();
            let result = match op {
                Op::Book { shop, slot, name } => store
                    .book_slot(shop, slot, Customer::new(name, "555", 30))
                    .map(|_| ()),
                Op::Review { shop, rating, author } => store
                    .add_review(shop, NewReview::new(author, rating, "comment"))
                    .map(|_| ()),
            };

            if result.is_err() {
                prop_assert_eq!(store.snapshot(), before);
            }
            assert_invariants(&store);

            for shop in store.list_shops() {
                let sum: u32 = shop.reviews().iter().map(|r| u32::from(r.rating)).sum();
                let count = shop.reviews().len() as f64;
                if count > 0.0 {
                    let expected = (f64::from(sum) / count * 10.0 + 0.5 + 1e-9).floor() / 10.0;
                    prop_assert!((shop.rating() - expected).abs() < 1e-9);
                }
            }
        }
    }
}
