//! Demonstration data loaded at startup.
//!
//! Three shops with a handful of reviews each, plus a fixed pre-booking
//! pattern so the staff schedule is not empty on first launch.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::models::{Customer, Review, Shop, ShopId};
use crate::slots::generate_slots;

/// Slots to pre-book for one shop, applied only when the generated day has
/// more than `min_slots` slots.
#[derive(Debug, Clone, Default)]
pub struct PreBookingPattern {
    pub min_slots: usize,
    /// Candidate index (not slot id) paired with the booking customer.
    pub bookings: Vec<(usize, Customer)>,
}

/// Pre-booking pattern for `shop_id`. Shops without one get an empty pattern.
pub fn pre_bookings(shop_id: ShopId) -> PreBookingPattern {
    match shop_id {
        1 => PreBookingPattern {
            min_slots: 4,
            bookings: vec![
                (1, Customer::new("Alex Johnson", "555-0101", 30)),
                (4, Customer::new("Samantha Bee", "555-0102", 15)),
            ],
        },
        2 => PreBookingPattern {
            min_slots: 6,
            bookings: vec![
                (2, Customer::new("Tom Wilson", "555-0103", 60)),
                (5, Customer::new("Maria Garcia", "555-0104", 30)),
            ],
        },
        _ => PreBookingPattern::default(),
    }
}

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn review(id: u32, author: &str, rating: u8, comment: &str, date: DateTime<Utc>) -> Review {
    Review {
        id,
        author: author.to_string(),
        rating,
        comment: comment.to_string(),
        date,
    }
}

/// The shops a fresh session starts with, slots generated for the day of
/// `now`.
pub fn seed_shops(now: NaiveDateTime) -> Vec<Shop> {
    vec![
        Shop::new(
            1,
            "The Dapper Den",
            "123 Main Street, Anytown, USA",
            "https://images.unsplash.com/photo-1599305445671-ac291c95aaa9",
            generate_slots(8, 1, now),
            vec![
                review(1, "John D.", 5, "Best haircut I've ever had!", utc(2023, 10, 26, 10, 0)),
                review(2, "Jane S.", 4, "Great service and friendly staff.", utc(2023, 10, 25, 14, 30)),
            ],
        ),
        Shop::new(
            2,
            "Clipper Kings",
            "456 Oak Avenue, Anytown, USA",
            "https://images.unsplash.com/photo-1622288432454-2415493c049d",
            generate_slots(12, 2, now),
            vec![review(1, "Mike R.", 5, "Modern shop, great vibes.", utc(2023, 10, 26, 11, 0))],
        ),
        Shop::new(
            3,
            "Sharp Styles",
            "789 Pine Lane, Anytown, USA",
            "https://images.unsplash.com/photo-1621605815971-fbc333ab683d",
            generate_slots(6, 3, now),
            vec![
                review(1, "Emily W.", 5, "Perfection every time.", utc(2023, 10, 24, 9, 0)),
                review(2, "Chris P.", 5, "Won't go anywhere else.", utc(2023, 10, 22, 16, 0)),
            ],
        ),
    ]
}
