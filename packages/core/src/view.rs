//! Text rendering for the terminal session.
//!
//! Pure functions from store snapshots to strings. Nothing here reads or
//! writes store state.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::StoreError;
use crate::models::{NotificationPermission, Review, Role, Shop, Slot, SlotState};
use crate::rating::MAX_RATING;
use crate::store::Booking;

/// "09:45 AM"
pub fn format_time(time: NaiveDateTime) -> String {
    time.format("%I:%M %p").to_string()
}

/// "Thursday, March 14"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

/// Five stars, filled up to the whole part of `rating`.
pub fn stars(rating: f64) -> String {
    (1..=MAX_RATING)
        .map(|star| if rating >= f64::from(star) { '★' } else { '☆' })
        .collect()
}

pub fn render_shop_list(shops: &[Shop], role: Role) -> String {
    if shops.is_empty() {
        return "No shops found.\n".to_string();
    }

    let mut out = String::new();
    for shop in shops {
        match role {
            Role::Customer => {
                let _ = writeln!(
                    out,
                    "[{}] {} - {}\n    {} {:.1} ({}) | {} slots available",
                    shop.id(),
                    shop.name(),
                    shop.address(),
                    stars(shop.rating()),
                    shop.rating(),
                    shop.total_ratings(),
                    shop.available_slots(),
                );
            }
            Role::Barber => {
                let booked = shop.slots().len() - shop.available_slots();
                let _ = writeln!(
                    out,
                    "[{}] {}: {} booked, {} open",
                    shop.id(),
                    shop.name(),
                    booked,
                    shop.available_slots(),
                );
            }
        }
    }
    out
}

fn render_slot_chip(slot: &Slot) -> String {
    match slot.state() {
        SlotState::Available => format!("#{} {}", slot.id(), format_time(slot.time())),
        SlotState::Booked(_) => format!("#{} {} (booked)", slot.id(), format_time(slot.time())),
    }
}

fn render_review(out: &mut String, review: &Review) {
    let _ = writeln!(
        out,
        "  {} {} on {}\n    {}",
        stars(f64::from(review.rating)),
        review.author,
        review.date.format("%b %-d, %Y"),
        review.comment,
    );
}

/// Customer-facing detail page: slots to pick from and reviews.
pub fn render_shop_detail(shop: &Shop) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", shop.name());
    let _ = writeln!(out, "{}", shop.address());
    let _ = writeln!(
        out,
        "{} {:.1} ({})",
        stars(shop.rating()),
        shop.rating(),
        shop.total_ratings()
    );

    let _ = writeln!(out, "\nAvailable Slots");
    if shop.slots().is_empty() {
        let _ = writeln!(out, "  No more slots available for today.");
    } else {
        let chips: Vec<String> = shop.slots().iter().map(render_slot_chip).collect();
        let _ = writeln!(out, "  {}", chips.join("  "));
    }

    let _ = writeln!(out, "\nCustomer Reviews (based on {} ratings)", shop.total_ratings());
    if shop.reviews().is_empty() {
        let _ = writeln!(out, "  No reviews yet.");
    }
    for review in shop.reviews() {
        render_review(&mut out, review);
    }
    out
}

/// Staff view of the day, with customer details on booked slots.
pub fn render_schedule(shop: &Shop, today: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Today's Schedule: {}", shop.name());
    let _ = writeln!(out, "{}", format_date(today));

    if shop.slots().is_empty() {
        let _ = writeln!(out, "\nThe day has ended. All slots for today are in the past.");
        return out;
    }

    for slot in shop.slots() {
        let _ = writeln!(
            out,
            "\n{}  {}",
            format_time(slot.time()),
            slot.status().to_string().to_uppercase()
        );
        if let Some(customer) = slot.customer() {
            let _ = writeln!(out, "  {}", customer.name);
            let _ = writeln!(out, "  {}", customer.phone);
            let _ = writeln!(
                out,
                "  Reminder set for {} mins prior.",
                customer.notification_minutes
            );
        }
    }
    out
}

pub fn render_booking(booking: &Booking, permission: NotificationPermission) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Appointment Confirmed!");
    let _ = writeln!(
        out,
        "We've booked your slot for {}.",
        format_time(booking.slot.time())
    );
    if let Some(customer) = booking.slot.customer() {
        if permission == NotificationPermission::Granted {
            let _ = writeln!(
                out,
                "A notification will be sent {} minutes before.",
                customer.notification_minutes
            );
        }
        let _ = writeln!(out, "A reminder will also be sent to {}.", customer.phone);
    }
    out
}

/// Inline feedback for bad input, a generic message for anything that means
/// the slot is gone.
pub fn render_error(err: &StoreError) -> String {
    match err {
        StoreError::InvalidInput { field, reason } => {
            format!("Please check {}: {}.\n", field, reason)
        }
        StoreError::ShopNotFound { shop_id } => format!("Shop {} not found.\n", shop_id),
        StoreError::SlotNotFound { .. } | StoreError::AlreadyBooked { .. } => {
            "That slot is no longer available.\n".to_string()
        }
    }
}
