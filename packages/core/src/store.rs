//! In-memory appointment store.
//!
//! `AppointmentStore` owns every shop together with its slots and reviews.
//! State changes only through [`AppointmentStore::book_slot`] and
//! [`AppointmentStore::add_review`]; both validate everything up front and
//! then mutate and recompute the shop's aggregates inside the same
//! `&mut self` call, so a reader can never observe a half-applied change.
//!
//! Callers that need to share the store across tasks wrap it in
//! [`SharedStore`] (`Arc<RwLock<AppointmentStore>>`).

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime, Utc};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{
    Customer, NewReview, NotificationPermission, Review, Shop, ShopId, Slot, SlotId,
};
use crate::notify::{ReminderRequest, ReminderScheduler, ScheduleOutcome};
use crate::rating::{MAX_RATING, MIN_RATING};
use crate::seed::seed_shops;

pub type SharedStore = Arc<RwLock<AppointmentStore>>;

/// Result of a successful booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub shop_id: ShopId,
    /// The slot as it is after booking.
    pub slot: Slot,
    /// The shop's available-slot count after booking.
    pub available_slots: usize,
    /// What the reminder scheduler did. Never affects the booking itself.
    pub reminder: ScheduleOutcome,
}

#[derive(Debug)]
pub struct AppointmentStore {
    shops: Vec<Shop>,
    reminders: ReminderScheduler,
}

impl AppointmentStore {
    /// Create a store over `shops`, kept in the given order. A shop repeating
    /// an earlier shop id is dropped with a warning.
    pub fn new(shops: Vec<Shop>, reminders: ReminderScheduler) -> Self {
        let mut seen = HashSet::new();
        let shops = shops
            .into_iter()
            .filter(|shop| {
                let fresh = seen.insert(shop.id());
                if !fresh {
                    tracing::warn!(shop_id = shop.id(), "Dropping shop with duplicate id");
                }
                fresh
            })
            .collect();
        Self { shops, reminders }
    }

    /// Create a store holding the demonstration shops for the day of `now`.
    pub fn seeded(now: NaiveDateTime, reminders: ReminderScheduler) -> Self {
        Self::new(seed_shops(now), reminders)
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// All shops in insertion order.
    pub fn list_shops(&self) -> &[Shop] {
        &self.shops
    }

    /// Owned copy of every shop, for callers that keep state across mutations.
    pub fn snapshot(&self) -> Vec<Shop> {
        self.shops.clone()
    }

    pub fn shop(&self, shop_id: ShopId) -> Option<&Shop> {
        self.shops.iter().find(|s| s.id() == shop_id)
    }

    /// Capability status resolved at startup.
    pub fn notification_permission(&self) -> NotificationPermission {
        self.reminders.permission()
    }

    /// Book `slot_id` in `shop_id` for `customer`.
    ///
    /// Fails without touching any state when the shop or slot is unknown,
    /// the slot is already booked, or the customer fields are invalid. On
    /// success the reminder is handed to the scheduler after the mutation;
    /// its outcome is reported but never turns the booking into an error.
    pub fn book_slot(
        &mut self,
        shop_id: ShopId,
        slot_id: SlotId,
        customer: Customer,
    ) -> Result<Booking, StoreError> {
        let result = self.apply_booking(shop_id, slot_id, customer);

        let (shop_name, slot, available_slots) = match result {
            Ok(booked) => booked,
            Err(err) => {
                tracing::warn!(shop_id, slot_id, reason = err.kind().as_str(), "Booking rejected: {}", err);
                return Err(err);
            }
        };

        let lead_minutes = slot
            .customer()
            .map(|c| c.notification_minutes)
            .unwrap_or_default();
        let reminder = self.reminders.schedule(
            ReminderRequest {
                shop_name,
                slot_time: slot.time(),
                lead_minutes,
            },
            Local::now().naive_local(),
        );

        tracing::info!(
            shop_id,
            slot_id,
            available_slots,
            reminder = reminder.as_str(),
            "Slot booked"
        );

        Ok(Booking {
            shop_id,
            slot,
            available_slots,
            reminder,
        })
    }

    fn apply_booking(
        &mut self,
        shop_id: ShopId,
        slot_id: SlotId,
        customer: Customer,
    ) -> Result<(String, Slot, usize), StoreError> {
        let shop = self
            .shops
            .iter_mut()
            .find(|s| s.id() == shop_id)
            .ok_or(StoreError::ShopNotFound { shop_id })?;

        let slot = shop
            .slot_mut(slot_id)
            .ok_or(StoreError::SlotNotFound { shop_id, slot_id })?;
        if !slot.is_available() {
            return Err(StoreError::AlreadyBooked { shop_id, slot_id });
        }
        validate_customer(&customer)?;

        slot.book(customer);
        let booked = slot.clone();
        shop.refresh_availability();

        Ok((shop.name().to_string(), booked, shop.available_slots()))
    }

    /// Add a review to `shop_id`, newest first, and recompute the shop's
    /// rating from its full review set.
    pub fn add_review(&mut self, shop_id: ShopId, review: NewReview) -> Result<Review, StoreError> {
        if let Err(err) = validate_review(&review) {
            tracing::warn!(shop_id, "Review rejected: {}", err);
            return Err(err);
        }

        let shop = self
            .shops
            .iter_mut()
            .find(|s| s.id() == shop_id)
            .ok_or(StoreError::ShopNotFound { shop_id })?;

        let stored = Review {
            id: shop.next_review_id(),
            author: review.author,
            rating: review.rating,
            comment: review.comment,
            date: Utc::now(),
        };
        shop.prepend_review(stored.clone());

        tracing::info!(
            shop_id,
            review_id = stored.id,
            rating = shop.rating(),
            total_ratings = shop.total_ratings(),
            "Review added"
        );
        Ok(stored)
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::invalid_input(field, "must not be empty"));
    }
    Ok(())
}

fn validate_customer(customer: &Customer) -> Result<(), StoreError> {
    require_text("name", &customer.name)?;
    require_text("phone", &customer.phone)?;
    if customer.notification_minutes == 0 {
        return Err(StoreError::invalid_input(
            "notification_minutes",
            "must be a positive number of minutes",
        ));
    }
    Ok(())
}

fn validate_review(review: &NewReview) -> Result<(), StoreError> {
    require_text("author", &review.author)?;
    require_text("comment", &review.comment)?;
    if !(MIN_RATING..=MAX_RATING).contains(&review.rating) {
        return Err(StoreError::invalid_input(
            "rating",
            format!("must be between {} and {}", MIN_RATING, MAX_RATING),
        ));
    }
    Ok(())
}
