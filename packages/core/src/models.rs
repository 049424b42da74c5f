//! Core domain types for shops, slots, customers and reviews.
//!
//! `Shop` and `Slot` keep their fields private: the only way to change them
//! is through [`crate::store::AppointmentStore`], which recomputes the derived
//! aggregates in the same call. Everything handed out to readers is either a
//! shared borrow or an owned clone.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rating::average_rating;

pub type ShopId = u32;
pub type SlotId = u32;
pub type ReviewId = u32;

/// Reminder lead times offered by the booking form, in minutes.
pub const REMINDER_PRESETS: [u32; 4] = [15, 30, 45, 60];

/// Lead time used when a booking does not pick one.
pub const DEFAULT_REMINDER_MINUTES: u32 = 30;

/// The person holding a booked slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    /// Minutes before the appointment the reminder should fire.
    pub notification_minutes: u32,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        notification_minutes: u32,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            notification_minutes,
        }
    }
}

/// Booking status of a slot, without the attached customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotStatus::Available => write!(f, "available"),
            SlotStatus::Booked => write!(f, "booked"),
        }
    }
}

/// A slot holds a customer exactly when it is booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "customer", rename_all = "lowercase")]
pub enum SlotState {
    Available,
    Booked(Customer),
}

/// A bookable time unit belonging to one shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    id: SlotId,
    time: NaiveDateTime,
    #[serde(flatten)]
    state: SlotState,
}

impl Slot {
    pub fn available(id: SlotId, time: NaiveDateTime) -> Self {
        Self {
            id,
            time,
            state: SlotState::Available,
        }
    }

    pub fn booked(id: SlotId, time: NaiveDateTime, customer: Customer) -> Self {
        Self {
            id,
            time,
            state: SlotState::Booked(customer),
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn status(&self) -> SlotStatus {
        match self.state {
            SlotState::Available => SlotStatus::Available,
            SlotState::Booked(_) => SlotStatus::Booked,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, SlotState::Available)
    }

    pub fn customer(&self) -> Option<&Customer> {
        match &self.state {
            SlotState::Available => None,
            SlotState::Booked(customer) => Some(customer),
        }
    }

    /// One-way transition. Callers check availability first.
    pub(crate) fn book(&mut self, customer: Customer) {
        self.state = SlotState::Booked(customer);
    }
}

/// A stored review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub author: String,
    pub rating: u8,
    pub comment: String,
    pub date: DateTime<Utc>,
}

/// A review as submitted, before the store assigns an id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    pub author: String,
    pub rating: u8,
    pub comment: String,
}

impl NewReview {
    pub fn new(author: impl Into<String>, rating: u8, comment: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            rating,
            comment: comment.into(),
        }
    }
}

/// A barber shop with its schedule for today and its reviews.
///
/// Deserializing goes through [`Shop::new`], so aggregates present in the
/// input are ignored and recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ShopRecord")]
pub struct Shop {
    id: ShopId,
    name: String,
    address: String,
    image: String,
    rating: f64,
    total_ratings: usize,
    available_slots: usize,
    slots: Vec<Slot>,
    reviews: Vec<Review>,
}

impl Shop {
    /// Build a shop; `reviews` are expected newest first. The aggregates are
    /// derived here rather than taken from the caller. Slots repeating an
    /// earlier slot id are dropped with a warning.
    pub fn new(
        id: ShopId,
        name: impl Into<String>,
        address: impl Into<String>,
        image: impl Into<String>,
        slots: Vec<Slot>,
        reviews: Vec<Review>,
    ) -> Self {
        let mut seen = HashSet::new();
        let slots = slots
            .into_iter()
            .filter(|slot| {
                let fresh = seen.insert(slot.id);
                if !fresh {
                    tracing::warn!(shop_id = id, slot_id = slot.id, "Dropping slot with duplicate id");
                }
                fresh
            })
            .collect();

        let mut shop = Self {
            id,
            name: name.into(),
            address: address.into(),
            image: image.into(),
            rating: 0.0,
            total_ratings: 0,
            available_slots: 0,
            slots,
            reviews,
        };
        shop.refresh_availability();
        shop.refresh_rating();
        shop
    }

    pub fn id(&self) -> ShopId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn total_ratings(&self) -> usize {
        self.total_ratings
    }

    pub fn available_slots(&self) -> usize {
        self.available_slots
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Reviews, newest first.
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn slot(&self, slot_id: SlotId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }

    pub(crate) fn slot_mut(&mut self, slot_id: SlotId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == slot_id)
    }

    pub(crate) fn next_review_id(&self) -> ReviewId {
        self.reviews.len() as ReviewId + 1
    }

    pub(crate) fn prepend_review(&mut self, review: Review) {
        self.reviews.insert(0, review);
        self.refresh_rating();
    }

    pub(crate) fn refresh_availability(&mut self) {
        self.available_slots = self.slots.iter().filter(|s| s.is_available()).count();
    }

    fn refresh_rating(&mut self) {
        self.rating = average_rating(self.reviews.iter().map(|r| r.rating));
        self.total_ratings = self.reviews.len();
    }
}

/// Wire form of a [`Shop`]. Stored aggregates are not read.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShopRecord {
    id: ShopId,
    name: String,
    address: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    slots: Vec<Slot>,
    #[serde(default)]
    reviews: Vec<Review>,
}

impl From<ShopRecord> for Shop {
    fn from(record: ShopRecord) -> Self {
        Shop::new(
            record.id,
            record.name,
            record.address,
            record.image,
            record.slots,
            record.reviews,
        )
    }
}

/// Platform capability for showing reminder alerts, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    /// Not yet requested from the user.
    #[default]
    Default,
    Granted,
    Denied,
}

impl FromStr for NotificationPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "not-yet-requested" | "prompt" => Ok(Self::Default),
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            other => Err(format!("Invalid notification permission: {}", other)),
        }
    }
}

impl fmt::Display for NotificationPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// Which side of the shop the session is rendering for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Barber,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Barber => write!(f, "barber"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "barber" | "staff" => Ok(Self::Barber),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}
