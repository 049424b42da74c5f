//! Daily slot generation.
//!
//! Produces today's bookable slots for one shop: fixed-interval candidates
//! from opening time, cut at closing time, seeded with the demonstration
//! pre-bookings and filtered down to slots still in the future.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

use crate::models::{ShopId, Slot, SlotId};
use crate::seed::pre_bookings;

/// Opening hours and slot spacing for a working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTemplate {
    /// Hour of the first slot.
    pub open_hour: u32,
    /// Candidates at or after this hour are dropped.
    pub close_hour: u32,
    pub interval_minutes: i64,
}

impl Default for DayTemplate {
    fn default() -> Self {
        Self {
            open_hour: 9,
            close_hour: 17,
            interval_minutes: 45,
        }
    }
}

impl DayTemplate {
    fn anchor(&self, now: NaiveDateTime) -> NaiveDateTime {
        let open = NaiveTime::from_hms_opt(self.open_hour, 0, 0).unwrap_or_default();
        now.date().and_time(open)
    }

    fn is_open_at(&self, time: NaiveDateTime) -> bool {
        time.hour() < self.close_hour
    }
}

/// Generate the slots for `shop_id` for the calendar day of `now` using the
/// default [`DayTemplate`].
///
/// Returns an empty vector when every candidate is past closing time or
/// already behind `now`.
pub fn generate_slots(count: u32, shop_id: ShopId, now: NaiveDateTime) -> Vec<Slot> {
    generate_slots_with(&DayTemplate::default(), count, shop_id, now)
}

/// Same as [`generate_slots`] with an explicit day template.
pub fn generate_slots_with(
    template: &DayTemplate,
    count: u32,
    shop_id: ShopId,
    now: NaiveDateTime,
) -> Vec<Slot> {
    let anchor = template.anchor(now);
    let step = Duration::minutes(template.interval_minutes);

    let mut slots: Vec<Slot> = (0..count)
        .filter_map(|i| {
            let time = anchor + step * i as i32;
            // Candidates that roll past midnight are also past closing time.
            (time.date() == anchor.date() && template.is_open_at(time))
                .then(|| Slot::available(i as SlotId + 1, time))
        })
        .collect();

    let pattern = pre_bookings(shop_id);
    if slots.len() > pattern.min_slots {
        for (index, customer) in pattern.bookings {
            if let Some(slot) = slots.get_mut(index) {
                slot.book(customer);
            }
        }
    }

    slots.retain(|slot| slot.time() > now);
    slots
}
