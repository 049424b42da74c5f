//! Prometheus metrics registry for the booking session.
//!
//! [`AppMetrics`] owns all registered metrics and the [`Registry`] they
//! belong to. Construct it once at startup and record into it after each
//! store operation. The session's `metrics` command prints the registry in
//! Prometheus text exposition format.

use prometheus::{Counter, CounterVec, GaugeVec, Opts, Registry};

use crate::error::StoreError;
use crate::models::Shop;
use crate::notify::ScheduleOutcome;

/// All application-level Prometheus metrics.
pub struct AppMetrics {
    /// Successful bookings.
    pub bookings_total: Counter,
    /// Rejected bookings, labelled by error kind.
    pub booking_rejections_total: CounterVec,
    /// Accepted reviews.
    pub reviews_total: Counter,
    /// Reminder scheduling outcomes, labelled by outcome.
    pub reminders_total: CounterVec,
    /// Current available-slot count per shop.
    pub available_slots: GaugeVec,
    /// The registry that owns all of the above metrics.
    pub registry: Registry,
}

impl AppMetrics {
    /// Create and register all metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let bookings_total = Counter::with_opts(Opts::new(
            "barber_booking_bookings_total",
            "Successful slot bookings",
        ))?;

        let booking_rejections_total = CounterVec::new(
            Opts::new(
                "barber_booking_booking_rejections_total",
                "Rejected slot bookings by reason",
            ),
            &["reason"],
        )?;

        let reviews_total = Counter::with_opts(Opts::new(
            "barber_booking_reviews_total",
            "Accepted reviews",
        ))?;

        let reminders_total = CounterVec::new(
            Opts::new(
                "barber_booking_reminders_total",
                "Reminder scheduling outcomes",
            ),
            &["outcome"],
        )?;

        let available_slots = GaugeVec::new(
            Opts::new(
                "barber_booking_available_slots",
                "Available slots per shop",
            ),
            &["shop"],
        )?;

        registry.register(Box::new(bookings_total.clone()))?;
        registry.register(Box::new(booking_rejections_total.clone()))?;
        registry.register(Box::new(reviews_total.clone()))?;
        registry.register(Box::new(reminders_total.clone()))?;
        registry.register(Box::new(available_slots.clone()))?;

        Ok(Self {
            bookings_total,
            booking_rejections_total,
            reviews_total,
            reminders_total,
            available_slots,
            registry,
        })
    }

    pub fn record_booking(&self, reminder: ScheduleOutcome) {
        self.bookings_total.inc();
        self.reminders_total
            .with_label_values(&[reminder.as_str()])
            .inc();
    }

    pub fn record_rejection(&self, err: &StoreError) {
        self.booking_rejections_total
            .with_label_values(&[err.kind().as_str()])
            .inc();
    }

    /// Set the available-slot gauge for every shop.
    pub fn observe_shops(&self, shops: &[Shop]) {
        for shop in shops {
            let label = shop.id().to_string();
            self.available_slots
                .with_label_values(&[label.as_str()])
                .set(shop.available_slots() as f64);
        }
    }

    /// Render all metrics as Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap_or_default())
    }
}
