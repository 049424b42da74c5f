//! Interactive terminal session.
//!
//! Reads one command per line, runs it against the owned
//! [`AppointmentStore`] and writes the rendered result. Every render reads
//! straight from the store, so the output always reflects the latest
//! mutation; the session keeps no copies of shops or slots of its own.

use std::io::Write;

use chrono::Local;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::cli::{SessionCommand, SessionLine};
use crate::error::{AppError, StoreError};
use crate::metrics::AppMetrics;
use crate::models::{Customer, NewReview, Role, Shop, ShopId, SlotId};
use crate::store::AppointmentStore;
use crate::view;

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<W: Write> {
    store: AppointmentStore,
    metrics: AppMetrics,
    role: Role,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(store: AppointmentStore, metrics: AppMetrics, role: Role, out: W) -> Self {
        metrics.observe_shops(store.list_shops());
        Self {
            store,
            metrics,
            role,
            out,
        }
    }

    pub fn store(&self) -> &AppointmentStore {
        &self.store
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Read commands from `input` until EOF or `quit`.
    pub async fn run<R>(mut self, input: R) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.prompt()?;

        while let Some(line) = lines.next_line().await? {
            if self.handle_line(&line)? == Flow::Quit {
                break;
            }
            self.prompt()?;
        }

        tracing::info!("Session ended");
        Ok(())
    }

    fn prompt(&mut self) -> std::io::Result<()> {
        write!(self.out, "{}> ", self.role)?;
        self.out.flush()
    }

    /// Run one input line.
    pub fn handle_line(&mut self, line: &str) -> std::io::Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match SessionLine::parse_line(line) {
            Ok(command) => command,
            Err(usage) => {
                writeln!(self.out, "{}", usage.trim_end())?;
                return Ok(Flow::Continue);
            }
        };

        let text = match command {
            SessionCommand::Quit => return Ok(Flow::Quit),
            SessionCommand::Shops { json } => self.list(json),
            SessionCommand::Shop { id } => match self.role {
                Role::Customer => self.with_shop(id, view::render_shop_detail),
                Role::Barber => self.schedule(id),
            },
            SessionCommand::Schedule { id } => self.schedule(id),
            SessionCommand::Book {
                shop,
                slot,
                name,
                phone,
                remind,
            } => self.book(shop, slot, Customer::new(name, phone, remind)),
            SessionCommand::Review {
                shop,
                author,
                rating,
                comment,
            } => self.review(shop, NewReview::new(author, rating, comment)),
            SessionCommand::Role { role } => {
                self.role = role;
                format!("Switched to the {} view.\n", role)
            }
            SessionCommand::Metrics => self
                .metrics
                .render()
                .unwrap_or_else(|e| format!("Failed to render metrics: {}\n", e)),
        };

        self.out.write_all(text.as_bytes())?;
        Ok(Flow::Continue)
    }

    fn list(&self, json: bool) -> String {
        if json {
            return serde_json::to_string_pretty(self.store.list_shops())
                .map(|s| s + "\n")
                .unwrap_or_else(|e| format!("Failed to serialize shops: {}\n", e));
        }
        view::render_shop_list(self.store.list_shops(), self.role)
    }

    fn with_shop<F>(&self, id: ShopId, render: F) -> String
    where
        F: FnOnce(&Shop) -> String,
    {
        match self.store.shop(id) {
            Some(shop) => render(shop),
            None => view::render_error(&StoreError::ShopNotFound { shop_id: id }),
        }
    }

    fn schedule(&self, id: ShopId) -> String {
        let today = Local::now().date_naive();
        self.with_shop(id, |shop| view::render_schedule(shop, today))
    }

    fn book(&mut self, shop_id: ShopId, slot_id: SlotId, customer: Customer) -> String {
        let result = self.store.book_slot(shop_id, slot_id, customer);
        self.metrics.observe_shops(self.store.list_shops());

        match result {
            Ok(booking) => {
                self.metrics.record_booking(booking.reminder);
                view::render_booking(&booking, self.store.notification_permission())
            }
            Err(err) => {
                self.metrics.record_rejection(&err);
                let mut text = view::render_error(&err);
                if matches!(
                    err,
                    StoreError::AlreadyBooked { .. } | StoreError::SlotNotFound { .. }
                ) {
                    // Show what is actually left to pick from.
                    text.push_str(&self.with_shop(shop_id, view::render_shop_detail));
                }
                text
            }
        }
    }

    fn review(&mut self, shop_id: ShopId, review: NewReview) -> String {
        match self.store.add_review(shop_id, review) {
            Ok(_) => {
                self.metrics.reviews_total.inc();
                let mut text = "Thank You! Your review has been submitted.\n".to_string();
                text.push_str(&self.with_shop(shop_id, view::render_shop_detail));
                text
            }
            Err(err) => view::render_error(&err),
        }
    }
}
