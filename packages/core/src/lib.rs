// Library root: exposes the booking core for the binary and for
// integration tests in `tests/`. Production entry point remains `src/main.rs`.

pub mod error;
pub mod metrics;
pub mod models;
pub mod notify;
pub mod rating;
pub mod seed;
pub mod slots;
pub mod store;

// Terminal front end. The store does not depend on any of these.
pub mod cli;
pub mod config;
pub mod logging;
pub mod session;
pub mod view;
