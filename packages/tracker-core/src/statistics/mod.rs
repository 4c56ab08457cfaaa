//! Tracker statistics.
//!
//! The coordinator emits one [`Event`](event::Event) per dispatch outcome.
//! [`handle_event`](event::handler::handle_event) folds it into the
//! [`Repository`](repository::Repository), which keeps the [`Metrics`](metrics::Metrics)
//! returned with the final shutdown report.
pub mod event;
pub mod metrics;
pub mod repository;
