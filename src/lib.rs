//! This crate displays a monthly calendar, fed by spreadsheets.
//!
//! Spreadsheets have no fixed schema. Every configured source (see [`config`]) is fetched as a [`tabular::Table`],
//! and the [`tabular::columns`] heuristics guess which column holds the date of an event and which holds its description.
//!
//! Sources are fetched in parallel and merged by an [`Aggregator`](aggregator::Aggregator). A failing source is logged and ignored.
//! Holidays are overlaid on the calendar grid, events can be filtered by category (i.e. by source), and each event has a
//! "done" checkbox whose value lives in a shared [`CompletionStore`](traits::CompletionStore).
//!
//! A [`CalendarController`](controller::CalendarController) ties these together.

pub mod traits;

pub mod config;
pub mod utils;
pub mod date;
pub mod tabular;
mod event;
pub use event::Event;
pub mod holiday;
pub use holiday::Holiday;

pub mod source;
pub mod aggregator;
pub use aggregator::Aggregator;
pub mod completion;
pub mod mock_behaviour;

pub mod calendar;
pub mod filter;
pub mod controller;
pub use controller::CalendarController;
pub mod poller;
