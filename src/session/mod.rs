//! Per-view state driven from a single event loop.
//!
//! A session owns all mutable state of its view. The event loop feeds it
//! channel events, pointer input and ticks one at a time, so nothing here
//! needs locking.

mod field;
mod stats;

pub use field::FieldSession;
pub use stats::StatsSession;
