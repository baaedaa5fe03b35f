//! Timed re-rendering of a device view for a connected dashboard.

pub mod backoff;
pub mod stream;

pub use backoff::{Backoff, CycleOutcome};
pub use stream::view_events;
