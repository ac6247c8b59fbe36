//! Storyline event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`StoryEvent`]: the domain event envelope.
//! - [`EventLog`]: background subscriber that keeps the most recent events
//!   for inspection.

pub mod bus;
pub mod log;

pub use bus::{event_types, EventBus, StoryEvent};
pub use log::EventLog;
