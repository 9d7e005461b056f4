//! Event routing
//!
//! Fans published events out to every other subscriber of a topic.

mod event_router;

pub use event_router::{EventHandler, EventRouter};
