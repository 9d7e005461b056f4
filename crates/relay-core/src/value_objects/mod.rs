//! Value objects

mod subscriber_id;

pub use subscriber_id::SubscriberId;
