//! Domain entities

mod identity;

pub use identity::Identity;
