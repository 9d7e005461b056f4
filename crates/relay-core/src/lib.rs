//! # relay-core
//!
//! Domain layer containing connection identities, value objects, and the authenticator port.
//! This crate has zero dependencies on infrastructure (web framework, runtime, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::Identity;
pub use error::DomainError;
pub use traits::{AuthOutcome, AuthResult, Authenticator};
pub use value_objects::SubscriberId;
