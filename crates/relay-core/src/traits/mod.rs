//! Domain traits (ports)

mod authenticator;

pub use authenticator::{AuthOutcome, AuthResult, Authenticator};
