//! Authentication backends

mod static_tokens;

pub use static_tokens::{StaticTokenAuthenticator, TokenEntry};
