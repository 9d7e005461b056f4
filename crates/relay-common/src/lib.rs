//! # relay-common
//!
//! Shared utilities including configuration, error handling, the static-token
//! authenticator, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{StaticTokenAuthenticator, TokenEntry};
pub use config::{AppConfig, AppSettings, ConfigError, Environment, RelayConfig, ServerConfig};
pub use error::{AppError, AppResult};
pub use telemetry::{try_init_tracing_with_config, TracingConfig, TracingError};
