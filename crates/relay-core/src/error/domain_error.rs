//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
///
/// A rejected credential is not an error (see `AuthOutcome::Denied`); this
/// covers an identity backend that could not answer at all.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Identity service unavailable: {0}")]
    IdentityServiceUnavailable(String),
}

impl DomainError {
    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::IdentityServiceUnavailable(_) => "IDENTITY_SERVICE_UNAVAILABLE",
        }
    }
}
