//! Authenticator trait (port) - maps a credential to an identity
//!
//! The domain layer defines what it needs; a static table, a token service,
//! or any other identity backend provides the implementation.

use async_trait::async_trait;

use crate::entities::Identity;
use crate::error::DomainError;

/// Result type for authenticator calls
pub type AuthResult<T> = Result<T, DomainError>;

/// Outcome of checking a credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credential accepted
    Granted(Identity),
    /// Credential rejected
    Denied,
}

impl AuthOutcome {
    /// Whether the credential was accepted
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

impl From<Option<Identity>> for AuthOutcome {
    fn from(identity: Option<Identity>) -> Self {
        identity.map_or(Self::Denied, Self::Granted)
    }
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Check a credential and return the identity it belongs to
    ///
    /// `Err` means the backend could not decide, not that the credential was bad.
    async fn authenticate(&self, credential: &str) -> AuthResult<AuthOutcome>;
}
