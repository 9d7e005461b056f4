//! Static token authenticator
//!
//! Exact-match lookup over a small in-memory credential table. Stands in for a
//! real identity service behind the same `Authenticator` contract.

use async_trait::async_trait;
use relay_core::{AuthOutcome, AuthResult, Authenticator, Identity};

/// One row of the credential table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEntry {
    pub token: String,
    pub identity: Identity,
}

impl TokenEntry {
    pub fn new(token: impl Into<String>, identity: Identity) -> Self {
        Self {
            token: token.into(),
            identity,
        }
    }
}

/// Authenticator backed by a fixed list of known tokens
#[derive(Debug, Clone)]
pub struct StaticTokenAuthenticator {
    entries: Vec<TokenEntry>,
}

impl StaticTokenAuthenticator {
    /// Create an authenticator over the given table
    #[must_use]
    pub fn new(entries: Vec<TokenEntry>) -> Self {
        Self { entries }
    }

    /// The built-in development table (`test1`, `test2`)
    #[must_use]
    pub fn with_default_tokens() -> Self {
        let topics = |names: &[&str]| -> Vec<String> {
            names.iter().map(ToString::to_string).collect()
        };

        Self::new(vec![
            TokenEntry::new(
                "test1",
                Identity::new("1", "test1", topics(&["message", "player_join", "player_part"])),
            ),
            TokenEntry::new(
                "test2",
                Identity::new(
                    "2",
                    "test2",
                    topics(&[
                        "connected",
                        "disconnected",
                        "message",
                        "player_join",
                        "player_part",
                    ]),
                ),
            ),
        ])
    }

    /// Find the identity for a token without going through the async trait
    pub fn lookup(&self, credential: &str) -> Option<&Identity> {
        self.entries
            .iter()
            .find(|entry| entry.token == credential)
            .map(|entry| &entry.identity)
    }

    /// Number of known tokens
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StaticTokenAuthenticator {
    fn default() -> Self {
        Self::with_default_tokens()
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, credential: &str) -> AuthResult<AuthOutcome> {
        let outcome = AuthOutcome::from(self.lookup(credential).cloned());

        tracing::debug!(granted = outcome.is_granted(), "Static token lookup");

        Ok(outcome)
    }
}
