//! Identity entity - who an authenticated connection is

use serde::{Deserialize, Serialize};

use crate::value_objects::SubscriberId;

/// Identity produced by the authenticator on a successful login
///
/// Serialized with the short wire names (`id`, `name`, `topics`) used in
/// presence broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Routing identity used for every router call of the connection
    #[serde(rename = "id")]
    pub subscriber_id: SubscriberId,
    /// Human readable name
    #[serde(rename = "name")]
    pub display_name: String,
    /// Topics the identity is meant to use, in the order the authenticator listed them.
    ///
    /// Informational only: neither subscribe nor publish checks this list.
    #[serde(rename = "topics", default)]
    pub allowed_topics: Vec<String>,
}

impl Identity {
    /// Create a new identity
    pub fn new(
        subscriber_id: impl Into<SubscriberId>,
        display_name: impl Into<String>,
        allowed_topics: Vec<String>,
    ) -> Self {
        Self {
            subscriber_id: subscriber_id.into(),
            display_name: display_name.into(),
            allowed_topics,
        }
    }

    /// Check whether a topic appears in the allowed list
    pub fn allows(&self, topic: &str) -> bool {
        self.allowed_topics.iter().any(|t| t == topic)
    }
}
