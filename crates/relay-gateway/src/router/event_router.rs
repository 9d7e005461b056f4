//! Topic router
//!
//! In-memory topic → subscriber table shared by every connection. A single
//! mutex serializes all four operations; handlers run after the lock is
//! released so a handler can never re-enter a locked router.

use parking_lot::Mutex;
use relay_core::SubscriberId;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Callback invoked with every payload delivered to a subscription
pub type EventHandler = Arc<dyn Fn(&Value) + Send + Sync>;

/// One subscription entry on a topic
struct Subscription {
    subscriber_id: SubscriberId,
    handler: EventHandler,
}

/// Multi-topic, multi-subscriber dispatch table
///
/// Topics are created on first subscribe and never removed. Subscribing the
/// same `(topic, subscriber_id)` twice stores two entries, and both are called
/// on every publish.
pub struct EventRouter {
    topics: Mutex<HashMap<String, Vec<Subscription>>>,
}

impl EventRouter {
    /// Create an empty router
    #[must_use]
    pub fn new() -> Self {
        Self {
            topics: Mutex::new(HashMap::new()),
        }
    }

    /// Create an empty router wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register `handler` under `subscriber_id` on each of `topics`
    ///
    /// All topics share the same handler instance.
    pub fn subscribe<I, T, F>(&self, topics: I, subscriber_id: &SubscriberId, handler: F)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let handler: EventHandler = Arc::new(handler);
        let mut table = self.topics.lock();

        for topic in topics {
            let topic = topic.into();
            let entries = table.entry(topic.clone()).or_insert_with(|| {
                tracing::debug!(topic = %topic, "Creating topic");
                Vec::new()
            });

            entries.push(Subscription {
                subscriber_id: subscriber_id.clone(),
                handler: Arc::clone(&handler),
            });

            tracing::debug!(
                topic = %topic,
                subscriber_id = %subscriber_id,
                "Subscribed to topic"
            );
        }
    }

    /// Remove every entry of `subscriber_id` on `topic`
    ///
    /// Returns the number of entries removed. The topic itself stays, even if empty.
    pub fn unsubscribe(&self, topic: &str, subscriber_id: &SubscriberId) -> usize {
        let mut table = self.topics.lock();

        let Some(entries) = table.get_mut(topic) else {
            return 0;
        };

        let before = entries.len();
        entries.retain(|s| &s.subscriber_id != subscriber_id);
        let removed = before - entries.len();

        tracing::debug!(
            topic = %topic,
            subscriber_id = %subscriber_id,
            removed = removed,
            "Unsubscribed from topic"
        );

        removed
    }

    /// Deliver `payload` to every subscriber of `topic` except `publisher_id`
    ///
    /// Handlers are called in subscription order. Returns the number of
    /// handlers invoked.
    pub fn publish(&self, topic: &str, payload: &Value, publisher_id: &SubscriberId) -> usize {
        let handlers: Vec<EventHandler> = {
            let table = self.topics.lock();
            match table.get(topic) {
                Some(entries) => entries
                    .iter()
                    .filter(|s| &s.subscriber_id != publisher_id)
                    .map(|s| Arc::clone(&s.handler))
                    .collect(),
                None => Vec::new(),
            }
        };

        for handler in &handlers {
            handler(payload);
        }

        tracing::trace!(
            topic = %topic,
            publisher_id = %publisher_id,
            delivered = handlers.len(),
            "Published event"
        );

        handlers.len()
    }

    /// Remove `subscriber_id` from every topic
    ///
    /// Returns the total number of entries removed.
    pub fn remove_all(&self, subscriber_id: &SubscriberId) -> usize {
        let mut table = self.topics.lock();
        let mut removed = 0;

        for entries in table.values_mut() {
            let before = entries.len();
            entries.retain(|s| &s.subscriber_id != subscriber_id);
            removed += before - entries.len();
        }

        tracing::debug!(
            subscriber_id = %subscriber_id,
            removed = removed,
            "Removed all subscriptions"
        );

        removed
    }

    /// Number of known topics, including empty ones
    pub fn topic_count(&self) -> usize {
        self.topics.lock().len()
    }

    /// Whether a topic has ever been subscribed to
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.lock().contains_key(topic)
    }

    /// Number of entries on a topic
    pub fn subscription_count(&self, topic: &str) -> usize {
        self.topics.lock().get(topic).map_or(0, Vec::len)
    }

    /// Total number of entries across all topics
    pub fn total_subscriptions(&self) -> usize {
        self.topics.lock().values().map(Vec::len).sum()
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.topics.lock();
        f.debug_struct("EventRouter")
            .field("topics", &table.len())
            .field(
                "subscriptions",
                &table.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}
