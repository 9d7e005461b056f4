//! Subscribe / unsubscribe frame handler

use super::{HandlerError, HandlerResult};
use crate::connection::ConnectionSession;
use crate::protocol::{frame_types, InboundFrame};

/// Handles `subscribe` and `unsubscribe` frames
pub struct SubscriptionHandler;

impl SubscriptionHandler {
    /// Subscribe the session's socket to every listed topic
    ///
    /// Subscribing twice delivers twice. No acknowledgement is sent.
    pub fn subscribe(session: &ConnectionSession, frame: &InboundFrame) -> HandlerResult<()> {
        let channels = frame.channels()?;
        let subscriber_id = session
            .subscriber_id()
            .ok_or_else(|| HandlerError::NotAuthenticated(frame_types::SUBSCRIBE.to_string()))?;

        if let Some(identity) = session.identity() {
            for topic in channels.iter().filter(|topic| !identity.allows(topic)) {
                tracing::debug!(
                    session_id = %session.session_id(),
                    topic = %topic,
                    "Subscribing outside the identity's topic list"
                );
            }
        }

        let outbound = session.outbound().clone();
        session
            .router()
            .subscribe(channels.iter().cloned(), subscriber_id, move |payload| {
                outbound.deliver(payload);
            });

        tracing::debug!(
            session_id = %session.session_id(),
            subscriber_id = %subscriber_id,
            channels = ?channels,
            "Subscribed"
        );

        Ok(())
    }

    /// Remove every subscription of the session's identity on the listed topics
    pub fn unsubscribe(session: &ConnectionSession, frame: &InboundFrame) -> HandlerResult<()> {
        let channels = frame.channels()?;
        let subscriber_id = session
            .subscriber_id()
            .ok_or_else(|| HandlerError::NotAuthenticated(frame_types::UNSUBSCRIBE.to_string()))?;

        let removed: usize = channels
            .iter()
            .map(|topic| session.router().unsubscribe(topic, subscriber_id))
            .sum();

        tracing::debug!(
            session_id = %session.session_id(),
            subscriber_id = %subscriber_id,
            channels = ?channels,
            removed,
            "Unsubscribed"
        );

        Ok(())
    }
}
