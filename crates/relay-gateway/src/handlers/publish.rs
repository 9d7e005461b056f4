//! Event publish handler

use super::{HandlerError, HandlerResult};
use crate::connection::ConnectionSession;
use crate::protocol::InboundFrame;

/// Handles every non-control frame: publish it to the topic named by its type
pub struct PublishHandler;

impl PublishHandler {
    pub fn handle(session: &ConnectionSession, frame: InboundFrame) -> HandlerResult<()> {
        let topic = frame.frame_type().to_string();
        let publisher_id = session
            .subscriber_id()
            .ok_or_else(|| HandlerError::NotAuthenticated(topic.clone()))?;

        let payload = frame.into_payload();
        let delivered = session.router().publish(&topic, &payload, publisher_id);

        tracing::trace!(
            session_id = %session.session_id(),
            topic = %topic,
            delivered,
            "Published event"
        );

        Ok(())
    }
}
