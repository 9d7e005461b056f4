//! Connection session
//!
//! Protocol state of one socket: unauthenticated until a successful `auth`
//! frame, authenticated afterwards, closed exactly once when the transport goes
//! away.

use super::FrameSender;
use crate::handlers::{HandlerResult, MessageDispatcher};
use crate::protocol::{frame_types, presence_payload, InboundFrame, SessionDescriptor};
use crate::router::EventRouter;
use relay_core::{Authenticator, Identity, SubscriberId};
use std::sync::Arc;
use std::time::Instant;

/// Session protocol state
///
/// The identity lives inside `Authenticated`, so a session has an identity
/// exactly when it is authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for an auth frame
    Unauthenticated,
    /// Authenticated; subscriptions may change freely
    Authenticated(Identity),
    /// Torn down
    Closed,
}

/// One connection's protocol session
pub struct ConnectionSession {
    /// Unique per-connection ID (logging and presence payloads only)
    session_id: String,

    state: SessionState,

    router: Arc<EventRouter>,

    authenticator: Arc<dyn Authenticator>,

    /// Queue of frames for this connection's socket
    outbound: FrameSender,

    /// Whether `connected` went out; `disconnected` is only sent to match it
    announced: bool,

    created_at: Instant,
}

impl ConnectionSession {
    /// Generate a new session ID
    #[must_use]
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Create an unauthenticated session bound to the shared router
    pub fn new(
        session_id: String,
        router: Arc<EventRouter>,
        authenticator: Arc<dyn Authenticator>,
        outbound: FrameSender,
    ) -> Self {
        Self {
            session_id,
            state: SessionState::Unauthenticated,
            router,
            authenticator,
            outbound,
            announced: false,
            created_at: Instant::now(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The authenticated identity, if any
    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// The routing identity used for every router call of this session
    pub fn subscriber_id(&self) -> Option<&SubscriberId> {
        self.identity().map(|identity| &identity.subscriber_id)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, SessionState::Closed)
    }

    pub fn router(&self) -> &Arc<EventRouter> {
        &self.router
    }

    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.authenticator
    }

    pub fn outbound(&self) -> &FrameSender {
        &self.outbound
    }

    /// Get session age
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    /// Reference to this session for presence events
    pub fn descriptor(&self) -> Option<SessionDescriptor> {
        self.identity().map(|identity| SessionDescriptor {
            session_id: self.session_id.clone(),
            identity: identity.clone(),
        })
    }

    /// Move from unauthenticated to authenticated
    ///
    /// Returns false (and changes nothing) from any other state.
    pub(crate) fn set_authenticated(&mut self, identity: Identity) -> bool {
        if !matches!(self.state, SessionState::Unauthenticated) {
            return false;
        }
        self.state = SessionState::Authenticated(identity);
        true
    }

    /// Whether `connected` has been broadcast for this session
    pub fn is_announced(&self) -> bool {
        self.announced
    }

    pub(crate) fn mark_announced(&mut self) {
        self.announced = true;
    }

    /// Decode and act on one inbound text frame
    ///
    /// Any `Err` is fatal: the caller must close the transport.
    pub async fn handle_text(&mut self, text: &str) -> HandlerResult<()> {
        let frame = InboundFrame::parse(text)?;

        tracing::trace!(
            session_id = %self.session_id,
            frame_type = %frame.frame_type(),
            "Received frame"
        );

        MessageDispatcher::dispatch(self, frame).await
    }

    /// Tear the session down after the transport closed
    ///
    /// An authenticated session leaves every topic and, if its `connected`
    /// went out, broadcasts `disconnected`; an unauthenticated one touches
    /// nothing. Only the first call does anything; returns whether this call
    /// did the teardown.
    pub fn close(&mut self) -> bool {
        match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Closed => false,
            SessionState::Unauthenticated => {
                tracing::debug!(
                    session_id = %self.session_id,
                    "Session closed before authenticating"
                );
                true
            }
            SessionState::Authenticated(identity) => {
                let removed = self.router.remove_all(&identity.subscriber_id);

                let descriptor = SessionDescriptor {
                    session_id: self.session_id.clone(),
                    identity,
                };

                if self.announced {
                    match presence_payload(frame_types::DISCONNECTED, &descriptor) {
                        Ok(payload) => {
                            self.router.publish(
                                frame_types::DISCONNECTED,
                                &payload,
                                &descriptor.identity.subscriber_id,
                            );
                        }
                        Err(e) => {
                            tracing::warn!(
                                session_id = %self.session_id,
                                error = %e,
                                "Failed to encode disconnected event"
                            );
                        }
                    }
                }

                tracing::info!(
                    session_id = %self.session_id,
                    subscriber_id = %descriptor.identity.subscriber_id,
                    removed_subscriptions = removed,
                    age_ms = self.age().as_millis(),
                    "Session closed"
                );
                true
            }
        }
    }
}

impl std::fmt::Debug for ConnectionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSession")
            .field("session_id", &self.session_id)
            .field("state", &self.state)
            .field("announced", &self.announced)
            .field("created_at", &self.created_at)
            .finish()
    }
}
