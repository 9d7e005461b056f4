//! Frame handlers
//!
//! Routes each decoded frame to the handler allowed for the session's state.

mod auth;
mod error;
mod publish;
mod subscription;

pub use auth::AuthHandler;
pub use error::{HandlerError, HandlerResult};
pub use publish::PublishHandler;
pub use subscription::SubscriptionHandler;

use crate::connection::ConnectionSession;
use crate::protocol::{FrameKind, InboundFrame};

/// Dispatch inbound frames to the appropriate handler
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle one decoded frame
    pub async fn dispatch(
        session: &mut ConnectionSession,
        frame: InboundFrame,
    ) -> HandlerResult<()> {
        if session.is_closed() {
            return Err(HandlerError::SessionClosed);
        }

        match (session.is_authenticated(), frame.kind()) {
            (false, FrameKind::Auth) => AuthHandler::handle(session, &frame).await,
            (false, _) => {
                tracing::warn!(
                    session_id = %session.session_id(),
                    frame_type = %frame.frame_type(),
                    "Frame before authentication"
                );
                Err(HandlerError::NotAuthenticated(frame.frame_type().to_string()))
            }
            (true, FrameKind::Auth) => {
                tracing::warn!(
                    session_id = %session.session_id(),
                    "Client sent auth while already authenticated"
                );
                Err(HandlerError::AlreadyAuthenticated)
            }
            (true, FrameKind::Subscribe) => SubscriptionHandler::subscribe(session, &frame),
            (true, FrameKind::Unsubscribe) => SubscriptionHandler::unsubscribe(session, &frame),
            (true, FrameKind::Event) => PublishHandler::handle(session, frame),
        }
    }
}
