//! Auth frame handler

use super::{HandlerError, HandlerResult};
use crate::connection::ConnectionSession;
use crate::protocol::{frame_types, presence_payload, AuthAck, InboundFrame};
use relay_core::AuthOutcome;
use std::sync::Arc;

/// Handles `auth` frames on unauthenticated sessions
pub struct AuthHandler;

impl AuthHandler {
    /// Check the credential, acknowledge, then announce `connected`
    ///
    /// A rejected credential sends nothing; the caller closes the socket.
    pub async fn handle(session: &mut ConnectionSession, frame: &InboundFrame) -> HandlerResult<()> {
        let authenticator = Arc::clone(session.authenticator());

        let identity = match authenticator.authenticate(frame.token()).await {
            Ok(AuthOutcome::Granted(identity)) => identity,
            Ok(AuthOutcome::Denied) => {
                tracing::info!(session_id = %session.session_id(), "Authentication failed");
                return Err(HandlerError::AuthenticationFailed);
            }
            Err(e) => {
                tracing::error!(
                    session_id = %session.session_id(),
                    error = %e,
                    code = e.code(),
                    "Identity service error"
                );
                return Err(e.into());
            }
        };

        let subscriber_id = identity.subscriber_id.clone();
        if !session.set_authenticated(identity) {
            return Err(HandlerError::AlreadyAuthenticated);
        }

        session.outbound().send_json(&AuthAck::success()).await?;

        if let Some(descriptor) = session.descriptor() {
            let payload = presence_payload(frame_types::CONNECTED, &descriptor)
                .map_err(HandlerError::Encode)?;
            session
                .router()
                .publish(frame_types::CONNECTED, &payload, &subscriber_id);
            session.mark_announced();
        }

        tracing::info!(
            session_id = %session.session_id(),
            subscriber_id = %subscriber_id,
            "Session authenticated"
        );

        Ok(())
    }
}
