//! Handler error types

use crate::connection::OutboundError;
use crate::protocol::{CloseCode, FrameError};
use relay_core::DomainError;
use thiserror::Error;

/// Handler error type
///
/// Every variant ends the connection.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame could not be decoded
    #[error("Invalid frame: {0}")]
    InvalidFrame(#[from] FrameError),

    /// Non-auth frame before authenticating
    #[error("Not authenticated: {0} frame before auth")]
    NotAuthenticated(String),

    /// Second auth frame
    #[error("Already authenticated")]
    AlreadyAuthenticated,

    /// Credential rejected
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Identity service could not answer
    #[error("Identity service error: {0}")]
    IdentityService(#[from] DomainError),

    /// Frame arrived after teardown
    #[error("Session closed")]
    SessionClosed,

    /// Presence payload could not be encoded
    #[error("Encode error: {0}")]
    Encode(serde_json::Error),

    /// Writer side is gone
    #[error("Outbound error: {0}")]
    Outbound(#[from] OutboundError),
}

impl HandlerError {
    /// Close code sent to the client for this error
    pub fn to_close_code(&self) -> CloseCode {
        match self {
            Self::InvalidFrame(_) => CloseCode::DecodeError,
            Self::NotAuthenticated(_) => CloseCode::NotAuthenticated,
            Self::AlreadyAuthenticated => CloseCode::AlreadyAuthenticated,
            Self::AuthenticationFailed => CloseCode::AuthenticationFailed,
            Self::IdentityService(_)
            | Self::SessionClosed
            | Self::Encode(_)
            | Self::Outbound(_) => CloseCode::UnknownError,
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
