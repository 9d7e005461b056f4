//! Relay frame format
//!
//! Every WebSocket text message is one JSON object with a string `type`.
//! Three types are control frames; any other type names the topic the frame
//! is published to.

use relay_core::Identity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Reserved frame and event type names
pub mod frame_types {
    pub const AUTH: &str = "auth";
    pub const SUBSCRIBE: &str = "subscribe";
    pub const UNSUBSCRIBE: &str = "unsubscribe";
    pub const CONNECTED: &str = "connected";
    pub const DISCONNECTED: &str = "disconnected";
}

/// Frame decoding errors
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("frame is not a JSON object")]
    NotAnObject,

    #[error("frame has no type")]
    MissingType,

    #[error("channels must be a string or an array of strings")]
    InvalidChannels,
}

/// What an inbound frame asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Auth,
    Subscribe,
    Unsubscribe,
    /// Anything else: publish the frame to the topic named by its type
    Event,
}

/// A decoded inbound frame
#[derive(Debug, Clone, PartialEq)]
pub struct InboundFrame {
    frame_type: String,
    body: Map<String, Value>,
}

/// `channels` accepts a single topic or a list
#[derive(Deserialize)]
#[serde(untagged)]
enum Channels {
    One(String),
    Many(Vec<String>),
}

impl InboundFrame {
    /// Decode a text message
    ///
    /// The message must be a JSON object whose `type` is a non-empty string.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let Value::Object(body) = serde_json::from_str::<Value>(text)? else {
            return Err(FrameError::NotAnObject);
        };

        let frame_type = match body.get("type") {
            Some(Value::String(t)) if !t.is_empty() => t.clone(),
            _ => return Err(FrameError::MissingType),
        };

        Ok(Self { frame_type, body })
    }

    /// The frame's `type` field
    pub fn frame_type(&self) -> &str {
        &self.frame_type
    }

    pub fn kind(&self) -> FrameKind {
        match self.frame_type.as_str() {
            frame_types::AUTH => FrameKind::Auth,
            frame_types::SUBSCRIBE => FrameKind::Subscribe,
            frame_types::UNSUBSCRIBE => FrameKind::Unsubscribe,
            _ => FrameKind::Event,
        }
    }

    /// The credential of an auth frame
    ///
    /// A missing or non-string token reads as the empty credential.
    pub fn token(&self) -> &str {
        self.body.get("token").and_then(Value::as_str).unwrap_or_default()
    }

    /// Topic names of a subscribe/unsubscribe frame
    pub fn channels(&self) -> Result<Vec<String>, FrameError> {
        let raw = self.body.get("channels").ok_or(FrameError::InvalidChannels)?;

        match Channels::deserialize(raw) {
            Ok(Channels::One(topic)) => Ok(vec![topic]),
            Ok(Channels::Many(topics)) => Ok(topics),
            Err(_) => Err(FrameError::InvalidChannels),
        }
    }

    /// The whole frame, `type` included, as the payload to publish
    pub fn into_payload(self) -> Value {
        Value::Object(self.body)
    }
}

/// Acknowledgement of a successful auth frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthAck {
    #[serde(rename = "type")]
    pub frame_type: String,
    pub success: bool,
}

impl AuthAck {
    #[must_use]
    pub fn success() -> Self {
        Self {
            frame_type: frame_types::AUTH.to_string(),
            success: true,
        }
    }
}

/// Reference to a session carried in presence events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionDescriptor {
    /// Per-connection id, for correlating logs; never used for routing
    pub session_id: String,
    #[serde(flatten)]
    pub identity: Identity,
}

/// Build a `connected` / `disconnected` payload
pub fn presence_payload(
    event_type: &str,
    session: &SessionDescriptor,
) -> Result<Value, serde_json::Error> {
    let mut payload = Map::new();
    payload.insert("type".to_string(), Value::String(event_type.to_string()));
    payload.insert("service".to_string(), serde_json::to_value(session)?);
    Ok(Value::Object(payload))
}
