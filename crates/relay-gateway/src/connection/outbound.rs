//! Outbound frame queue
//!
//! Frames for a connection are queued on a bounded channel and written to the
//! socket by a single writer task.

use crate::protocol::CloseCode;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Something for the socket writer to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Write a text frame
    Text(String),
    /// Send a close frame and stop writing
    Close(CloseCode),
}

/// Outbound queue errors
#[derive(Debug, thiserror::Error)]
pub enum OutboundError {
    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Outbound channel closed")]
    Closed,
}

/// Cloneable handle to a connection's outbound queue
#[derive(Clone)]
pub struct FrameSender {
    session_id: Arc<str>,
    tx: mpsc::Sender<Outbound>,
}

impl FrameSender {
    /// Wrap an existing channel
    pub fn new(session_id: impl Into<Arc<str>>, tx: mpsc::Sender<Outbound>) -> Self {
        Self {
            session_id: session_id.into(),
            tx,
        }
    }

    /// Create a queue of the given capacity and return both ends
    pub fn channel(
        session_id: impl Into<Arc<str>>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(session_id, tx), rx)
    }

    /// Session this queue belongs to
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Serialize and queue a frame, waiting for room in the queue
    pub async fn send_json<T: Serialize>(&self, frame: &T) -> Result<(), OutboundError> {
        let text = serde_json::to_string(frame)?;
        self.tx
            .send(Outbound::Text(text))
            .await
            .map_err(|_| OutboundError::Closed)
    }

    /// Serialize and queue a delivered event without waiting
    ///
    /// Used from router handlers, which run synchronously inside a publish.
    /// A full queue drops the event. Returns whether the event was queued.
    pub fn deliver(&self, payload: &Value) -> bool {
        let text = match serde_json::to_string(payload) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(session_id = %self.session_id, error = %e, "Failed to encode event");
                return false;
            }
        };

        match self.tx.try_send(Outbound::Text(text)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(session_id = %self.session_id, "Outbound queue full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::trace!(session_id = %self.session_id, "Outbound queue closed, dropping event");
                false
            }
        }
    }

    /// Ask the writer to send a close frame
    pub async fn close(&self, code: CloseCode) {
        if self.tx.send(Outbound::Close(code)).await.is_err() {
            tracing::trace!(session_id = %self.session_id, "Writer already gone");
        }
    }

}

impl std::fmt::Debug for FrameSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSender")
            .field("session_id", &self.session_id)
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}
