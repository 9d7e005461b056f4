//! Test helpers shared by session and handler tests

use super::{ConnectionSession, FrameSender, Outbound};
use crate::protocol::AuthAck;
use crate::router::EventRouter;
use parking_lot::Mutex;
use relay_common::StaticTokenAuthenticator;
use relay_core::SubscriberId;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

pub(crate) const AUTH_TEST1: &str = r#"{"type":"auth","token":"test1"}"#;

/// Session over the default token table with a small outbound queue
pub(crate) fn test_session(
    router: Arc<EventRouter>,
) -> (ConnectionSession, mpsc::Receiver<Outbound>) {
    let session_id = ConnectionSession::generate_id();
    let (outbound, rx) = FrameSender::channel(session_id.as_str(), 16);
    let session = ConnectionSession::new(
        session_id,
        router,
        Arc::new(StaticTokenAuthenticator::with_default_tokens()),
        outbound,
    );
    (session, rx)
}

/// Subscribe a recording handler to `topic` under `subscriber_id`
pub(crate) fn spy(
    router: &EventRouter,
    topic: &str,
    subscriber_id: &str,
) -> Arc<Mutex<Vec<Value>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    router.subscribe([topic], &SubscriberId::new(subscriber_id), move |payload| {
        sink.lock().push(payload.clone());
    });
    seen
}

/// Drain every queued text frame
pub(crate) fn texts(rx: &mut mpsc::Receiver<Outbound>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        if let Outbound::Text(text) = frame {
            out.push(text);
        }
    }
    out
}

pub(crate) fn auth_ack() -> String {
    serde_json::to_string(&AuthAck::success()).unwrap()
}
