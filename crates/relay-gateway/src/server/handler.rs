//! WebSocket handler
//!
//! Drives one connection: a writer task drains the outbound queue into the
//! socket while the read loop feeds text frames to the session.

use crate::connection::{ConnectionSession, FrameSender, Outbound};
use crate::protocol::CloseCode;
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long the writer may take to flush a close frame
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let session_id = ConnectionSession::generate_id();

    let (outbound, rx) =
        FrameSender::channel(session_id.as_str(), state.config().relay.outbound_buffer);

    let mut session = ConnectionSession::new(
        session_id.clone(),
        Arc::clone(state.router()),
        Arc::clone(state.authenticator()),
        outbound.clone(),
    );

    tracing::info!(session_id = %session_id, "WebSocket connection established");

    let (ws_sink, mut ws_stream) = socket.split();

    let mut send_task = tokio::spawn(write_frames(session_id.clone(), ws_sink, rx));
    let mut send_finished = false;

    let close_code = loop {
        tokio::select! {
            msg = ws_stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    if let Err(close_code) = handle_text_message(&mut session, &text).await {
                        break Some(close_code);
                    }
                }
                Some(Ok(Message::Binary(_))) => {
                    tracing::debug!(session_id = %session_id, "Binary messages not supported");
                    break Some(CloseCode::DecodeError);
                }
                Some(Ok(Message::Ping(_))) => {
                    // Pong is handled automatically by axum
                    tracing::trace!(session_id = %session_id, "Ping received");
                }
                Some(Ok(Message::Pong(_))) => {
                    tracing::trace!(session_id = %session_id, "Pong received");
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!(session_id = %session_id, "Client closed connection");
                    break None;
                }
                Some(Err(e)) => {
                    tracing::warn!(session_id = %session_id, error = %e, "WebSocket error");
                    break Some(CloseCode::UnknownError);
                }
            },
            _ = &mut send_task => {
                tracing::debug!(session_id = %session_id, "Send task ended");
                send_finished = true;
                break None;
            }
        }
    };

    if let Some(code) = close_code {
        tracing::debug!(
            session_id = %session_id,
            close_code = %code,
            "Closing connection due to protocol violation"
        );
        if tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, outbound.close(code))
            .await
            .is_err()
        {
            tracing::warn!(session_id = %session_id, "Outbound queue stuck, close frame not queued");
        }
    }

    // Teardown: leave every topic and announce the departure
    session.close();
    drop(session);
    drop(outbound);

    if !send_finished
        && tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut send_task)
            .await
            .is_err()
    {
        tracing::warn!(session_id = %session_id, "Writer did not finish, aborting");
        send_task.abort();
    }

    tracing::info!(session_id = %session_id, "Connection cleaned up");
}

/// Write queued frames to the socket until a close is requested or every sender is gone
async fn write_frames(
    session_id: String,
    mut ws_sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Outbound>,
) {
    while let Some(frame) = rx.recv().await {
        match frame {
            Outbound::Text(text) => {
                if ws_sink.send(Message::Text(text)).await.is_err() {
                    tracing::warn!(
                        session_id = %session_id,
                        "Failed to send message to WebSocket"
                    );
                    break;
                }
            }
            Outbound::Close(code) => {
                let close = CloseFrame {
                    code: code.as_u16(),
                    reason: code.close_reason().into(),
                };
                if ws_sink.send(Message::Close(Some(close))).await.is_err() {
                    tracing::debug!(session_id = %session_id, "Failed to send close frame");
                }
                break;
            }
        }
    }

    // Close the WebSocket when channel is closed
    let _ = ws_sink.close().await;
}

/// Handle a text message from the client
async fn handle_text_message(session: &mut ConnectionSession, text: &str) -> Result<(), CloseCode> {
    session.handle_text(text).await.map_err(|e| {
        let close_code = e.to_close_code();
        tracing::warn!(
            session_id = %session.session_id(),
            error = %e,
            close_code = close_code.as_u16(),
            "Handler error"
        );
        close_code
    })
}
