//! Test helpers for integration tests
//!
//! Spawns the gateway on an ephemeral port and wraps a WebSocket client.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use relay_common::AppConfig;
use relay_gateway::server::{create_app, create_gateway_state};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// How long a test waits for a frame before failing
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// How long `sync_on` waits for one marker before publishing the next
const SYNC_POLL: Duration = Duration::from_millis(50);

/// Topic reserved for `sync_on` markers
pub const SYNC_TOPIC: &str = "sync";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    ws_path: String,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with default configuration
    pub async fn start() -> Result<Self> {
        Self::start_with_config(AppConfig::default()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let ws_path = config.relay.ws_path.clone();
        let app = create_app(create_gateway_state(config));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            ws_path,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// WebSocket URL of the relay route
    pub fn ws_url(&self) -> String {
        format!("ws://{}{}", self.addr, self.ws_path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Open a relay connection
    pub async fn connect(&self) -> Result<WsClient> {
        WsClient::connect(&self.ws_url()).await
    }

    /// Open a relay connection and authenticate with `token`
    pub async fn connect_as(&self, token: &str) -> Result<WsClient> {
        let mut client = self.connect().await?;
        client.auth(token).await?;
        Ok(client)
    }
}

/// Thin WebSocket client speaking the relay frame format
pub struct WsClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws, _) = connect_async(url).await.context("WebSocket connect failed")?;
        Ok(Self { ws })
    }

    /// Send a raw text frame
    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.ws.send(Message::text(text)).await?;
        Ok(())
    }

    /// Send a JSON frame
    pub async fn send_json(&mut self, frame: &Value) -> Result<()> {
        self.send_text(&frame.to_string()).await
    }

    /// Authenticate and check the acknowledgement
    pub async fn auth(&mut self, token: &str) -> Result<()> {
        self.send_json(&json!({"type": "auth", "token": token})).await?;
        let ack = self.recv_json().await?;
        anyhow::ensure!(
            ack == json!({"type": "auth", "success": true}),
            "unexpected auth reply: {ack}"
        );
        Ok(())
    }

    pub async fn subscribe(&mut self, channels: &[&str]) -> Result<()> {
        self.send_json(&json!({"type": "subscribe", "channels": channels}))
            .await
    }

    pub async fn unsubscribe(&mut self, channels: &[&str]) -> Result<()> {
        self.send_json(&json!({"type": "unsubscribe", "channels": channels}))
            .await
    }

    /// Wait for the next text frame and decode it
    pub async fn recv_json(&mut self) -> Result<Value> {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .context("timed out waiting for a frame")?
                .context("connection ended")??;

            match msg {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Ping(_) | Message::Pong(_) => {}
                other => anyhow::bail!("expected a text frame, got {other:?}"),
            }
        }
    }

    /// Wait for the server to close the connection and return the close code
    pub async fn recv_close_code(&mut self) -> Result<u16> {
        Ok(self.recv_close().await?.0)
    }

    /// Wait for the server to close the connection and return code and reason
    pub async fn recv_close(&mut self) -> Result<(u16, String)> {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .context("timed out waiting for close")?
                .context("connection ended without a close frame")??;

            match msg {
                Message::Close(Some(frame)) => {
                    return Ok((u16::from(frame.code), frame.reason.into_owned()))
                }
                Message::Close(None) => anyhow::bail!("close frame without a code"),
                Message::Text(text) => anyhow::bail!("expected close, got text {text}"),
                _ => {}
            }
        }
    }

    /// Block until every frame this client already sent has been processed
    ///
    /// The client must be subscribed to `SYNC_TOPIC` and `publisher` must be
    /// an authenticated connection of another identity. Frames of one
    /// connection are handled in order, so once a marker from `publisher`
    /// arrives here the earlier subscribe/unsubscribe frames have taken
    /// effect. Markers are numbered: a publish either reaches the
    /// subscription or is dropped, so after the first one arrives every
    /// later one is drained too.
    pub async fn sync_on(&mut self, publisher: &mut WsClient) -> Result<()> {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        let mut sent = 0u64;

        let first = loop {
            anyhow::ensure!(
                tokio::time::Instant::now() < deadline,
                "sync marker never arrived"
            );
            publisher
                .send_json(&json!({"type": SYNC_TOPIC, "seq": sent}))
                .await?;
            sent += 1;

            match tokio::time::timeout(SYNC_POLL, self.recv_json()).await {
                Ok(frame) => break frame?,
                Err(_) => continue,
            }
        };

        let mut last = marker_seq(&first)?;
        while last + 1 < sent {
            last = marker_seq(&self.recv_json().await?)?;
        }
        Ok(())
    }

    /// Close the connection from the client side and wait for the server's reply
    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await?;
        while let Some(msg) = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
            .await
            .context("timed out waiting for close reply")?
        {
            if msg.is_err() {
                break;
            }
        }
        Ok(())
    }
}

fn marker_seq(frame: &Value) -> Result<u64> {
    anyhow::ensure!(frame["type"] == SYNC_TOPIC, "expected a sync marker, got {frame}");
    frame["seq"]
        .as_u64()
        .context("sync marker without a sequence number")
}
