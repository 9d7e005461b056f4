//! Relay end-to-end tests
//!
//! Each test spawns its own gateway on an ephemeral port; nothing external is
//! required.
//!
//! Run with: cargo test -p integration-tests --test relay_tests

use integration_tests::{TestServer, WsClient, SYNC_TOPIC};
use relay_common::AppConfig;
use serde_json::json;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_custom_ws_path() {
    let mut config = AppConfig::default();
    config.relay.ws_path = "/relay".to_string();
    let server = TestServer::start_with_config(config).await.unwrap();

    let mut client = server.connect().await.unwrap();
    client.auth("test1").await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_auth_success_is_acknowledged() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client
        .send_text(r#"{"type":"auth","token":"test1"}"#)
        .await
        .unwrap();

    assert_eq!(
        client.recv_json().await.unwrap(),
        json!({"type": "auth", "success": true})
    );
}

#[tokio::test]
async fn test_bad_token_closes_with_authentication_failed() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client
        .send_json(&json!({"type": "auth", "token": "bad_token"}))
        .await
        .unwrap();

    let (code, reason) = client.recv_close().await.unwrap();
    assert_eq!(code, 4004);
    assert!(reason.is_empty());
}

#[tokio::test]
async fn test_second_auth_closes_with_already_authenticated() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect_as("test1").await.unwrap();

    client
        .send_json(&json!({"type": "auth", "token": "test1"}))
        .await
        .unwrap();

    assert_eq!(client.recv_close_code().await.unwrap(), 4005);
}

#[tokio::test]
async fn test_subscribe_before_auth_closes_with_not_authenticated() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.subscribe(&["message"]).await.unwrap();

    assert_eq!(client.recv_close_code().await.unwrap(), 4003);
}

#[tokio::test]
async fn test_invalid_json_closes_with_decode_error() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_text("invalid JSON").await.unwrap();

    assert_eq!(client.recv_close_code().await.unwrap(), 4002);
}

#[tokio::test]
async fn test_frame_without_type_closes_with_decode_error() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect_as("test1").await.unwrap();

    client.send_text(r#"{"channels":["message"]}"#).await.unwrap();

    assert_eq!(client.recv_close_code().await.unwrap(), 4002);
}

// ============================================================================
// Routing Tests
// ============================================================================

/// `test1` observer subscribed to `channels`, plus an authenticated `test2`
/// helper; returns once the subscriptions are in place
async fn observer_with_helper(server: &TestServer, channels: &[&str]) -> (WsClient, WsClient) {
    let mut observer = server.connect_as("test1").await.unwrap();
    let mut helper = server.connect_as("test2").await.unwrap();

    // Once the helper hears a marker, its own `connected` has gone out to
    // nobody and cannot reach the observer's subscriptions below
    helper.subscribe(&[SYNC_TOPIC]).await.unwrap();
    helper.sync_on(&mut observer).await.unwrap();

    let mut all = channels.to_vec();
    all.push(SYNC_TOPIC);
    observer.subscribe(&all).await.unwrap();
    observer.sync_on(&mut helper).await.unwrap();

    (observer, helper)
}

#[tokio::test]
async fn test_connected_event_reaches_subscribers() {
    let server = TestServer::start().await.unwrap();
    let (mut observer, _helper) = observer_with_helper(&server, &["connected"]).await;

    let _other = server.connect_as("test2").await.unwrap();

    let event = observer.recv_json().await.unwrap();
    assert_eq!(event["type"], "connected");
    assert_eq!(event["service"]["id"], "2");
    assert_eq!(event["service"]["name"], "test2");
    assert!(event["service"]["session_id"].is_string());
}

#[tokio::test]
async fn test_event_fan_out_excludes_publisher() {
    let server = TestServer::start().await.unwrap();

    let mut listener = server.connect_as("test1").await.unwrap();
    let mut publisher = server.connect_as("test2").await.unwrap();
    listener.subscribe(&["test_event", SYNC_TOPIC]).await.unwrap();
    publisher.subscribe(&["test_event", "marker"]).await.unwrap();

    // Both sides' subscribe frames precede the markers they exchange here
    listener.sync_on(&mut publisher).await.unwrap();

    publisher
        .send_text(r#"{"type": "test_event", "test_field": true}"#)
        .await
        .unwrap();

    assert_eq!(
        listener.recv_json().await.unwrap(),
        json!({"type": "test_event", "test_field": true})
    );

    // The publisher's next frame is the marker, not its own event
    listener
        .send_json(&json!({"type": "marker"}))
        .await
        .unwrap();
    assert_eq!(publisher.recv_json().await.unwrap(), json!({"type": "marker"}));
}

#[tokio::test]
async fn test_unsubscribe_stops_delivery() {
    let server = TestServer::start().await.unwrap();

    let mut listener = server.connect_as("test1").await.unwrap();
    let mut publisher = server.connect_as("test2").await.unwrap();
    listener
        .subscribe(&["message", "marker", SYNC_TOPIC])
        .await
        .unwrap();
    listener.unsubscribe(&["message"]).await.unwrap();
    listener.sync_on(&mut publisher).await.unwrap();

    publisher
        .send_json(&json!({"type": "message", "text": "hidden"}))
        .await
        .unwrap();
    publisher
        .send_json(&json!({"type": "marker"}))
        .await
        .unwrap();

    assert_eq!(listener.recv_json().await.unwrap(), json!({"type": "marker"}));
}

#[tokio::test]
async fn test_disconnect_broadcasts_disconnected() {
    let server = TestServer::start().await.unwrap();
    let (mut observer, _helper) =
        observer_with_helper(&server, &["connected", "disconnected"]).await;

    let leaving = server.connect_as("test2").await.unwrap();
    let connected = observer.recv_json().await.unwrap();
    assert_eq!(connected["type"], "connected");

    leaving.close().await.unwrap();

    let event = observer.recv_json().await.unwrap();
    assert_eq!(event["type"], "disconnected");
    assert_eq!(event["service"]["id"], "2");
    assert_eq!(event["service"]["session_id"], connected["service"]["session_id"]);
}

#[tokio::test]
async fn test_unauthenticated_disconnect_is_silent() {
    let server = TestServer::start().await.unwrap();
    let (mut observer, mut helper) =
        observer_with_helper(&server, &["disconnected", "marker"]).await;

    let anonymous = server.connect().await.unwrap();
    anonymous.close().await.unwrap();

    helper.send_json(&json!({"type": "marker"})).await.unwrap();

    assert_eq!(observer.recv_json().await.unwrap(), json!({"type": "marker"}));
}
