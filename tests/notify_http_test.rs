//! HTTP surface integration tests: health check, the internal notify
//! gateway, and the fallback emit endpoint.
//!
//! Tests build the router directly around a `Relay` they keep a handle
//! to, so broadcasts can be observed on plain channel receivers standing
//! in for connected sockets.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chat_relay::relay::registry::ConnectionId;
use chat_relay::routes::create_router;
use chat_relay::server::{AppState, RelayConfig};
use chat_relay::shared::RoomId;
use chat_relay::{Relay, RelayEvent};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;

const TEST_SECRET: &str = "test-secret";

fn test_server(relay: Relay) -> TestServer {
    let config = RelayConfig {
        port: 0,
        client_url: "http://localhost:3000".to_string(),
        internal_secret: TEST_SECRET.to_string(),
    };
    let app = create_router(AppState::new(relay, config));
    TestServer::new(app).expect("failed to build test server")
}

fn secret_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-internal-secret"),
        HeaderValue::from_static(TEST_SECRET),
    )
}

/// Connect a channel-backed client and swallow its handshake.
fn connect(relay: &Relay) -> (ConnectionId, UnboundedReceiver<RelayEvent>) {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let id = relay.connect(tx);
    let handshake = rx.try_recv().expect("missing connected handshake");
    assert_eq!(handshake.event, "connected");
    (id, rx)
}

fn drain(rx: &mut UnboundedReceiver<RelayEvent>) -> Vec<RelayEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn health_check_reports_ok() {
    let server = test_server(Relay::new());

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn notify_without_secret_is_forbidden() {
    let relay = Relay::new();
    let (member, mut rx) = connect(&relay);
    relay.join(&member, RoomId::new("chat1"));
    let server = test_server(relay);

    let response = server
        .post("/internal/notify")
        .json(&json!({"event": "receive_message", "chatId": "chat1", "payload": {}}))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"], "Forbidden");
    // No broadcast happened.
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn notify_with_wrong_secret_is_forbidden() {
    let server = test_server(Relay::new());

    let response = server
        .post("/internal/notify")
        .add_header(
            HeaderName::from_static("x-internal-secret"),
            HeaderValue::from_static("wrong-secret"),
        )
        .json(&json!({"event": "receive_message", "chatId": "chat1"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn notify_missing_event_is_bad_request() {
    let server = test_server(Relay::new());
    let (name, value) = secret_header();

    let response = server
        .post("/internal/notify")
        .add_header(name, value)
        .json(&json!({"chatId": "chat1"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Missing event or chatId");
}

#[tokio::test]
async fn notify_missing_chat_id_is_bad_request() {
    let server = test_server(Relay::new());
    let (name, value) = secret_header();

    let response = server
        .post("/internal/notify")
        .add_header(name, value)
        .json(&json!({"event": "receive_message", "payload": {"content": "hi"}}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn notify_fans_out_to_each_target_room() {
    let relay = Relay::new();
    let (in_chat, mut rx_chat) = connect(&relay);
    let (in_personal, mut rx_personal) = connect(&relay);
    relay.join(&in_chat, RoomId::new("chat1"));
    relay.join(&in_personal, RoomId::new("user_42"));
    let server = test_server(relay);
    let (name, value) = secret_header();

    let response = server
        .post("/internal/notify")
        .add_header(name, value)
        .json(&json!({
            "event": "receive_message",
            "chatId": ["chat1", "user_42"],
            "payload": {"content": "hi"},
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["roomsNotified"], 2);

    for rx in [&mut rx_chat, &mut rx_personal] {
        let events = drain(rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "receive_message");
        assert_eq!(events[0].payload["content"], "hi");
    }
}

#[tokio::test]
async fn notify_accepts_numeric_chat_id() {
    let relay = Relay::new();
    let (member, mut rx) = connect(&relay);
    // Member joined with the string form; the notify uses the number.
    relay.join(&member, RoomId::new("5"));
    let server = test_server(relay);
    let (name, value) = secret_header();

    let response = server
        .post("/internal/notify")
        .add_header(name, value)
        .json(&json!({"event": "receive_message", "chatId": 5, "payload": {}}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(drain(&mut rx).len(), 1);
}

#[tokio::test]
async fn notify_to_empty_room_succeeds_with_zero_recipients() {
    let relay = Relay::new();
    let server = test_server(relay);
    let (name, value) = secret_header();

    let response = server
        .post("/internal/notify")
        .add_header(name, value)
        .json(&json!({"event": "receive_message", "chatId": "nobody-here", "payload": {}}))
        .await;

    // Broadcasting into a memberless room is a silent no-op, not an error.
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["roomsNotified"], 1);
}

#[tokio::test]
async fn group_deleted_broadcasts_then_evicts() {
    let relay = Relay::new();
    let (a, mut rx_a) = connect(&relay);
    let (b, mut rx_b) = connect(&relay);
    let room = RoomId::new("doomed");
    relay.join(&a, room.clone());
    relay.join(&b, room.clone());
    drain(&mut rx_a);
    drain(&mut rx_b);
    let server = test_server(relay.clone());
    let (name, value) = secret_header();

    let response = server
        .post("/internal/notify")
        .add_header(name, value)
        .json(&json!({"event": "group:deleted", "chatId": "doomed", "payload": {"groupId": "doomed"}}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    // Both members saw the deletion notice, then were evicted.
    for rx in [&mut rx_a, &mut rx_b] {
        let events = drain(rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "group:deleted");
    }
    assert_eq!(relay.room_size(&room), 0);
    assert!(relay.rooms_of(&a).is_empty());

    // A rejoin succeeds into a fresh, empty room.
    relay.join(&a, room.clone());
    assert_eq!(relay.room_size(&room), 1);
}

#[tokio::test]
async fn emit_dispatches_for_registered_connection() {
    let relay = Relay::new();
    let (listener, mut rx_listener) = connect(&relay);
    let (sender, _rx_sender) = connect(&relay);
    relay.join(&listener, RoomId::new("chat1"));
    relay.join(&sender, RoomId::new("chat1"));
    drain(&mut rx_listener);
    let server = test_server(relay);

    let response = server
        .post("/socket/emit")
        .add_header(
            HeaderName::from_static("x-connection-id"),
            HeaderValue::from_str(&sender.to_string()).unwrap(),
        )
        .json(&json!({"type": "group:typing", "roomId": "chat1"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let events = drain(&mut rx_listener);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, "group:typing");
    assert_eq!(events[0].payload["userId"], sender.to_string());
}

#[tokio::test]
async fn emit_for_unknown_connection_is_not_found() {
    let server = test_server(Relay::new());

    let response = server
        .post("/socket/emit")
        .add_header(
            HeaderName::from_static("x-connection-id"),
            HeaderValue::from_str(&ConnectionId::new().to_string()).unwrap(),
        )
        .json(&json!({"type": "join_room", "roomId": "chat1"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn emit_without_connection_header_is_bad_request() {
    let server = test_server(Relay::new());

    let response = server
        .post("/socket/emit")
        .json(&json!({"type": "join_room", "roomId": "chat1"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
