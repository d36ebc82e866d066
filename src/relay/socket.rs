/**
 * WebSocket Transport
 *
 * The primary transport: a persistent, bidirectional connection at
 * `GET /socket`. Inbound text frames are parsed as client events and
 * dispatched; outbound deliveries arrive on the connection's channel and
 * are written as JSON text frames.
 *
 * # Keepalive
 *
 * The server pings every 25 seconds and drops connections that have shown
 * no traffic for 60 seconds, mirroring the ping interval/timeout the web
 * client was tuned against. A read error on the stream is logged and the
 * loop continues; only stream end or a close frame triggers disconnect
 * cleanup, so a transient transport error never corrupts room state.
 */

use crate::relay::events::ClientEvent;
use crate::relay::Relay;
use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// How often the server pings idle connections.
const PING_INTERVAL: Duration = Duration::from_secs(25);

/// How long a connection may stay silent before it is dropped.
const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Handle the WebSocket upgrade (GET /socket).
pub async fn socket_handler(ws: WebSocketUpgrade, State(relay): State<Relay>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

/// Drive one established WebSocket connection until it ends.
async fn handle_socket(socket: WebSocket, relay: Relay) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = relay.connect(tx);

    let mut ping = tokio::time::interval(PING_INTERVAL);
    let mut last_seen = Instant::now();
    let reason;

    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                Some(Ok(message)) => {
                    last_seen = Instant::now();
                    match message {
                        Message::Text(text) => {
                            match serde_json::from_str::<ClientEvent>(&text) {
                                Ok(event) => relay.handle_client_event(&id, event),
                                Err(e) => {
                                    // A malformed frame from one client must not
                                    // affect other rooms or connections.
                                    tracing::warn!(
                                        "[Socket] Unparseable event from {}: {}",
                                        id,
                                        e
                                    );
                                }
                            }
                        }
                        Message::Close(_) => {
                            reason = "client closed";
                            break;
                        }
                        Message::Ping(data) => {
                            if sink.send(Message::Pong(data)).await.is_err() {
                                reason = "send failed";
                                break;
                            }
                        }
                        Message::Pong(_) | Message::Binary(_) => {}
                    }
                }
                Some(Err(e)) => {
                    // Transport error: log only, room state stays intact.
                    tracing::error!("[Socket] Transport error for {}: {}", id, e);
                }
                None => {
                    reason = "transport closed";
                    break;
                }
            },
            delivery = rx.recv() => match delivery {
                Some(event) => {
                    let frame = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("[Socket] Failed to serialize event: {}", e);
                            continue;
                        }
                    };
                    if sink.send(Message::Text(frame.into())).await.is_err() {
                        reason = "send failed";
                        break;
                    }
                }
                // The relay dropped our entry (disconnect raced us).
                None => {
                    reason = "delivery channel closed";
                    break;
                }
            },
            _ = ping.tick() => {
                if last_seen.elapsed() > IDLE_TIMEOUT {
                    reason = "keepalive timeout";
                    break;
                }
                if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                    reason = "send failed";
                    break;
                }
            }
        }
    }

    relay.disconnect(&id, reason);
    let _ = sink.close().await;
}
