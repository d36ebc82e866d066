/**
 * Fallback Transport (SSE + HTTP emit)
 *
 * For environments that cannot establish a WebSocket, the relay offers a
 * split fallback:
 *
 * - `GET /socket/sse` registers a connection and streams its outbound
 *   events as Server-Sent Events. The first event is the `connected`
 *   handshake carrying the connection id.
 * - `POST /socket/emit` accepts one inbound client event, addressed by
 *   the `x-connection-id` header the client learned from the handshake.
 *
 * When the SSE client goes away, axum drops the stream; a guard held in
 * the stream state runs the same disconnect cleanup a WebSocket close
 * would.
 */

use crate::error::RelayError;
use crate::relay::events::ClientEvent;
use crate::relay::registry::ConnectionId;
use crate::relay::Relay;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream;
use tokio::sync::mpsc;

/// Header naming the fallback connection an emit belongs to.
pub const CONNECTION_ID_HEADER: &str = "x-connection-id";

/// Runs disconnect cleanup when the SSE stream is dropped.
struct DisconnectGuard {
    relay: Relay,
    id: ConnectionId,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        self.relay.disconnect(&self.id, "sse stream closed");
    }
}

/// Handle an SSE subscription (GET /socket/sse).
pub async fn sse_handler(
    State(relay): State<Relay>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, axum::Error>>> {
    let (tx, rx) = mpsc::unbounded_channel();
    let id = relay.connect(tx);
    tracing::info!("[SSE] Fallback subscription active for {}", id);

    let guard = DisconnectGuard { relay, id };

    // Yield one SSE event per delivery; keep-alive comments are injected
    // by axum, so the stream only produces real events.
    let stream = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        loop {
            match rx.recv().await {
                Some(event) => {
                    let data = match serde_json::to_string(&event) {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::error!("[SSE] Failed to serialize event: {}", e);
                            continue;
                        }
                    };
                    let sse_event = Event::default().event(event.event.clone()).data(data);
                    return Some((Ok(sse_event), (rx, guard)));
                }
                // Relay dropped the connection entry; end the stream.
                None => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle an inbound event from a fallback client (POST /socket/emit).
///
/// # Errors
///
/// * `400 Bad Request` - missing/invalid `x-connection-id` header or an
///   unparseable event body
/// * `404 Not Found` - the connection id is not registered (the SSE
///   stream already closed, or the id was never issued)
pub async fn emit_handler(
    State(relay): State<Relay>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, RelayError> {
    let id: ConnectionId = headers
        .get(CONNECTION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| RelayError::bad_request("Missing x-connection-id header"))?
        .parse()
        .map_err(|_| RelayError::bad_request("Invalid x-connection-id header"))?;

    if !relay.is_connected(&id) {
        return Err(RelayError::UnknownConnection);
    }

    let event: ClientEvent = serde_json::from_slice(&body)
        .map_err(|e| RelayError::bad_request(format!("Unparseable client event: {}", e)))?;

    relay.handle_client_event(&id, event);
    Ok(StatusCode::OK)
}
