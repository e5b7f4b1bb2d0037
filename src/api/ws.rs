//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// The push channel: one WebSocket per observer, attached to EventFanout.
// Sends `CONNECTION_ESTABLISHED` on attach, then relays every subsequent
// `EngineEvent` broadcast until the socket closes; answers client pings with
// `PONG` and logs non-JSON messages without closing the connection.
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use serde_json::Value;
use tracing::{info, warn};

use super::AppState;
use crate::events::EngineEvent;

pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let snapshot = match state.engine.snapshot(15).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(%err, "could not fetch initial snapshot for new websocket observer");
            let _ = socket.close().await;
            return;
        }
    };

    let mut observer = state.fanout.attach(snapshot.into());
    info!("websocket observer attached, total {}", state.fanout.observer_count());

    loop {
        tokio::select! {
            event = observer.receiver.recv() => {
                let Some(event) = event else { break };
                let payload = serde_json::to_string(&event).unwrap_or_else(|err| {
                    warn!(%err, "failed to serialize event");
                    "{}".to_string()
                });
                if socket.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
            message = socket.recv() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<Value>(&text) {
                            Ok(json) if json.get("type").and_then(Value::as_str) == Some("ping") => {
                                let pong = serde_json::to_string(&EngineEvent::Pong).unwrap();
                                if socket.send(Message::Text(pong.into())).await.is_err() {
                                    break;
                                }
                            }
                            Ok(_) => {}
                            Err(_) => warn!("received non-JSON websocket message, ignoring"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
        }
    }

    info!("websocket observer disconnected");
}
