//! Background WebSocket connection loop. One attempt, no reconnect.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use galaxy_common::{ClientEvent, ProtocolViolation, ServerEvent};
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use super::types::{ConnectionCommand, ConnectionConfig, ConnectionEvent};

/// Decode one text frame from the relay.
pub fn decode(text: &str) -> Result<ServerEvent, ProtocolViolation> {
    serde_json::from_str(text).map_err(|e| ProtocolViolation::Malformed(e.to_string()))
}

pub fn encode(event: &ClientEvent) -> Result<String, ProtocolViolation> {
    serde_json::to_string(event).map_err(|e| ProtocolViolation::Malformed(e.to_string()))
}

/// Background task owning the socket until either side closes it.
pub(crate) async fn connection_loop(
    config: ConnectionConfig,
    connected: Arc<RwLock<bool>>,
    event_tx: mpsc::Sender<ConnectionEvent>,
    mut command_rx: mpsc::Receiver<ConnectionCommand>,
) {
    info!(url = %config.url, "Connecting to relay");

    let ws_stream = match tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        tokio_tungstenite::connect_async(config.url.as_str()),
    )
    .await
    {
        Ok(Ok((ws_stream, _))) => ws_stream,
        Ok(Err(e)) => {
            error!(error = %e, "Failed to connect to relay");
            let _ = event_tx
                .send(ConnectionEvent::Error(format!("Connection failed: {e}")))
                .await;
            let _ = event_tx.send(ConnectionEvent::Disconnected).await;
            return;
        }
        Err(_elapsed) => {
            error!(
                secs = config.connect_timeout_secs,
                "Relay connection timed out"
            );
            let _ = event_tx
                .send(ConnectionEvent::Error(format!(
                    "Connection timed out after {}s",
                    config.connect_timeout_secs
                )))
                .await;
            let _ = event_tx.send(ConnectionEvent::Disconnected).await;
            return;
        }
    };

    *connected.write().await = true;
    let _ = event_tx.send(ConnectionEvent::Connected).await;
    let (mut ws_write, mut ws_read) = ws_stream.split();

    loop {
        tokio::select! {
            cmd = command_rx.recv() => match cmd {
                Some(ConnectionCommand::Send(event)) => {
                    let json = match encode(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            warn!(event = event.name(), error = %e, "Failed to encode event");
                            continue;
                        }
                    };
                    if ws_write.send(WsMessage::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Some(ConnectionCommand::Disconnect) | None => {
                    let _ = ws_write.send(WsMessage::Close(None)).await;
                    break;
                }
            },

            frame = ws_read.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => match decode(&text) {
                    Ok(event) => {
                        if event_tx.send(ConnectionEvent::Server(event)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => debug!(error = %e, "Unrecognized frame from relay"),
                },
                Some(Ok(WsMessage::Ping(data))) => {
                    let _ = ws_write.send(WsMessage::Pong(data)).await;
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    info!("Relay closed connection");
                    break;
                }
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket error");
                    break;
                }
                _ => {}
            },
        }
    }

    *connected.write().await = false;
    let _ = event_tx.send(ConnectionEvent::Disconnected).await;
}
