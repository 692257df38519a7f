//! Per-connection handler: register, then pump frames both ways.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use galaxy_common::{ClientEvent, ConnId, ProtocolViolation};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::dispatcher::Ingress;

/// Decode one text frame into a client event.
pub fn parse_frame(text: &str) -> Result<ClientEvent, ProtocolViolation> {
    serde_json::from_str(text).map_err(|e| ProtocolViolation::Malformed(e.to_string()))
}

/// Handle a single WebSocket connection until it closes.
pub async fn handle_connection(
    ws: tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
    addr: SocketAddr,
    ingress: mpsc::Sender<Ingress>,
    outbound_capacity: usize,
) {
    let (mut sink, mut stream) = ws.split();
    let conn_id = ConnId::new();

    // 1. Register with the dispatcher; it answers with session_ready.
    let (tx, mut rx) = mpsc::channel::<String>(outbound_capacity);
    if ingress
        .send(Ingress::Connected {
            conn_id: conn_id.clone(),
            outbound: tx,
        })
        .await
        .is_err()
    {
        tracing::warn!(peer = %addr, "Dispatcher unavailable, closing connection");
        return;
    }

    tracing::info!(peer = %addr, conn = %conn_id, "Client connected");

    // 2. Forwarding loop.
    loop {
        tokio::select! {
            // Frames queued by the dispatcher -> this client's WebSocket
            Some(msg) = rx.recv() => {
                if sink.send(Message::Text(msg.into())).await.is_err() {
                    break;
                }
            }

            // Frames from this client's WebSocket -> dispatcher
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match parse_frame(&text) {
                        Ok(event) => {
                            let msg = Ingress::Event { conn_id: conn_id.clone(), event };
                            if ingress.send(msg).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(conn = %conn_id, error = %e, "Dropping frame");
                        }
                    },
                    Some(Ok(Message::Binary(_))) => {
                        tracing::warn!(conn = %conn_id, error = %ProtocolViolation::BinaryFrame, "Dropping frame");
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(conn = %conn_id, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    // 3. Cleanup.
    tracing::info!(peer = %addr, conn = %conn_id, "Client disconnected");
    let _ = ingress.send(Ingress::Disconnected { conn_id }).await;
}
