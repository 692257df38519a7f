//! Public handle for the relay connection.

use std::sync::Arc;

use galaxy_common::ClientEvent;
use tokio::sync::{mpsc, RwLock};

use super::task::connection_loop;
use super::types::{ConnectionCommand, ConnectionConfig, ConnectionEvent};

/// Handle for talking to the relay.
///
/// All methods are non-blocking and hand commands to the background
/// connection task.
pub struct RelayClient {
    command_tx: mpsc::Sender<ConnectionCommand>,
    connected: Arc<RwLock<bool>>,
}

impl RelayClient {
    /// Start the background connection.
    /// Returns `(client, event_receiver)`.
    pub fn connect(config: ConnectionConfig) -> (Self, mpsc::Receiver<ConnectionEvent>) {
        let (event_tx, event_rx) = mpsc::channel(config.queue_capacity);
        let (command_tx, command_rx) = mpsc::channel(config.queue_capacity);
        let connected = Arc::new(RwLock::new(false));

        let client = Self {
            command_tx,
            connected: Arc::clone(&connected),
        };

        tokio::spawn(connection_loop(config, connected, event_tx, command_rx));

        (client, event_rx)
    }

    /// Queue an event without waiting. Returns false when the queue is
    /// full or the connection is gone; the event is then dropped.
    pub fn send(&self, event: ClientEvent) -> bool {
        match self.command_tx.try_send(ConnectionCommand::Send(event)) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Outgoing event dropped");
                false
            }
        }
    }

    pub async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }

    pub async fn disconnect(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Disconnect).await;
    }
}
