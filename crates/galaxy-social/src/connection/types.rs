//! Configuration and event/command enums for the relay connection.

use galaxy_common::{ClientEvent, ServerEvent};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// `ws://` or `wss://` URL of the relay.
    pub url: String,
    /// Give up on the initial handshake after this many seconds.
    pub connect_timeout_secs: u64,
    /// Capacity of the inbound event and outbound command queues.
    pub queue_capacity: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:3001".into(),
            connect_timeout_secs: 15,
            queue_capacity: 256,
        }
    }
}

// ---------------------------------------------------------------------------
// Events & Commands
// ---------------------------------------------------------------------------

/// Events delivered from the background connection task.
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    Connected,
    Server(ServerEvent),
    /// The transport is gone. Nothing is retried.
    Disconnected,
    Error(String),
}

/// Commands sent to the background connection task.
#[derive(Debug, Clone)]
pub(crate) enum ConnectionCommand {
    Send(ClientEvent),
    Disconnect,
}
