//! Relay server configuration.

use serde::{Deserialize, Serialize};

/// Relay server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind: String,
    pub port: u16,
    /// Capacity of the single ingress queue feeding the dispatcher.
    pub ingress_capacity: u32,
    /// Per-connection outbound queue capacity. A full queue drops frames.
    pub outbound_capacity: u32,
    /// Drop a room (and its placed objects) once its last member leaves.
    /// Off by default: rooms then live for the whole process lifetime.
    pub evict_empty_rooms: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3001,
            ingress_capacity: 1024,
            outbound_capacity: 256,
            evict_empty_rooms: false,
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
