//! Client connection and frame loop configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket URL of the relay.
    pub server_url: String,
    /// Room joined after connecting.
    pub room: String,
    /// Frames per second of the simulation loop.
    pub tick_rate: u32,
    /// Chat messages retained per room.
    pub chat_history: u32,
    /// Base URL the asset provider serves sprites from.
    pub asset_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:3001".into(),
            room: "lobby".into(),
            tick_rate: 60,
            chat_history: 200,
            asset_base_url: "/assets".into(),
        }
    }
}
