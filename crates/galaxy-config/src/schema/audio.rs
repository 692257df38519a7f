//! Proximity audio configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Distance at which a peer becomes inaudible.
    pub max_distance: f64,
    /// Request microphone access on startup. When false the client joins
    /// receive-only.
    pub microphone: bool,
    pub start_muted: bool,
    /// STUN/TURN servers handed to the media engine.
    pub ice_servers: Vec<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_distance: 400.0,
            microphone: true,
            start_muted: false,
            ice_servers: vec![
                "stun:stun.l.google.com:19302".into(),
                "stun:global.stun.twilio.com:3478".into(),
            ],
        }
    }
}
