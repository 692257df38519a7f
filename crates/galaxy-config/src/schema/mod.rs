//! Configuration schema types for Galaxy.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults the relay and client were
//! tuned against.

mod audio;
mod client;
mod server;
mod system;
mod world;

pub use audio::*;
pub use client::*;
pub use server::*;
pub use system::*;
pub use world::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration shared by `galaxy-relay` and the `galaxy` client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    pub server: ServerConfig,
    pub world: WorldConfig,
    pub audio: AudioConfig,
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}
