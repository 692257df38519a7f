//! Shared-space geometry and movement tuning.

use serde::{Deserialize, Serialize};

/// World configuration. The relay uses the spawn point; the client uses
/// everything.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub spawn_x: f64,
    pub spawn_y: f64,
    /// Pixels per frame per held direction.
    pub move_speed: f64,
    /// Radius of the circle approximating an avatar for collisions.
    pub avatar_radius: f64,
    /// Walk-cycle length in sprite sheet columns.
    pub animation_frames: u32,
    /// Frames between walk-cycle steps.
    pub animation_speed: u32,
    /// Load the built-in office furniture as static scenery.
    pub default_scenery: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            spawn_x: 400.0,
            spawn_y: 300.0,
            move_speed: 5.0,
            avatar_radius: 16.0,
            animation_frames: 4,
            animation_speed: 10,
            default_scenery: true,
        }
    }
}
