//! Draw command types.

use galaxy_common::{Rect, Vec2};
use serde::Serialize;

/// Sprite sheet frame size in source pixels.
pub const SPRITE_SOURCE_SIZE: f64 = 256.0;
/// On-screen avatar size.
pub const SPRITE_DISPLAY_SIZE: f64 = 64.0;
/// Radius of the placeholder circle drawn when the sheet is missing.
pub const PLACEHOLDER_RADIUS: f64 = 20.0;
/// Vertical offset of the name label below the avatar centre.
pub const LABEL_OFFSET: f64 = 35.0;
pub const GRID_SPACING: f64 = 50.0;

pub const BACKGROUND_COLOR: &str = "#0f172a";
pub const GRID_COLOR: &str = "#1e293b";
pub const LOCAL_AVATAR_COLOR: &str = "#a855f7";
pub const REMOTE_AVATAR_COLOR: &str = "#6366f1";
pub const OBJECT_PLACEHOLDER_COLOR: &str = "#475569";
pub const LABEL_COLOR: &str = "#ffffff";

/// One primitive for a drawing surface, in painter's order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        color: &'static str,
    },
    /// Repeat an image over the whole surface.
    Pattern {
        image: String,
    },
    Grid {
        spacing: f64,
        color: &'static str,
    },
    Sprite {
        image: String,
        source: Option<Rect>,
        dest: Rect,
    },
    Circle {
        center: Vec2,
        radius: f64,
        color: &'static str,
    },
    Rectangle {
        rect: Rect,
        color: &'static str,
    },
    Label {
        text: String,
        position: Vec2,
        color: &'static str,
    },
}
