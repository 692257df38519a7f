//! Static furniture and the collision footprint of each object kind.

use galaxy_common::{ObjectKind, PlacedObject, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Collision box relative to an object's anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Display size and collision footprint for one kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindGeometry {
    pub width: f64,
    pub height: f64,
    pub footprint: Footprint,
}

pub fn geometry(kind: ObjectKind) -> KindGeometry {
    match kind {
        ObjectKind::Desk => KindGeometry {
            width: 96.0,
            height: 64.0,
            footprint: Footprint {
                offset_x: -48.0,
                offset_y: -20.0,
                width: 96.0,
                height: 40.0,
            },
        },
        ObjectKind::Chair => KindGeometry {
            width: 48.0,
            height: 48.0,
            footprint: Footprint {
                offset_x: -24.0,
                offset_y: -16.0,
                width: 48.0,
                height: 32.0,
            },
        },
        ObjectKind::Plant => KindGeometry {
            width: 48.0,
            height: 64.0,
            footprint: Footprint {
                offset_x: -16.0,
                offset_y: -16.0,
                width: 32.0,
                height: 32.0,
            },
        },
    }
}

/// An object present in the room, static or placed by a participant.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: String,
    pub kind: ObjectKind,
    /// Anchor: horizontal centre, bottom edge.
    pub position: Vec2,
    pub width: f64,
    pub height: f64,
    pub footprint: Footprint,
}

impl SceneObject {
    pub fn new(id: impl Into<String>, kind: ObjectKind, position: Vec2) -> Self {
        let g = geometry(kind);
        Self {
            id: id.into(),
            kind,
            position,
            width: g.width,
            height: g.height,
            footprint: g.footprint,
        }
    }

    pub fn from_placed(obj: &PlacedObject) -> Self {
        Self::new(obj.id.clone(), obj.kind, obj.position())
    }

    pub fn collision_rect(&self) -> Rect {
        Rect {
            x: self.position.x + self.footprint.offset_x,
            y: self.position.y + self.footprint.offset_y,
            width: self.footprint.width,
            height: self.footprint.height,
        }
    }

    /// Where the sprite goes: centred horizontally, bottom at the anchor.
    pub fn draw_rect(&self) -> Rect {
        Rect {
            x: self.position.x - self.width / 2.0,
            y: self.position.y - self.height,
            width: self.width,
            height: self.height,
        }
    }
}

/// The built-in office layout.
pub fn default_office() -> Vec<SceneObject> {
    vec![
        SceneObject::new("desk-1", ObjectKind::Desk, Vec2::new(300.0, 250.0)),
        SceneObject::new("desk-2", ObjectKind::Desk, Vec2::new(500.0, 250.0)),
        SceneObject::new("chair-1", ObjectKind::Chair, Vec2::new(300.0, 310.0)),
        SceneObject::new("chair-2", ObjectKind::Chair, Vec2::new(500.0, 310.0)),
        SceneObject::new("plant-1", ObjectKind::Plant, Vec2::new(150.0, 200.0)),
        SceneObject::new("plant-2", ObjectKind::Plant, Vec2::new(650.0, 400.0)),
    ]
}
