use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::core::Vec2;

/// Furniture that can be placed in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Desk,
    Chair,
    Plant,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Desk, ObjectKind::Chair, ObjectKind::Plant];

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Desk => "desk",
            ObjectKind::Chair => "chair",
            ObjectKind::Plant => "plant",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desk" => Ok(ObjectKind::Desk),
            "chair" => Ok(ObjectKind::Chair),
            "plant" => Ok(ObjectKind::Plant),
            other => Err(format!("unknown object type '{other}'")),
        }
    }
}

/// An object placed in a room. Append-only for the room's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub x: f64,
    pub y: f64,
}

impl PlacedObject {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}
