pub mod errors;
pub mod id;
pub mod protocol;
pub mod types;

pub use errors::{ConfigError, GalaxyError, ProtocolViolation};
pub use id::{new_id, ConnId};
pub use protocol::{ClientEvent, ServerEvent};
pub use types::{Direction, ObjectKind, PlacedObject, Rect, Vec2};

pub type Result<T> = std::result::Result<T, GalaxyError>;
