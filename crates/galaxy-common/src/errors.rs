use std::path::PathBuf;

use crate::id::ConnId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// A client sent something the relay cannot act on. The event is dropped and
/// the connection stays open.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolViolation {
    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("connection {0} has no session")]
    NoSession(ConnId),

    #[error("session is in room '{session_room}' but event names '{requested}'")]
    RoomMismatch {
        session_room: String,
        requested: String,
    },

    #[error("binary frames are not supported")]
    BinaryFrame,
}

#[derive(Debug, thiserror::Error)]
pub enum GalaxyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    #[error("unknown target: {0}")]
    UnknownTarget(ConnId),

    #[error("asset unavailable: {0}")]
    AssetUnavailable(String),

    #[error("media access denied: {0}")]
    MediaAccessDenied(String),

    #[error("transport lost: {0}")]
    TransportLoss(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
