pub mod chat;
pub mod connection;
pub mod peer_audio;

pub use chat::{ChatHistory, ChatHistoryConfig, ChatMessage};
pub use connection::{ConnectionConfig, ConnectionEvent, RelayClient};
pub use peer_audio::{AudioSettings, HeadlessEngine, LinkState, MediaEngine, PeerAudio, PeerLink};
