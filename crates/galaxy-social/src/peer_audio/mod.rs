//! Proximity peer audio.
//!
//! The participant that observes a join makes the offer; the newcomer
//! answers. Only existing members see `user_joined`, so two sides never
//! offer to each other. Playback volume falls off linearly with distance
//! and is applied locally only.

mod engine;
mod manager;
mod types;

pub use engine::{HeadlessEngine, MediaEngine};
pub use manager::PeerAudio;
pub use types::{gain, AudioSettings, LinkState, PeerLink, StreamHandle};
