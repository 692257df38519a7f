//! Peer link state and audio settings.

use galaxy_common::ConnId;
use galaxy_config::schema::AudioConfig;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Negotiation state of one peer link. A link that does not exist is
/// "absent"; closed links are removed, so `Closed` is only observed on a
/// link handed out after release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// We sent an offer and wait for the answer.
    Offering,
    /// We answered a remote offer and wait for media.
    Answering,
    Established,
    Closed,
}

/// Opaque handle for a remote audio stream owned by the media engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle(pub u64);

#[derive(Debug, Clone)]
pub struct PeerLink {
    pub remote: ConnId,
    pub state: LinkState,
    pub stream: Option<StreamHandle>,
    /// Last gain pushed to local playback.
    pub gain: Option<f64>,
}

impl PeerLink {
    pub(crate) fn new(remote: ConnId, state: LinkState) -> Self {
        Self {
            remote,
            state,
            stream: None,
            gain: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AudioSettings {
    pub enabled: bool,
    pub max_distance: f64,
    pub microphone: bool,
    pub start_muted: bool,
    pub ice_servers: Vec<String>,
}

impl AudioSettings {
    pub fn from_config(config: &AudioConfig) -> Self {
        Self {
            enabled: config.enabled,
            max_distance: config.max_distance,
            microphone: config.microphone,
            start_muted: config.start_muted,
            ice_servers: config.ice_servers.clone(),
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self::from_config(&AudioConfig::default())
    }
}

/// Volume for a peer `distance` away: 1 at zero, falling linearly to 0 at
/// `max_distance` and beyond.
pub fn gain(distance: f64, max_distance: f64) -> f64 {
    if max_distance <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / max_distance).clamp(0.0, 1.0)
}
