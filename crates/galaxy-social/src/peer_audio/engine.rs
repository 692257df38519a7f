//! Media engine seam.
//!
//! The session manager decides *when* to negotiate; a [`MediaEngine`]
//! does the actual session description work and owns the audio streams.

use std::collections::{HashMap, HashSet};

use galaxy_common::{ConnId, GalaxyError, ProtocolViolation};
use serde_json::{json, Value};

use super::types::StreamHandle;

pub trait MediaEngine {
    /// Ask for the local microphone. Failure leaves the session
    /// receive-only.
    fn acquire_microphone(&mut self) -> Result<(), GalaxyError>;

    /// Build an offer for `peer`.
    fn create_offer(&mut self, peer: &ConnId) -> Result<Value, GalaxyError>;

    /// Apply a remote offer and build the answer.
    fn accept_offer(&mut self, peer: &ConnId, offer: &Value) -> Result<Value, GalaxyError>;

    fn accept_answer(&mut self, peer: &ConnId, answer: &Value) -> Result<(), GalaxyError>;

    fn add_ice_candidate(&mut self, peer: &ConnId, candidate: &Value) -> Result<(), GalaxyError>;

    /// Remote streams that started since the last poll.
    fn poll_remote_streams(&mut self) -> Vec<(ConnId, StreamHandle)>;

    /// Locally gathered connectivity candidates to forward to peers.
    fn drain_local_candidates(&mut self) -> Vec<(ConnId, Value)>;

    /// Set local playback volume for one remote stream. Never affects what
    /// the remote side hears.
    fn set_gain(&mut self, peer: &ConnId, stream: StreamHandle, gain: f64);

    /// Enable or disable the outgoing microphone track.
    fn set_muted(&mut self, muted: bool);

    /// Tear down the link and release its stream.
    fn close(&mut self, peer: &ConnId);
}

/// Engine without real audio. Descriptions are synthetic and every
/// negotiation completes immediately; gains are recorded for inspection.
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    ice_servers: Vec<String>,
    microphone_allowed: bool,
    muted: bool,
    next_stream: u64,
    open: HashSet<ConnId>,
    arrivals: Vec<(ConnId, StreamHandle)>,
    candidates: Vec<(ConnId, Value)>,
    gains: HashMap<ConnId, f64>,
    closed: Vec<ConnId>,
}

impl HeadlessEngine {
    pub fn new(ice_servers: Vec<String>, microphone_allowed: bool) -> Self {
        Self {
            ice_servers,
            microphone_allowed,
            ..Default::default()
        }
    }

    pub fn gain_for(&self, peer: &ConnId) -> Option<f64> {
        self.gains.get(peer).copied()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn open_links(&self) -> usize {
        self.open.len()
    }

    /// Every peer ever closed, in order, including repeats.
    pub fn closed(&self) -> &[ConnId] {
        &self.closed
    }

    fn description(&self, kind: &str, peer: &ConnId) -> Value {
        json!({
            "type": kind,
            "sdp": format!("v=0\r\no=galaxy-headless 0 0 IN IP4 127.0.0.1\r\ns={peer}\r\n"),
            "iceServers": self.ice_servers,
        })
    }

    fn gather(&mut self, peer: &ConnId) {
        self.candidates.push((
            peer.clone(),
            json!({
                "candidate": "candidate:0 1 UDP 2122252543 127.0.0.1 9 typ host",
                "sdpMid": "0",
                "sdpMLineIndex": 0,
            }),
        ));
    }

    fn arrive(&mut self, peer: &ConnId) {
        self.next_stream += 1;
        self.arrivals
            .push((peer.clone(), StreamHandle(self.next_stream)));
    }
}

fn expect_type(value: &Value, kind: &str) -> Result<(), GalaxyError> {
    if value.get("type").and_then(Value::as_str) == Some(kind) {
        Ok(())
    } else {
        Err(ProtocolViolation::Malformed(format!("expected a session description of type '{kind}'")).into())
    }
}

impl MediaEngine for HeadlessEngine {
    fn acquire_microphone(&mut self) -> Result<(), GalaxyError> {
        if self.microphone_allowed {
            Ok(())
        } else {
            Err(GalaxyError::MediaAccessDenied(
                "microphone permission refused".into(),
            ))
        }
    }

    fn create_offer(&mut self, peer: &ConnId) -> Result<Value, GalaxyError> {
        self.open.insert(peer.clone());
        self.gather(peer);
        Ok(self.description("offer", peer))
    }

    fn accept_offer(&mut self, peer: &ConnId, offer: &Value) -> Result<Value, GalaxyError> {
        expect_type(offer, "offer")?;
        self.open.insert(peer.clone());
        self.gather(peer);
        self.arrive(peer);
        Ok(self.description("answer", peer))
    }

    fn accept_answer(&mut self, peer: &ConnId, answer: &Value) -> Result<(), GalaxyError> {
        expect_type(answer, "answer")?;
        self.arrive(peer);
        Ok(())
    }

    fn add_ice_candidate(&mut self, _peer: &ConnId, candidate: &Value) -> Result<(), GalaxyError> {
        if candidate.get("candidate").is_some() {
            Ok(())
        } else {
            Err(ProtocolViolation::MissingField("candidate").into())
        }
    }

    fn poll_remote_streams(&mut self) -> Vec<(ConnId, StreamHandle)> {
        std::mem::take(&mut self.arrivals)
    }

    fn drain_local_candidates(&mut self) -> Vec<(ConnId, Value)> {
        std::mem::take(&mut self.candidates)
    }

    fn set_gain(&mut self, peer: &ConnId, _stream: StreamHandle, gain: f64) {
        self.gains.insert(peer.clone(), gain);
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn close(&mut self, peer: &ConnId) {
        self.open.remove(peer);
        self.gains.remove(peer);
        self.arrivals.retain(|(p, _)| p != peer);
        self.candidates.retain(|(p, _)| p != peer);
        self.closed.push(peer.clone());
    }
}
