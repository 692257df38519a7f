//! Peer audio session manager: link lifecycle and proximity gain.

use std::collections::{BTreeMap, HashMap};

use galaxy_common::protocol::SignalRequest;
use galaxy_common::{ClientEvent, ConnId, ServerEvent, Vec2};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::engine::MediaEngine;
use super::types::{gain, AudioSettings, LinkState, PeerLink};

// ---------------------------------------------------------------------------
// Peer Audio
// ---------------------------------------------------------------------------

/// Owns one [`PeerLink`] per remote participant and drives negotiation
/// through a [`MediaEngine`]. Outgoing negotiation messages are returned
/// to the caller, who forwards them to the relay.
pub struct PeerAudio<E: MediaEngine> {
    settings: AudioSettings,
    engine: E,
    links: BTreeMap<ConnId, PeerLink>,
    receive_only: bool,
    muted: bool,
}

impl<E: MediaEngine> PeerAudio<E> {
    pub fn new(engine: E, settings: AudioSettings) -> Self {
        Self {
            muted: settings.start_muted,
            settings,
            engine,
            links: BTreeMap::new(),
            receive_only: false,
        }
    }

    /// Acquire the microphone. A refusal is logged once and the session
    /// continues receive-only; it is never retried.
    pub fn start(&mut self) {
        if !self.settings.enabled {
            info!("Peer audio disabled");
            return;
        }
        if !self.settings.microphone {
            self.receive_only = true;
        } else if let Err(e) = self.engine.acquire_microphone() {
            warn!(error = %e, "Microphone unavailable, continuing receive-only");
            self.receive_only = true;
        }
        self.engine.set_muted(self.muted || self.receive_only);
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn is_receive_only(&self) -> bool {
        self.receive_only
    }

    pub fn is_muted(&self) -> bool {
        self.muted || self.receive_only
    }

    pub fn link(&self, peer: &ConnId) -> Option<&PeerLink> {
        self.links.get(peer)
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Flip the outgoing track. Returns whether we are now muted. Without
    /// a microphone we are always muted.
    pub fn toggle_mute(&mut self) -> bool {
        if self.receive_only {
            return true;
        }
        self.muted = !self.muted;
        self.engine.set_muted(self.muted);
        info!(muted = self.muted, "Microphone toggled");
        self.muted
    }

    /// React to one relay event. Returns negotiation messages to send.
    pub fn handle(&mut self, event: &ServerEvent) -> Vec<ClientEvent> {
        if !self.settings.enabled {
            return Vec::new();
        }
        match event {
            ServerEvent::UserJoined(s) => self.peer_joined(&s.conn_id),
            ServerEvent::Offer(d) => self.offer_received(&d.sender_id, &d.payload),
            ServerEvent::Answer(d) => {
                self.answer_received(&d.sender_id, &d.payload);
                Vec::new()
            }
            ServerEvent::IceCandidate(d) => {
                self.candidate_received(&d.sender_id, &d.payload);
                Vec::new()
            }
            ServerEvent::UserLeft(left) => {
                self.peer_left(&left.conn_id);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// A participant joined after us: we make the offer.
    pub fn peer_joined(&mut self, peer: &ConnId) -> Vec<ClientEvent> {
        if self.links.contains_key(peer) {
            return Vec::new();
        }
        match self.engine.create_offer(peer) {
            Ok(payload) => {
                self.links
                    .insert(peer.clone(), PeerLink::new(peer.clone(), LinkState::Offering));
                debug!(peer = %peer, "Offer created");
                vec![ClientEvent::Offer(SignalRequest {
                    target_id: peer.clone(),
                    payload,
                })]
            }
            Err(e) => {
                warn!(peer = %peer, error = %e, "Failed to create offer");
                self.engine.close(peer);
                Vec::new()
            }
        }
    }

    pub fn offer_received(&mut self, from: &ConnId, payload: &Value) -> Vec<ClientEvent> {
        let state = self.links.get(from).map(|l| l.state);
        if state == Some(LinkState::Offering) {
            debug!(peer = %from, "Offer while offering ignored");
            return Vec::new();
        }
        match self.engine.accept_offer(from, payload) {
            Ok(answer) => {
                self.links
                    .entry(from.clone())
                    .or_insert_with(|| PeerLink::new(from.clone(), LinkState::Answering));
                debug!(peer = %from, renegotiation = state.is_some(), "Answer created");
                vec![ClientEvent::Answer(SignalRequest {
                    target_id: from.clone(),
                    payload: answer,
                })]
            }
            Err(e) => {
                warn!(peer = %from, error = %e, "Failed to answer offer");
                if state.is_none() {
                    self.engine.close(from);
                }
                Vec::new()
            }
        }
    }

    pub fn answer_received(&mut self, from: &ConnId, payload: &Value) {
        let Some(link) = self.links.get_mut(from) else {
            debug!(peer = %from, "Answer for unknown link ignored");
            return;
        };
        if link.state != LinkState::Offering {
            debug!(peer = %from, state = ?link.state, "Unexpected answer ignored");
            return;
        }
        match self.engine.accept_answer(from, payload) {
            Ok(()) => {
                link.state = LinkState::Established;
                info!(peer = %from, "Peer link established");
            }
            Err(e) => warn!(peer = %from, error = %e, "Failed to apply answer"),
        }
    }

    pub fn candidate_received(&mut self, from: &ConnId, payload: &Value) {
        if !self.links.contains_key(from) {
            debug!(peer = %from, "Candidate for unknown link ignored");
            return;
        }
        if let Err(e) = self.engine.add_ice_candidate(from, payload) {
            warn!(peer = %from, error = %e, "Failed to add candidate");
        }
    }

    /// Release the link and its media. Safe to call more than once.
    pub fn peer_left(&mut self, peer: &ConnId) -> Option<PeerLink> {
        let mut link = self.links.remove(peer)?;
        self.engine.close(peer);
        link.state = LinkState::Closed;
        link.stream = None;
        info!(peer = %peer, "Peer link released");
        Some(link)
    }

    /// Release every link, e.g. when the relay connection is gone.
    pub fn close_all(&mut self) {
        let peers: Vec<ConnId> = self.links.keys().cloned().collect();
        for peer in peers {
            self.peer_left(&peer);
        }
    }

    /// Per-frame work: pick up arrived streams, forward gathered
    /// candidates and push proximity gain for every established link.
    pub fn frame<'a>(
        &mut self,
        listener: Vec2,
        peers: impl IntoIterator<Item = (&'a ConnId, Vec2)>,
    ) -> Vec<ClientEvent> {
        if !self.settings.enabled {
            return Vec::new();
        }

        for (peer, stream) in self.engine.poll_remote_streams() {
            match self.links.get_mut(&peer) {
                Some(link) => {
                    link.stream = Some(stream);
                    if link.state == LinkState::Answering {
                        link.state = LinkState::Established;
                        info!(peer = %peer, "Peer link established");
                    }
                }
                None => debug!(peer = %peer, "Stream for unknown link ignored"),
            }
        }

        let outgoing: Vec<ClientEvent> = self
            .engine
            .drain_local_candidates()
            .into_iter()
            .filter(|(peer, _)| self.links.contains_key(peer))
            .map(|(peer, payload)| {
                ClientEvent::IceCandidate(SignalRequest {
                    target_id: peer,
                    payload,
                })
            })
            .collect();

        let positions: HashMap<&ConnId, Vec2> = peers.into_iter().collect();
        for (peer, link) in self.links.iter_mut() {
            if link.state != LinkState::Established {
                continue;
            }
            let (Some(stream), Some(pos)) = (link.stream, positions.get(peer)) else {
                continue;
            };
            let g = gain(listener.distance(*pos), self.settings.max_distance);
            self.engine.set_gain(peer, stream, g);
            link.gain = Some(g);
        }

        outgoing
    }
}
