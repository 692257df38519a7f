//! The client frame loop.
//!
//! Each frame: drain network events, advance the script, tick the
//! simulation, forward its move update, then run the peer audio frame.

use std::time::Duration;

use galaxy_common::protocol::{GetObjects, JoinRoom, PlaceObject, UserDescriptor};
use galaxy_common::{ClientEvent, ServerEvent};
use galaxy_config::GalaxyConfig;
use galaxy_social::chat::{compose, ChatHistory, ChatHistoryConfig, ChatMessage};
use galaxy_social::{ConnectionEvent, HeadlessEngine, PeerAudio, RelayClient};
use galaxy_world::render::{AssetKeys, NoAssets};
use galaxy_world::sim::SimSettings;
use galaxy_world::{scenery, Simulation, WorldState};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, trace, warn};

use crate::script::{Action, ScriptRunner};

pub struct ClientSession {
    client: RelayClient,
    events: mpsc::Receiver<ConnectionEvent>,
    sim: Simulation,
    audio: PeerAudio<HeadlessEngine>,
    chat: ChatHistory,
    script: ScriptRunner,
    tick_rate: u32,
    frame: u64,
}

impl ClientSession {
    pub fn new(
        config: &GalaxyConfig,
        user: UserDescriptor,
        client: RelayClient,
        events: mpsc::Receiver<ConnectionEvent>,
        script: ScriptRunner,
    ) -> Self {
        let world_cfg = &config.world;
        let scenery = if world_cfg.default_scenery {
            scenery::default_office()
        } else {
            Vec::new()
        };
        let world = WorldState::new(
            config.client.room.clone(),
            user,
            galaxy_common::Vec2::new(world_cfg.spawn_x, world_cfg.spawn_y),
            scenery,
        );
        let sim = Simulation::new(
            world,
            SimSettings::from_config(world_cfg),
            AssetKeys::new(&config.client.asset_base_url),
        );

        let audio_settings = galaxy_social::AudioSettings::from_config(&config.audio);
        let engine = HeadlessEngine::new(
            audio_settings.ice_servers.clone(),
            audio_settings.microphone,
        );
        let mut audio = PeerAudio::new(engine, audio_settings);
        audio.start();

        Self {
            client,
            events,
            sim,
            audio,
            chat: ChatHistory::new(ChatHistoryConfig {
                max_messages_per_room: config.client.chat_history as usize,
            }),
            script,
            tick_rate: config.client.tick_rate,
            frame: 0,
        }
    }

    pub fn world(&self) -> &WorldState {
        self.sim.world()
    }

    pub fn chat(&self) -> &ChatHistory {
        &self.chat
    }

    /// Run until the relay connection ends, or until the script finishes
    /// when `exit_when_done` is set.
    pub async fn run(&mut self, exit_when_done: bool) {
        let period = Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let Some(inbound) = self.drain_network() else {
                info!("Relay connection ended");
                self.audio.close_all();
                return;
            };

            if self.sim.world().local().is_some() {
                let actions = self.script.advance(self.sim.input_mut());
                for action in actions {
                    self.perform(action);
                }
            }

            let out = self.sim.tick(&inbound, &NoAssets);
            if let Some(update) = out.outgoing {
                self.client.send(ClientEvent::Move(update));
            }
            trace!(frame = self.frame, commands = out.frame.len(), "Frame drawn");

            if let Some(local) = self.sim.world().local() {
                let peers = self
                    .sim
                    .world()
                    .remotes()
                    .iter()
                    .map(|(id, avatar)| (id, avatar.position));
                for event in self.audio.frame(local.position, peers) {
                    self.client.send(event);
                }
            }

            self.frame += 1;
            if self.frame % self.tick_rate.max(1) as u64 == 0 {
                self.log_status();
            }

            if exit_when_done && self.script.is_finished() && self.sim.world().local().is_some() {
                info!(frames = self.frame, "Script finished, disconnecting");
                self.audio.close_all();
                self.client.disconnect().await;
                return;
            }
        }
    }

    /// Pull everything that arrived since the last frame. `None` once the
    /// connection is gone.
    fn drain_network(&mut self) -> Option<Vec<ServerEvent>> {
        let mut inbound = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(ConnectionEvent::Connected) => info!("Connected to relay"),
                Ok(ConnectionEvent::Server(event)) => {
                    self.on_server_event(&event);
                    inbound.push(event);
                }
                Ok(ConnectionEvent::Error(e)) => warn!(error = %e, "Relay connection error"),
                Ok(ConnectionEvent::Disconnected) | Err(TryRecvError::Disconnected) => return None,
                Err(TryRecvError::Empty) => return Some(inbound),
            }
        }
    }

    fn on_server_event(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::SessionReady(ready) => {
                let world = self.sim.world();
                info!(conn = %ready.conn_id, room = %world.room(), "Session ready, joining");
                self.client.send(ClientEvent::JoinRoom(JoinRoom {
                    room_id: world.room().to_string(),
                    user: world.profile().clone(),
                }));
            }
            ServerEvent::ExistingUsers(users) => {
                info!(others = users.len(), "Joined room");
            }
            ServerEvent::UserJoined(s) => info!(conn = %s.conn_id, username = %s.username, "User joined"),
            ServerEvent::UserLeft(left) => info!(conn = %left.conn_id, "User left"),
            ServerEvent::ChatMessage(msg) => {
                info!(from = %msg.username, at = %msg.timestamp, "{}", msg.message);
                let room = self.sim.world().room().to_string();
                self.chat.push(ChatMessage::from_broadcast(&room, msg));
            }
            ServerEvent::ObjectPlaced(obj) => {
                debug!(id = %obj.id, kind = %obj.kind, x = obj.x, y = obj.y, "Object placed");
            }
            _ => {}
        }

        for out in self.audio.handle(event) {
            self.client.send(out);
        }
    }

    fn perform(&mut self, action: Action) {
        let room = self.sim.world().room().to_string();
        match action {
            Action::Say(text) => match compose(&room, &text) {
                Some(send) => {
                    self.client.send(ClientEvent::ChatMessage(send));
                }
                None => debug!("Blank chat message skipped"),
            },
            Action::Place { kind, x, y } => {
                self.client.send(ClientEvent::PlaceObject(PlaceObject {
                    kind,
                    x,
                    y,
                    room_id: room,
                }));
            }
            Action::Objects => {
                self.client
                    .send(ClientEvent::GetObjects(GetObjects { room_id: room }));
            }
            Action::Mute => {
                let muted = self.audio.toggle_mute();
                info!(muted, "Microphone toggled");
            }
        }
    }

    fn log_status(&self) {
        let world = self.sim.world();
        if let Some(local) = world.local() {
            debug!(
                frame = self.frame,
                x = local.position.x,
                y = local.position.y,
                direction = %local.direction,
                remotes = world.remotes().len(),
                objects = world.objects().count(),
                peers = self.audio.link_count(),
                chat = self.chat.total_messages(),
                "Status"
            );
        }
    }
}
