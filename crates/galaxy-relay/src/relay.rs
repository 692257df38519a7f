//! Event relay: maps each inbound client event to registry mutations and
//! the outbound events they produce.
//!
//! Handlers are pure over the [`RoomRegistry`]: they return a list of
//! `(recipients, event)` pairs and never touch a socket. Delivery is the
//! dispatcher's job.

use chrono::{SecondsFormat, Utc};
use galaxy_common::protocol::{
    ChatBroadcast, ChatSend, ClientEvent, GetObjects, JoinRoom, MoveUpdate, PlaceObject,
    ServerEvent, UserLeft, UserMoved,
};
use galaxy_common::{ConnId, ProtocolViolation, Vec2};
use tracing::debug;

use crate::registry::{Departure, RoomRegistry};
use crate::signaling::{self, SignalKind};

/// Who receives an outbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipients {
    /// Only the connection that sent the triggering event.
    Sender,
    /// Every member of the room except the sender.
    RoomExceptSender(String),
    /// Every member of the room, sender included.
    Room(String),
    /// One specific connection.
    Direct(ConnId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub recipients: Recipients,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn new(recipients: Recipients, event: ServerEvent) -> Self {
        Self { recipients, event }
    }
}

/// Current time as ISO-8601 UTC with millisecond precision.
pub(crate) fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct Relay {
    registry: RoomRegistry,
}

impl Relay {
    pub fn new(registry: RoomRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Apply one client event. A protocol violation leaves the registry
    /// untouched and produces no outbound events.
    pub fn handle(
        &mut self,
        sender: &ConnId,
        event: ClientEvent,
    ) -> Result<Vec<Outbound>, ProtocolViolation> {
        match event {
            ClientEvent::JoinRoom(join) => self.join(sender, join),
            ClientEvent::Move(update) => Ok(self.move_session(sender, update)),
            ClientEvent::ChatMessage(chat) => self.chat(sender, chat),
            ClientEvent::PlaceObject(place) => self.place_object(sender, place),
            ClientEvent::GetObjects(get) => Ok(self.get_objects(get)),
            ClientEvent::Offer(req) => Ok(vec![signaling::forward(sender, SignalKind::Offer, req)]),
            ClientEvent::Answer(req) => Ok(vec![signaling::forward(sender, SignalKind::Answer, req)]),
            ClientEvent::IceCandidate(req) => {
                Ok(vec![signaling::forward(sender, SignalKind::IceCandidate, req)])
            }
        }
    }

    /// Transport closed: remove the session and tell the room.
    pub fn disconnect(&mut self, conn_id: &ConnId) -> Vec<Outbound> {
        match self.registry.leave(conn_id) {
            Some(departure) => vec![left_notice(departure)],
            None => Vec::new(),
        }
    }

    /// Resolve recipients to concrete connections. Room-scoped sets use the
    /// membership at delivery time.
    pub fn resolve(&self, sender: &ConnId, recipients: &Recipients) -> Vec<ConnId> {
        match recipients {
            Recipients::Sender => vec![sender.clone()],
            Recipients::Direct(target) => vec![target.clone()],
            Recipients::Room(room) => self.registry.members(room),
            Recipients::RoomExceptSender(room) => self
                .registry
                .members(room)
                .into_iter()
                .filter(|id| id != sender)
                .collect(),
        }
    }

    fn join(&mut self, sender: &ConnId, join: JoinRoom) -> Result<Vec<Outbound>, ProtocolViolation> {
        let outcome = self.registry.join(sender, &join.room_id, &join.user)?;

        let mut out = Vec::with_capacity(4);
        if let Some(departure) = outcome.left {
            out.push(left_notice(departure));
        }
        out.push(Outbound::new(
            Recipients::Sender,
            ServerEvent::ExistingUsers(outcome.others),
        ));
        out.push(Outbound::new(
            Recipients::Sender,
            ServerEvent::ExistingObjects(outcome.objects),
        ));
        out.push(Outbound::new(
            Recipients::RoomExceptSender(join.room_id),
            ServerEvent::UserJoined(outcome.session),
        ));
        Ok(out)
    }

    fn move_session(&mut self, sender: &ConnId, update: MoveUpdate) -> Vec<Outbound> {
        let Some(session) = self.registry.move_session(sender, &update) else {
            debug!(conn = %sender, "Move from connection without session ignored");
            return Vec::new();
        };
        vec![Outbound::new(
            Recipients::RoomExceptSender(session.room_id.clone()),
            ServerEvent::UserMoved(UserMoved {
                conn_id: sender.clone(),
                x: update.x,
                y: update.y,
                direction: update.direction,
                is_moving: update.is_moving,
            }),
        )]
    }

    fn chat(&mut self, sender: &ConnId, chat: ChatSend) -> Result<Vec<Outbound>, ProtocolViolation> {
        let from = self.registry.chat_sender(sender, &chat.room_id)?;
        Ok(vec![Outbound::new(
            Recipients::Room(from.room_id),
            ServerEvent::ChatMessage(ChatBroadcast {
                sender_id: sender.clone(),
                username: from.username,
                message: chat.message,
                timestamp: iso_timestamp(),
            }),
        )])
    }

    fn place_object(
        &mut self,
        sender: &ConnId,
        place: PlaceObject,
    ) -> Result<Vec<Outbound>, ProtocolViolation> {
        let object = self.registry.place_object(
            sender,
            place.kind,
            Vec2::new(place.x, place.y),
            &place.room_id,
        )?;
        Ok(vec![Outbound::new(
            Recipients::Room(place.room_id),
            ServerEvent::ObjectPlaced(object),
        )])
    }

    fn get_objects(&self, get: GetObjects) -> Vec<Outbound> {
        let objects = self.registry.objects(&get.room_id).to_vec();
        vec![Outbound::new(
            Recipients::Sender,
            ServerEvent::ExistingObjects(objects),
        )]
    }
}

fn left_notice(departure: Departure) -> Outbound {
    Outbound::new(
        Recipients::RoomExceptSender(departure.room_id),
        ServerEvent::UserLeft(UserLeft {
            conn_id: departure.conn_id,
        }),
    )
}
