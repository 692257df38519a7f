//! The client's view of the room, kept in step with relay events.

use std::collections::BTreeMap;

use galaxy_common::protocol::{SessionSnapshot, UserDescriptor};
use galaxy_common::{ConnId, Direction, Rect, ServerEvent, Vec2};
use tracing::debug;

use crate::scenery::SceneObject;

#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub conn_id: ConnId,
    pub user_id: String,
    pub username: String,
    pub avatar_url: String,
    pub position: Vec2,
    pub direction: Direction,
    pub is_moving: bool,
}

impl Avatar {
    pub fn from_snapshot(s: &SessionSnapshot) -> Self {
        Self {
            conn_id: s.conn_id.clone(),
            user_id: s.user_id.clone(),
            username: s.username.clone(),
            avatar_url: s.avatar_url.clone(),
            position: s.position(),
            direction: s.direction,
            is_moving: s.is_moving,
        }
    }
}

pub struct WorldState {
    room: String,
    profile: UserDescriptor,
    spawn: Vec2,
    self_id: Option<ConnId>,
    local: Option<Avatar>,
    remotes: BTreeMap<ConnId, Avatar>,
    scenery: Vec<SceneObject>,
    placed: Vec<SceneObject>,
}

impl WorldState {
    pub fn new(
        room: impl Into<String>,
        profile: UserDescriptor,
        spawn: Vec2,
        scenery: Vec<SceneObject>,
    ) -> Self {
        Self {
            room: room.into(),
            profile,
            spawn,
            self_id: None,
            local: None,
            remotes: BTreeMap::new(),
            scenery,
            placed: Vec::new(),
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn profile(&self) -> &UserDescriptor {
        &self.profile
    }

    pub fn self_id(&self) -> Option<&ConnId> {
        self.self_id.as_ref()
    }

    /// The local avatar, once the relay has seated us.
    pub fn local(&self) -> Option<&Avatar> {
        self.local.as_ref()
    }

    pub fn local_mut(&mut self) -> Option<&mut Avatar> {
        self.local.as_mut()
    }

    pub fn remotes(&self) -> &BTreeMap<ConnId, Avatar> {
        &self.remotes
    }

    pub fn remote(&self, conn_id: &ConnId) -> Option<&Avatar> {
        self.remotes.get(conn_id)
    }

    /// Static scenery followed by placed objects in placement order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.scenery.iter().chain(self.placed.iter())
    }

    pub fn obstacles(&self) -> Vec<Rect> {
        self.objects().map(SceneObject::collision_rect).collect()
    }

    /// Fold one relay event into the view. Events that carry nothing for
    /// the world (chat, negotiation) are ignored.
    pub fn apply(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::SessionReady(ready) => {
                self.self_id = Some(ready.conn_id.clone());
            }
            ServerEvent::ExistingUsers(users) => {
                self.remotes = users
                    .iter()
                    .filter(|(id, _)| Some(*id) != self.self_id.as_ref())
                    .map(|(id, s)| (id.clone(), Avatar::from_snapshot(s)))
                    .collect();
                self.seat_local();
            }
            ServerEvent::ExistingObjects(objects) => {
                self.placed.clear();
                for obj in objects {
                    self.add_placed(SceneObject::from_placed(obj));
                }
            }
            ServerEvent::UserJoined(s) => {
                if Some(&s.conn_id) == self.self_id.as_ref() {
                    return;
                }
                self.remotes
                    .insert(s.conn_id.clone(), Avatar::from_snapshot(s));
            }
            ServerEvent::UserMoved(m) => match self.remotes.get_mut(&m.conn_id) {
                Some(avatar) => {
                    avatar.position = Vec2::new(m.x, m.y);
                    avatar.direction = m.direction;
                    avatar.is_moving = m.is_moving;
                }
                None => debug!(conn = %m.conn_id, "Move for unknown avatar ignored"),
            },
            ServerEvent::UserLeft(left) => {
                self.remotes.remove(&left.conn_id);
            }
            ServerEvent::ObjectPlaced(obj) => {
                self.add_placed(SceneObject::from_placed(obj));
            }
            ServerEvent::ChatMessage(_)
            | ServerEvent::Offer(_)
            | ServerEvent::Answer(_)
            | ServerEvent::IceCandidate(_) => {}
        }
    }

    fn seat_local(&mut self) {
        let conn_id = self.self_id.clone().unwrap_or_default();
        self.local = Some(Avatar {
            conn_id,
            user_id: self.profile.user_id.clone(),
            username: self.profile.username.clone(),
            avatar_url: self.profile.avatar_url.clone(),
            position: self.spawn,
            direction: Direction::Down,
            is_moving: false,
        });
        debug!(room = %self.room, x = self.spawn.x, y = self.spawn.y, "Local avatar seated");
    }

    fn add_placed(&mut self, obj: SceneObject) {
        if self.objects().any(|o| o.id == obj.id) {
            return;
        }
        self.placed.push(obj);
    }
}
