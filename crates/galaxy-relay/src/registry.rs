//! Room registry: the authoritative store of sessions and placed objects.
//!
//! Pure data plus mutation operations. No I/O and no locking; the
//! dispatcher owns the only instance and applies events one at a time.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use galaxy_common::protocol::{MoveUpdate, SessionSnapshot, UserDescriptor};
use galaxy_common::{new_id, ConnId, Direction, ObjectKind, PlacedObject, ProtocolViolation, Vec2};
use tracing::{debug, info};

/// A connected participant seated in exactly one room.
#[derive(Debug, Clone)]
pub struct Session {
    pub conn_id: ConnId,
    pub user_id: String,
    pub username: String,
    pub avatar_url: String,
    pub room_id: String,
    pub position: Vec2,
    pub direction: Direction,
    pub is_moving: bool,
}

impl Session {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            conn_id: self.conn_id.clone(),
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            avatar_url: self.avatar_url.clone(),
            room_id: self.room_id.clone(),
            x: self.position.x,
            y: self.position.y,
            direction: self.direction,
            is_moving: self.is_moving,
        }
    }
}

/// A named shared space.
#[derive(Debug, Clone, Default)]
pub struct Room {
    pub name: String,
    pub members: BTreeSet<ConnId>,
    pub objects: Vec<PlacedObject>,
}

/// Result of a successful join.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub session: SessionSnapshot,
    /// Everyone else already in the room. Never contains the joiner.
    pub others: BTreeMap<ConnId, SessionSnapshot>,
    pub objects: Vec<PlacedObject>,
    /// Set when the connection was seated elsewhere and had to leave first.
    pub left: Option<Departure>,
}

/// A session removed from its room.
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub conn_id: ConnId,
    pub room_id: String,
    pub username: String,
    pub room_evicted: bool,
}

/// Sender details needed to stamp a chat broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSender {
    pub room_id: String,
    pub username: String,
}

pub struct RoomRegistry {
    sessions: HashMap<ConnId, Session>,
    rooms: HashMap<String, Room>,
    spawn: Vec2,
    evict_empty_rooms: bool,
}

impl RoomRegistry {
    pub fn new(spawn: Vec2, evict_empty_rooms: bool) -> Self {
        Self {
            sessions: HashMap::new(),
            rooms: HashMap::new(),
            spawn,
            evict_empty_rooms,
        }
    }

    /// Seat `conn_id` in `room_id` at the spawn point.
    ///
    /// The room is created on first join. Rejects empty user id, username or
    /// room id without touching any state.
    pub fn join(
        &mut self,
        conn_id: &ConnId,
        room_id: &str,
        user: &UserDescriptor,
    ) -> Result<JoinOutcome, ProtocolViolation> {
        if room_id.trim().is_empty() {
            return Err(ProtocolViolation::MissingField("roomId"));
        }
        if user.user_id.trim().is_empty() {
            return Err(ProtocolViolation::MissingField("userId"));
        }
        if user.username.trim().is_empty() {
            return Err(ProtocolViolation::MissingField("username"));
        }

        // One room per session: joining another room leaves the old one
        // first. Rejoining the same room re-seats in place so the room
        // never empties.
        let left = if self.room_of(conn_id) == Some(room_id) {
            self.sessions.remove(conn_id);
            None
        } else {
            self.leave(conn_id)
        };

        let session = Session {
            conn_id: conn_id.clone(),
            user_id: user.user_id.clone(),
            username: user.username.clone(),
            avatar_url: user.avatar_url.clone(),
            room_id: room_id.to_string(),
            position: self.spawn,
            direction: Direction::Down,
            is_moving: false,
        };
        let snapshot = session.snapshot();

        let room = self.rooms.entry(room_id.to_string()).or_insert_with(|| {
            info!(room = room_id, "Room created");
            Room {
                name: room_id.to_string(),
                ..Room::default()
            }
        });

        let others = room
            .members
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .map(|s| (s.conn_id.clone(), s.snapshot()))
            .collect();
        let objects = room.objects.clone();

        room.members.insert(conn_id.clone());
        self.sessions.insert(conn_id.clone(), session);

        info!(conn = %conn_id, room = room_id, user = %user.username, "Session joined");
        Ok(JoinOutcome {
            session: snapshot,
            others,
            objects,
            left,
        })
    }

    /// Overwrite a session's position and facing. Returns `None` when the
    /// connection has no session.
    pub fn move_session(&mut self, conn_id: &ConnId, update: &MoveUpdate) -> Option<&Session> {
        let session = self.sessions.get_mut(conn_id)?;
        session.position = update.position();
        session.direction = update.direction;
        session.is_moving = update.is_moving;
        Some(session)
    }

    /// Append a freshly identified object to the sender's room.
    pub fn place_object(
        &mut self,
        conn_id: &ConnId,
        kind: ObjectKind,
        position: Vec2,
        room_id: &str,
    ) -> Result<PlacedObject, ProtocolViolation> {
        let session_room = self.require_room(conn_id, room_id)?;
        let room = self
            .rooms
            .get_mut(&session_room)
            .ok_or_else(|| ProtocolViolation::NoSession(conn_id.clone()))?;

        let object = PlacedObject {
            id: new_id(),
            kind,
            x: position.x,
            y: position.y,
        };
        room.objects.push(object.clone());
        debug!(conn = %conn_id, room = %session_room, id = %object.id, kind = %kind, "Object placed");
        Ok(object)
    }

    /// Check that the sender may chat in `room_id`.
    pub fn chat_sender(&self, conn_id: &ConnId, room_id: &str) -> Result<ChatSender, ProtocolViolation> {
        let session_room = self.require_room(conn_id, room_id)?;
        let username = self
            .sessions
            .get(conn_id)
            .map(|s| s.username.clone())
            .unwrap_or_default();
        Ok(ChatSender {
            room_id: session_room,
            username,
        })
    }

    /// Objects of a room in placement order. Unknown rooms have none.
    pub fn objects(&self, room_id: &str) -> &[PlacedObject] {
        self.rooms
            .get(room_id)
            .map(|r| r.objects.as_slice())
            .unwrap_or(&[])
    }

    /// Remove a session from its room. Idempotent: a second call for the
    /// same connection returns `None` and changes nothing.
    pub fn leave(&mut self, conn_id: &ConnId) -> Option<Departure> {
        let session = self.sessions.remove(conn_id)?;

        let mut room_evicted = false;
        if let Some(room) = self.rooms.get_mut(&session.room_id) {
            room.members.remove(conn_id);
            if room.members.is_empty() && self.evict_empty_rooms {
                self.rooms.remove(&session.room_id);
                room_evicted = true;
                info!(room = %session.room_id, "Room evicted (empty)");
            }
        }

        info!(conn = %conn_id, room = %session.room_id, user = %session.username, "Session left");
        Some(Departure {
            conn_id: conn_id.clone(),
            room_id: session.room_id,
            username: session.username,
            room_evicted,
        })
    }

    /// Current members of a room.
    pub fn members(&self, room_id: &str) -> Vec<ConnId> {
        self.rooms
            .get(room_id)
            .map(|r| r.members.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn session(&self, conn_id: &ConnId) -> Option<&Session> {
        self.sessions.get(conn_id)
    }

    pub fn room_of(&self, conn_id: &ConnId) -> Option<&str> {
        self.sessions.get(conn_id).map(|s| s.room_id.as_str())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn require_room(&self, conn_id: &ConnId, room_id: &str) -> Result<String, ProtocolViolation> {
        let session = self
            .sessions
            .get(conn_id)
            .ok_or_else(|| ProtocolViolation::NoSession(conn_id.clone()))?;
        if session.room_id != room_id {
            return Err(ProtocolViolation::RoomMismatch {
                session_room: session.room_id.clone(),
                requested: room_id.to_string(),
            });
        }
        Ok(session.room_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn user(name: &str) -> UserDescriptor {
        UserDescriptor {
            user_id: format!("uid-{name}"),
            username: name.to_string(),
            avatar_url: String::new(),
        }
    }

    fn registry() -> RoomRegistry {
        RoomRegistry::new(Vec2::new(400.0, 300.0), false)
    }

    #[test]
    fn join_spawns_at_default_position() {
        let mut reg = registry();
        let a = ConnId::from("a");
        let outcome = reg.join(&a, "lobby", &user("ada")).unwrap();
        assert_eq!(outcome.session.x, 400.0);
        assert_eq!(outcome.session.y, 300.0);
        assert_eq!(outcome.session.direction, Direction::Down);
        assert!(!outcome.session.is_moving);
        assert!(outcome.others.is_empty());
        assert_eq!(reg.room_of(&a), Some("lobby"));
    }

    #[test]
    fn snapshot_never_includes_joiner() {
        let mut reg = registry();
        let a = ConnId::from("a");
        let b = ConnId::from("b");
        reg.join(&a, "lobby", &user("ada")).unwrap();
        let outcome = reg.join(&b, "lobby", &user("bob")).unwrap();
        assert_eq!(outcome.others.len(), 1);
        assert!(outcome.others.contains_key(&a));
        assert!(!outcome.others.contains_key(&b));
    }

    #[test]
    fn join_rejects_blank_identity_without_side_effects() {
        let mut reg = registry();
        let a = ConnId::from("a");
        let mut bad = user("ada");
        bad.user_id.clear();
        assert!(matches!(
            reg.join(&a, "lobby", &bad),
            Err(ProtocolViolation::MissingField("userId"))
        ));

        let mut bad = user("ada");
        bad.username = "  ".into();
        assert!(reg.join(&a, "lobby", &bad).is_err());
        assert!(reg.join(&a, "", &user("ada")).is_err());

        assert_eq!(reg.session_count(), 0);
        assert_eq!(reg.room_count(), 0);
    }

    #[test]
    fn rejoin_moves_session_between_rooms() {
        let mut reg = registry();
        let a = ConnId::from("a");
        reg.join(&a, "lobby", &user("ada")).unwrap();
        let outcome = reg.join(&a, "attic", &user("ada")).unwrap();
        let left = outcome.left.unwrap();
        assert_eq!(left.room_id, "lobby");
        assert!(reg.members("lobby").is_empty());
        assert_eq!(reg.members("attic"), vec![a.clone()]);
        assert_eq!(reg.session_count(), 1);
    }

    #[test]
    fn move_overwrites_fields() {
        let mut reg = registry();
        let a = ConnId::from("a");
        reg.join(&a, "lobby", &user("ada")).unwrap();
        let update = MoveUpdate {
            x: 405.0,
            y: 300.0,
            direction: Direction::Right,
            is_moving: true,
        };
        let session = reg.move_session(&a, &update).unwrap();
        assert_eq!(session.position, Vec2::new(405.0, 300.0));
        assert_eq!(session.direction, Direction::Right);
        assert!(session.is_moving);
    }

    #[test]
    fn move_without_session_is_noop() {
        let mut reg = registry();
        let update = MoveUpdate {
            x: 1.0,
            y: 1.0,
            direction: Direction::Up,
            is_moving: true,
        };
        assert!(reg.move_session(&ConnId::from("ghost"), &update).is_none());
        assert_eq!(reg.session_count(), 0);
    }

    #[test]
    fn placements_are_unique_and_ordered() {
        let mut reg = registry();
        let a = ConnId::from("a");
        reg.join(&a, "lobby", &user("ada")).unwrap();

        let kinds = [ObjectKind::Desk, ObjectKind::Plant, ObjectKind::Chair, ObjectKind::Plant];
        let mut placed = Vec::new();
        for (i, kind) in kinds.iter().enumerate() {
            let obj = reg
                .place_object(&a, *kind, Vec2::new(i as f64, 0.0), "lobby")
                .unwrap();
            placed.push(obj);
        }

        let objects = reg.objects("lobby");
        assert_eq!(objects.len(), kinds.len());
        assert_eq!(objects, placed.as_slice());
        let ids: HashSet<_> = objects.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids.len(), kinds.len());
    }

    #[test]
    fn place_object_in_foreign_room_is_rejected() {
        let mut reg = registry();
        let a = ConnId::from("a");
        reg.join(&a, "lobby", &user("ada")).unwrap();
        let err = reg
            .place_object(&a, ObjectKind::Desk, Vec2::new(0.0, 0.0), "attic")
            .unwrap_err();
        assert!(matches!(err, ProtocolViolation::RoomMismatch { .. }));
        assert!(reg.objects("lobby").is_empty());
    }

    #[test]
    fn leave_is_idempotent() {
        let mut reg = registry();
        let a = ConnId::from("a");
        reg.join(&a, "lobby", &user("ada")).unwrap();
        let first = reg.leave(&a).unwrap();
        assert_eq!(first.room_id, "lobby");
        assert!(!first.room_evicted);
        assert!(reg.leave(&a).is_none());
        assert_eq!(reg.session_count(), 0);
    }

    #[test]
    fn empty_rooms_are_kept_by_default() {
        let mut reg = registry();
        let a = ConnId::from("a");
        reg.join(&a, "lobby", &user("ada")).unwrap();
        reg.place_object(&a, ObjectKind::Plant, Vec2::new(150.0, 200.0), "lobby")
            .unwrap();
        reg.leave(&a);
        assert_eq!(reg.room_count(), 1);
        assert_eq!(reg.objects("lobby").len(), 1);
    }

    #[test]
    fn empty_rooms_are_evicted_when_enabled() {
        let mut reg = RoomRegistry::new(Vec2::new(400.0, 300.0), true);
        let a = ConnId::from("a");
        reg.join(&a, "lobby", &user("ada")).unwrap();
        let departure = reg.leave(&a).unwrap();
        assert!(departure.room_evicted);
        assert_eq!(reg.room_count(), 0);
        assert!(reg.objects("lobby").is_empty());
    }

    #[test]
    fn rejoining_same_room_keeps_it_and_its_objects() {
        let mut reg = RoomRegistry::new(Vec2::new(400.0, 300.0), true);
        let a = ConnId::from("a");
        reg.join(&a, "lobby", &user("ada")).unwrap();
        reg.place_object(&a, ObjectKind::Plant, Vec2::new(150.0, 200.0), "lobby")
            .unwrap();
        reg.move_session(
            &a,
            &MoveUpdate {
                x: 10.0,
                y: 20.0,
                direction: Direction::Up,
                is_moving: true,
            },
        );

        let outcome = reg.join(&a, "lobby", &user("ada")).unwrap();
        assert!(outcome.left.is_none());
        assert!(outcome.others.is_empty());
        assert_eq!(outcome.objects.len(), 1);
        assert_eq!(reg.objects("lobby").len(), 1);
        assert_eq!(reg.members("lobby"), vec![a.clone()]);
        assert_eq!(reg.session_count(), 1);
        assert_eq!(reg.session(&a).unwrap().position, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn membership_equals_joins_minus_leaves() {
        let mut reg = registry();
        let ids: Vec<ConnId> = (0..6).map(|i| ConnId::from(format!("c{i}"))).collect();
        for id in &ids {
            reg.join(id, "lobby", &user(id.as_str())).unwrap();
        }
        reg.leave(&ids[1]);
        reg.leave(&ids[4]);
        reg.leave(&ids[4]);
        reg.join(&ids[1], "lobby", &user("again")).unwrap();

        let members: HashSet<_> = reg.members("lobby").into_iter().collect();
        let expected: HashSet<_> = [0, 1, 2, 3, 5].iter().map(|&i| ids[i].clone()).collect();
        assert_eq!(members, expected);
    }

    #[test]
    fn chat_requires_matching_room() {
        let mut reg = registry();
        let a = ConnId::from("a");
        assert!(matches!(
            reg.chat_sender(&a, "lobby"),
            Err(ProtocolViolation::NoSession(_))
        ));
        reg.join(&a, "lobby", &user("ada")).unwrap();
        let sender = reg.chat_sender(&a, "lobby").unwrap();
        assert_eq!(sender.username, "ada");
        assert!(reg.chat_sender(&a, "attic").is_err());
    }
}
