//! Wire protocol shared by the relay and its clients.
//!
//! Every WebSocket text frame carries one JSON object of the form
//! `{"event": "<name>", "data": <payload>}`. Payload fields are camelCase.
//! Negotiation payloads for `offer`, `answer` and `ice-candidate` are
//! opaque JSON values that the relay forwards without inspecting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::ConnId;
use crate::types::{Direction, ObjectKind, PlacedObject, Vec2};

// ---------------------------------------------------------------------------
// Client -> server
// ---------------------------------------------------------------------------

/// Events a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "join_room")]
    JoinRoom(JoinRoom),

    #[serde(rename = "move")]
    Move(MoveUpdate),

    #[serde(rename = "chat_message")]
    ChatMessage(ChatSend),

    #[serde(rename = "place_object")]
    PlaceObject(PlaceObject),

    #[serde(rename = "get_objects")]
    GetObjects(GetObjects),

    #[serde(rename = "offer")]
    Offer(SignalRequest),

    #[serde(rename = "answer")]
    Answer(SignalRequest),

    #[serde(rename = "ice-candidate")]
    IceCandidate(SignalRequest),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinRoom(_) => "join_room",
            ClientEvent::Move(_) => "move",
            ClientEvent::ChatMessage(_) => "chat_message",
            ClientEvent::PlaceObject(_) => "place_object",
            ClientEvent::GetObjects(_) => "get_objects",
            ClientEvent::Offer(_) => "offer",
            ClientEvent::Answer(_) => "answer",
            ClientEvent::IceCandidate(_) => "ice-candidate",
        }
    }
}

/// Identity supplied by the authentication service before joining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDescriptor {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoom {
    pub room_id: String,
    pub user: UserDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveUpdate {
    pub x: f64,
    pub y: f64,
    pub direction: Direction,
    pub is_moving: bool,
}

impl MoveUpdate {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSend {
    pub message: String,
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceObject {
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub x: f64,
    pub y: f64,
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetObjects {
    pub room_id: String,
}

/// A negotiation message addressed to one connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalRequest {
    pub target_id: ConnId,
    pub payload: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Server -> client
// ---------------------------------------------------------------------------

/// Events the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// First frame on every connection: tells the client its own id.
    #[serde(rename = "session_ready")]
    SessionReady(SessionReady),

    #[serde(rename = "existing_users")]
    ExistingUsers(BTreeMap<ConnId, SessionSnapshot>),

    #[serde(rename = "existing_objects")]
    ExistingObjects(Vec<PlacedObject>),

    #[serde(rename = "user_joined")]
    UserJoined(SessionSnapshot),

    #[serde(rename = "user_moved")]
    UserMoved(UserMoved),

    #[serde(rename = "user_left")]
    UserLeft(UserLeft),

    #[serde(rename = "chat_message")]
    ChatMessage(ChatBroadcast),

    #[serde(rename = "object_placed")]
    ObjectPlaced(PlacedObject),

    #[serde(rename = "offer")]
    Offer(SignalDelivery),

    #[serde(rename = "answer")]
    Answer(SignalDelivery),

    #[serde(rename = "ice-candidate")]
    IceCandidate(SignalDelivery),
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::SessionReady(_) => "session_ready",
            ServerEvent::ExistingUsers(_) => "existing_users",
            ServerEvent::ExistingObjects(_) => "existing_objects",
            ServerEvent::UserJoined(_) => "user_joined",
            ServerEvent::UserMoved(_) => "user_moved",
            ServerEvent::UserLeft(_) => "user_left",
            ServerEvent::ChatMessage(_) => "chat_message",
            ServerEvent::ObjectPlaced(_) => "object_placed",
            ServerEvent::Offer(_) => "offer",
            ServerEvent::Answer(_) => "answer",
            ServerEvent::IceCandidate(_) => "ice-candidate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReady {
    pub conn_id: ConnId,
}

/// Public view of one seated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub conn_id: ConnId,
    pub user_id: String,
    pub username: String,
    pub avatar_url: String,
    pub room_id: String,
    pub x: f64,
    pub y: f64,
    pub direction: Direction,
    pub is_moving: bool,
}

impl SessionSnapshot {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMoved {
    pub conn_id: ConnId,
    pub x: f64,
    pub y: f64,
    pub direction: Direction,
    pub is_moving: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeft {
    pub conn_id: ConnId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBroadcast {
    pub sender_id: ConnId,
    pub username: String,
    pub message: String,
    /// ISO-8601 UTC, millisecond precision.
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalDelivery {
    pub sender_id: ConnId,
    pub payload: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_join_room() {
        let raw = r#"{"event":"join_room","data":{"roomId":"lobby","user":{"userId":"u1","username":"ada","avatarUrl":"/a.png"}}}"#;
        let event: ClientEvent = serde_json::from_str(raw).unwrap();
        match event {
            ClientEvent::JoinRoom(join) => {
                assert_eq!(join.room_id, "lobby");
                assert_eq!(join.user.user_id, "u1");
                assert_eq!(join.user.username, "ada");
                assert_eq!(join.user.avatar_url, "/a.png");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn avatar_url_is_optional() {
        let raw = r#"{"event":"join_room","data":{"roomId":"lobby","user":{"userId":"u1","username":"ada"}}}"#;
        let event: ClientEvent = serde_json::from_str(raw).unwrap();
        assert!(matches!(event, ClientEvent::JoinRoom(ref j) if j.user.avatar_url.is_empty()));
    }

    #[test]
    fn join_without_user_id_is_rejected() {
        let raw = r#"{"event":"join_room","data":{"roomId":"lobby","user":{"username":"ada"}}}"#;
        assert!(serde_json::from_str::<ClientEvent>(raw).is_err());
    }

    #[test]
    fn parses_move_with_numeric_direction() {
        let raw = r#"{"event":"move","data":{"x":405,"y":300,"direction":2,"isMoving":true}}"#;
        let event: ClientEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(
            event,
            ClientEvent::Move(MoveUpdate {
                x: 405.0,
                y: 300.0,
                direction: Direction::Right,
                is_moving: true,
            })
        );
    }

    #[test]
    fn parses_place_object_type_field() {
        let raw = r#"{"event":"place_object","data":{"type":"plant","x":150,"y":200,"roomId":"lobby"}}"#;
        let event: ClientEvent = serde_json::from_str(raw).unwrap();
        assert!(matches!(event, ClientEvent::PlaceObject(ref p) if p.kind == ObjectKind::Plant));
    }

    #[test]
    fn ice_candidate_event_name_has_hyphen() {
        let event = ClientEvent::IceCandidate(SignalRequest {
            target_id: ConnId::from("b"),
            payload: json!({"candidate": "candidate:1 1 udp"}),
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "ice-candidate");
        assert_eq!(value["data"]["targetId"], "b");
        assert_eq!(event.name(), "ice-candidate");
    }

    #[test]
    fn unknown_event_is_rejected() {
        let raw = r#"{"event":"teleport","data":{}}"#;
        assert!(serde_json::from_str::<ClientEvent>(raw).is_err());
    }

    #[test]
    fn user_moved_wire_shape() {
        let event = ServerEvent::UserMoved(UserMoved {
            conn_id: ConnId::from("a"),
            x: 405.0,
            y: 300.0,
            direction: Direction::Right,
            is_moving: true,
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "user_moved",
                "data": {"connId": "a", "x": 405.0, "y": 300.0, "direction": 2, "isMoving": true}
            })
        );
    }

    #[test]
    fn existing_users_is_a_map_keyed_by_conn_id() {
        let mut users = BTreeMap::new();
        users.insert(
            ConnId::from("a"),
            SessionSnapshot {
                conn_id: ConnId::from("a"),
                user_id: "u1".into(),
                username: "ada".into(),
                avatar_url: String::new(),
                room_id: "lobby".into(),
                x: 400.0,
                y: 300.0,
                direction: Direction::Down,
                is_moving: false,
            },
        );
        let value = serde_json::to_value(ServerEvent::ExistingUsers(users)).unwrap();
        assert_eq!(value["event"], "existing_users");
        assert_eq!(value["data"]["a"]["username"], "ada");
        assert_eq!(value["data"]["a"]["roomId"], "lobby");
    }

    #[test]
    fn signal_payload_is_passed_through_untouched() {
        let payload = json!({"type": "offer", "sdp": "v=0\r\n", "extra": [1, 2, 3]});
        let event = ServerEvent::Offer(SignalDelivery {
            sender_id: ConnId::from("a"),
            payload: payload.clone(),
        });
        let json = serde_json::to_string(&event).unwrap();
        let back: ServerEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, ServerEvent::Offer(ref d) if d.payload == payload));
    }
}
