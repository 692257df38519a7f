//! Chat history management.
//!
//! Stores messages per room with a bounded ring buffer so memory
//! usage stays predictable.

use std::collections::{HashMap, VecDeque};

use galaxy_common::protocol::{ChatBroadcast, ChatSend};
use galaxy_common::ConnId;
use serde::{Deserialize, Serialize};

/// A single chat message as received from the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub room: String,
    pub sender_id: ConnId,
    pub username: String,
    pub message: String,
    pub timestamp: String,
}

impl ChatMessage {
    pub fn from_broadcast(room: &str, msg: &ChatBroadcast) -> Self {
        Self {
            room: room.to_string(),
            sender_id: msg.sender_id.clone(),
            username: msg.username.clone(),
            message: msg.message.clone(),
            timestamp: msg.timestamp.clone(),
        }
    }
}

/// Build an outgoing chat event. Blank input is not sent.
pub fn compose(room: &str, input: &str) -> Option<ChatSend> {
    if input.trim().is_empty() {
        return None;
    }
    Some(ChatSend {
        message: input.to_string(),
        room_id: room.to_string(),
    })
}

/// Configuration for chat history storage.
#[derive(Debug, Clone)]
pub struct ChatHistoryConfig {
    /// Maximum messages to retain per room.
    pub max_messages_per_room: usize,
}

impl Default for ChatHistoryConfig {
    fn default() -> Self {
        Self {
            max_messages_per_room: 200,
        }
    }
}

/// In-memory chat history, keyed by room name.
pub struct ChatHistory {
    config: ChatHistoryConfig,
    rooms: HashMap<String, VecDeque<ChatMessage>>,
}

impl ChatHistory {
    pub fn new(config: ChatHistoryConfig) -> Self {
        Self {
            config,
            rooms: HashMap::new(),
        }
    }

    /// Push a message into its room. Oldest messages are evicted when the
    /// buffer is full.
    pub fn push(&mut self, msg: ChatMessage) {
        let buf = self.rooms.entry(msg.room.clone()).or_default();
        if buf.len() >= self.config.max_messages_per_room {
            buf.pop_front();
        }
        buf.push_back(msg);
    }

    /// The most recent `limit` messages from a room (oldest first).
    pub fn recent(&self, room: &str, limit: usize) -> Vec<&ChatMessage> {
        match self.rooms.get(room) {
            Some(buf) => {
                let skip = buf.len().saturating_sub(limit);
                buf.iter().skip(skip).collect()
            }
            None => Vec::new(),
        }
    }

    pub fn all(&self, room: &str) -> Vec<&ChatMessage> {
        match self.rooms.get(room) {
            Some(buf) => buf.iter().collect(),
            None => Vec::new(),
        }
    }

    pub fn clear_room(&mut self, room: &str) {
        self.rooms.remove(room);
    }

    /// Total number of stored messages across all rooms.
    pub fn total_messages(&self) -> usize {
        self.rooms.values().map(|b| b.len()).sum()
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new(ChatHistoryConfig::default())
    }
}
