//! WebSocket client for the Galaxy relay.
//!
//! A background task owns the socket; the caller gets a [`RelayClient`]
//! handle for outgoing events and an mpsc receiver of
//! [`ConnectionEvent`]s to drain once per frame.

mod client;
mod task;
mod types;

pub use client::RelayClient;
pub use task::{decode, encode};
pub use types::{ConnectionConfig, ConnectionEvent};
