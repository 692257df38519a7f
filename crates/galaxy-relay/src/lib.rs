//! galaxy-relay: authoritative room registry and event relay.
//!
//! Accepts WebSocket connections, tracks which room each connection is
//! seated in, and rebroadcasts movement, chat, placement and peer
//! negotiation events to the right recipients. Positions are taken as
//! reported by clients.

pub mod connection;
pub mod dispatcher;
pub mod registry;
pub mod relay;
pub mod server;
pub mod signaling;

pub use dispatcher::{Dispatcher, Ingress};
pub use registry::RoomRegistry;
pub use relay::{Outbound, Recipients, Relay};
pub use server::{bind, serve, RelaySettings};
