//! Single-consumer dispatcher.
//!
//! Connection tasks push [`Ingress`] messages into one bounded queue. The
//! dispatcher drains it in arrival order, applies each event to the relay
//! and fans the results out to per-connection outbound channels. Because
//! one task owns all state, events are applied atomically with respect to
//! each other and per-recipient order follows queue order.

use std::collections::HashMap;

use galaxy_common::protocol::{ClientEvent, ServerEvent, SessionReady};
use galaxy_common::ConnId;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::relay::{Outbound, Relay};

/// Messages from connection tasks to the dispatcher.
#[derive(Debug)]
pub enum Ingress {
    /// A transport was accepted. Frames for it go to `outbound`.
    Connected {
        conn_id: ConnId,
        outbound: mpsc::Sender<String>,
    },
    /// A parsed client event.
    Event { conn_id: ConnId, event: ClientEvent },
    /// The transport closed, cleanly or otherwise.
    Disconnected { conn_id: ConnId },
}

pub struct Dispatcher {
    relay: Relay,
    outbound: HashMap<ConnId, mpsc::Sender<String>>,
}

impl Dispatcher {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay,
            outbound: HashMap::new(),
        }
    }

    pub fn relay(&self) -> &Relay {
        &self.relay
    }

    pub fn connection_count(&self) -> usize {
        self.outbound.len()
    }

    /// Drain the ingress queue until every producer has gone away.
    pub async fn run(mut self, mut rx: mpsc::Receiver<Ingress>) {
        while let Some(msg) = rx.recv().await {
            self.apply(msg);
        }
        info!("Ingress queue closed, dispatcher stopping");
    }

    /// Apply one ingress message to completion.
    pub fn apply(&mut self, msg: Ingress) {
        match msg {
            Ingress::Connected { conn_id, outbound } => {
                debug!(conn = %conn_id, "Connection registered");
                let ready = ServerEvent::SessionReady(SessionReady {
                    conn_id: conn_id.clone(),
                });
                self.outbound.insert(conn_id.clone(), outbound);
                self.send_to(&conn_id, &ready);
            }
            Ingress::Event { conn_id, event } => {
                let name = event.name();
                match self.relay.handle(&conn_id, event) {
                    Ok(out) => self.deliver(&conn_id, out),
                    Err(e) => {
                        warn!(conn = %conn_id, event = name, error = %e, "Event rejected");
                    }
                }
            }
            Ingress::Disconnected { conn_id } => {
                self.outbound.remove(&conn_id);
                let out = self.relay.disconnect(&conn_id);
                self.deliver(&conn_id, out);
                debug!(conn = %conn_id, "Connection unregistered");
            }
        }
    }

    fn deliver(&self, sender: &ConnId, out: Vec<Outbound>) {
        for item in out {
            for target in self.relay.resolve(sender, &item.recipients) {
                self.send_to(&target, &item.event);
            }
        }
    }

    fn send_to(&self, target: &ConnId, event: &ServerEvent) {
        let Some(tx) = self.outbound.get(target) else {
            debug!(target = %target, event = event.name(), "Unknown recipient, dropping");
            return;
        };
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                warn!(event = event.name(), error = %e, "Failed to encode event");
                return;
            }
        };
        if let Err(e) = tx.try_send(json) {
            match e {
                mpsc::error::TrySendError::Full(_) => {
                    warn!(target = %target, event = event.name(), "Outbound queue full, dropping frame");
                }
                mpsc::error::TrySendError::Closed(_) => {
                    debug!(target = %target, "Outbound channel closed");
                }
            }
        }
    }
}
