//! Accept loop and dispatcher wiring.

use galaxy_common::{GalaxyError, Vec2};
use galaxy_config::GalaxyConfig;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;

use crate::connection::handle_connection;
use crate::dispatcher::Dispatcher;
use crate::registry::RoomRegistry;
use crate::relay::Relay;

/// Runtime settings for one relay instance.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub spawn: Vec2,
    pub evict_empty_rooms: bool,
    pub ingress_capacity: usize,
    pub outbound_capacity: usize,
}

impl RelaySettings {
    pub fn from_config(config: &GalaxyConfig) -> Self {
        Self {
            spawn: Vec2::new(config.world.spawn_x, config.world.spawn_y),
            evict_empty_rooms: config.server.evict_empty_rooms,
            ingress_capacity: config.server.ingress_capacity as usize,
            outbound_capacity: config.server.outbound_capacity as usize,
        }
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self::from_config(&GalaxyConfig::default())
    }
}

pub async fn bind(addr: &str) -> Result<TcpListener, GalaxyError> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "galaxy-relay listening");
    Ok(listener)
}

/// Spawn the dispatcher and accept connections forever.
pub async fn serve(listener: TcpListener, settings: RelaySettings) {
    let (ingress_tx, ingress_rx) = mpsc::channel(settings.ingress_capacity);
    let relay = Relay::new(RoomRegistry::new(settings.spawn, settings.evict_empty_rooms));
    tokio::spawn(Dispatcher::new(relay).run(ingress_rx));

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let ingress = ingress_tx.clone();
                let outbound_capacity = settings.outbound_capacity;
                tokio::spawn(async move {
                    match accept_async(stream).await {
                        Ok(ws) => handle_connection(ws, addr, ingress, outbound_capacity).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}
