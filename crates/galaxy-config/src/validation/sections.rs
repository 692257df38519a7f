//! Per-section validators.

use crate::schema::GalaxyConfig;

use super::helpers::{validate_range, validate_range_f64};

/// Validate relay server constraints.
pub(crate) fn validate_server(errors: &mut Vec<String>, config: &GalaxyConfig) {
    validate_range(errors, "server.port", config.server.port as u32, 1, 65535);
    validate_range(
        errors,
        "server.ingress_capacity",
        config.server.ingress_capacity,
        16,
        65536,
    );
    validate_range(
        errors,
        "server.outbound_capacity",
        config.server.outbound_capacity,
        8,
        4096,
    );
    if config.server.bind.trim().is_empty() {
        errors.push("server.bind must not be empty".into());
    }
}

/// Validate movement, collision and animation constraints.
pub(crate) fn validate_world(errors: &mut Vec<String>, config: &GalaxyConfig) {
    let world = &config.world;
    validate_range_f64(errors, "world.move_speed", world.move_speed, 0.5, 50.0);
    validate_range_f64(errors, "world.avatar_radius", world.avatar_radius, 1.0, 128.0);
    validate_range(errors, "world.animation_frames", world.animation_frames, 1, 16);
    validate_range(errors, "world.animation_speed", world.animation_speed, 1, 120);
    if !world.spawn_x.is_finite() || !world.spawn_y.is_finite() {
        errors.push("world.spawn_x/spawn_y must be finite".into());
    }
}

/// Validate proximity audio constraints.
pub(crate) fn validate_audio(errors: &mut Vec<String>, config: &GalaxyConfig) {
    validate_range_f64(
        errors,
        "audio.max_distance",
        config.audio.max_distance,
        1.0,
        10000.0,
    );
    for url in &config.audio.ice_servers {
        if !(url.starts_with("stun:") || url.starts_with("turn:") || url.starts_with("turns:")) {
            errors.push(format!(
                "audio.ice_servers entry '{url}' must start with stun:, turn: or turns:"
            ));
        }
    }
}

/// Validate client connection constraints.
pub(crate) fn validate_client(errors: &mut Vec<String>, config: &GalaxyConfig) {
    let client = &config.client;
    validate_range(errors, "client.tick_rate", client.tick_rate, 10, 240);
    validate_range(errors, "client.chat_history", client.chat_history, 1, 10000);
    if !(client.server_url.starts_with("ws://") || client.server_url.starts_with("wss://")) {
        errors.push(format!(
            "client.server_url = '{}' must start with ws:// or wss://",
            client.server_url
        ));
    }
    if client.room.trim().is_empty() {
        errors.push("client.room must not be empty".into());
    }
}
