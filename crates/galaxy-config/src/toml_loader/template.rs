//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Galaxy Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# bind = "0.0.0.0"
# port = 3001
# ingress_capacity = 1024    # 16-65536
# outbound_capacity = 256    # 8-4096
# evict_empty_rooms = false  # rooms otherwise live until restart

[world]
# spawn_x = 400.0
# spawn_y = 300.0
# move_speed = 5.0           # 0.5-50
# avatar_radius = 16.0       # 1-128
# animation_frames = 4       # 1-16
# animation_speed = 10       # 1-120
# default_scenery = true

[audio]
# enabled = true
# max_distance = 400.0       # 1-10000
# microphone = true
# start_muted = false
# ice_servers = ["stun:stun.l.google.com:19302", "stun:global.stun.twilio.com:3478"]

[client]
# server_url = "ws://127.0.0.1:3001"
# room = "lobby"
# tick_rate = 60             # 10-240
# chat_history = 200         # 1-10000
# asset_base_url = "/assets"

[logging]
# level = "info"             # trace, debug, info, warn, error
"##
    .to_string()
}
