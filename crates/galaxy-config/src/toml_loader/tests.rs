//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_galaxy_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, galaxy_common::ConfigError::FileNotFound(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[server]
port = 4100
evict_empty_rooms = true

[audio]
max_distance = 250.0
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.port, 4100);
    assert!(config.server.evict_empty_rooms);
    assert_eq!(config.audio.max_distance, 250.0);
    // Defaults preserved
    assert_eq!(config.server.bind, "0.0.0.0");
    assert_eq!(config.world.spawn_y, 300.0);
    assert_eq!(config.client.room, "lobby");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, galaxy_common::ConfigError::ParseError(_)));
}

#[test]
fn load_config_with_invalid_values_reports_every_violation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[world]
move_speed = 0.0

[client]
tick_rate = 0
"#,
    )
    .unwrap();

    match load_from_path(&path).unwrap_err() {
        galaxy_common::ConfigError::ValidationError(msg) => {
            assert!(msg.contains("world.move_speed"), "{msg}");
            assert!(msg.contains("client.tick_rate"), "{msg}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("galaxy").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.port, 3001);
    assert_eq!(config.client.server_url, "ws://127.0.0.1:3001");
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::GalaxyConfig;

    let config: GalaxyConfig = toml::from_str(&default_config_toml()).unwrap();
    assert_eq!(config.world.avatar_radius, 16.0);
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("galaxy"));
        assert!(path_str.ends_with("config.toml"));
    }
}
