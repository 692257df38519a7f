//! Galaxy configuration system.
//!
//! TOML-based configuration shared by the relay server and the client.
//! All sections use `serde(default)` so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use galaxy_config::{config_to_json, load_config};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{GalaxyConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use galaxy_common::ConfigError;

/// Load config from `path` if given, otherwise from the platform default
/// location (creating a commented default file on first run).
pub fn load_config(path: Option<&Path>) -> Result<GalaxyConfig, ConfigError> {
    match path {
        Some(path) => toml_loader::load_from_path(path),
        None => toml_loader::load_default(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &GalaxyConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
