use std::path::Path;

use galaxy_common::ConfigError;
use tracing::{debug, info};

use super::paths::{create_default_config, default_config_path};
use crate::schema::GalaxyConfig;
use crate::validation;

/// Read, parse and validate one TOML file. Missing fields take their
/// defaults; out-of-range values are reported together as one
/// [`ConfigError::ValidationError`].
pub fn load_from_path(path: &Path) -> Result<GalaxyConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "failed to read {}: {e}",
                path.display()
            )))
        }
    };

    let config: GalaxyConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
    validation::validate(&config)?;

    debug!(path = %path.display(), "Config loaded");
    Ok(config)
}

/// Load `<config dir>/galaxy/config.toml`, writing the commented template
/// there first if nothing exists yet.
pub fn load_default() -> Result<GalaxyConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "No config found, writing defaults");
            create_default_config(&path)?;
            Ok(GalaxyConfig::default())
        }
        other => other,
    }
}
