//! Full configuration validation.
//!
//! Validates numeric ranges and URL/room formats. Each section has its own
//! validator; this orchestrator calls them all and collects errors into a
//! single `ConfigError`.

mod helpers;
mod sections;


use crate::schema::GalaxyConfig;
use galaxy_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &GalaxyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_server(&mut errors, config);
    sections::validate_world(&mut errors, config);
    sections::validate_audio(&mut errors, config);
    sections::validate_client(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
