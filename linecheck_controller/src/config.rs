//! TOML configuration loader with validation.
//!
//! Loads `LineCheckConfig` and validates every section (tick bounds, clamp
//! window ordering, log directory, service name). A missing file is only
//! tolerated when no path was given explicitly: the station then runs on
//! built-in defaults.

use std::path::{Path, PathBuf};

use linecheck_common::config::{ConfigError, ConfigLoader};
use linecheck_common::consts::DEFAULT_CONFIG_PATH;
use linecheck_common::station::config::LineCheckConfig;

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<LineCheckConfig, ConfigError> {
    let config = LineCheckConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate from an in-memory TOML string (tests, embedding).
pub fn load_config_from_str(content: &str) -> Result<LineCheckConfig, ConfigError> {
    let config = LineCheckConfig::parse(content)?;
    config.validate()?;
    Ok(config)
}

/// Resolve the configuration for a run.
///
/// - `Some(path)`: the file must exist and validate.
/// - `None`: `DEFAULT_CONFIG_PATH` if present, else built-in defaults.
pub fn resolve_config(
    explicit: Option<&Path>,
) -> Result<(LineCheckConfig, ConfigSource), ConfigError> {
    if let Some(path) = explicit {
        return Ok((load_config(path)?, ConfigSource::File(path.to_path_buf())));
    }
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    match load_config(default_path) {
        Ok(config) => Ok((config, ConfigSource::File(default_path.to_path_buf()))),
        Err(ConfigError::NotFound(_)) => Ok((LineCheckConfig::default(), ConfigSource::Defaults)),
        Err(e) => Err(e),
    }
}
