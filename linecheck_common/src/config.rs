//! TOML loading for station configuration.
//!
//! Every config type is a plain `serde` struct; `ConfigLoader` adds
//! `load`/`parse` to all of them. Errors name the file or the offending key
//! so a bad `linecheck.toml` can be fixed from the message alone.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading or validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("config file {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read config file {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("invalid TOML: {0}")]
    Syntax(String),

    /// A value parsed but is outside what the station accepts.
    #[error("{key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }

    /// Key that failed validation, if any.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::Invalid { key, .. } => Some(*key),
            _ => None,
        }
    }
}

/// Diagnostic verbosity, written lowercase in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    /// Interlock denials, timeouts, misuse.
    Warn,
    /// Clamp fault and ERROR lock violations only.
    Error,
}

impl LogLevel {
    /// `EnvFilter` directive for this level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// `[shared]` section: process-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedConfig {
    pub log_level: LogLevel,
    /// Station name reported in diagnostics.
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: "linecheck".to_string(),
        }
    }
}

impl SharedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.service_name;
        if name.trim().is_empty() {
            return Err(ConfigError::invalid("shared.service_name", "must not be empty"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid(
                "shared.service_name",
                format!("{name:?} must not contain whitespace"),
            ));
        }
        Ok(())
    }
}

/// `load`/`parse` for any deserializable config type.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Syntax(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
