// src/config/loader.rs

//! # Configuration Loader
//!
//! Reads `alerter.toml` and deserializes it into [`Config`].  A missing file
//! is not an error for callers of [`load_or_default`]: the client falls back
//! to the built-in profile and logging defaults.

use std::{fs, path::Path};

use thiserror::Error;

use crate::config::model::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load and parse the configuration from `path`.
/// Logs at DEBUG before reading and INFO on success.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    log::debug!("reading alerter config from {:?}", path);
    let txt = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&txt)?;
    log::info!("loaded alerter config from {:?}", path);
    Ok(cfg)
}

/// Like [`load`], but an absent or unreadable file yields the defaults
/// (profile `"motion"`, logging to stdout at INFO).
pub fn load_or_default(path: &Path) -> Config {
    if !path.exists() {
        log::debug!("no config at {:?}, using defaults", path);
        return Config::default();
    }
    load(path).unwrap_or_else(|e| {
        log::error!("ignoring unusable config {:?}: {e}", path);
        Config::default()
    })
}
