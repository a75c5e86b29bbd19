// src/config/model.rs

use serde::Deserialize;

/// Top-level runtime config, mirror of `alerter.toml`.  Every table is
/// optional; an absent file yields the built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

/// Mirror of the `[client]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Profile name used to locate the cryptographic identity registered
    /// with the manager.
    pub profile: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            profile: crate::client::DEFAULT_PROFILE.to_owned(),
        }
    }
}

/// Mirror of the `[logging]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "INFO".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable: false,
            file: None,
            level: default_level(),
        }
    }
}
