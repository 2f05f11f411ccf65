use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{domain::track::Station, sync::LateArtworkPolicy};

const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub station: Station,
    #[serde(default)]
    pub artwork: ArtworkConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported config version {0}, expected 1")]
    UnsupportedVersion(u32),

    #[error("station name must not be empty")]
    EmptyStationName,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy()))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Config> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Config {
                version: CONFIG_VERSION,
                ..Default::default()
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.version));
        }
        if self.station.name.trim().is_empty() {
            return Err(ConfigError::EmptyStationName);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArtworkConfig {
    /// When off, artwork-changed events are ignored.
    pub enabled: bool,
    /// Base directory for relative artwork addresses.
    pub root: Option<PathBuf>,
    pub late_policy: LateArtworkPolicy,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            root: None,
            late_policy: LateArtworkPolicy::Apply,
        }
    }
}
