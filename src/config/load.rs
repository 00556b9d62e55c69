//! The main config loading module for hdls.
//!
//! Handles loading and deserializing settings from `hdls.toml`.
//!
//! Provides the main [Config] struct, as well as the internal [RawConfig] used for parsing.
//! The file is optional: without one, hdls runs on the `HADOOP_*` environment alone.

use crate::config::connection::{Connection, InternalConnection, Kerberos};
use crate::error::{Error, Result};
use crate::utils::get_home;

use serde::Deserialize;

use std::fs;
use std::path::{Path, PathBuf};

/// Raw configuration as read from the toml file.
/// It is converted into the main [Config] struct afterwards.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    connection: Connection,
    kerberos: Kerberos,
}

/// Main configuration struct for hdls
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    connection: InternalConnection,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            connection: InternalConnection::from((raw.connection, raw.kerberos)),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default path when none is given,
    /// then apply the process environment.
    ///
    /// A missing file means defaults; an unreadable or invalid file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        let config = Self::load_file(&path)?;
        Ok(config.with_env(|name| std::env::var(name).ok()))
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("reading config {}: {}", path.display(), e)))?;
        let config = Self::from_toml(&content)
            .map_err(|e| Error::config(format!("parsing config {}: {}", path.display(), e)))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str::<RawConfig>(content).map(Self::from)
    }

    /// Applies environment overrides through `lookup`.
    pub fn with_env<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            connection: self.connection.with_env(lookup),
        }
    }

    // Getters

    #[inline]
    pub fn connection(&self) -> &InternalConnection {
        &self.connection
    }

    /// Determine the default configuration file path.
    /// Checks for XDG_CONFIG_HOME first,
    /// then defaults to ~/.config/hdls/hdls.toml.
    /// `HDLS_CONFIG` is handled by the command line parser.
    pub fn default_path() -> PathBuf {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("hdls/hdls.toml");
        }

        if let Some(home) = get_home() {
            return home.join(".config/hdls/hdls.toml");
        }
        PathBuf::from("hdls.toml")
    }
}
