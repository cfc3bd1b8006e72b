use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::image::runtimes::docker_cli::DEFAULT_DOCKER_BINARY;
use crate::logging::LogLevel;
use crate::version::filter::TagFilter;

// =============================================================================
// Constants
// =============================================================================

/// Default bound on a whole `peek-latest-image` run in seconds (1 minute)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// User agent sent to registries
pub const USER_AGENT: &str = concat!("image-peek/", env!("CARGO_PKG_VERSION"));

/// Name of the config file inside the config directory
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub log_level: LogLevel,
    pub peek: PeekConfig,
}

/// Settings for the `peek-latest-image` command
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PeekConfig {
    /// Bound on the whole run in seconds
    pub timeout_secs: u64,
    /// Regular expression registry tags must match
    pub tag_filter: TagFilter,
    /// Skip tags that fail to parse instead of aborting
    pub skip_invalid_tags: bool,
    /// Path to the docker client
    pub docker_binary: PathBuf,
}

impl Default for PeekConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            tag_filter: TagFilter::default(),
            skip_invalid_tags: false,
            docker_binary: PathBuf::from(DEFAULT_DOCKER_BINARY),
        }
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, the default config file is
    /// read if present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_default(explicit, &config_path())
    }

    fn load_with_default(explicit: Option<&Path>, default_path: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if default_path.is_file() => Self::from_file(default_path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the config directory for image-peek.
/// Uses $XDG_CONFIG_HOME/image-peek if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/image-peek,
/// or ./image-peek if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("image-peek")
}
