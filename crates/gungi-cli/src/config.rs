//! Optional `gungi.toml` settings for the command-line front end.

use std::path::{Path, PathBuf};

use gungi_core::SetupMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Defaults applied when a command does not say otherwise. Command-line
/// flags win over every field here.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Setup mode used when no position string is given.
    #[serde(default = "default_mode")]
    pub mode: SetupMode,
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log")]
    pub log: String,
    /// Emit JSON instead of plain text.
    #[serde(default)]
    pub json: bool,
}

fn default_mode() -> SetupMode {
    SetupMode::Beginner
}

fn default_log() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            log: default_log(),
            json: false,
        }
    }
}

impl Config {
    pub const DEFAULT_PATH: &'static str = "gungi.toml";

    /// Reads `path`, or `gungi.toml` in the working directory when no path is
    /// given. A missing default file yields the defaults; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(Self::DEFAULT_PATH), false),
        };
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
