//! Configuration management for yearguess
//!
//! Handles loading user preferences: the game service URL and an optional
//! pinned visitor id.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default game service
pub const DEFAULT_BASE_URL: &str = "https://aricemusic-caregiver.hf.space";

/// yearguess configuration
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Config {
    /// Base URL of the game service, without the `/api/...` path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Fixed visitor id. If not set, each run generates a fresh one,
    /// which means each run plays a separate game.
    #[serde(default)]
    pub visitor_id: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            visitor_id: None,
        }
    }
}

impl Config {
    /// Get config directory path (~/.yearguess)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".yearguess"))
    }

    /// Get config file path (~/.yearguess/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load config from the default location, or return default if not found
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file, or return default if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }
}
