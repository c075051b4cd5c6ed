//! TOML configuration
//!
//! Loaded from `--config PATH` or `~/.daygrid/config.toml`. A missing file
//! yields the defaults; a malformed one is an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::types::{DaygridError, Result};

/// Name of the per-user data directory under `$HOME`
const DATA_DIR_NAME: &str = ".daygrid";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub retry: RetryConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

/// Mock client delays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub fetch_delay_ms: u64,
    pub post_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: 400,
            post_delay_ms: 500,
        }
    }
}

impl ClientConfig {
    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }

    pub fn post_delay(&self) -> Duration {
        Duration::from_millis(self.post_delay_ms)
    }
}

/// Retry policy for month fetches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
        }
    }
}

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Auto,
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: ThemeChoice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, overridden by `DAYGRID_LOG`
    pub filter: String,
    /// Log file for the TUI; defaults to `~/.daygrid/daygrid.log`
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load from `path`, or the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Ok(p) => p,
                Err(_) => return Ok(Self::default()),
            },
        };
        Self::load_from(&path)
    }

    /// Load from an explicit file; missing file means defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Self::parse_inner(&content)
            .map_err(|msg| DaygridError::Config(format!("{}: {}", path.display(), msg)))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_inner(content).map_err(DaygridError::Config)
    }

    fn parse_inner(content: &str) -> std::result::Result<Self, String> {
        let config: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        if config.retry.max_attempts == 0 {
            return Err("retry.max_attempts must be at least 1".into());
        }
        Ok(config)
    }

    /// Log file path for the TUI
    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.log.file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("daygrid.log")),
        }
    }
}

/// `~/.daygrid`
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new()
        .ok_or_else(|| DaygridError::Config("Cannot determine home directory".into()))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("config.toml"))
}
