//! `adloc.toml` configuration.

use std::path::{Path, PathBuf};

use adloc_core::{PlatformTree, DEFAULT_DELIMITER};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name searched for when no `--config` is given.
pub const CONFIG_FILE: &str = "adloc.toml";

/// The top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdlocConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Hierarchy settings.
    #[serde(default)]
    pub data: DataConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// `[data]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Base path of the root node, e.g. `/root`.
    #[serde(default)]
    pub base: Option<String>,
    /// Segment delimiter.
    #[serde(default)]
    pub delimiter: Option<char>,
    /// Data file loaded when the server starts, relative to the config file.
    #[serde(default)]
    pub preload: Option<PathBuf>,
}

/// `[log]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl AdlocConfig {
    /// Parse the config at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Search upward from `start_dir` for `adloc.toml`, returning it along
    /// with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                return Ok(Some((Self::load(&candidate)?, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// An empty hierarchy with the configured base and delimiter.
    pub fn empty_tree(&self) -> Result<PlatformTree> {
        let delimiter = self.data.delimiter.unwrap_or(DEFAULT_DELIMITER);
        PlatformTree::with_options(self.data.base.as_deref(), delimiter)
            .context("invalid [data] base path")
    }

    /// The preload file resolved against `config_dir`.
    pub fn preload_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.data.preload.as_ref().map(|p| config_dir.join(p))
    }
}
