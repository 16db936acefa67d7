use crate::escape_sequences::MAX_PAYLOAD_BYTES;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Truncation threshold in bytes; 0 means the default.
    pub max_payload: usize,
    /// Emit the sequence even when the terminal is not known to support it.
    pub force: bool,
}

impl Config {
    /// Loads `path`, or `<config_dir>/termclip/config.toml` when none is given.
    /// A missing file yields the defaults.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let Some(path) = path.or_else(default_path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn max_payload(&self) -> usize {
        effective_max_payload(self.max_payload)
    }
}

pub fn effective_max_payload(requested: usize) -> usize {
    match requested {
        0 => MAX_PAYLOAD_BYTES,
        n => n.min(MAX_PAYLOAD_BYTES),
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("termclip").join("config.toml"))
}
