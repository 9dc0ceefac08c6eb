//! Configuration for the bootstrap layer
//!
//! Small serde structs loadable from TOML. Everything has a usable default so
//! `EngineSetup::builder(..).build()` works without any file on disk.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file content is not valid TOML for the expected structure.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Native display surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window title
    pub title: String,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
    /// Color depth in bits
    pub color_depth: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "prism".to_string(),
            width: 800,
            height: 600,
            color_depth: 32,
        }
    }
}

/// Top-level bootstrap configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Display surface settings
    pub display: DisplayConfig,
    /// Directories appended to the resource search path at startup
    pub data_directories: Vec<PathBuf>,
    /// Target file for the debug scene-graph export
    pub debug_graph_path: Option<PathBuf>,
}

impl SetupConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }
}
