//! Generation settings (erdflow.toml)

use crate::layout::{LayoutMode, RankDirection};
use crate::parser::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default file name looked up in the working directory.
pub const CONFIG_FILE: &str = "erdflow.toml";

pub const DEFAULT_SPACING: i64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Layout mode (grid, hierarchical, or their aliases)
    pub layout: LayoutMode,

    /// Grid step, or gap between layers in hierarchical mode
    pub spacing: i64,

    /// Rank axis for hierarchical mode
    pub direction: RankDirection,

    /// Relation inference options
    pub parse: ParseOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutMode::default(),
            spacing: DEFAULT_SPACING,
            direction: RankDirection::default(),
            parse: ParseOptions::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
