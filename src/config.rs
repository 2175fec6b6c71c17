use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DriftError;

const CONFIG_DIR: &str = "driftnorm";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Tree,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub strict_mode: bool,
    pub format: OutputFormat,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, DriftError> {
        toml::from_str(content).map_err(|e| DriftError::Config(e.to_string()))
    }

    /// An explicit path must exist. Without one, the per-user config file is
    /// read when present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, DriftError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_path().filter(|p| p.is_file()) {
                Some(path) => path,
                None => {
                    tracing::debug!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = std::fs::read_to_string(&path).map_err(|e| {
            DriftError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "config loaded");
        Self::from_toml(&content)
    }

    /// CLI flags win over file values: `--strict` can only turn strict mode on.
    pub fn with_overrides(mut self, strict: bool, format: Option<OutputFormat>) -> Self {
        self.strict_mode |= strict;
        if let Some(format) = format {
            self.format = format;
        }
        self
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}
