use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::DiscreteColumns;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlameConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub contention: ContentionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Columns whose values are categorical and get a write histogram.
    #[serde(default = "default_discrete_columns")]
    pub discrete_columns: DiscreteColumns,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            discrete_columns: default_discrete_columns(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentionConfig {
    /// Distinct editors at which a cell is flagged as contended.
    #[serde(default = "default_min_editors")]
    pub min_editors: usize,
}

impl Default for ContentionConfig {
    fn default() -> Self {
        Self {
            min_editors: default_min_editors(),
        }
    }
}

/// Project-local config location, relative to the working directory.
pub const PROJECT_CONFIG: &str = ".blame/config.toml";

/// Parse a config file.
///
/// # Errors
///
/// Fails if the file cannot be read or is not valid config TOML.
pub fn load_config_file(path: &Path) -> Result<BlameConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<BlameConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("blame/config.toml"))
}

/// Resolve the effective config.
///
/// Precedence: `explicit` (must exist) > `<project_root>/.blame/config.toml`
/// > user config dir `blame/config.toml` > built-in defaults.
///
/// # Errors
///
/// Fails if `explicit` is missing, or if any file that exists cannot be
/// parsed.
pub fn resolve_config(project_root: &Path, explicit: Option<&Path>) -> Result<BlameConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    let candidates = std::iter::once(project_root.join(PROJECT_CONFIG)).chain(user_config_path());
    for path in candidates {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            return load_config_file(&path);
        }
    }

    Ok(BlameConfig::default())
}

fn default_discrete_columns() -> DiscreteColumns {
    DiscreteColumns::new(["Gender", "Supporter", "ResultofContact", "Party"])
}

const fn default_min_editors() -> usize {
    2
}
