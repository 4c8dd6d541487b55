//! `reftable.toml` loading

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use reftable_core::TableGenSettings;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const CONFIG_FILE: &str = "reftable.toml";

/// Which files of the vault are indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Glob patterns matched against vault-relative paths.
    pub exclude: Vec<String>,
    /// Document extensions, without the dot.
    pub extensions: Vec<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        VaultConfig {
            exclude: Vec::new(),
            extensions: vec!["md".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Generation defaults; command line and query parameters override them.
    pub table: TableGenSettings,
    pub vault: VaultConfig,
}

/// Load the project configuration.
///
/// With `explicit` set, that file must exist. Otherwise `reftable.toml` in
/// `root` is read when present and defaults are used when it is not.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<ProjectConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = root.join(CONFIG_FILE);
            if !path.exists() {
                debug!("No {} in {}, using defaults", CONFIG_FILE, root.display());
                return Ok(ProjectConfig::default());
            }
            path
        }
    };

    let text = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = parse_config(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    debug!("Loaded {}: {:?}", path.display(), config);
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<ProjectConfig> {
    Ok(toml::from_str(text)?)
}
