use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// User configuration, read from `~/.zisk/config.toml`. Every field is
/// optional; CLI flags override whatever is set here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run the optimizer pass (default: true).
    pub optimize: Option<bool>,
    /// Caret diagnostics instead of one-line errors (default: false).
    pub pretty_errors: Option<bool>,
    /// Shell prompt override.
    pub prompt: Option<String>,
}

pub fn default_config_path() -> Option<PathBuf> {
    // ~\Users\you\.zisk\config.toml on Windows; ~/.zisk/config.toml elsewhere
    dirs_next::home_dir().map(|h| h.join(".zisk").join("config.toml"))
}

pub fn resolve_config_path(cli_path: &Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = cli_path {
        return Some(p.clone());
    }
    default_config_path()
}

/// Loads the config file if it exists; a missing file is the default
/// config, a malformed one is an error worth surfacing.
pub fn load(path: &Option<PathBuf>) -> Result<Config> {
    let path = match path {
        Some(p) if p.exists() => p,
        _ => return Ok(Config::default()),
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}

#[allow(dead_code)]
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create config parent dir {}", parent.display()))?;
    }
    Ok(())
}
