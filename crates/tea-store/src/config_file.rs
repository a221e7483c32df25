//! `config.toml` in the data directory.

use std::fs;
use std::path::Path;

use tea_core::EngineConfig;

use crate::error::Result;

pub const CONFIG_FILE: &str = "config.toml";

/// Read the config file. A missing file yields the defaults; the loaded
/// settings are validated and their element weights renormalized.
pub fn load(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        return Ok(EngineConfig::default());
    }
    let text = fs::read_to_string(path)?;
    let mut config: EngineConfig = toml::from_str(&text)?;
    config.validate()?;
    config.element_weights.renormalize();
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn save(path: &Path, config: &EngineConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(config)?)?;
    tracing::info!(path = %path.display(), "config written");
    Ok(())
}
