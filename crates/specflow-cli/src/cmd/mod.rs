pub mod check;
pub mod create;
pub mod paths;
pub mod resolve;

use anyhow::Context;
use specflow_core::config::{Config, WarnLevel};
use std::path::Path;

/// Load `.specify/config.yaml` and surface validation findings as log lines.
pub fn load_config(root: &Path) -> anyhow::Result<Config> {
    let config = Config::load(root).context("failed to load .specify/config.yaml")?;
    for warning in config.validate(root) {
        match warning.level {
            WarnLevel::Error => tracing::error!("config: {}", warning.message),
            WarnLevel::Warning => tracing::warn!("config: {}", warning.message),
        }
    }
    Ok(config)
}

pub fn display(path: &Path) -> String {
    path.display().to_string()
}
