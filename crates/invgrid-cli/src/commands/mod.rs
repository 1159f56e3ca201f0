//! Sub-command implementations.

pub mod batch;
pub mod config;
pub mod extract;
pub mod inspect;

use std::path::{Path, PathBuf};

use tracing::debug;

use invgrid_core::models::config::InvgridConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invgrid")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvgridConfig> {
    let config = match config_path {
        Some(path) => InvgridConfig::from_file(Path::new(path))?,
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                debug!("Using config file {}", default_path.display());
                InvgridConfig::from_file(&default_path)?
            } else {
                InvgridConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}
