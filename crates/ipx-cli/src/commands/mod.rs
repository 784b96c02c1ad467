//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;

use ipx_core::IpxConfig;
use tracing::debug;

/// Load the configuration from an explicit path, the default location, or
/// fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<IpxConfig> {
    if let Some(path) = config_path {
        return Ok(IpxConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(IpxConfig::from_file(&default_path)?)
    } else {
        Ok(IpxConfig::default())
    }
}
