//! First-run setup of the per-user quickpanel directories.

use crate::Result;
use quickpanel_core::config::{Config, Directories};
use tracing::info;

/// Create the config and scenario directories and write a default
/// `config.json` if none exists. An existing config is never overwritten.
///
/// Returns `true` when a config file was written.
///
/// # Errors
///
/// Returns an error if a directory cannot be created or the config cannot
/// be written.
pub fn init_layout(dirs: &Directories) -> Result<bool> {
    dirs.ensure_exists()?;
    if dirs.config_file.exists() {
        info!("Keeping existing config at {}", dirs.config_file.display());
        return Ok(false);
    }
    Config::default().save(&dirs.config_file)?;
    info!("Wrote default config to {}", dirs.config_file.display());
    Ok(true)
}
