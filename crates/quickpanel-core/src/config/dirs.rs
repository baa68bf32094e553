use crate::{Error, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";
const SCENARIO_DIR: &str = "scenarios";

/// Where quickpanel keeps its files on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directories {
    /// `$XDG_CONFIG_HOME/quickpanel`
    pub config: PathBuf,

    pub config_file: PathBuf,

    /// Scenario files the daemon can load by bare file name
    pub scenarios: PathBuf,
}

impl Directories {
    /// Resolve the per-user locations for this platform.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when no home directory can be found.
    pub fn new() -> Result<Self> {
        let project = ProjectDirs::from("", "", "quickpanel")
            .ok_or_else(|| Error::Config("no home directory for quickpanel".to_string()))?;
        Ok(Self::with_base(project.config_dir().to_path_buf()))
    }

    /// Lay everything out under `base`; used by tests and `--config` overrides.
    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join(CONFIG_FILE),
            scenarios: base.join(SCENARIO_DIR),
            config: base,
        }
    }

    /// Create the config and scenario directories if missing.
    ///
    /// # Errors
    ///
    /// Propagates the first `create_dir_all` failure.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        for dir in [&self.config, &self.scenarios] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Path of a scenario stored under `scenarios/`.
    #[must_use]
    pub fn scenario(&self, name: &Path) -> PathBuf {
        self.scenarios.join(name)
    }
}
