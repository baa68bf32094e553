//! Scenario files: timed panel events to replay.
//!
//! ```json
//! { "steps": [ { "atMs": 0, "event": { "type": "opened" } } ] }
//! ```

use crate::{DaemonError, Result};
use quickpanel_core::config::Directories;
use quickpanel_types::PanelEvent;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Simulated time at which the event fires
    #[serde(default)]
    pub at_ms: u64,
    pub event: PanelEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Parse a scenario, ordering steps by time. Steps sharing a time keep
    /// their file order.
    ///
    /// # Errors
    ///
    /// Returns `DaemonError::Json` for malformed input.
    pub fn parse(content: &str) -> Result<Self> {
        let mut scenario: Self = serde_json::from_str(content)?;
        scenario.steps.sort_by_key(|step| step.at_ms);
        Ok(scenario)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let scenario = Self::parse(&content)?;
        debug!(
            "Loaded {} steps from {}",
            scenario.steps.len(),
            path.display()
        );
        Ok(scenario)
    }

    /// Time of the last step.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.steps.last().map_or(0, |step| step.at_ms)
    }
}

/// Find a scenario given on the command line: an existing path wins, then
/// the name inside the scenarios directory.
///
/// # Errors
///
/// Returns `DaemonError::ScenarioNotFound` if neither exists.
pub fn resolve(arg: &Path, dirs: Option<&Directories>) -> Result<PathBuf> {
    if arg.exists() {
        return Ok(arg.to_path_buf());
    }
    if let Some(dirs) = dirs {
        let candidate = dirs.scenario(arg);
        if candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(DaemonError::ScenarioNotFound(arg.display().to_string()))
}
