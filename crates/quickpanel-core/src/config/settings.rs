use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub transitions: TransitionConfig,

    #[serde(default)]
    pub panel: PanelConfig,
}

impl Config {
    /// Load config from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid JSON,
    /// or holds values the scheduler cannot work with.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values that would break the duration policy or list layout.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.transitions.throttle_threshold == 0 {
            return Err(Error::Config(
                "transitions.throttleThreshold must be at least 1".to_string(),
            ));
        }
        if self.transitions.max_pending == 0 {
            return Err(Error::Config(
                "transitions.maxPending must be at least 1".to_string(),
            ));
        }
        if self.panel.row_height <= 0 {
            return Err(Error::Config(
                "panel.rowHeight must be positive".to_string(),
            ));
        }
        if self.panel.panel_width <= 0 {
            return Err(Error::Config(
                "panel.panelWidth must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Animation timing knobs for the visual-interaction scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionConfig {
    #[serde(default = "default_insert_ms")]
    pub insert_ms: u64,

    #[serde(default = "default_update_ms")]
    pub update_ms: u64,

    #[serde(default = "default_delete_ms")]
    pub delete_ms: u64,

    #[serde(default = "default_reorder_ms")]
    pub reorder_ms: u64,

    #[serde(default = "default_resize_ms")]
    pub resize_ms: u64,

    /// Backlog length above which durations shrink by `1/len`
    #[serde(default = "default_throttle_threshold")]
    pub throttle_threshold: usize,

    /// Records allowed in the pending queue before `create` refuses more
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
}

fn default_insert_ms() -> u64 {
    170
}
fn default_update_ms() -> u64 {
    170
}
fn default_delete_ms() -> u64 {
    170
}
fn default_reorder_ms() -> u64 {
    250
}
fn default_resize_ms() -> u64 {
    250
}
fn default_throttle_threshold() -> usize {
    5
}
fn default_max_pending() -> usize {
    256
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            insert_ms: default_insert_ms(),
            update_ms: default_update_ms(),
            delete_ms: default_delete_ms(),
            reorder_ms: default_reorder_ms(),
            resize_ms: default_resize_ms(),
            throttle_threshold: default_throttle_threshold(),
            max_pending: default_max_pending(),
        }
    }
}

/// Layout of the panel list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelConfig {
    #[serde(default = "default_panel_width")]
    pub panel_width: i32,

    /// Height of a notification row
    #[serde(default = "default_row_height")]
    pub row_height: i32,

    /// Minicontrol views taller than this are clamped
    #[serde(default = "default_minictrl_max_height")]
    pub minictrl_max_height: i32,

    /// Oldest regular notifications are dropped beyond this count (0 = unlimited)
    #[serde(default)]
    pub notification_limit: usize,
}

fn default_panel_width() -> i32 {
    720
}
fn default_row_height() -> i32 {
    120
}
fn default_minictrl_max_height() -> i32 {
    400
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            panel_width: default_panel_width(),
            row_height: default_row_height(),
            minictrl_max_height: default_minictrl_max_height(),
            notification_limit: 0,
        }
    }
}
