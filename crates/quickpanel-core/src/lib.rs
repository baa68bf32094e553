pub mod config;
pub mod features;
pub mod host;
pub mod vi;

mod error;
mod panel;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use panel::{PanelSnapshot, QuickPanel, RowSnapshot, SETTINGS_STRIP_HEIGHT};

pub use quickpanel_types::*;
