//! Error types for the quickpanel daemon.

/// Errors that can occur while replaying a scenario
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] quickpanel_core::Error),

    /// Scenario file could not be located
    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    /// The panel never went idle within the frame budget
    #[error("Panel still busy after {frames} frames ({pending} pending)")]
    Wedged { frames: u64, pending: usize },
}

pub type Result<T> = std::result::Result<T, DaemonError>;
