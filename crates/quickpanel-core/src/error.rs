use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// A transition record could not be allocated; the caller skips the animation.
    #[error("Allocation error: {0}")]
    Allocation(String),

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Invalid index {index} (len {len})")]
    InvalidIndex { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
