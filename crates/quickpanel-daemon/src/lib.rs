//! Headless quickpanel runner.
//!
//! Drives a `QuickPanel` over an in-memory host from a scenario of timed
//! panel events, so the VI scheduler can be exercised without a toolkit.

pub mod error;
pub mod headless;
pub mod init;
pub mod runner;
pub mod scenario;

pub use error::{DaemonError, Result};
pub use headless::{HeadlessHost, HeadlessItem};
pub use init::init_layout;
pub use runner::{RunOptions, RunReport, run};
pub use scenario::{Scenario, Step};
