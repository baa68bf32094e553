//! Quickpanel daemon entry point.
//!
//! Replays a scenario of panel events against a headless host and prints
//! the final panel snapshot as JSON.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use quickpanel_core::config::{Config, Directories};
use quickpanel_daemon::runner::{DEFAULT_MAX_FRAMES, RunOptions};
use quickpanel_daemon::{Scenario, init_layout, run, scenario};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Quickpanel daemon - headless VI scheduler runner
#[derive(Parser, Debug)]
#[command(name = "quickpanel-daemon")]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file (defaults to `$XDG_CONFIG_HOME/quickpanel/config.json`)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Simulated milliseconds per frame
    #[arg(long, value_name = "N", default_value_t = 16)]
    frame_ms: u64,

    /// Abort if the panel is still busy after this many frames
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_FRAMES)]
    max_frames: u64,

    /// Start with the panel already open
    #[arg(long)]
    open: bool,

    /// Create the config and scenario directories, write a default config, and exit
    #[arg(long)]
    init: bool,

    /// Scenario file, or a name inside the scenarios directory
    #[arg(required_unless_present = "init")]
    scenario: Option<PathBuf>,
}

/// Set up logging with file output for debugging.
/// In debug builds, defaults to debug level and logs to timestamped file.
/// In release builds, defaults to info level and logs to stderr.
fn setup_logging() {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("quickpanel={default_level}")));

    if cfg!(debug_assertions) {
        let temp_dir = std::env::temp_dir();
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let log_filename = format!("quickpanel-daemon-{timestamp}.log");
        let log_path = temp_dir.join(&log_filename);

        #[cfg(unix)]
        {
            let symlink_path = temp_dir.join("quickpanel-daemon.log");
            let _ = std::fs::remove_file(&symlink_path);
            let _ = std::os::unix::fs::symlink(&log_path, &symlink_path);
        }

        let file_appender = tracing_appender::rolling::never(&temp_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        std::mem::forget(guard);

        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true);

        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .with(filter)
            .init();

        eprintln!("Logging to: {} (and stderr)", log_path.display());
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    setup_logging();

    let dirs = match Directories::new() {
        Ok(dirs) => Some(dirs),
        Err(e) => {
            warn!("No standard directories: {e}");
            None
        }
    };

    if args.init {
        let dirs = dirs.context("No home directory to initialise")?;
        init_layout(&dirs)?;
        println!("{}", dirs.config.display());
        return Ok(());
    }
    let Some(scenario_arg) = args.scenario.as_deref() else {
        anyhow::bail!("A scenario is required");
    };

    let config = match args
        .config
        .clone()
        .or_else(|| dirs.as_ref().map(|d| d.config_file.clone()))
    {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let path = scenario::resolve(scenario_arg, dirs.as_ref())?;
    let scenario = Scenario::load(&path)
        .with_context(|| format!("Failed to load scenario {}", path.display()))?;

    info!("Starting quickpanel replay of {}", path.display());

    let options = RunOptions {
        frame: Duration::from_millis(args.frame_ms),
        max_frames: args.max_frames,
        start_open: args.open,
    };
    let report = run(&config, &scenario, options).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    info!("Quickpanel replay stopped");
    Ok(())
}
