//! Frame loop replaying a scenario against a headless panel.

use crate::headless::HeadlessHost;
use crate::scenario::Scenario;
use crate::{DaemonError, Result};
use quickpanel_core::config::Config;
use quickpanel_core::{PanelSnapshot, QuickPanel};
use quickpanel_types::PanelEvent;
use serde::Serialize;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub const DEFAULT_FRAME: Duration = Duration::from_millis(16);
pub const DEFAULT_MAX_FRAMES: u64 = 100_000;

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Simulated time per frame, also the real tick period
    pub frame: Duration,
    /// Give up after this many frames
    pub max_frames: u64,
    /// Whether the panel is open before the first step
    pub start_open: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frame: DEFAULT_FRAME,
            max_frames: DEFAULT_MAX_FRAMES,
            start_open: false,
        }
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub frames: u64,
    pub elapsed_ms: u64,
    pub animations: usize,
    pub snapshot: PanelSnapshot,
}

// Simulated time stays far below u64::MAX milliseconds
#[allow(clippy::cast_possible_truncation)]
fn as_millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

/// Replay `scenario` until every step has fired and the panel is idle.
///
/// # Errors
///
/// Returns `DaemonError::Wedged` if the panel is still busy after
/// `options.max_frames` frames.
pub async fn run(config: &Config, scenario: &Scenario, options: RunOptions) -> Result<RunReport> {
    let host = HeadlessHost::new(options.start_open);
    let mut panel = QuickPanel::new(config, host.services());
    let mut steps = scenario.steps.iter().peekable();

    let frame = options.frame.max(Duration::from_millis(1));
    let mut interval = tokio::time::interval(frame);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "Replaying {} steps over {}ms",
        scenario.steps.len(),
        scenario.duration_ms()
    );

    let mut frames = 0;
    loop {
        interval.tick().await;
        let now_ms = as_millis(host.now());

        while let Some(step) = steps.next_if(|step| step.at_ms <= now_ms) {
            apply(&mut panel, &host, step.event.clone());
        }

        for vi in host.take_finished() {
            if !panel.animation_finished(vi) {
                debug!("{vi} finished after its record was dropped");
            }
        }
        panel.run_until_idle();

        let busy = host.has_running()
            || panel.scheduler().has_idle_work()
            || panel.scheduler().current().is_some();
        if steps.peek().is_none() && !busy {
            break;
        }

        frames += 1;
        if frames >= options.max_frames {
            warn!("Giving up after {frames} frames");
            return Err(DaemonError::Wedged {
                frames,
                pending: panel.scheduler().pending_len(),
            });
        }
        host.advance(frame);
    }

    let report = RunReport {
        frames,
        elapsed_ms: as_millis(host.now()),
        animations: host.played(),
        snapshot: panel.snapshot(),
    };
    panel.shutdown();
    info!(
        "Replay finished after {} frames, {} animations",
        report.frames, report.animations
    );
    Ok(report)
}

/// Forward one scenario event, mirroring visibility changes into the host
/// before the panel reacts to them.
fn apply(panel: &mut QuickPanel, host: &HeadlessHost, event: PanelEvent) {
    match event {
        PanelEvent::Opened => host.set_open(true),
        PanelEvent::Closed => host.set_open(false),
        _ => {}
    }
    let queued = panel.handle_event(event);
    if !queued.is_empty() {
        debug!("Queued {queued:?}");
    }
}
