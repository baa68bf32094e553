//! Duration and easing policy for transitions.
//!
//! Pure and stateless: the scheduler asks for a duration at admission time,
//! passing the current backlog so long queues play back faster.

use crate::config::TransitionConfig;
use quickpanel_types::{Easing, ViOperation};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPolicy {
    insert: Duration,
    update: Duration,
    delete: Duration,
    reorder: Duration,
    resize: Duration,
    throttle_threshold: usize,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::from_config(&TransitionConfig::default())
    }
}

impl TransitionPolicy {
    #[must_use]
    pub fn from_config(config: &TransitionConfig) -> Self {
        Self {
            insert: Duration::from_millis(config.insert_ms),
            update: Duration::from_millis(config.update_ms),
            delete: Duration::from_millis(config.delete_ms),
            reorder: Duration::from_millis(config.reorder_ms),
            resize: Duration::from_millis(config.resize_ms),
            throttle_threshold: config.throttle_threshold.max(1),
        }
    }

    #[must_use]
    pub fn base_duration(&self, op: ViOperation) -> Duration {
        match op {
            ViOperation::Insert => self.insert,
            ViOperation::Update => self.update,
            ViOperation::Delete => self.delete,
            ViOperation::Reorder => self.reorder,
            ViOperation::Resize => self.resize,
            ViOperation::None => Duration::ZERO,
        }
    }

    /// Base duration, divided by the backlog once it exceeds the threshold.
    // queue_len is bounded by maxPending, far below u32::MAX
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn duration(&self, op: ViOperation, queue_len: usize) -> Duration {
        let base = self.base_duration(op);
        if queue_len > self.throttle_threshold {
            base / queue_len as u32
        } else {
            base
        }
    }

    #[must_use]
    pub fn easing(&self, op: ViOperation) -> Easing {
        match op {
            ViOperation::Insert | ViOperation::Update => Easing::Decelerate,
            ViOperation::Delete => Easing::Accelerate,
            ViOperation::Reorder => Easing::Sinusoidal,
            ViOperation::Resize | ViOperation::None => Easing::Linear,
        }
    }

    #[must_use]
    pub fn throttle_threshold(&self) -> usize {
        self.throttle_threshold
    }
}
