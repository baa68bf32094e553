//! Shared types for quickpanel components.
//!
//! This crate provides the value types used across quickpanel-core and
//! quickpanel-daemon. Everything that crosses the scenario/event boundary is
//! serializable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a decorated item hosted by the panel container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Handle of a visual-interaction record owned by the scheduler.
///
/// Handles stay valid to pass around after the record is gone; the scheduler
/// treats a stale handle as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViId(pub u64);

impl fmt::Display for ViId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vi#{}", self.0)
    }
}

/// Kind of structural change a transition animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViOperation {
    Insert,
    Update,
    Delete,
    Reorder,
    Resize,
    #[default]
    None,
}

impl ViOperation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Reorder => "reorder",
            Self::Resize => "resize",
            Self::None => "none",
        }
    }
}

impl fmt::Display for ViOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain tag of the animated item. Opaque to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Notification,
    Ongoing,
    Minicontrol,
    SettingButton,
    #[default]
    Unknown,
}

/// Lifecycle of a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViState {
    #[default]
    NotReady,
    Ready,
    Running,
    Done,
    Interrupted,
}

impl ViState {
    /// Whether the record has already fired its terminal callback.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Interrupted)
    }
}

/// Global state of the scheduler gating admission of queued work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineState {
    #[default]
    NotReady,
    Ready,
    Working,
    Suspended,
}

/// Easing curve requested from the animation runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    Decelerate,
    Accelerate,
    Sinusoidal,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
            Self::Accelerate => t * t,
            Self::Sinusoidal => (1.0 - (t * std::f64::consts::PI).cos()) / 2.0,
        }
    }
}

/// Position and size of an item inside the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Geometry {
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub const fn with_y(self, y: i32) -> Self {
        Self { y, ..self }
    }

    #[must_use]
    pub const fn with_x(self, x: i32) -> Self {
        Self { x, ..self }
    }

    #[must_use]
    pub const fn with_size(self, w: i32, h: i32) -> Self {
        Self { w, h, ..self }
    }
}

/// Typed auxiliary data carried by a record for its transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViPayload {
    #[default]
    None,
    Resize {
        width: i32,
        height: i32,
    },
    Reorder {
        from: usize,
        to: usize,
    },
    /// Horizontal drag offset of a swipe gesture
    Swipe {
        offset: i32,
    },
}

/// A notification as posted by the notification service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    /// Ongoing notifications live in their own band above regular ones
    #[serde(default)]
    pub ongoing: bool,
}

/// Events delivered to the panel from the outside world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PanelEvent {
    /// Panel became visible to the user
    Opened,

    /// Panel is closing
    Closed,

    NotificationPosted {
        notification: Notification,
    },

    NotificationUpdated {
        notification: Notification,
    },

    NotificationRemoved {
        id: u64,
    },

    /// "Clear all" pressed
    NotificationsCleared,

    /// Finger down and dragging on a notification row
    SwipeStarted {
        id: u64,
        #[serde(default)]
        offset: i32,
    },

    /// Finger lifted; `dismiss` is true when the swipe crossed the threshold
    SwipeReleased {
        id: u64,
        #[serde(default)]
        dismiss: bool,
    },

    MinictrlAdded {
        name: String,
        width: i32,
        height: i32,
    },

    MinictrlResized {
        name: String,
        width: i32,
        height: i32,
    },

    MinictrlRemoved {
        name: String,
    },

    SettingsReordered {
        from: usize,
        to: usize,
    },
}
