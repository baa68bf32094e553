//! Capabilities the scheduler needs from its host environment.
//!
//! The real panel renders through a device toolkit; the scheduler only ever
//! talks to these three traits so it can run against a headless host or a
//! recording mock.

use quickpanel_types::{Easing, Geometry, ItemId, ViId};
use std::time::Duration;

/// The scrollable container hosting decorated items
pub trait Container {
    /// Push one level of input freeze. The underlying primitive is a counter.
    fn freeze_input(&mut self);

    /// Pop one level of input freeze.
    fn unfreeze_input(&mut self);

    fn is_visible(&self) -> bool;

    /// Turn off buffered rendering so geometry queries are exact while animating.
    fn disable_render_cache(&mut self);

    fn set_item_input_enabled(&mut self, item: ItemId, enabled: bool);

    /// Take a borrow on `item` so the container keeps it alive.
    fn retain_item(&mut self, item: ItemId);

    fn release_item(&mut self, item: ItemId);

    /// Liveness flag; false once the item was destroyed out-of-band.
    fn is_item_alive(&self, item: ItemId) -> bool;

    fn item_geometry(&self, item: ItemId) -> Option<Geometry>;

    /// Host a new item at `geometry`, initially transparent when `alpha` is 0.
    fn add_item(&mut self, item: ItemId, geometry: Geometry, alpha: f64);

    fn remove_item(&mut self, item: ItemId);

    /// Move or resize an item without animating.
    fn set_item_geometry(&mut self, item: ItemId, geometry: Geometry);

    fn set_item_alpha(&mut self, item: ItemId, alpha: f64);
}

/// Ticket handed to the animation runner. The host reports it back through
/// `ViScheduler::done` (or `QuickPanel::animation_finished`) exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Completion {
    pub vi: ViId,
}

/// Composed scene-graph animation primitive
pub trait AnimationRunner {
    fn play_transform(
        &mut self,
        item: ItemId,
        from: Geometry,
        to: Geometry,
        duration: Duration,
        easing: Easing,
        completion: Completion,
    );

    fn play_fade(
        &mut self,
        item: ItemId,
        from_alpha: f64,
        to_alpha: f64,
        duration: Duration,
        easing: Easing,
        completion: Completion,
    );
}

pub trait PanelVisibility {
    fn is_open(&self) -> bool;
}

/// The three capabilities bundled for injection into the scheduler
pub struct HostServices {
    pub container: Box<dyn Container>,
    pub animator: Box<dyn AnimationRunner>,
    pub panel: Box<dyn PanelVisibility>,
}

impl HostServices {
    pub fn new(
        container: impl Container + 'static,
        animator: impl AnimationRunner + 'static,
        panel: impl PanelVisibility + 'static,
    ) -> Self {
        Self {
            container: Box::new(container),
            animator: Box::new(animator),
            panel: Box::new(panel),
        }
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("container_visible", &self.container.is_visible())
            .field("panel_open", &self.panel.is_open())
            .finish_non_exhaustive()
    }
}
