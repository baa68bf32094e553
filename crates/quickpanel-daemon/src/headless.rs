//! Headless host: a container, animation runner and panel window that only
//! exist in memory. Animations complete once their duration of simulated
//! time has elapsed.

use quickpanel_core::host::{
    AnimationRunner, Completion, Container, HostServices, PanelVisibility,
};
use quickpanel_types::{Easing, Geometry, ItemId, ViId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessItem {
    pub geometry: Geometry,
    pub alpha: f64,
    pub input_enabled: bool,
    pub borrows: u32,
}

#[derive(Debug, Clone, Copy)]
struct RunningAnimation {
    completion: Completion,
    ends_at: Duration,
}

#[derive(Debug, Default)]
struct HeadlessState {
    now: Duration,
    open: bool,
    freeze_depth: u32,
    items: HashMap<ItemId, HeadlessItem>,
    running: Vec<RunningAnimation>,
    played: usize,
}

/// Cheap handle; clones share the same simulated world.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessHost {
    #[must_use]
    pub fn new(open: bool) -> Self {
        let host = Self::default();
        host.state.borrow_mut().open = open;
        host
    }

    /// Capability bundle for the scheduler, sharing this host's state.
    #[must_use]
    pub fn services(&self) -> HostServices {
        HostServices::new(
            HeadlessContainer {
                state: self.state.clone(),
            },
            HeadlessAnimator {
                state: self.state.clone(),
            },
            HeadlessPanel {
                state: self.state.clone(),
            },
        )
    }

    pub fn set_open(&self, open: bool) {
        self.state.borrow_mut().open = open;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn advance(&self, by: Duration) {
        self.state.borrow_mut().now += by;
    }

    /// Remove and return completions whose animation has ended.
    pub fn take_finished(&self) -> Vec<ViId> {
        let mut state = self.state.borrow_mut();
        let now = state.now;
        let mut finished = Vec::new();
        state.running.retain(|animation| {
            if animation.ends_at <= now {
                finished.push(animation.completion.vi);
                false
            } else {
                true
            }
        });
        finished
    }

    #[must_use]
    pub fn has_running(&self) -> bool {
        !self.state.borrow().running.is_empty()
    }

    /// Number of animations started so far.
    #[must_use]
    pub fn played(&self) -> usize {
        self.state.borrow().played
    }

    #[must_use]
    pub fn freeze_depth(&self) -> u32 {
        self.state.borrow().freeze_depth
    }

    #[must_use]
    pub fn item(&self, item: ItemId) -> Option<HeadlessItem> {
        self.state.borrow().items.get(&item).copied()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.state.borrow().items.len()
    }
}

struct HeadlessContainer {
    state: Rc<RefCell<HeadlessState>>,
}

impl Container for HeadlessContainer {
    fn freeze_input(&mut self) {
        self.state.borrow_mut().freeze_depth += 1;
    }

    fn unfreeze_input(&mut self) {
        let mut state = self.state.borrow_mut();
        state.freeze_depth = state.freeze_depth.saturating_sub(1);
    }

    fn is_visible(&self) -> bool {
        self.state.borrow().open
    }

    fn disable_render_cache(&mut self) {}

    fn set_item_input_enabled(&mut self, item: ItemId, enabled: bool) {
        if let Some(entry) = self.state.borrow_mut().items.get_mut(&item) {
            entry.input_enabled = enabled;
        }
    }

    fn retain_item(&mut self, item: ItemId) {
        if let Some(entry) = self.state.borrow_mut().items.get_mut(&item) {
            entry.borrows += 1;
        }
    }

    fn release_item(&mut self, item: ItemId) {
        if let Some(entry) = self.state.borrow_mut().items.get_mut(&item) {
            entry.borrows = entry.borrows.saturating_sub(1);
        }
    }

    fn is_item_alive(&self, item: ItemId) -> bool {
        self.state.borrow().items.contains_key(&item)
    }

    fn item_geometry(&self, item: ItemId) -> Option<Geometry> {
        self.state.borrow().items.get(&item).map(|entry| entry.geometry)
    }

    fn add_item(&mut self, item: ItemId, geometry: Geometry, alpha: f64) {
        self.state.borrow_mut().items.insert(
            item,
            HeadlessItem {
                geometry,
                alpha,
                input_enabled: true,
                borrows: 0,
            },
        );
    }

    fn remove_item(&mut self, item: ItemId) {
        self.state.borrow_mut().items.remove(&item);
    }

    fn set_item_geometry(&mut self, item: ItemId, geometry: Geometry) {
        if let Some(entry) = self.state.borrow_mut().items.get_mut(&item) {
            entry.geometry = geometry;
        }
    }

    fn set_item_alpha(&mut self, item: ItemId, alpha: f64) {
        if let Some(entry) = self.state.borrow_mut().items.get_mut(&item) {
            entry.alpha = alpha;
        }
    }
}

struct HeadlessAnimator {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessAnimator {
    fn schedule(&mut self, duration: Duration, completion: Completion) {
        let mut state = self.state.borrow_mut();
        let ends_at = state.now + duration;
        state.running.push(RunningAnimation {
            completion,
            ends_at,
        });
        state.played += 1;
    }
}

impl AnimationRunner for HeadlessAnimator {
    fn play_transform(
        &mut self,
        item: ItemId,
        from: Geometry,
        to: Geometry,
        duration: Duration,
        easing: Easing,
        completion: Completion,
    ) {
        info!(
            "{} transform {item} ({},{} {}x{}) -> ({},{} {}x{}) over {duration:?} {easing:?}",
            completion.vi, from.x, from.y, from.w, from.h, to.x, to.y, to.w, to.h
        );
        self.schedule(duration, completion);
        if let Some(entry) = self.state.borrow_mut().items.get_mut(&item) {
            entry.geometry = to;
        }
    }

    fn play_fade(
        &mut self,
        item: ItemId,
        from_alpha: f64,
        to_alpha: f64,
        duration: Duration,
        easing: Easing,
        completion: Completion,
    ) {
        info!(
            "{} fade {item} {from_alpha:.2} -> {to_alpha:.2} over {duration:?} {easing:?}",
            completion.vi
        );
        self.schedule(duration, completion);
        if let Some(entry) = self.state.borrow_mut().items.get_mut(&item) {
            entry.alpha = to_alpha;
        }
    }
}

struct HeadlessPanel {
    state: Rc<RefCell<HeadlessState>>,
}

impl PanelVisibility for HeadlessPanel {
    fn is_open(&self) -> bool {
        self.state.borrow().open
    }
}
