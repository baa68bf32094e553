use crate::host::{AnimationRunner, Completion, Container, HostServices};
use crate::vi::policy::TransitionPolicy;
use quickpanel_types::{Easing, Geometry, ItemId, ItemKind, ViId, ViOperation, ViPayload, ViState};
use std::time::Duration;

/// What `Transition::on_run` did with control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// An animation was handed to the runner; completion arrives later.
    Animating,
    /// Nothing to animate; the record completes right away.
    Finished,
}

/// Lifecycle callbacks of one record. Every method defaults to a no-op,
/// and a default `on_run` finishes immediately.
pub trait Transition {
    fn on_init(&mut self, _ctx: &mut ViContext<'_>) {}

    fn on_run(&mut self, _ctx: &mut ViContext<'_>) -> RunOutcome {
        RunOutcome::Finished
    }

    fn on_done(&mut self, _ctx: &mut ViContext<'_>) {}

    fn on_interrupt(&mut self, _ctx: &mut ViContext<'_>) {}
}

/// Transition with no callbacks at all
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTransition;

impl Transition for NoopTransition {}

/// Immutable description of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViMeta {
    pub id: ViId,
    pub operation: ViOperation,
    pub item_kind: ItemKind,
    pub target: Option<ItemId>,
    pub payload: ViPayload,
}

/// Animation timing resolved by the policy for one callback invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub duration: Duration,
    pub easing: Easing,
}

impl Timing {
    pub(crate) fn resolve(policy: &TransitionPolicy, op: ViOperation, queue_len: usize) -> Self {
        Self {
            duration: policy.duration(op, queue_len),
            easing: policy.easing(op),
        }
    }
}

/// One queued UI transition
pub struct ViRecord {
    pub(crate) meta: ViMeta,
    pub(crate) transition: Box<dyn Transition>,
    pub(crate) state: ViState,
    pub(crate) suppress_user_event_interrupt: bool,
    pub(crate) disable_freeze: bool,
    pub(crate) target_retained: bool,
}

impl ViRecord {
    pub(crate) fn new(meta: ViMeta, transition: Box<dyn Transition>) -> Self {
        Self {
            meta,
            transition,
            state: ViState::NotReady,
            suppress_user_event_interrupt: false,
            disable_freeze: false,
            target_retained: false,
        }
    }

    /// Arrival of this record leaves pending user-gesture records alone.
    #[must_use]
    pub fn suppress_user_event_interrupt(mut self, suppress: bool) -> Self {
        self.suppress_user_event_interrupt = suppress;
        self
    }

    /// Admitting this record does not freeze the container.
    #[must_use]
    pub fn disable_freeze(mut self, disable: bool) -> Self {
        self.disable_freeze = disable;
        self
    }

    #[must_use]
    pub fn id(&self) -> ViId {
        self.meta.id
    }

    #[must_use]
    pub fn meta(&self) -> &ViMeta {
        &self.meta
    }

    #[must_use]
    pub fn state(&self) -> ViState {
        self.state
    }

    #[must_use]
    pub fn operation(&self) -> ViOperation {
        self.meta.operation
    }
}

impl std::fmt::Debug for ViRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViRecord")
            .field("meta", &self.meta)
            .field("state", &self.state)
            .field(
                "suppress_user_event_interrupt",
                &self.suppress_user_event_interrupt,
            )
            .field("disable_freeze", &self.disable_freeze)
            .finish_non_exhaustive()
    }
}

/// What a transition callback may see and touch
pub struct ViContext<'a> {
    meta: ViMeta,
    target_alive: bool,
    timing: Timing,
    container: &'a mut dyn Container,
    animator: &'a mut dyn AnimationRunner,
}

impl<'a> ViContext<'a> {
    pub(crate) fn new(meta: ViMeta, host: &'a mut HostServices, timing: Timing) -> Self {
        let target_alive = meta
            .target
            .is_some_and(|item| host.container.is_item_alive(item));
        Self {
            meta,
            target_alive,
            timing,
            container: host.container.as_mut(),
            animator: host.animator.as_mut(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ViId {
        self.meta.id
    }

    #[must_use]
    pub fn operation(&self) -> ViOperation {
        self.meta.operation
    }

    #[must_use]
    pub fn item_kind(&self) -> ItemKind {
        self.meta.item_kind
    }

    #[must_use]
    pub fn payload(&self) -> ViPayload {
        self.meta.payload
    }

    /// The animated item, or `None` once it has been destroyed.
    #[must_use]
    pub fn target(&self) -> Option<ItemId> {
        self.meta.target.filter(|_| self.target_alive)
    }

    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    #[must_use]
    pub fn completion(&self) -> Completion {
        Completion { vi: self.meta.id }
    }

    pub fn container(&mut self) -> &mut dyn Container {
        &mut *self.container
    }

    /// Animate the live target between two geometries with the resolved timing.
    /// Returns `Finished` when there is nothing to animate.
    pub fn play_transform(&mut self, from: Geometry, to: Geometry) -> RunOutcome {
        let Some(item) = self.target() else {
            return RunOutcome::Finished;
        };
        if from == to || self.timing.duration.is_zero() {
            return RunOutcome::Finished;
        }
        let completion = self.completion();
        self.animator.play_transform(
            item,
            from,
            to,
            self.timing.duration,
            self.timing.easing,
            completion,
        );
        RunOutcome::Animating
    }

    /// Fade the live target with the resolved timing.
    pub fn play_fade(&mut self, from_alpha: f64, to_alpha: f64) -> RunOutcome {
        let Some(item) = self.target() else {
            return RunOutcome::Finished;
        };
        if self.timing.duration.is_zero() {
            return RunOutcome::Finished;
        }
        let completion = self.completion();
        self.animator.play_fade(
            item,
            from_alpha,
            to_alpha,
            self.timing.duration,
            self.timing.easing,
            completion,
        );
        RunOutcome::Animating
    }
}
