//! Visual-interaction scheduler.
//!
//! Serializes UI transitions acting on the shared panel container. At most
//! one record runs at a time; the rest wait in FIFO order in the pending
//! queue. Gesture-driven records live in a separate user-event queue and are
//! cancelled by the next structural change unless that change opts out.
//!
//! The scheduler never blocks. Work that must wait for the current record is
//! deferred to an idle task, which the host event loop (or a test) drains
//! through [`ViScheduler::run_idle`].

use super::freeze::FreezeController;
use super::idle::{IdleQueue, IdleTask};
use super::policy::TransitionPolicy;
use super::record::{RunOutcome, Timing, Transition, ViContext, ViMeta, ViRecord};
use crate::config::TransitionConfig;
use crate::host::HostServices;
use crate::{Error, Result};
use quickpanel_types::{ItemId, ItemKind, MachineState, ViId, ViOperation, ViPayload, ViState};
use std::collections::VecDeque;
use tracing::{debug, info};

pub struct ViScheduler {
    host: HostServices,
    policy: TransitionPolicy,
    pending: VecDeque<ViRecord>,
    user_events: Vec<ViRecord>,
    current: Option<ViId>,
    machine: MachineState,
    freeze: FreezeController,
    idle: IdleQueue,
    next_id: u64,
    max_pending: usize,
}

impl ViScheduler {
    #[must_use]
    pub fn new(host: HostServices, policy: TransitionPolicy) -> Self {
        Self {
            host,
            policy,
            pending: VecDeque::new(),
            user_events: Vec::new(),
            current: None,
            machine: MachineState::NotReady,
            freeze: FreezeController::default(),
            idle: IdleQueue::default(),
            next_id: 0,
            max_pending: usize::MAX,
        }
    }

    #[must_use]
    pub fn with_config(host: HostServices, config: &TransitionConfig) -> Self {
        let mut scheduler = Self::new(host, TransitionPolicy::from_config(config));
        scheduler.max_pending = config.max_pending.max(1);
        scheduler
    }

    /// Leave `NotReady` once the hosting view exists.
    pub fn init(&mut self) {
        if self.machine != MachineState::NotReady {
            return;
        }
        self.machine = self.idle_state();
        info!("VI scheduler ready ({:?})", self.machine);
        if !self.pending.is_empty() {
            self.idle.schedule(IdleTask::Dispatch);
        }
    }

    /// Tear down: abandon queued work and return to `NotReady`.
    pub fn fini(&mut self) {
        info!(
            "VI scheduler shutting down ({} pending, {} user events)",
            self.pending.len(),
            self.user_events.len()
        );
        self.drain();
        self.interrupt_user_events();
        self.idle.clear();
        self.machine = MachineState::NotReady;
    }

    /// Allocate a record in state `NotReady`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Allocation` when the pending queue is at capacity or
    /// the id space is exhausted. Callers skip the animation.
    pub fn create(
        &mut self,
        operation: ViOperation,
        item_kind: ItemKind,
        target: Option<ItemId>,
        transition: impl Transition + 'static,
        payload: ViPayload,
    ) -> Result<ViRecord> {
        let meta = self.allocate(operation, item_kind, target, payload)?;
        Ok(ViRecord::new(meta, Box::new(transition)))
    }

    pub(crate) fn allocate(
        &mut self,
        operation: ViOperation,
        item_kind: ItemKind,
        target: Option<ItemId>,
        payload: ViPayload,
    ) -> Result<ViMeta> {
        if self.pending.len() >= self.max_pending {
            return Err(Error::Allocation(format!(
                "pending queue full ({})",
                self.max_pending
            )));
        }
        let next = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| Error::Allocation("record ids exhausted".to_string()))?;
        self.next_id = next;

        Ok(ViMeta {
            id: ViId(next),
            operation,
            item_kind,
            target,
            payload,
        })
    }

    /// Run `transition`'s init and done callbacks back to back with no
    /// animation. Used when a record could not be allocated.
    pub fn apply_immediately(
        &mut self,
        operation: ViOperation,
        item_kind: ItemKind,
        target: Option<ItemId>,
        payload: ViPayload,
        transition: &mut dyn Transition,
    ) {
        let meta = ViMeta {
            id: ViId(0),
            operation,
            item_kind,
            target,
            payload,
        };
        let timing = Timing {
            duration: std::time::Duration::ZERO,
            easing: self.policy.easing(operation),
        };
        transition.on_init(&mut ViContext::new(meta, &mut self.host, timing));
        transition.on_done(&mut ViContext::new(meta, &mut self.host, timing));
    }

    /// Queue `record` for execution and trigger a dispatch.
    ///
    /// The very first animation of a session (machine still `NotReady`) is
    /// dispatched inline; every later one waits for the next idle tick.
    pub fn start(&mut self, mut record: ViRecord) -> ViId {
        let id = record.id();
        self.host.container.disable_render_cache();

        let timing = self.timing(record.meta.operation, self.pending.len() + 1);
        record
            .transition
            .on_init(&mut ViContext::new(record.meta, &mut self.host, timing));
        record.state = ViState::Ready;

        if !record.disable_freeze {
            self.freeze.engage(self.host.container.as_mut());
        }
        self.retain_target(&mut record);
        if record.meta.operation == ViOperation::Delete
            && let Some(item) = self.live_target(&record)
        {
            self.host.container.set_item_input_enabled(item, false);
        }

        debug!(
            "Queued {id} ({} {:?}), {} pending",
            record.meta.operation,
            record.meta.item_kind,
            self.pending.len() + 1
        );
        self.pending.push_back(record);

        if self.machine == MachineState::NotReady {
            self.dispatch();
        } else {
            self.idle.schedule(IdleTask::Dispatch);
        }
        id
    }

    /// Complete a pending record. Unknown or already finished ids are ignored.
    pub fn done(&mut self, id: ViId) -> bool {
        self.finish(id, ViState::Done)
    }

    /// Cancel a pending record. Unknown or already finished ids are ignored.
    pub fn interrupt(&mut self, id: ViId) -> bool {
        self.finish(id, ViState::Interrupted)
    }

    /// Track a gesture-driven record until a structural change cancels it.
    pub fn add_user_event(&mut self, mut record: ViRecord) -> ViId {
        let id = record.id();
        record.state = ViState::Running;
        self.retain_target(&mut record);
        debug!("User event {id} added");
        self.user_events.push(record);
        id
    }

    /// Drop a user-event record without firing any callback.
    pub fn remove_user_event(&mut self, id: ViId) -> bool {
        let Some(pos) = self.user_events.iter().position(|r| r.id() == id) else {
            return false;
        };
        let mut record = self.user_events.remove(pos);
        self.release_target(&mut record);
        debug!("User event {id} removed");
        true
    }

    /// Panel is closing: abandon queued work.
    pub fn suspend(&mut self) {
        if self.machine == MachineState::Suspended && self.pending.is_empty() {
            return;
        }
        self.machine = MachineState::Suspended;
        debug!("VI scheduler suspended");
        self.dispatch();
    }

    /// Panel opened again.
    pub fn resume(&mut self) {
        if self.machine != MachineState::Suspended {
            return;
        }
        self.machine = MachineState::Ready;
        debug!("VI scheduler resumed");
        self.idle.schedule(IdleTask::Dispatch);
    }

    /// Run one deferred idle task. Returns false when there was none.
    pub fn run_idle(&mut self) -> bool {
        match self.idle.pop() {
            Some(IdleTask::Dispatch) => {
                self.dispatch();
                true
            }
            None => false,
        }
    }

    /// Run idle tasks until the queue is empty; returns how many ran.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        while self.run_idle() {
            ran += 1;
        }
        ran
    }

    #[must_use]
    pub fn state(&self) -> MachineState {
        self.machine
    }

    #[must_use]
    pub fn current(&self) -> Option<ViId> {
        self.current
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn user_event_len(&self) -> usize {
        self.user_events.len()
    }

    #[must_use]
    pub fn is_pending(&self, id: ViId) -> bool {
        self.pending.iter().any(|r| r.id() == id)
    }

    /// State of a live record; `None` once it has been freed.
    #[must_use]
    pub fn record_state(&self, id: ViId) -> Option<ViState> {
        self.pending
            .iter()
            .chain(self.user_events.iter())
            .find(|r| r.id() == id)
            .map(ViRecord::state)
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.freeze.is_engaged()
    }

    #[must_use]
    pub fn has_idle_work(&self) -> bool {
        !self.idle.is_empty()
    }

    #[must_use]
    pub fn host(&self) -> &HostServices {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut HostServices {
        &mut self.host
    }

    fn dispatch(&mut self) {
        match self.machine {
            MachineState::Suspended => {
                self.drain();
                return;
            }
            MachineState::Working => return,
            MachineState::NotReady | MachineState::Ready => {}
        }

        let Some(head) = self.pending.front() else {
            return;
        };
        if !head.suppress_user_event_interrupt {
            self.interrupt_user_events();
        }

        let queue_len = self.pending.len();
        let Some(head) = self.pending.front_mut() else {
            return;
        };
        let id = head.id();
        head.state = ViState::Running;
        self.current = Some(id);
        self.machine = MachineState::Working;

        let timing = Timing::resolve(&self.policy, head.meta.operation, queue_len);
        debug!(
            "Running {id} ({}) for {:?}, {queue_len} queued",
            head.meta.operation, timing.duration
        );
        let outcome = head
            .transition
            .on_run(&mut ViContext::new(head.meta, &mut self.host, timing));

        if outcome == RunOutcome::Finished {
            self.done(id);
        }
    }

    fn finish(&mut self, id: ViId, terminal: ViState) -> bool {
        let Some(pos) = self.pending.iter().position(|r| r.id() == id) else {
            debug!("{id} is no longer queued, ignoring {terminal:?}");
            return false;
        };
        let Some(record) = self.pending.remove(pos) else {
            return false;
        };
        self.terminate(record, terminal);

        if self.current == Some(id) {
            self.current = None;
            self.machine = self.idle_state();
        }
        if self.pending.is_empty() {
            self.freeze.release(self.host.container.as_mut());
        }
        self.idle.schedule(IdleTask::Dispatch);
        true
    }

    /// Finish every pending record through the done path without running it.
    fn drain(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        info!("Abandoning {} queued transitions", self.pending.len());
        self.current = None;
        while let Some(record) = self.pending.pop_front() {
            self.terminate(record, ViState::Done);
        }
        self.freeze.release(self.host.container.as_mut());
    }

    fn interrupt_user_events(&mut self) {
        if self.user_events.is_empty() {
            return;
        }
        let events = std::mem::take(&mut self.user_events);
        debug!("Interrupting {} user events", events.len());
        for record in events {
            self.terminate(record, ViState::Interrupted);
        }
    }

    /// Fire the terminal callback, release the target and free the record.
    fn terminate(&mut self, mut record: ViRecord, terminal: ViState) {
        record.state = terminal;
        let timing = self.timing(record.meta.operation, self.pending.len());
        let mut ctx = ViContext::new(record.meta, &mut self.host, timing);
        if terminal == ViState::Interrupted {
            record.transition.on_interrupt(&mut ctx);
        } else {
            record.transition.on_done(&mut ctx);
        }
        self.release_target(&mut record);
        debug!("{} {terminal:?}", record.id());
    }

    fn retain_target(&mut self, record: &mut ViRecord) {
        if let Some(item) = self.live_target(record) {
            self.host.container.retain_item(item);
            record.target_retained = true;
        }
    }

    fn release_target(&mut self, record: &mut ViRecord) {
        if !record.target_retained {
            return;
        }
        record.target_retained = false;
        if let Some(item) = self.live_target(record) {
            self.host.container.release_item(item);
        }
    }

    fn live_target(&self, record: &ViRecord) -> Option<ItemId> {
        record
            .meta
            .target
            .filter(|&item| self.host.container.is_item_alive(item))
    }

    fn timing(&self, op: ViOperation, queue_len: usize) -> Timing {
        Timing::resolve(&self.policy, op, queue_len)
    }

    fn idle_state(&self) -> MachineState {
        if self.host.panel.is_open() {
            MachineState::Ready
        } else {
            MachineState::Suspended
        }
    }
}

impl std::fmt::Debug for ViScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViScheduler")
            .field("machine", &self.machine)
            .field("current", &self.current)
            .field("pending", &self.pending.len())
            .field("user_events", &self.user_events.len())
            .field("frozen", &self.freeze.is_engaged())
            .finish_non_exhaustive()
    }
}
