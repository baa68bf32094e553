use std::collections::VecDeque;

/// Work deferred to the next idle moment of the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTask {
    /// Run one dispatcher pass
    Dispatch,
}

/// Explicit idle-task queue. The event loop (or a test) drains it by
/// repeatedly calling `ViScheduler::run_idle`.
#[derive(Debug, Default)]
pub struct IdleQueue {
    tasks: VecDeque<IdleTask>,
}

impl IdleQueue {
    /// Queue `task` unless an identical task is already waiting.
    pub fn schedule(&mut self, task: IdleTask) {
        if !self.tasks.contains(&task) {
            self.tasks.push_back(task);
        }
    }

    pub fn pop(&mut self) -> Option<IdleTask> {
        self.tasks.pop_front()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
