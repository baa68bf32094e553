//! Panel sections that drive the VI scheduler.

pub mod list;
pub mod minictrl;
pub mod noti;
pub mod settings;
pub mod transitions;

use crate::vi::{Transition, ViRecord, ViScheduler};
use quickpanel_types::{ItemId, ItemKind, ViId, ViOperation, ViPayload};
use tracing::warn;

/// Record options a section may set before starting it
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SubmitOptions {
    pub suppress_user_event_interrupt: bool,
    pub disable_freeze: bool,
}

/// Queue `transition` on the scheduler. When no record can be allocated the
/// change is applied right away without animation.
pub(crate) fn submit<T: Transition + 'static>(
    scheduler: &mut ViScheduler,
    operation: ViOperation,
    kind: ItemKind,
    target: ItemId,
    payload: ViPayload,
    mut transition: T,
    options: SubmitOptions,
) -> Option<ViId> {
    match scheduler.allocate(operation, kind, Some(target), payload) {
        Ok(meta) => {
            let record = ViRecord::new(meta, Box::new(transition))
                .suppress_user_event_interrupt(options.suppress_user_event_interrupt)
                .disable_freeze(options.disable_freeze);
            Some(scheduler.start(record))
        }
        Err(e) => {
            warn!("Skipping {operation} animation for {target}: {e}");
            scheduler.apply_immediately(operation, kind, Some(target), payload, &mut transition);
            None
        }
    }
}
