//! Transitions over rows of the shared panel list.
//!
//! Every structural change commits on both terminal paths, so a record that
//! was abandoned (drained on suspend) or interrupted still leaves the list in
//! its final shape.

use super::list::{Row, SharedList};
use crate::vi::{RunOutcome, Transition, ViContext};
use quickpanel_types::{Geometry, ItemId, ViPayload};

/// Where `item` is on screen right now, falling back to its resting place.
fn current_geometry(list: &SharedList, ctx: &mut ViContext<'_>, item: ItemId) -> Option<Geometry> {
    ctx.container()
        .item_geometry(item)
        .or_else(|| list.borrow().geometry_of(item))
}

/// Adds a row transparent in `on_init`, fades it in on run.
pub struct InsertRow {
    list: SharedList,
    row: Option<Row>,
    at_bottom: bool,
}

impl InsertRow {
    pub fn new(list: SharedList, row: Row) -> Self {
        Self {
            list,
            row: Some(row),
            at_bottom: false,
        }
    }

    #[must_use]
    pub fn at_bottom(mut self) -> Self {
        self.at_bottom = true;
        self
    }

    fn reveal(&self, ctx: &mut ViContext<'_>) {
        let Some(item) = ctx.target() else {
            return;
        };
        if let Some(row) = self.list.borrow_mut().row_mut(item) {
            row.alpha = 1.0;
        }
        ctx.container().set_item_alpha(item, 1.0);
    }
}

impl Transition for InsertRow {
    fn on_init(&mut self, ctx: &mut ViContext<'_>) {
        let Some(mut row) = self.row.take() else {
            return;
        };
        row.alpha = 0.0;
        let item = row.item;
        let mut list = self.list.borrow_mut();
        let index = if self.at_bottom {
            list.insert_bottom(row)
        } else {
            list.insert_top(row)
        };
        if let Some(geometry) = list.geometry_at(index) {
            ctx.container().add_item(item, geometry, 0.0);
        }
        list.relayout(ctx.container(), Some(item));
    }

    fn on_run(&mut self, ctx: &mut ViContext<'_>) -> RunOutcome {
        ctx.play_fade(0.0, 1.0)
    }

    fn on_done(&mut self, ctx: &mut ViContext<'_>) {
        self.reveal(ctx);
    }

    fn on_interrupt(&mut self, ctx: &mut ViContext<'_>) {
        self.reveal(ctx);
    }
}

/// Replaces a row's label with a quick cross-fade.
pub struct UpdateRow {
    list: SharedList,
    label: Option<String>,
}

impl UpdateRow {
    pub fn new(list: SharedList, label: String) -> Self {
        Self {
            list,
            label: Some(label),
        }
    }

    fn commit(&mut self, ctx: &mut ViContext<'_>) {
        let Some(item) = ctx.target() else {
            return;
        };
        let mut list = self.list.borrow_mut();
        if let Some(row) = list.row_mut(item) {
            if let Some(label) = self.label.take() {
                row.label = label;
            }
            row.alpha = 1.0;
        }
        ctx.container().set_item_alpha(item, 1.0);
    }
}

impl Transition for UpdateRow {
    fn on_run(&mut self, ctx: &mut ViContext<'_>) -> RunOutcome {
        let Some(item) = ctx.target() else {
            return RunOutcome::Finished;
        };
        if let Some(row) = self.list.borrow_mut().row_mut(item)
            && let Some(label) = self.label.take()
        {
            row.label = label;
        }
        ctx.play_fade(0.3, 1.0)
    }

    fn on_done(&mut self, ctx: &mut ViContext<'_>) {
        self.commit(ctx);
    }

    fn on_interrupt(&mut self, ctx: &mut ViContext<'_>) {
        self.commit(ctx);
    }
}

/// Fades a row out, then removes it from list and container.
pub struct DeleteRow {
    list: SharedList,
}

impl DeleteRow {
    pub fn new(list: SharedList) -> Self {
        Self { list }
    }

    fn commit(&self, ctx: &mut ViContext<'_>) {
        let Some(item) = ctx.target() else {
            return;
        };
        let mut list = self.list.borrow_mut();
        list.remove(item);
        ctx.container().remove_item(item);
        list.relayout(ctx.container(), None);
    }
}

impl Transition for DeleteRow {
    fn on_run(&mut self, ctx: &mut ViContext<'_>) -> RunOutcome {
        ctx.play_fade(1.0, 0.0)
    }

    fn on_done(&mut self, ctx: &mut ViContext<'_>) {
        self.commit(ctx);
    }

    fn on_interrupt(&mut self, ctx: &mut ViContext<'_>) {
        self.commit(ctx);
    }
}

/// Moves a row to the index in `ViPayload::Reorder`, sliding it into place.
pub struct ReorderRow {
    list: SharedList,
    committed: bool,
}

impl ReorderRow {
    pub fn new(list: SharedList) -> Self {
        Self {
            list,
            committed: false,
        }
    }

    fn commit(&mut self, item: ItemId, to: usize) {
        if !self.committed {
            self.list.borrow_mut().move_within_band(item, to);
            self.committed = true;
        }
    }

    fn settle(&mut self, ctx: &mut ViContext<'_>) {
        let Some(item) = ctx.target() else {
            return;
        };
        if let ViPayload::Reorder { to, .. } = ctx.payload() {
            self.commit(item, to);
        }
        self.list.borrow().relayout(ctx.container(), None);
    }
}

impl Transition for ReorderRow {
    fn on_run(&mut self, ctx: &mut ViContext<'_>) -> RunOutcome {
        let (Some(item), ViPayload::Reorder { to, .. }) = (ctx.target(), ctx.payload()) else {
            return RunOutcome::Finished;
        };
        let Some(from) = current_geometry(&self.list, ctx, item) else {
            return RunOutcome::Finished;
        };
        self.commit(item, to);
        let list = self.list.borrow();
        let Some(dest) = list.geometry_of(item) else {
            return RunOutcome::Finished;
        };
        list.relayout(ctx.container(), Some(item));
        drop(list);
        ctx.play_transform(from, dest)
    }

    fn on_done(&mut self, ctx: &mut ViContext<'_>) {
        self.settle(ctx);
    }

    fn on_interrupt(&mut self, ctx: &mut ViContext<'_>) {
        self.settle(ctx);
    }
}

/// Grows or shrinks a row to the height in `ViPayload::Resize`. Rows span
/// the list's full cross size, so the requested width is not applied.
pub struct ResizeRow {
    list: SharedList,
}

impl ResizeRow {
    pub fn new(list: SharedList) -> Self {
        Self { list }
    }

    fn settle(&self, ctx: &mut ViContext<'_>) {
        let (Some(item), ViPayload::Resize { height, .. }) = (ctx.target(), ctx.payload()) else {
            return;
        };
        let mut list = self.list.borrow_mut();
        if let Some(row) = list.row_mut(item) {
            row.extent = height;
        }
        list.relayout(ctx.container(), None);
    }
}

impl Transition for ResizeRow {
    fn on_run(&mut self, ctx: &mut ViContext<'_>) -> RunOutcome {
        let (Some(item), ViPayload::Resize { height, .. }) = (ctx.target(), ctx.payload()) else {
            return RunOutcome::Finished;
        };
        let Some(from) = current_geometry(&self.list, ctx, item) else {
            return RunOutcome::Finished;
        };
        ctx.play_transform(from, from.with_size(from.w, height))
    }

    fn on_done(&mut self, ctx: &mut ViContext<'_>) {
        self.settle(ctx);
    }

    fn on_interrupt(&mut self, ctx: &mut ViContext<'_>) {
        self.settle(ctx);
    }
}

/// Gesture record for a row being dragged sideways. Interrupting it snaps
/// the row back to its resting place.
pub struct SwipeRow {
    list: SharedList,
}

impl SwipeRow {
    pub fn new(list: SharedList) -> Self {
        Self { list }
    }
}

impl Transition for SwipeRow {
    fn on_interrupt(&mut self, ctx: &mut ViContext<'_>) {
        let Some(item) = ctx.target() else {
            return;
        };
        let mut list = self.list.borrow_mut();
        if let Some(row) = list.row_mut(item) {
            row.offset = 0;
        }
        if let Some(geometry) = list.geometry_of(item) {
            ctx.container().set_item_geometry(item, geometry);
        }
    }
}
