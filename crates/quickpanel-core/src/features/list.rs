//! Ordered model of the decorated rows hosted by the panel container.
//!
//! Rows are stacked along one axis in three bands: minicontrols, ongoing
//! notifications, then everything else. The container mirrors this model;
//! `relayout` pushes every row's geometry to it. The notification list stacks
//! vertically; the quick-settings strip reuses the model horizontally.

use crate::host::Container;
use quickpanel_types::{Geometry, ItemId, ItemKind};
use std::cell::RefCell;
use std::rc::Rc;

pub type SharedList = Rc<RefCell<PanelList>>;

/// Domain object a row presents
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Notification(u64),
    Minicontrol(String),
    Setting(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub item: ItemId,
    pub kind: ItemKind,
    pub key: RowKey,
    pub label: String,
    /// Size along the stacking axis
    pub extent: i32,
    pub alpha: f64,
    /// Horizontal drag offset while being swiped
    pub offset: i32,
}

impl Row {
    fn band(&self) -> u8 {
        band_of(self.kind)
    }
}

fn band_of(kind: ItemKind) -> u8 {
    match kind {
        ItemKind::Minicontrol => 0,
        ItemKind::Ongoing => 1,
        _ => 2,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug)]
pub struct PanelList {
    rows: Vec<Row>,
    axis: Axis,
    /// Size across the stacking axis
    cross: i32,
    /// Where the first row starts along the stacking axis
    origin: i32,
    item_base: u64,
    next_item: u64,
}

impl PanelList {
    #[must_use]
    pub fn new(cross: i32, origin: i32) -> Self {
        Self {
            rows: Vec::new(),
            axis: Axis::Vertical,
            cross,
            origin,
            item_base: 0,
            next_item: 0,
        }
    }

    #[must_use]
    pub fn horizontal(mut self) -> Self {
        self.axis = Axis::Horizontal;
        self
    }

    /// Offset added to every allocated item id, so lists sharing one
    /// container never hand out the same id.
    #[must_use]
    pub fn with_item_base(mut self, base: u64) -> Self {
        self.item_base = base;
        self
    }

    #[must_use]
    pub fn into_shared(self) -> SharedList {
        Rc::new(RefCell::new(self))
    }

    pub fn allocate_item(&mut self) -> ItemId {
        self.next_item += 1;
        ItemId(self.item_base + self.next_item)
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn cross(&self) -> i32 {
        self.cross
    }

    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[must_use]
    pub fn position(&self, item: ItemId) -> Option<usize> {
        self.rows.iter().position(|r| r.item == item)
    }

    #[must_use]
    pub fn find(&self, key: &RowKey) -> Option<&Row> {
        self.rows.iter().find(|r| &r.key == key)
    }

    #[must_use]
    pub fn row(&self, item: ItemId) -> Option<&Row> {
        self.rows.iter().find(|r| r.item == item)
    }

    pub fn row_mut(&mut self, item: ItemId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.item == item)
    }

    /// Index range occupied by rows of `kind`'s band.
    #[must_use]
    pub fn band_range(&self, kind: ItemKind) -> std::ops::Range<usize> {
        let band = band_of(kind);
        let start = self.rows.iter().take_while(|r| r.band() < band).count();
        let len = self.rows[start..]
            .iter()
            .take_while(|r| r.band() == band)
            .count();
        start..start + len
    }

    /// Insert `row` at the top of its band; returns its index.
    pub fn insert_top(&mut self, row: Row) -> usize {
        let index = self.band_range(row.kind).start;
        self.rows.insert(index, row);
        index
    }

    /// Insert `row` at the bottom of its band; returns its index.
    pub fn insert_bottom(&mut self, row: Row) -> usize {
        let index = self.band_range(row.kind).end;
        self.rows.insert(index, row);
        index
    }

    pub fn remove(&mut self, item: ItemId) -> Option<Row> {
        let index = self.position(item)?;
        Some(self.rows.remove(index))
    }

    /// Move `item` to `to`, clamped to its own band. Returns the final index.
    pub fn move_within_band(&mut self, item: ItemId, to: usize) -> Option<usize> {
        let from = self.position(item)?;
        let band = self.band_range(self.rows[from].kind);
        let to = to.clamp(band.start, band.end.saturating_sub(1));
        let row = self.rows.remove(from);
        self.rows.insert(to, row);
        Some(to)
    }

    /// Resting geometry of the row at `index`, ignoring swipe offsets.
    #[must_use]
    pub fn geometry_at(&self, index: usize) -> Option<Geometry> {
        let row = self.rows.get(index)?;
        let main = self.origin + self.rows[..index].iter().map(|r| r.extent).sum::<i32>();
        Some(self.place(main, row.extent, 0))
    }

    #[must_use]
    pub fn geometry_of(&self, item: ItemId) -> Option<Geometry> {
        self.geometry_at(self.position(item)?)
    }

    /// Total extent of all rows along the stacking axis.
    #[must_use]
    pub fn content_extent(&self) -> i32 {
        self.rows.iter().map(|r| r.extent).sum()
    }

    /// Push every row's geometry to the container, skipping `except`.
    pub fn relayout(&self, container: &mut dyn Container, except: Option<ItemId>) {
        let mut main = self.origin;
        for row in &self.rows {
            if Some(row.item) != except && container.is_item_alive(row.item) {
                container.set_item_geometry(row.item, self.place(main, row.extent, row.offset));
            }
            main += row.extent;
        }
    }

    fn place(&self, main: i32, extent: i32, offset: i32) -> Geometry {
        match self.axis {
            Axis::Vertical => Geometry::new(offset, main, self.cross, extent),
            Axis::Horizontal => Geometry::new(main, offset, extent, self.cross),
        }
    }
}
