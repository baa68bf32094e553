//! Quick-settings button strip above the notification list.
//!
//! Reordering buttons (edit mode) animates on the same scheduler, but the
//! strip is not part of the scrolled container, so its records neither
//! freeze the container nor cancel swipe gestures on notification rows.

use super::list::{PanelList, Row, RowKey, SharedList};
use super::transitions::ReorderRow;
use super::{SubmitOptions, submit};
use crate::vi::ViScheduler;
use crate::{Error, Result};
use quickpanel_types::{ItemKind, ViId, ViOperation, ViPayload};
use tracing::debug;

/// Item ids of setting buttons start here
const SETTINGS_ITEM_BASE: u64 = 1 << 32;

pub const DEFAULT_BUTTONS: &[&str] = &["wifi", "bluetooth", "sound", "rotation", "flashlight"];

pub struct SettingsGrid {
    list: SharedList,
}

impl SettingsGrid {
    /// Lay out `buttons` left to right and host them in the container.
    #[must_use]
    pub fn new(scheduler: &mut ViScheduler, buttons: &[&str], button_width: i32, height: i32) -> Self {
        let mut list = PanelList::new(height, 0)
            .horizontal()
            .with_item_base(SETTINGS_ITEM_BASE);
        for name in buttons {
            let row = Row {
                item: list.allocate_item(),
                kind: ItemKind::SettingButton,
                key: RowKey::Setting((*name).to_string()),
                label: (*name).to_string(),
                extent: button_width,
                alpha: 1.0,
                offset: 0,
            };
            list.insert_bottom(row);
        }

        let container = scheduler.host_mut().container.as_mut();
        for (index, row) in list.rows().iter().enumerate() {
            if let Some(geometry) = list.geometry_at(index) {
                container.add_item(row.item, geometry, 1.0);
            }
        }

        Self {
            list: list.into_shared(),
        }
    }

    /// Button names in display order.
    #[must_use]
    pub fn order(&self) -> Vec<String> {
        self.list
            .borrow()
            .rows()
            .iter()
            .map(|row| row.label.clone())
            .collect()
    }

    /// Slide the button at `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidIndex` if either index is out of range.
    pub fn reorder(
        &mut self,
        scheduler: &mut ViScheduler,
        from: usize,
        to: usize,
    ) -> Result<Option<ViId>> {
        let (item, len) = {
            let list = self.list.borrow();
            let len = list.len();
            (list.rows().get(from).map(|row| row.item), len)
        };
        let Some(item) = item else {
            return Err(Error::InvalidIndex { index: from, len });
        };
        if to >= len {
            return Err(Error::InvalidIndex { index: to, len });
        }
        if from == to {
            return Ok(None);
        }
        debug!("Moving setting button {from} -> {to}");

        Ok(submit(
            scheduler,
            ViOperation::Reorder,
            ItemKind::SettingButton,
            item,
            ViPayload::Reorder { from, to },
            ReorderRow::new(self.list.clone()),
            SubmitOptions {
                suppress_user_event_interrupt: true,
                disable_freeze: true,
            },
        ))
    }
}
