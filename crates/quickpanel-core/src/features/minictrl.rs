//! Minicontrol views: app-provided live widgets (music player, call status)
//! shown above all notifications.

use super::list::{Row, RowKey, SharedList};
use super::transitions::{DeleteRow, InsertRow, ResizeRow};
use super::{SubmitOptions, submit};
use crate::config::PanelConfig;
use crate::vi::ViScheduler;
use crate::{Error, Result};
use quickpanel_types::{ItemId, ItemKind, ViId, ViOperation, ViPayload};
use std::collections::HashMap;
use tracing::debug;

pub struct MinictrlSection {
    list: SharedList,
    max_height: i32,
    views: HashMap<String, ItemId>,
}

impl MinictrlSection {
    #[must_use]
    pub fn new(list: SharedList, config: &PanelConfig) -> Self {
        Self {
            list,
            max_height: config.minictrl_max_height.max(1),
            views: HashMap::new(),
        }
    }

    fn clamp(&self, width: i32, height: i32) -> (i32, i32) {
        let cross = self.list.borrow().cross();
        (width.clamp(1, cross), height.clamp(1, self.max_height))
    }

    /// Show a new minicontrol below existing ones. Adding a known name
    /// resizes it instead.
    ///
    /// # Errors
    ///
    /// Propagates errors from the resize path.
    pub fn add(
        &mut self,
        scheduler: &mut ViScheduler,
        name: &str,
        width: i32,
        height: i32,
    ) -> Result<Option<ViId>> {
        if self.views.contains_key(name) {
            return self.resize(scheduler, name, width, height);
        }

        let (_, height) = self.clamp(width, height);
        let item = self.list.borrow_mut().allocate_item();
        let row = Row {
            item,
            kind: ItemKind::Minicontrol,
            key: RowKey::Minicontrol(name.to_string()),
            label: name.to_string(),
            extent: height,
            alpha: 0.0,
            offset: 0,
        };
        self.views.insert(name.to_string(), item);
        debug!("Adding minicontrol {name} as {item}");

        Ok(submit(
            scheduler,
            ViOperation::Insert,
            ItemKind::Minicontrol,
            item,
            ViPayload::None,
            InsertRow::new(self.list.clone(), row).at_bottom(),
            SubmitOptions::default(),
        ))
    }

    /// Animate a minicontrol to a new height. Views always span the panel
    /// width, so a width-only change completes without animating.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownItem` for an unknown name.
    pub fn resize(
        &mut self,
        scheduler: &mut ViScheduler,
        name: &str,
        width: i32,
        height: i32,
    ) -> Result<Option<ViId>> {
        let Some(&item) = self.views.get(name) else {
            return Err(Error::UnknownItem(format!("minicontrol {name}")));
        };
        let (width, height) = self.clamp(width, height);

        Ok(submit(
            scheduler,
            ViOperation::Resize,
            ItemKind::Minicontrol,
            item,
            ViPayload::Resize { width, height },
            ResizeRow::new(self.list.clone()),
            SubmitOptions::default(),
        ))
    }

    /// # Errors
    ///
    /// Returns `Error::UnknownItem` for an unknown name.
    pub fn remove(&mut self, scheduler: &mut ViScheduler, name: &str) -> Result<Option<ViId>> {
        let Some(item) = self.views.remove(name) else {
            return Err(Error::UnknownItem(format!("minicontrol {name}")));
        };

        Ok(submit(
            scheduler,
            ViOperation::Delete,
            ItemKind::Minicontrol,
            item,
            ViPayload::None,
            DeleteRow::new(self.list.clone()),
            SubmitOptions::default(),
        ))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
