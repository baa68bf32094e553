//! Notification rows: post, update, remove, clear-all and swipe-to-dismiss.

use super::list::{Row, RowKey, SharedList};
use super::transitions::{DeleteRow, InsertRow, ReorderRow, SwipeRow, UpdateRow};
use super::{SubmitOptions, submit};
use crate::config::PanelConfig;
use crate::vi::ViScheduler;
use crate::{Error, Result};
use quickpanel_types::{ItemId, ItemKind, Notification, ViId, ViOperation, ViPayload};
use std::collections::HashMap;
use tracing::{debug, warn};

pub struct NotificationSection {
    list: SharedList,
    row_height: i32,
    limit: usize,
    /// Swipe gesture records by notification id
    swipes: HashMap<u64, ViId>,
    /// Queued delete records by the row they fade out. A repost during the
    /// fade gets a fresh row, so notification ids are not unique here.
    deletes: HashMap<ItemId, ViId>,
}

impl NotificationSection {
    #[must_use]
    pub fn new(list: SharedList, config: &PanelConfig) -> Self {
        Self {
            list,
            row_height: config.row_height,
            limit: config.notification_limit,
            swipes: HashMap::new(),
            deletes: HashMap::new(),
        }
    }

    /// Row currently showing notification `id`, skipping rows that are
    /// already fading out.
    fn item_of(&self, id: u64) -> Option<(ItemId, ItemKind)> {
        let key = RowKey::Notification(id);
        self.list
            .borrow()
            .rows()
            .iter()
            .find(|row| row.key == key && !self.deletes.contains_key(&row.item))
            .map(|row| (row.item, row.kind))
    }

    fn is_deleting(&self, id: u64) -> bool {
        let key = RowKey::Notification(id);
        self.list
            .borrow()
            .rows()
            .iter()
            .any(|row| row.key == key && self.deletes.contains_key(&row.item))
    }

    /// Forget records the scheduler has finished with.
    pub(crate) fn prune(&mut self, scheduler: &ViScheduler) {
        self.deletes.retain(|_, vi| scheduler.is_pending(*vi));
        self.swipes
            .retain(|_, vi| scheduler.record_state(*vi).is_some());
    }

    #[cfg(test)]
    pub(crate) fn tracked_records(&self) -> usize {
        self.deletes.len() + self.swipes.len()
    }

    /// Show a new notification at the top of its band. A repost of a known
    /// id is treated as an update.
    ///
    /// # Errors
    ///
    /// Propagates errors from the update path.
    pub fn post(
        &mut self,
        scheduler: &mut ViScheduler,
        notification: Notification,
    ) -> Result<Option<ViId>> {
        self.prune(scheduler);
        if self.item_of(notification.id).is_some() {
            return self.update(scheduler, notification);
        }

        let kind = if notification.ongoing {
            ItemKind::Ongoing
        } else {
            ItemKind::Notification
        };
        let row = {
            let mut list = self.list.borrow_mut();
            Row {
                item: list.allocate_item(),
                kind,
                key: RowKey::Notification(notification.id),
                label: notification.title,
                extent: self.row_height,
                alpha: 0.0,
                offset: 0,
            }
        };
        let item = row.item;
        debug!("Posting notification {} as {item}", notification.id);

        let vi = submit(
            scheduler,
            ViOperation::Insert,
            kind,
            item,
            ViPayload::None,
            InsertRow::new(self.list.clone(), row),
            SubmitOptions::default(),
        );
        self.enforce_limit(scheduler);
        Ok(vi)
    }

    /// Replace a notification's text, first moving it to the top of its band
    /// if newer notifications sit above it.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownItem` if the notification is not shown.
    pub fn update(
        &mut self,
        scheduler: &mut ViScheduler,
        notification: Notification,
    ) -> Result<Option<ViId>> {
        self.prune(scheduler);
        let Some((item, kind)) = self.item_of(notification.id) else {
            return Err(Error::UnknownItem(format!("notification {}", notification.id)));
        };

        let position = {
            let list = self.list.borrow();
            list.position(item)
                .map(|index| (index, list.band_range(kind).start))
        };
        if let Some((from, top)) = position
            && from > top
        {
            submit(
                scheduler,
                ViOperation::Reorder,
                kind,
                item,
                ViPayload::Reorder { from, to: top },
                ReorderRow::new(self.list.clone()),
                SubmitOptions::default(),
            );
        }

        Ok(submit(
            scheduler,
            ViOperation::Update,
            kind,
            item,
            ViPayload::None,
            UpdateRow::new(self.list.clone(), notification.title),
            SubmitOptions::default(),
        ))
    }

    /// Fade a notification out and drop its row. Removing a notification
    /// whose delete is already queued is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownItem` if the notification is not shown.
    pub fn remove(&mut self, scheduler: &mut ViScheduler, id: u64) -> Result<Option<ViId>> {
        self.prune(scheduler);
        let Some((item, kind)) = self.item_of(id) else {
            if self.is_deleting(id) {
                debug!("Notification {id} already being removed");
                return Ok(None);
            }
            return Err(Error::UnknownItem(format!("notification {id}")));
        };
        if let Some(swipe) = self.swipes.remove(&id) {
            scheduler.remove_user_event(swipe);
        }

        let vi = submit(
            scheduler,
            ViOperation::Delete,
            kind,
            item,
            ViPayload::None,
            DeleteRow::new(self.list.clone()),
            SubmitOptions::default(),
        );
        if let Some(vi) = vi {
            self.deletes.insert(item, vi);
        }
        Ok(vi)
    }

    /// Remove every regular notification, newest first. Ongoing ones stay.
    pub fn clear_all(&mut self, scheduler: &mut ViScheduler) -> Vec<ViId> {
        self.prune(scheduler);
        self.live_regular_ids()
            .into_iter()
            .filter_map(|id| match self.remove(scheduler, id) {
                Ok(vi) => vi,
                Err(e) => {
                    warn!("Clear all skipped notification {id}: {e}");
                    None
                }
            })
            .collect()
    }

    /// Finger is dragging a row sideways. The first call registers a user
    /// event; later calls only move the row.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownItem` if the notification is not shown, or
    /// `Error::Allocation` if no gesture record could be created.
    pub fn begin_swipe(
        &mut self,
        scheduler: &mut ViScheduler,
        id: u64,
        offset: i32,
    ) -> Result<ViId> {
        self.prune(scheduler);
        let Some((item, kind)) = self.item_of(id) else {
            return Err(Error::UnknownItem(format!("notification {id}")));
        };

        let geometry = {
            let mut list = self.list.borrow_mut();
            if let Some(row) = list.row_mut(item) {
                row.offset = offset;
            }
            list.geometry_of(item)
        };
        if let Some(geometry) = geometry {
            scheduler
                .host_mut()
                .container
                .set_item_geometry(item, geometry.with_x(offset));
        }

        if let Some(&vi) = self.swipes.get(&id)
            && scheduler.record_state(vi).is_some()
        {
            return Ok(vi);
        }

        let record = scheduler.create(
            ViOperation::None,
            kind,
            Some(item),
            SwipeRow::new(self.list.clone()),
            ViPayload::Swipe { offset },
        )?;
        let vi = scheduler.add_user_event(record);
        self.swipes.insert(id, vi);
        Ok(vi)
    }

    /// Finger lifted. A dismissing swipe removes the notification; otherwise
    /// the row returns to rest.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownItem` if the notification is not shown.
    pub fn end_swipe(
        &mut self,
        scheduler: &mut ViScheduler,
        id: u64,
        dismiss: bool,
    ) -> Result<Option<ViId>> {
        if let Some(vi) = self.swipes.remove(&id) {
            scheduler.remove_user_event(vi);
        }
        self.prune(scheduler);
        if dismiss {
            return self.remove(scheduler, id);
        }

        let Some((item, _)) = self.item_of(id) else {
            return Err(Error::UnknownItem(format!("notification {id}")));
        };
        let geometry = {
            let mut list = self.list.borrow_mut();
            if let Some(row) = list.row_mut(item) {
                row.offset = 0;
            }
            list.geometry_of(item)
        };
        if let Some(geometry) = geometry {
            scheduler
                .host_mut()
                .container
                .set_item_geometry(item, geometry);
        }
        Ok(None)
    }

    /// Number of notification rows currently shown, ongoing included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list
            .borrow()
            .rows()
            .iter()
            .filter(|row| matches!(row.key, RowKey::Notification(_)))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of regular notifications not already fading out, newest first.
    fn live_regular_ids(&self) -> Vec<u64> {
        self.list
            .borrow()
            .rows()
            .iter()
            .filter(|row| row.kind == ItemKind::Notification)
            .filter(|row| !self.deletes.contains_key(&row.item))
            .filter_map(|row| match row.key {
                RowKey::Notification(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Drop the oldest regular notifications beyond the configured limit.
    fn enforce_limit(&mut self, scheduler: &mut ViScheduler) {
        if self.limit == 0 {
            return;
        }
        for id in self.live_regular_ids().into_iter().skip(self.limit) {
            debug!("Notification limit {} reached, dropping {id}", self.limit);
            if let Err(e) = self.remove(scheduler, id) {
                warn!("Failed to drop notification {id}: {e}");
            }
        }
    }
}
