//! The quick panel: notification list, minicontrols and the settings strip
//! sharing one VI scheduler.

use crate::config::Config;
use crate::features::list::{PanelList, SharedList};
use crate::features::minictrl::MinictrlSection;
use crate::features::noti::NotificationSection;
use crate::features::settings::{DEFAULT_BUTTONS, SettingsGrid};
use crate::host::HostServices;
use crate::vi::ViScheduler;
use crate::Result;
use quickpanel_types::{Geometry, ItemId, ItemKind, MachineState, PanelEvent, ViId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Height of the quick-settings strip; the list starts below it
pub const SETTINGS_STRIP_HEIGHT: i32 = 100;

/// One row of the list as seen from outside
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSnapshot {
    pub item: ItemId,
    pub kind: ItemKind,
    pub label: String,
    pub alpha: f64,
    pub geometry: Geometry,
}

/// Point-in-time view of the panel and its scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSnapshot {
    pub machine: MachineState,
    pub pending: usize,
    pub user_events: usize,
    pub frozen: bool,
    /// Height of all rows stacked, excluding the settings strip
    pub content_extent: i32,
    pub rows: Vec<RowSnapshot>,
    pub settings: Vec<String>,
}

pub struct QuickPanel {
    scheduler: ViScheduler,
    list: SharedList,
    notifications: NotificationSection,
    minictrls: MinictrlSection,
    settings: SettingsGrid,
}

impl QuickPanel {
    /// Build the panel on top of `host` and bring the scheduler up.
    #[must_use]
    pub fn new(config: &Config, host: HostServices) -> Self {
        let mut scheduler = ViScheduler::with_config(host, &config.transitions);

        let list =
            PanelList::new(config.panel.panel_width, SETTINGS_STRIP_HEIGHT).into_shared();
        let notifications = NotificationSection::new(list.clone(), &config.panel);
        let minictrls = MinictrlSection::new(list.clone(), &config.panel);

        let button_count = i32::try_from(DEFAULT_BUTTONS.len()).unwrap_or(1).max(1);
        let settings = SettingsGrid::new(
            &mut scheduler,
            DEFAULT_BUTTONS,
            config.panel.panel_width / button_count,
            SETTINGS_STRIP_HEIGHT,
        );

        scheduler.init();
        info!("Quick panel up ({:?})", scheduler.state());

        Self {
            scheduler,
            list,
            notifications,
            minictrls,
            settings,
        }
    }

    /// Apply one outside event, returning the records it queued.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownItem` or `Error::InvalidIndex` when the event
    /// refers to something the panel does not show.
    pub fn try_handle_event(&mut self, event: PanelEvent) -> Result<Vec<ViId>> {
        debug!("Event: {event:?}");
        let scheduler = &mut self.scheduler;
        let queued = match event {
            PanelEvent::Opened => {
                scheduler.resume();
                Vec::new()
            }
            PanelEvent::Closed => {
                scheduler.suspend();
                Vec::new()
            }
            PanelEvent::NotificationPosted { notification } => self
                .notifications
                .post(scheduler, notification)?
                .into_iter()
                .collect(),
            PanelEvent::NotificationUpdated { notification } => self
                .notifications
                .update(scheduler, notification)?
                .into_iter()
                .collect(),
            PanelEvent::NotificationRemoved { id } => self
                .notifications
                .remove(scheduler, id)?
                .into_iter()
                .collect(),
            PanelEvent::NotificationsCleared => self.notifications.clear_all(scheduler),
            PanelEvent::SwipeStarted { id, offset } => {
                vec![self.notifications.begin_swipe(scheduler, id, offset)?]
            }
            PanelEvent::SwipeReleased { id, dismiss } => self
                .notifications
                .end_swipe(scheduler, id, dismiss)?
                .into_iter()
                .collect(),
            PanelEvent::MinictrlAdded {
                name,
                width,
                height,
            } => self
                .minictrls
                .add(scheduler, &name, width, height)?
                .into_iter()
                .collect(),
            PanelEvent::MinictrlResized {
                name,
                width,
                height,
            } => self
                .minictrls
                .resize(scheduler, &name, width, height)?
                .into_iter()
                .collect(),
            PanelEvent::MinictrlRemoved { name } => self
                .minictrls
                .remove(scheduler, &name)?
                .into_iter()
                .collect(),
            PanelEvent::SettingsReordered { from, to } => self
                .settings
                .reorder(scheduler, from, to)?
                .into_iter()
                .collect(),
        };
        self.notifications.prune(&self.scheduler);
        Ok(queued)
    }

    /// Like [`Self::try_handle_event`], logging rejected events instead.
    pub fn handle_event(&mut self, event: PanelEvent) -> Vec<ViId> {
        match self.try_handle_event(event) {
            Ok(queued) => queued,
            Err(e) => {
                warn!("Ignoring event: {e}");
                Vec::new()
            }
        }
    }

    /// The host finished playing the animation of `vi`.
    pub fn animation_finished(&mut self, vi: ViId) -> bool {
        let finished = self.scheduler.done(vi);
        self.notifications.prune(&self.scheduler);
        finished
    }

    pub fn run_idle(&mut self) -> bool {
        let ran = self.scheduler.run_idle();
        self.notifications.prune(&self.scheduler);
        ran
    }

    pub fn run_until_idle(&mut self) -> usize {
        let ran = self.scheduler.run_until_idle();
        self.notifications.prune(&self.scheduler);
        ran
    }

    /// Abandon queued work and stop the scheduler.
    pub fn shutdown(&mut self) {
        self.scheduler.fini();
        self.notifications.prune(&self.scheduler);
    }

    #[must_use]
    pub fn snapshot(&self) -> PanelSnapshot {
        let list = self.list.borrow();
        let rows = list
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| RowSnapshot {
                item: row.item,
                kind: row.kind,
                label: row.label.clone(),
                alpha: row.alpha,
                geometry: list.geometry_at(index).unwrap_or_default(),
            })
            .collect();

        PanelSnapshot {
            machine: self.scheduler.state(),
            pending: self.scheduler.pending_len(),
            user_events: self.scheduler.user_event_len(),
            frozen: self.scheduler.is_frozen(),
            content_extent: list.content_extent(),
            rows,
            settings: self.settings.order(),
        }
    }

    #[must_use]
    pub fn scheduler(&self) -> &ViScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut ViScheduler {
        &mut self.scheduler
    }

    #[cfg(test)]
    pub(crate) fn notifications(&self) -> &NotificationSection {
        &self.notifications
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }

    #[must_use]
    pub fn minictrl_count(&self) -> usize {
        self.minictrls.len()
    }
}

impl std::fmt::Debug for QuickPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuickPanel")
            .field("scheduler", &self.scheduler)
            .field("rows", &self.list.borrow().len())
            .finish_non_exhaustive()
    }
}
