//! Tests for minicontrol views

use super::fixtures::{AnimationKind, MockHost, make_notification, make_panel, settle};
use crate::{Error, QuickPanel, SETTINGS_STRIP_HEIGHT};
use quickpanel_types::{Easing, Geometry, ItemKind, PanelEvent};
use std::time::Duration;

fn add(panel: &mut QuickPanel, name: &str, width: i32, height: i32) -> usize {
    panel
        .handle_event(PanelEvent::MinictrlAdded {
            name: name.to_string(),
            width,
            height,
        })
        .len()
}

#[test]
fn test_minicontrol_sits_above_notifications() {
    let host = MockHost::new();
    let mut panel = make_panel(&host);
    panel.handle_event(PanelEvent::NotificationPosted {
        notification: make_notification(1, "chat"),
    });
    add(&mut panel, "music", 720, 200);
    settle(&mut panel, &host);

    let rows = panel.snapshot().rows;
    assert_eq!(rows[0].kind, ItemKind::Minicontrol);
    assert_eq!(rows[0].geometry, Geometry::new(0, SETTINGS_STRIP_HEIGHT, 720, 200));
    assert_eq!(rows[1].geometry.y, SETTINGS_STRIP_HEIGHT + 200);
}

#[test]
fn test_later_minicontrols_go_below_earlier_ones() {
    let host = MockHost::new();
    let mut panel = make_panel(&host);
    add(&mut panel, "music", 720, 200);
    add(&mut panel, "call", 720, 100);
    settle(&mut panel, &host);

    let labels: Vec<String> = panel.snapshot().rows.into_iter().map(|r| r.label).collect();
    assert_eq!(labels, vec!["music", "call"]);
    assert_eq!(panel.minictrl_count(), 2);
}

#[test]
fn test_height_clamped_to_limit() {
    let host = MockHost::new();
    let mut panel = make_panel(&host);
    add(&mut panel, "huge", 720, 5_000);
    settle(&mut panel, &host);

    assert_eq!(panel.snapshot().rows[0].geometry.h, 400);
}

#[test]
fn test_resize_animates_and_pushes_rows_down() {
    let host = MockHost::new();
    let mut panel = make_panel(&host);
    add(&mut panel, "music", 720, 200);
    panel.handle_event(PanelEvent::NotificationPosted {
        notification: make_notification(1, "chat"),
    });
    settle(&mut panel, &host);

    let queued = panel.handle_event(PanelEvent::MinictrlResized {
        name: "music".to_string(),
        width: 720,
        height: 300,
    });
    assert_eq!(queued.len(), 1);
    panel.run_until_idle();

    let animation = host.log().last_animation().unwrap();
    assert_eq!(
        animation.kind,
        AnimationKind::Transform {
            from: Geometry::new(0, SETTINGS_STRIP_HEIGHT, 720, 200),
            to: Geometry::new(0, SETTINGS_STRIP_HEIGHT, 720, 300),
        }
    );
    assert_eq!(animation.duration, Duration::from_millis(250));
    assert_eq!(animation.easing, Easing::Linear);

    panel.animation_finished(queued[0]);
    let rows = panel.snapshot().rows;
    assert_eq!(rows[0].geometry.h, 300);
    assert_eq!(host.log().items[&rows[1].item].geometry.y, SETTINGS_STRIP_HEIGHT + 300);
}

#[test]
fn test_resize_to_same_size_does_not_animate() {
    let host = MockHost::new();
    let mut panel = make_panel(&host);
    add(&mut panel, "music", 720, 200);
    settle(&mut panel, &host);
    let before = host.log().animations.len();

    panel.handle_event(PanelEvent::MinictrlResized {
        name: "music".to_string(),
        width: 720,
        height: 200,
    });
    panel.run_until_idle();

    assert_eq!(host.log().animations.len(), before);
    assert_eq!(panel.scheduler().pending_len(), 0);
}

#[test]
fn test_width_only_resize_keeps_full_width() {
    let host = MockHost::new();
    let mut panel = make_panel(&host);
    add(&mut panel, "music", 720, 200);
    settle(&mut panel, &host);
    let before = host.log().animations.len();

    panel.handle_event(PanelEvent::MinictrlResized {
        name: "music".to_string(),
        width: 360,
        height: 200,
    });
    settle(&mut panel, &host);

    assert_eq!(host.log().animations.len(), before);
    let row = &panel.snapshot().rows[0];
    assert_eq!(row.geometry, Geometry::new(0, SETTINGS_STRIP_HEIGHT, 720, 200));
    assert_eq!(host.log().items[&row.item].geometry.w, 720);
}

#[test]
fn test_resize_animates_height_only() {
    let host = MockHost::new();
    let mut panel = make_panel(&host);
    add(&mut panel, "music", 720, 200);
    settle(&mut panel, &host);

    let queued = panel.handle_event(PanelEvent::MinictrlResized {
        name: "music".to_string(),
        width: 500,
        height: 120,
    });
    panel.run_until_idle();

    let animation = host.log().last_animation().unwrap();
    assert_eq!(
        animation.kind,
        AnimationKind::Transform {
            from: Geometry::new(0, SETTINGS_STRIP_HEIGHT, 720, 200),
            to: Geometry::new(0, SETTINGS_STRIP_HEIGHT, 720, 120),
        }
    );
    panel.animation_finished(queued[0]);
    assert_eq!(panel.snapshot().rows[0].geometry.w, 720);
}

#[test]
fn test_add_existing_name_resizes() {
    let host = MockHost::new();
    let mut panel = make_panel(&host);
    add(&mut panel, "music", 720, 200);
    add(&mut panel, "music", 720, 250);
    settle(&mut panel, &host);

    let rows = panel.snapshot().rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].geometry.h, 250);
}

#[test]
fn test_resize_unknown_is_error() {
    let host = MockHost::new();
    let mut panel = make_panel(&host);
    let err = panel
        .try_handle_event(PanelEvent::MinictrlResized {
            name: "ghost".to_string(),
            width: 10,
            height: 10,
        })
        .unwrap_err();
    assert!(matches!(err, Error::UnknownItem(_)));
}

#[test]
fn test_remove_minicontrol() {
    let host = MockHost::new();
    let mut panel = make_panel(&host);
    add(&mut panel, "music", 720, 200);
    settle(&mut panel, &host);

    let queued = panel.handle_event(PanelEvent::MinictrlRemoved {
        name: "music".to_string(),
    });
    assert_eq!(queued.len(), 1);
    settle(&mut panel, &host);

    assert!(panel.snapshot().rows.is_empty());
    assert_eq!(panel.minictrl_count(), 0);
    assert!(
        panel
            .try_handle_event(PanelEvent::MinictrlRemoved {
                name: "music".to_string(),
            })
            .is_err()
    );
}
