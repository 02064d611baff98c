use air_folder::capture::{
    CaptureEvent, CaptureService, LiveAnchor, MockAnchorOverlay, MockCaptureHandle,
    MockCaptureHookBackend, MockCursor, MockCursorHandle, MockOverlayHandle, PickOutcome,
    PositionPicker,
};
use air_folder::error::CaptureError;
use air_folder::geometry::Anchor;

struct Rig {
    picker: PositionPicker,
    hooks: MockCaptureHandle,
    cursor: MockCursorHandle,
    overlay: MockOverlayHandle,
}

fn rig() -> Rig {
    let (backend, hooks) = MockCaptureHookBackend::new();
    let (cursor_ctl, cursor) = MockCursor::new();
    let (overlay_win, overlay) = MockAnchorOverlay::new();
    let service = CaptureService::new(Box::new(backend), Box::new(cursor_ctl));
    Rig {
        picker: PositionPicker::new(service, Box::new(overlay_win)),
        hooks,
        cursor,
        overlay,
    }
}

#[test]
fn begin_shows_overlay_at_current_value_and_hides_cursor() {
    let mut rig = rig();
    let target = LiveAnchor::new(Anchor::new(10.0, 20.0));
    rig.picker.begin_pick(&target, None).unwrap();

    assert!(rig.picker.is_picking());
    assert!(rig.overlay.is_visible());
    assert_eq!(rig.overlay.position(), Some(Anchor::new(10.0, 20.0)));
    assert_eq!(rig.cursor.display_count(), -1);
    assert_eq!(rig.hooks.installed_hooks(), 2);
}

#[test]
fn confirm_commits_the_clicked_point() {
    let mut rig = rig();
    let target = LiveAnchor::new(Anchor::new(10.0, 20.0));
    rig.picker.begin_pick(&target, None).unwrap();

    rig.hooks.emit(CaptureEvent::PointerMoved(Anchor::new(100.0, 100.0)));
    rig.hooks.emit(CaptureEvent::PointerConfirmed(Anchor::new(150.0, 300.0)));

    assert_eq!(
        rig.picker.pump(),
        Some(PickOutcome::Confirmed(Anchor::new(150.0, 300.0)))
    );
    assert_eq!(target.get(), Anchor::new(150.0, 300.0));
    assert!(!rig.picker.is_picking());
    assert_eq!(rig.hooks.installed_hooks(), 0);
    assert!(!rig.overlay.is_visible());
    assert_eq!(rig.cursor.display_count(), 0);
}

#[test]
fn cancel_after_moves_restores_original_value() {
    let mut rig = rig();
    let target = LiveAnchor::new(Anchor::new(10.0, 20.0));
    rig.picker.begin_pick(&target, None).unwrap();

    for (x, y) in [(30.0, 40.0), (50.0, 60.0), (70.0, 80.0)] {
        rig.hooks.emit(CaptureEvent::PointerMoved(Anchor::new(x, y)));
    }
    assert_eq!(rig.picker.pump(), None);
    assert_eq!(target.get(), Anchor::new(70.0, 80.0));
    assert_eq!(rig.overlay.moves(), 3);
    assert_eq!(rig.overlay.position(), Some(Anchor::new(70.0, 80.0)));

    rig.hooks.emit(CaptureEvent::Cancelled);
    assert_eq!(
        rig.picker.pump(),
        Some(PickOutcome::Cancelled(Anchor::new(10.0, 20.0)))
    );
    assert_eq!(target.get(), Anchor::new(10.0, 20.0));
    assert_eq!(rig.hooks.installed_hooks(), 0);
    assert_eq!(rig.cursor.display_count(), 0);
    assert!(!rig.overlay.is_visible());
}

#[test]
fn confirm_wins_over_later_moves() {
    let mut rig = rig();
    let target = LiveAnchor::new(Anchor::default());
    rig.picker.begin_pick(&target, None).unwrap();

    rig.hooks.emit(CaptureEvent::PointerConfirmed(Anchor::new(5.0, 5.0)));
    rig.hooks.emit(CaptureEvent::PointerMoved(Anchor::new(9.0, 9.0)));

    assert_eq!(rig.picker.pump(), Some(PickOutcome::Confirmed(Anchor::new(5.0, 5.0))));
    assert_eq!(rig.picker.pump(), None);
    assert_eq!(target.get(), Anchor::new(5.0, 5.0));
}

#[test]
fn second_begin_is_rejected_without_reinstalling() {
    let mut rig = rig();
    let target = LiveAnchor::default();
    rig.picker.begin_pick(&target, None).unwrap();
    let err = rig.picker.begin_pick(&target, None).unwrap_err();
    assert!(matches!(err, CaptureError::SessionActive));
    assert_eq!(rig.hooks.install_count(), 1);
}

#[test]
fn failed_install_undoes_overlay_and_cursor() {
    let mut rig = rig();
    rig.hooks.fail_install(true);
    let target = LiveAnchor::new(Anchor::new(1.0, 2.0));

    let err = rig.picker.begin_pick(&target, None).unwrap_err();
    assert!(matches!(err, CaptureError::HookInstallationFailed(_)));
    assert!(!rig.picker.is_picking());
    assert!(!rig.overlay.is_visible());
    assert_eq!(rig.cursor.display_count(), 0);
    assert_eq!(target.get(), Anchor::new(1.0, 2.0));
}

#[test]
fn overlay_failure_aborts_before_hooks() {
    let mut rig = rig();
    rig.overlay.fail_show(true);
    let err = rig
        .picker
        .begin_pick(&LiveAnchor::default(), None)
        .unwrap_err();
    assert!(matches!(err, CaptureError::OverlayUnavailable(_)));
    assert_eq!(rig.hooks.install_count(), 0);
    assert_eq!(rig.cursor.hide_calls(), 0);
}

#[test]
fn unload_mid_pick_releases_everything() {
    let mut rig = rig();
    let target = LiveAnchor::new(Anchor::new(10.0, 20.0));
    rig.picker.begin_pick(&target, None).unwrap();
    rig.hooks.emit(CaptureEvent::PointerMoved(Anchor::new(400.0, 400.0)));
    rig.picker.pump();

    rig.picker.unload();
    rig.picker.unload();

    assert_eq!(rig.hooks.installed_hooks(), 0);
    assert_eq!(rig.hooks.uninstall_count(), 1);
    assert_eq!(rig.cursor.display_count(), 0);
    assert!(!rig.overlay.is_visible());
    assert_eq!(target.get(), Anchor::new(10.0, 20.0));
}

#[test]
fn dropping_the_picker_rolls_back() {
    let rig = rig();
    let Rig {
        mut picker,
        hooks,
        cursor,
        overlay,
    } = rig;
    let target = LiveAnchor::new(Anchor::new(7.0, 8.0));
    picker.begin_pick(&target, None).unwrap();
    hooks.emit(CaptureEvent::PointerMoved(Anchor::new(70.0, 80.0)));
    picker.pump();
    drop(picker);

    assert_eq!(hooks.installed_hooks(), 0);
    assert_eq!(cursor.display_count(), 0);
    assert!(!overlay.is_visible());
    assert_eq!(target.get(), Anchor::new(7.0, 8.0));
}

#[test]
fn start_stop_cycles_are_net_zero() {
    let mut rig = rig();
    let target = LiveAnchor::default();
    for _ in 0..3 {
        rig.picker.begin_pick(&target, None).unwrap();
        rig.picker.cancel_pick();
    }
    assert_eq!(rig.hooks.install_count(), 3);
    assert_eq!(rig.hooks.uninstall_count(), 3);
    assert_eq!(rig.cursor.hide_calls(), rig.cursor.show_calls());
    assert_eq!(rig.cursor.display_count(), 0);
}

#[test]
fn half_hidden_cursor_is_restored_on_every_exit() {
    let mut rig = rig();
    rig.cursor.fail_hide(true);
    let target = LiveAnchor::new(Anchor::new(5.0, 5.0));

    rig.picker.begin_pick(&target, None).unwrap();
    rig.picker.cancel_pick();
    rig.picker.unload();
    drop(rig.picker);

    assert_eq!(rig.cursor.display_count(), 0);
    assert_eq!(rig.cursor.show_calls(), 1);
}

#[test]
fn keyboard_hook_failure_aborts_the_pick_cleanly() {
    let mut rig = rig();
    rig.hooks.fail_keyboard(true);
    let target = LiveAnchor::new(Anchor::new(7.0, 8.0));

    let err = rig.picker.begin_pick(&target, None).unwrap_err();
    assert!(matches!(err, CaptureError::HookInstallationFailed(_)));
    assert_eq!(rig.hooks.installed_hooks(), 0);
    assert_eq!(rig.cursor.display_count(), 0);
    assert!(!rig.overlay.is_visible());
    assert_eq!(target.get(), Anchor::new(7.0, 8.0));
}
