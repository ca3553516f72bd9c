//! End-to-end sessions over the demo panel catalog: register, interact, restart, restore.

use std::rc::Rc;

use panel_host::{MemoryPrefsStore, PrefsStore};
use panel_runtime::{
    geometry::fits_viewport, Geometry, HitRegion, PanelAction, PanelCatalog, PanelEvent,
    PanelManager, Point, ViewportBounds, WindowId,
};
use pretty_assertions::assert_eq;

const CATALOG: &str = include_str!("../../../demos/scope_layout.toml");
const DESK: ViewportBounds = ViewportBounds::new(1200.0, 800.0);

fn id(raw: &str) -> WindowId {
    WindowId::new(raw)
}

fn boot(store: &MemoryPrefsStore, viewport: ViewportBounds) -> PanelManager {
    let catalog = PanelCatalog::from_toml_str(CATALOG).expect("demo catalog parses");
    let mut manager = PanelManager::new(Rc::new(store.clone()), catalog.config);
    for descriptor in catalog.windows {
        manager
            .dispatch(PanelAction::Register {
                descriptor,
                viewport,
            })
            .expect("register never fails");
    }
    manager
}

fn drag_by(manager: &mut PanelManager, raw: &str, grab: Point, delta: Point) -> Vec<PanelEvent> {
    drag_within(manager, raw, grab, delta, DESK)
}

fn drag_within(
    manager: &mut PanelManager,
    raw: &str,
    grab: Point,
    delta: Point,
    viewport: ViewportBounds,
) -> Vec<PanelEvent> {
    let mut events = manager
        .dispatch(PanelAction::PointerDown {
            window_id: id(raw),
            region: HitRegion::DragRegion,
            pointer: grab,
        })
        .expect("pointer down");
    events.extend(
        manager
            .dispatch(PanelAction::PointerMove {
                pointer: Point::new(grab.x + delta.x, grab.y + delta.y),
                viewport,
            })
            .expect("pointer move"),
    );
    events.extend(manager.dispatch(PanelAction::PointerUp).expect("pointer up"));
    events
}

#[test]
fn restart_restores_committed_geometry() {
    let store = MemoryPrefsStore::default();
    let mut manager = boot(&store, DESK);

    drag_by(
        &mut manager,
        "oscilloscope",
        Point::new(30.0, 90.0),
        Point::new(100.0, 100.0),
    );
    let moved = Geometry::new(120.0, 180.0, 900.0, 450.0);
    assert_eq!(manager.geometry(&id("oscilloscope")), Some(moved));
    assert!(store
        .load_pref("scope.geometry.oscilloscope")
        .expect("read")
        .is_some());

    let restarted = boot(&store, DESK);
    assert_eq!(restarted.geometry(&id("oscilloscope")), Some(moved));
    assert_eq!(
        restarted.geometry(&id("status-panel")),
        Some(Geometry::new(830.0, 80.0, 350.0, 450.0))
    );
}

#[test]
fn small_screen_session_does_not_pin_untouched_defaults() {
    let store = MemoryPrefsStore::default();
    let small = ViewportBounds::new(600.0, 400.0);
    let mut manager = boot(&store, small);
    assert_eq!(
        manager.geometry(&id("quick-actions")),
        Some(Geometry::new(380.0, 205.0, 200.0, 175.0))
    );

    drag_within(
        &mut manager,
        "quick-actions",
        Point::new(390.0, 215.0),
        Point::new(-100.0, -100.0),
        small,
    );
    let moved = Geometry::new(280.0, 105.0, 200.0, 175.0);
    assert_eq!(manager.geometry(&id("quick-actions")), Some(moved));

    let restarted = boot(&store, DESK);
    assert_eq!(restarted.geometry(&id("quick-actions")), Some(moved));
    assert_eq!(
        restarted.geometry(&id("oscilloscope")),
        Some(Geometry::new(20.0, 80.0, 900.0, 450.0))
    );
    assert_eq!(
        restarted.geometry(&id("control-panel")),
        Some(Geometry::new(20.0, 430.0, 400.0, 350.0))
    );
}

#[test]
fn small_screen_boot_keeps_every_panel_inside() {
    let store = MemoryPrefsStore::default();
    let viewport = ViewportBounds::new(600.0, 400.0).with_reserved(40.0, 20.0);
    let manager = boot(&store, viewport);

    for descriptor in manager.descriptors() {
        let geometry = manager.geometry(&descriptor.id).expect("geometry");
        assert!(
            fits_viewport(geometry, viewport, descriptor.min_size()),
            "{} escaped: {geometry:?}",
            descriptor.id
        );
    }
    assert!(store.is_empty());
}

#[test]
fn hidden_panel_can_be_shown_with_clamped_default() {
    let store = MemoryPrefsStore::default();
    let mut manager = boot(&store, DESK);

    let events = manager
        .dispatch(PanelAction::ToggleVisible {
            window_id: id("fft-analyzer"),
        })
        .expect("toggle");

    assert_eq!(
        events,
        vec![PanelEvent::VisibilityChanged {
            window_id: id("fft-analyzer"),
            visible: true,
        }]
    );
    assert_eq!(
        manager.geometry(&id("fft-analyzer")),
        Some(Geometry::new(20.0, 430.0, 700.0, 350.0))
    );
}

#[test]
fn palette_drags_but_never_tiles_resizes_or_closes() {
    let store = MemoryPrefsStore::default();
    let mut manager = boot(&store, DESK);
    let palette = id("layout-palette");

    let closed = manager
        .dispatch(PanelAction::Close {
            window_id: palette.clone(),
        })
        .expect("close");
    let resized = manager
        .dispatch(PanelAction::PointerDown {
            window_id: palette.clone(),
            region: HitRegion::ResizeHandle,
            pointer: Point::new(208.0, 408.0),
        })
        .expect("resize handle");
    assert!(closed.is_empty());
    assert!(resized.is_empty());

    drag_by(
        &mut manager,
        "layout-palette",
        Point::new(20.0, 20.0),
        Point::new(50.0, 30.0),
    );
    let dragged = Geometry::new(58.0, 38.0, 200.0, 400.0);
    assert_eq!(manager.geometry(&palette), Some(dragged));
    assert_eq!(manager.focused(), Some(&palette));

    let tiled = manager
        .dispatch(PanelAction::ArrangeGrid { viewport: DESK })
        .expect("grid");
    assert_eq!(tiled.len(), 5);
    assert!(!tiled.iter().any(|event| matches!(
        event,
        PanelEvent::GeometryCommitted { window_id, .. } if *window_id == palette
    )));
    assert_eq!(manager.geometry(&palette), Some(dragged));

    let scope = manager.geometry(&id("oscilloscope")).expect("scope");
    assert_eq!((scope.x, scope.y, scope.height), (20.0, 20.0, 370.0));
}

#[test]
fn save_reset_and_load_survive_a_restart() {
    let store = MemoryPrefsStore::default();
    let mut manager = boot(&store, DESK);

    drag_by(
        &mut manager,
        "quick-actions",
        Point::new(900.0, 460.0),
        Point::new(-400.0, -300.0),
    );
    let arranged = manager.geometry(&id("quick-actions")).expect("quick actions");
    let saved = manager.dispatch(PanelAction::SaveLayout).expect("save");
    assert!(matches!(saved.as_slice(), [PanelEvent::LayoutSaved { .. }]));

    manager
        .dispatch(PanelAction::ResetLayout { viewport: DESK })
        .expect("reset");
    assert_eq!(
        manager.geometry(&id("quick-actions")),
        Some(Geometry::new(830.0, 430.0, 350.0, 350.0))
    );
    assert!(store
        .load_pref("scope.geometry.quick-actions")
        .expect("read")
        .is_none());

    let mut restarted = boot(&store, DESK);
    assert_eq!(
        restarted.geometry(&id("quick-actions")),
        Some(Geometry::new(830.0, 430.0, 350.0, 350.0))
    );

    let events = restarted
        .dispatch(PanelAction::LoadLayout { viewport: DESK })
        .expect("load");
    assert_eq!(events.len(), 8);
    assert_eq!(restarted.geometry(&id("quick-actions")), Some(arranged));
}

#[test]
fn unknown_panel_commands_fail_without_side_effects() {
    let store = MemoryPrefsStore::default();
    let mut manager = boot(&store, DESK);

    let error = manager
        .dispatch(PanelAction::ResizeToContent {
            window_id: id("spectrogram"),
            viewport: DESK,
        })
        .expect_err("unknown panel");

    assert_eq!(error.to_string(), "panel `spectrogram` is not registered");
    assert!(store.is_empty());
}
