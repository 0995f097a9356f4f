//! End-to-end whiteboard session behaviour.

use inkboard_core::{
    Bounds, ElementKind, ElementPatch, HistoryMode, StrokeOptions, Whiteboard, WhiteboardConfig, WhiteboardError,
};
use kurbo::{Point, Vec2};
use serde_json::json;

const EPS: f64 = 1e-9;

fn board_with_depth(depth: usize) -> Whiteboard {
    let mut config = WhiteboardConfig::default();
    config.set_max_history_depth(depth).unwrap();
    Whiteboard::with_config(config).unwrap()
}

#[test]
fn undo_twice_restores_empty_board() {
    let mut board = Whiteboard::new();
    let a = board.insert_element(ElementKind::Rectangle, &ElementPatch::new()).unwrap();
    board
        .update_element(&a, &ElementPatch::new().with_position(40.0, 40.0), HistoryMode::Record);

    assert!(board.undo());
    assert!((board.element(&a).unwrap().x).abs() < EPS);
    assert!(board.undo());
    assert!(board.elements().is_empty());
    assert!(!board.undo());
    assert!(!board.can_undo());
}

#[test]
fn history_depth_evicts_oldest_state() {
    let mut board = board_with_depth(3);
    let id = board.insert_element(ElementKind::Rectangle, &ElementPatch::new()).unwrap();
    for x in 1..=4 {
        board.update_element(&id, &ElementPatch::new().with_position(x as f64, 0.0), HistoryMode::Record);
    }
    assert_eq!(board.history().len(), 3);

    let mut undone = 0;
    while board.undo() {
        undone += 1;
    }
    assert_eq!(undone, 3);
    // The floor is the newest evicted state, not the empty board
    assert!((board.element(&id).unwrap().x - 1.0).abs() < EPS);
}

#[test]
fn new_change_discards_redo() {
    let mut board = Whiteboard::new();
    let id = board.insert_element(ElementKind::Ellipse, &ElementPatch::new()).unwrap();
    board.update_element(&id, &ElementPatch::new().with_opacity(0.5), HistoryMode::Record);
    assert!(board.undo());
    assert!(board.can_redo());

    board.update_element(&id, &ElementPatch::new().with_rotation(30.0), HistoryMode::Record);
    assert!(!board.can_redo());
    assert!(!board.redo());
    let element = board.element(&id).unwrap();
    assert!((element.opacity - 1.0).abs() < EPS);
    assert!((element.rotation - 30.0).abs() < EPS);
}

#[test]
fn export_import_round_trip() {
    let mut source = Whiteboard::new();
    source
        .insert_element(ElementKind::Text, &ElementPatch::new().with_position(5.0, 5.0).with_text("hello"))
        .unwrap();
    source
        .insert_element(ElementKind::Arrow, &ElementPatch::new().with_endpoints(0.0, 0.0, 30.0, 40.0))
        .unwrap();
    source.pan(Vec2::new(12.0, -8.0));
    let json = source.export_json().unwrap();

    let mut target = Whiteboard::new();
    target.import_json(&json).unwrap();
    assert_eq!(target.elements(), source.elements());
    assert_eq!(target.viewport(), source.viewport());
    assert!(!target.can_undo());
    assert!(target.selected_ids().is_empty());
}

#[test]
fn rejected_import_changes_nothing() {
    let mut board = Whiteboard::new();
    let id = board.insert_element(ElementKind::Line, &ElementPatch::new()).unwrap();
    board.select(&[&id], false);
    let before = board.export_data();

    let payloads = [
        json!({"version": "1.0.0"}),
        json!({"elements": "nope"}),
        json!({"elements": [{"id": "x", "type": "star", "x": 0, "y": 0}]}),
        json!({"elements": [], "canvas": {"width": -10}}),
    ];
    for payload in payloads {
        assert!(board.import_data(payload).is_err());
    }

    let err = board.import_data(json!({"elements": {}})).unwrap_err();
    assert!(matches!(err, WhiteboardError::InvalidData(_)));
    assert_eq!(err.to_string(), "Invalid data format");

    assert_eq!(board.elements(), before.elements.as_slice());
    assert_eq!(board.selected_ids(), vec![id]);
    assert_eq!(board.history().len(), 1);
    assert_eq!(board.config().canvas, before.canvas);
}

#[test]
fn import_applies_present_sections_only() {
    let mut board = Whiteboard::new();
    board
        .import_data(json!({
            "elements": [{"id": "r1", "type": "rectangle", "x": 10, "y": 10, "width": 20, "height": 20, "opacity": 40}],
            "grid": {"enabled": true, "size": 10}
        }))
        .unwrap();

    let element = board.element("r1").unwrap();
    assert!((element.opacity - 0.4).abs() < EPS);
    assert!(board.config().grid_enabled());
    assert!((board.config().grid_size() - 10.0).abs() < EPS);
    assert_eq!(board.config().canvas, WhiteboardConfig::default().canvas);
}

#[test]
fn deferred_drag_is_one_undo_step() {
    let mut board = Whiteboard::new();
    let id = board.insert_element(ElementKind::Rectangle, &ElementPatch::new()).unwrap();
    for _ in 0..10 {
        board.move_elements(&[&id], Vec2::new(3.0, 4.0), HistoryMode::Deferred);
    }
    assert!(board.has_pending_snapshot());
    assert!(board.commit());
    assert_eq!(board.history().len(), 2);

    let moved = board.element(&id).unwrap();
    assert!((moved.x - 30.0).abs() < EPS);
    assert!((moved.y - 40.0).abs() < EPS);

    assert!(board.undo());
    assert!((board.element(&id).unwrap().x).abs() < EPS);
}

#[test]
fn selection_never_reports_removed_elements() {
    let mut board = Whiteboard::new();
    let a = board.insert_element(ElementKind::Rectangle, &ElementPatch::new()).unwrap();
    let b = board
        .insert_element(ElementKind::Rectangle, &ElementPatch::new().with_position(300.0, 0.0))
        .unwrap();
    assert!(board.select_all());
    assert_eq!(board.selected_ids(), vec![a.clone(), b.clone()]);

    board.remove_elements(&[&a]);
    assert_eq!(board.selected_ids(), vec![b.clone()]);
    assert!(!board.is_selected(&a));

    board.remove_selected();
    assert!(board.selected_ids().is_empty());
    assert!(board.elements().is_empty());
}

#[test]
fn lasso_selects_intersecting_elements() {
    let mut board = Whiteboard::new();
    let near = board
        .insert_element(ElementKind::Ellipse, &ElementPatch::new().with_position(0.0, 0.0))
        .unwrap();
    board
        .insert_element(ElementKind::Ellipse, &ElementPatch::new().with_position(1000.0, 1000.0))
        .unwrap();
    let selected = board.select_in_bounds(&Bounds::new(50.0, 50.0, 60.0, 60.0), false);
    assert_eq!(selected, vec![near]);
}

#[test]
fn draw_then_erase_stroke() {
    let mut board = Whiteboard::new();
    let samples: Vec<[f64; 2]> = (0..40).map(|i| [i as f64 * 4.0, 100.0]).collect();
    let options = StrokeOptions {
        simulate_pressure: true,
        ..StrokeOptions::default()
    };
    let id = board.draw_stroke(&samples, &options).unwrap().unwrap();
    assert_eq!(board.element(&id).unwrap().kind(), ElementKind::Pen);
    assert_eq!(board.history().len(), 1);

    let miss = board.erase_along(Point::new(0.0, 300.0), Point::new(150.0, 300.0), HistoryMode::Record);
    assert!(miss.is_empty());

    let erased = board.erase_along(Point::new(60.0, 102.0), Point::new(60.0, 200.0), HistoryMode::Record);
    assert_eq!(erased, vec![id]);
    assert!(board.elements().is_empty());
    assert!(board.undo());
    assert_eq!(board.elements().len(), 1);
}

#[test]
fn duplicate_ids_rejected_on_add() {
    let mut board = Whiteboard::new();
    let element = board.create_element(ElementKind::Image, &ElementPatch::new().with_src("cat.png"));
    board.add_elements(vec![element.clone()]).unwrap();
    assert!(matches!(
        board.add_elements(vec![element]),
        Err(WhiteboardError::DuplicateId(_))
    ));
    assert_eq!(board.elements().len(), 1);
    assert_eq!(board.history().len(), 1);
}
