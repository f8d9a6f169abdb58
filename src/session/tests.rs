//! Tests for the annotation session.

use std::path::Path;

use tempfile::TempDir;

use super::*;
use crate::format::FormatError;
use crate::render::Gesture;
use crate::state::{FixedSizeProbe, ImageProbeError};

fn kp(n: u32) -> KeypointId {
    KeypointId::new(n).unwrap()
}

fn px(x: f64, y: f64) -> PixelPoint {
    PixelPoint::new(x, y)
}

/// Directory with placeholder image files; the fixed-size probe never reads them.
fn image_dir(names: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in names {
        std::fs::write(dir.path().join(name), "img").unwrap();
    }
    dir
}

fn session(auto_save: bool) -> AnnotationSession {
    let mut config = AppConfig::default();
    config.preferences.auto_save = auto_save;
    AnnotationSession::new(&config, FixedSizeProbe(ImageSize::new(800, 600)))
}

fn opened(names: &[&str], auto_save: bool) -> (TempDir, AnnotationSession) {
    let dir = image_dir(names);
    let mut session = session(auto_save);
    session.open_directory(dir.path()).unwrap();
    (dir, session)
}

fn first_tokens(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .split_whitespace()
        .take(2)
        .map(str::to_string)
        .collect()
}

struct FailingProbe;

impl ImageProbe for FailingProbe {
    fn dimensions(&self, path: &Path) -> Result<ImageSize, ImageProbeError> {
        Err(ImageProbeError::new(path, "corrupt header"))
    }
}

#[test]
fn test_open_directory_loads_first_image() {
    let dir = image_dir(&["b.jpg", "a.png", "notes.txt"]);
    let mut session = session(true);

    let report = session.open_directory(dir.path()).unwrap().unwrap();

    assert_eq!(report.index, 0);
    assert_eq!(report.image, dir.path().join("a.png"));
    assert!(!report.found_annotations);
    assert!(report.is_clean());
    assert_eq!(session.image_count(), 2);
    assert_eq!(session.progress().as_deref(), Some("1/2 - a.png"));
}

#[test]
fn test_open_empty_directory_has_no_image() {
    let dir = image_dir(&[]);
    let mut session = session(true);

    assert!(session.open_directory(dir.path()).unwrap().is_none());
    assert_eq!(session.current_index(), None);
    assert!(session.progress().is_none());
    assert!(matches!(session.save(), Err(SessionError::NoImage)));
    assert!(matches!(
        session.add_at_pixel(kp(1), px(1.0, 1.0)),
        Err(SessionError::NoImage)
    ));
}

#[test]
fn test_add_at_pixel_stores_ratio() {
    let (_dir, mut session) = opened(&["face.jpg"], true);
    session.drain_render_commands();

    assert!(session.add_at_pixel(kp(1), px(400.0, 300.0)).unwrap());

    assert_eq!(session.store().get(kp(1)), Some(RatioPoint::new(0.5, 0.5)));
    assert_eq!(
        session.drain_render_commands(),
        vec![RenderCommand::Place {
            id: kp(1),
            at: px(400.0, 300.0)
        }]
    );
}

#[test]
fn test_unknown_dimensions_record_nothing() {
    let dir = image_dir(&["face.jpg"]);
    let mut session = AnnotationSession::new(&AppConfig::default(), FailingProbe);

    let report = session.open_directory(dir.path()).unwrap().unwrap();
    assert!(report.image_error.is_some());
    assert_eq!(report.warnings().len(), 1);

    let result = session.add_at_pixel(kp(3), px(10.0, 10.0));

    assert!(matches!(
        result,
        Err(SessionError::CoordinateUnavailable(_))
    ));
    assert!(session.store().is_empty());
    assert!(!session.history().can_undo());
}

#[test]
fn test_unknown_dimensions_still_load_annotations() {
    let dir = image_dir(&["face.jpg"]);
    let mut store = AnnotationStore::new();
    store.set(kp(9), RatioPoint::new(0.2, 0.4));
    AnnotationFormat::Delimited
        .codec()
        .write(&store, &dir.path().join("face.jpg"))
        .unwrap();

    let mut session = AnnotationSession::new(&AppConfig::default(), FailingProbe);
    let report = session.open_directory(dir.path()).unwrap().unwrap();

    assert_eq!(report.annotated, 1);
    assert!(session.store().contains(kp(9)));
    // No pixel positions without dimensions
    assert_eq!(session.drain_render_commands(), vec![RenderCommand::Clear]);
}

#[test]
fn test_advance_saves_current_image() {
    let (dir, mut session) = opened(&["face_001.jpg", "face_002.jpg"], true);
    session.add_at_pixel(kp(1), px(400.0, 300.0)).unwrap();

    let report = session.advance(Direction::Next).unwrap().unwrap();

    assert_eq!(report.index, 1);
    assert_eq!(session.current_index(), Some(1));
    assert!(session.store().is_empty());
    assert_eq!(
        first_tokens(&dir.path().join("face_001.txt")),
        vec!["0.500000", "0.500000"]
    );
    assert!(!dir.path().join("face_002.txt").exists());

    // Coming back restores what was saved
    session.advance(Direction::Previous).unwrap().unwrap();
    assert_eq!(session.store().get(kp(1)), Some(RatioPoint::new(0.5, 0.5)));
}

#[test]
fn test_advance_without_auto_save_discards_edits() {
    let (dir, mut session) = opened(&["face_001.jpg", "face_002.jpg"], false);
    session.add_at_pixel(kp(1), px(400.0, 300.0)).unwrap();

    session.advance(Direction::Next).unwrap();
    session.advance(Direction::Previous).unwrap();

    assert!(!dir.path().join("face_001.txt").exists());
    assert!(session.store().is_empty());
}

#[test]
fn test_advance_at_boundary_is_noop() {
    let (dir, mut session) = opened(&["face_001.jpg", "face_002.jpg"], true);
    session.add_at_pixel(kp(1), px(10.0, 10.0)).unwrap();

    assert!(session.advance(Direction::Previous).unwrap().is_none());

    assert_eq!(session.current_index(), Some(0));
    assert_eq!(session.store().len(), 1);
    assert!(!dir.path().join("face_001.txt").exists());
}

#[test]
fn test_failed_save_aborts_navigation() {
    let (dir, mut session) = opened(&["face_001.jpg", "face_002.jpg"], true);
    session.add_at_pixel(kp(7), px(80.0, 60.0)).unwrap();
    // A directory where the annotation file should go makes the write fail
    std::fs::create_dir(dir.path().join("face_001.txt")).unwrap();

    let result = session.advance(Direction::Next);

    assert!(matches!(result, Err(SessionError::Io { .. })));
    assert_eq!(session.current_index(), Some(0));
    assert_eq!(session.store().get(kp(7)), Some(RatioPoint::new(0.1, 0.1)));
    assert!(session.history().can_undo());
}

#[test]
fn test_truncated_file_loads_empty_with_warning() {
    let dir = image_dir(&["face.jpg"]);
    std::fs::write(dir.path().join("face.txt"), vec!["0.5"; 135].join(" ")).unwrap();
    let mut session = session(true);

    let report = session.open_directory(dir.path()).unwrap().unwrap();

    match &report.annotation_error {
        Some(SessionError::Format {
            source: FormatError::TokenCount { expected, actual },
            ..
        }) => assert_eq!((*expected, *actual), (136, 135)),
        other => panic!("unexpected annotation error: {other:?}"),
    }
    let warning = &report.warnings()[0];
    assert!(warning.contains("136") && warning.contains("135"));
    assert!(session.store().is_empty());
}

#[test]
fn test_format_switch_persists_before_reload() {
    let (dir, mut session) = opened(&["face.jpg"], false);
    session.add_at_pixel(kp(2), px(200.0, 150.0)).unwrap();

    let report = session
        .set_format(AnnotationFormat::Structured, || true)
        .unwrap()
        .unwrap();

    assert_eq!(session.format(), AnnotationFormat::Structured);
    assert_eq!(
        first_tokens(&dir.path().join("face.txt")),
        vec!["-1.000000", "-1.000000"]
    );
    let saved = AnnotationFormat::Delimited
        .codec()
        .read(&dir.path().join("face.jpg"))
        .unwrap()
        .unwrap();
    assert_eq!(saved.get(kp(2)), Some(RatioPoint::new(0.25, 0.25)));

    // No JSON file yet, so the reloaded store is empty
    assert!(!report.found_annotations);
    assert!(session.store().is_empty());
}

#[test]
fn test_format_switch_declined_does_not_write() {
    let (dir, mut session) = opened(&["face.jpg"], false);
    session.add_at_pixel(kp(2), px(200.0, 150.0)).unwrap();

    session.toggle_format(|| false).unwrap();

    assert_eq!(session.format(), AnnotationFormat::Structured);
    assert!(!dir.path().join("face.txt").exists());
    assert!(session.store().is_empty());
}

#[test]
fn test_format_switch_with_auto_save_skips_confirmation() {
    let (dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(2), px(200.0, 150.0)).unwrap();

    session
        .set_format(AnnotationFormat::Structured, || {
            panic!("confirmation requested with auto-save on")
        })
        .unwrap();

    assert!(dir.path().join("face.txt").exists());
}

#[test]
fn test_format_switch_to_same_format_is_noop() {
    let (dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(2), px(200.0, 150.0)).unwrap();

    assert!(
        session
            .set_format(AnnotationFormat::Delimited, || true)
            .unwrap()
            .is_none()
    );
    assert_eq!(session.store().len(), 1);
    assert!(!dir.path().join("face.txt").exists());
}

#[test]
fn test_undo_redo_never_persist() {
    let (dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(1), px(400.0, 300.0)).unwrap();
    session.move_to_pixel(kp(1), px(800.0, 600.0)).unwrap();

    assert_eq!(session.undo(), HistoryOutcome::Applied);
    assert_eq!(session.store().get(kp(1)), Some(RatioPoint::new(0.5, 0.5)));
    assert_eq!(session.undo(), HistoryOutcome::Applied);
    assert!(session.store().is_empty());
    assert_eq!(session.undo(), HistoryOutcome::NoneAvailable);

    assert_eq!(session.redo(), HistoryOutcome::Applied);
    assert_eq!(session.redo(), HistoryOutcome::Applied);
    assert_eq!(session.store().get(kp(1)), Some(RatioPoint::new(1.0, 1.0)));
    assert_eq!(session.redo(), HistoryOutcome::NoneAvailable);

    assert!(!dir.path().join("face.txt").exists());
}

#[test]
fn test_undo_redraws_everything() {
    let (_dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(1), px(400.0, 300.0)).unwrap();
    session.mutate(EditOp::Clear).unwrap();
    session.drain_render_commands();

    session.undo();

    assert_eq!(
        session.drain_render_commands(),
        vec![
            RenderCommand::Clear,
            RenderCommand::Place {
                id: kp(1),
                at: px(400.0, 300.0)
            },
        ]
    );
}

#[test]
fn test_new_edit_invalidates_redo() {
    let (_dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(1), px(10.0, 10.0)).unwrap();
    session.undo();
    assert!(session.history().can_redo());

    session.add_at_pixel(kp(2), px(20.0, 20.0)).unwrap();

    assert_eq!(session.redo(), HistoryOutcome::NoneAvailable);
}

#[test]
fn test_history_depth_from_config() {
    let dir = image_dir(&["face.jpg"]);
    let mut config = AppConfig::default();
    config.preferences.max_undo_steps = 3;
    let mut session = AnnotationSession::new(&config, FixedSizeProbe(ImageSize::new(100, 100)));
    session.open_directory(dir.path()).unwrap();

    for n in 1..=5 {
        session.add_at_pixel(kp(n), px(1.0, 1.0)).unwrap();
    }

    assert_eq!(session.history().undo_count(), 3);
    while session.undo() == HistoryOutcome::Applied {}
    // Oldest reachable state has the first two points
    assert_eq!(session.store().len(), 2);
}

#[test]
fn test_noop_edits_record_nothing() {
    let (_dir, mut session) = opened(&["face.jpg"], true);

    assert!(!session.mutate(EditOp::Delete(kp(5))).unwrap());
    assert!(!session.mutate(EditOp::Clear).unwrap());
    assert!(!session.mutate(EditOp::Swap(kp(1), kp(2))).unwrap());
    assert!(
        !session
            .mutate(EditOp::Move {
                id: kp(3),
                to: RatioPoint::new(0.5, 0.5)
            })
            .unwrap()
    );

    assert_eq!(session.history().undo_count(), 0);
}

#[test]
fn test_swap_moves_coordinates_between_ids() {
    let (_dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(1), px(200.0, 150.0)).unwrap();
    session.drain_render_commands();

    assert!(session.mutate(EditOp::Swap(kp(1), kp(2))).unwrap());

    assert!(!session.store().contains(kp(1)));
    assert_eq!(session.store().get(kp(2)), Some(RatioPoint::new(0.25, 0.25)));
    assert_eq!(
        session.drain_render_commands(),
        vec![
            RenderCommand::Remove { id: kp(1) },
            RenderCommand::Place {
                id: kp(2),
                at: px(200.0, 150.0)
            },
        ]
    );
}

#[test]
fn test_delete_clears_selection() {
    let (_dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(4), px(8.0, 6.0)).unwrap();
    session.select(kp(4));
    session.drain_render_commands();

    session.mutate(EditOp::Delete(kp(4))).unwrap();

    assert_eq!(session.selected(), None);
    assert_eq!(
        session.drain_render_commands(),
        vec![
            RenderCommand::Remove { id: kp(4) },
            RenderCommand::ClearHighlight
        ]
    );
}

#[test]
fn test_small_drag_is_a_click() {
    let (_dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(1), px(100.0, 150.0)).unwrap();

    session
        .handle_gesture(Gesture::PointerDown {
            hit: Some(kp(1)),
            at: px(100.0, 150.0),
        })
        .unwrap();
    session
        .handle_gesture(Gesture::PointerMove {
            at: px(100.5, 150.5),
        })
        .unwrap();
    session
        .handle_gesture(Gesture::PointerUp {
            at: px(101.0, 150.9),
        })
        .unwrap();

    assert_eq!(session.selected(), Some(kp(1)));
    assert_eq!(session.history().undo_count(), 1);
    assert_eq!(session.store().get(kp(1)), Some(RatioPoint::new(0.125, 0.25)));
    // Preview snapped back to the stored position
    assert_eq!(
        session.drain_render_commands().last(),
        Some(&RenderCommand::Place {
            id: kp(1),
            at: px(100.0, 150.0)
        })
    );
}

#[test]
fn test_drag_beyond_threshold_is_one_move() {
    let (_dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(1), px(100.0, 100.0)).unwrap();

    session
        .handle_gesture(Gesture::PointerDown {
            hit: Some(kp(1)),
            at: px(100.0, 100.0),
        })
        .unwrap();
    for step in 1..=10 {
        session
            .handle_gesture(Gesture::PointerMove {
                at: px(100.0 + f64::from(step) * 10.0, 100.0),
            })
            .unwrap();
    }
    assert!(session.is_dragging());
    session
        .handle_gesture(Gesture::PointerUp {
            at: px(200.0, 100.0),
        })
        .unwrap();

    assert!(!session.is_dragging());
    assert_eq!(session.store().get(kp(1)).unwrap().x, 0.25);
    // Add plus exactly one move
    assert_eq!(session.history().undo_count(), 2);
    session.undo();
    assert_eq!(session.store().get(kp(1)).unwrap().x, 0.125);
}

#[test]
fn test_pointer_down_on_unannotated_hit_deselects() {
    let (_dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(1), px(100.0, 100.0)).unwrap();
    session.select(kp(1));

    session
        .handle_gesture(Gesture::PointerDown {
            hit: None,
            at: px(5.0, 5.0),
        })
        .unwrap();

    assert_eq!(session.selected(), None);
    assert!(!session.is_dragging());
}

#[test]
fn test_pending_drag_resolved_before_auto_save() {
    let (dir, mut session) = opened(&["face_001.jpg", "face_002.jpg"], true);
    session.add_at_pixel(kp(1), px(400.0, 300.0)).unwrap();
    session
        .handle_gesture(Gesture::PointerDown {
            hit: Some(kp(1)),
            at: px(400.0, 300.0),
        })
        .unwrap();
    session
        .handle_gesture(Gesture::PointerMove {
            at: px(200.0, 150.0),
        })
        .unwrap();

    session.advance(Direction::Next).unwrap();

    assert_eq!(
        first_tokens(&dir.path().join("face_001.txt")),
        vec!["0.250000", "0.250000"]
    );
    assert!(!session.is_dragging());
    assert!(session.store().is_empty());
}

#[test]
fn test_list_click_enters_add_mode() {
    let (_dir, mut session) = opened(&["face.jpg"], true);

    session.list_clicked(kp(30));
    assert_eq!(session.adding(), Some(kp(30)));

    session
        .handle_gesture(Gesture::PointerDown {
            hit: None,
            at: px(400.0, 0.0),
        })
        .unwrap();

    assert_eq!(session.adding(), None);
    assert_eq!(session.selected(), Some(kp(30)));
    assert_eq!(session.store().get(kp(30)), Some(RatioPoint::new(0.5, 0.0)));

    // Clicking an annotated row selects instead
    session.list_clicked(kp(30));
    assert_eq!(session.adding(), None);
}

#[test]
fn test_select_highlights_reference() {
    let (dir, mut session) = opened(&["face.jpg"], true);
    let reference = dir.path().join("reference").join("standard.jpg");
    std::fs::create_dir(reference.parent().unwrap()).unwrap();
    let mut store = AnnotationStore::new();
    store.set(kp(31), RatioPoint::new(0.5, 0.5));
    AnnotationFormat::Structured
        .codec()
        .write(&store, &reference)
        .unwrap();

    session.load_reference(&reference).unwrap();
    session.add_at_pixel(kp(31), px(1.0, 1.0)).unwrap();
    session.drain_render_commands();

    session.select(kp(31));
    assert_eq!(
        session.drain_render_commands(),
        vec![
            RenderCommand::Highlight { id: kp(31) },
            RenderCommand::HighlightReference { id: kp(31) },
        ]
    );

    session.clear_reference();
    session.select(kp(31));
    assert_eq!(
        session.drain_render_commands(),
        vec![RenderCommand::Highlight { id: kp(31) }]
    );
}

#[test]
fn test_keypoint_rows() {
    let (_dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(2), px(100.0, 200.0)).unwrap();

    let rows = session.keypoint_rows();

    assert_eq!(rows.len(), 68);
    assert_eq!(rows[0].text, "1: unannotated");
    assert_eq!(rows[1].text, "2: (0.1250, 0.3333)");
    assert_eq!(rows[67].id, kp(68));
}

#[test]
fn test_close_flushes() {
    let (dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(1), px(400.0, 300.0)).unwrap();

    session.close().unwrap();

    assert!(dir.path().join("face.txt").exists());
    assert_eq!(session.current_index(), None);
    assert!(session.store().is_empty());
}

#[test]
fn test_close_without_auto_save_writes_nothing() {
    let (dir, mut session) = opened(&["face.jpg"], false);
    session.add_at_pixel(kp(1), px(400.0, 300.0)).unwrap();

    session.close().unwrap();

    assert!(!dir.path().join("face.txt").exists());
}

#[test]
fn test_load_at_out_of_range() {
    let (_dir, mut session) = opened(&["face.jpg"], true);
    assert!(matches!(
        session.load_at(3),
        Err(SessionError::IndexOutOfRange { index: 3, len: 1 })
    ));
    assert_eq!(session.current_index(), Some(0));
}

#[test]
fn test_non_finite_positions_are_rejected() {
    let (dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(1), px(100.0, 150.0)).unwrap();

    assert!(!session.add_at_pixel(kp(2), px(f64::NAN, 50.0)).unwrap());
    assert!(!session.move_to_pixel(kp(1), px(f64::INFINITY, 1.0)).unwrap());
    assert!(
        !session
            .mutate(EditOp::Add {
                id: kp(3),
                at: RatioPoint::new(0.5, f64::NAN)
            })
            .unwrap()
    );
    assert_eq!(session.history().undo_count(), 1);

    session.save().unwrap();
    let text = std::fs::read_to_string(dir.path().join("face.txt")).unwrap();
    assert!(!text.contains("NaN") && !text.contains("inf"));

    let report = session.load_at(0).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.annotated, 1);
    assert_eq!(session.store().get(kp(1)), Some(RatioPoint::new(0.125, 0.25)));
}

#[test]
fn test_new_press_resolves_unreleased_drag() {
    let (_dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(1), px(100.0, 150.0)).unwrap();
    session.add_at_pixel(kp(2), px(400.0, 300.0)).unwrap();

    session
        .handle_gesture(Gesture::PointerDown {
            hit: Some(kp(1)),
            at: px(100.0, 150.0),
        })
        .unwrap();
    session
        .handle_gesture(Gesture::PointerMove {
            at: px(200.0, 300.0),
        })
        .unwrap();
    // Release of the first drag never arrives
    session
        .handle_gesture(Gesture::PointerDown {
            hit: Some(kp(2)),
            at: px(400.0, 300.0),
        })
        .unwrap();

    assert_eq!(session.store().get(kp(1)), Some(RatioPoint::new(0.25, 0.5)));
    assert_eq!(session.selected(), Some(kp(2)));
    assert!(session.is_dragging());
}

#[test]
fn test_new_press_restores_preview_of_small_drag() {
    let (_dir, mut session) = opened(&["face.jpg"], true);
    session.add_at_pixel(kp(1), px(100.0, 150.0)).unwrap();

    session
        .handle_gesture(Gesture::PointerDown {
            hit: Some(kp(1)),
            at: px(100.0, 150.0),
        })
        .unwrap();
    session
        .handle_gesture(Gesture::PointerMove {
            at: px(100.5, 150.5),
        })
        .unwrap();
    session.drain_render_commands();
    session
        .handle_gesture(Gesture::PointerDown {
            hit: None,
            at: px(700.0, 500.0),
        })
        .unwrap();

    let commands = session.drain_render_commands();
    assert_eq!(
        commands.first(),
        Some(&RenderCommand::Place {
            id: kp(1),
            at: px(100.0, 150.0)
        })
    );
    assert_eq!(session.store().get(kp(1)), Some(RatioPoint::new(0.125, 0.25)));
    assert_eq!(session.history().undo_count(), 1);
}
