use super::*;
use crate::foundation::core::{Point, Rgba};

fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> LineSegment {
    LineSegment::new(Rgba::opaque(1.0, 0.0, 0.0), Point::new(x0, y0), 10.0)
        .with_end(Point::new(x1, y1))
}

fn commit(p: &mut Painting, s: LineSegment, is_tape: bool) {
    assert!(p.begin_line(s, is_tape));
    p.end_line().unwrap();
}

#[test]
fn stroke_record_is_normalized_by_painting_size() {
    let mut p = Painting::new(Size::new(200, 100));
    commit(&mut p, seg(50.0, 25.0, 100.0, 75.0), false);

    let mut scene = PackedScene::new();
    scene.upload(&p);
    let r = scene.strokes()[0];
    assert_eq!(r.start_uv, [0.25, 0.25]);
    assert_eq!(r.end_uv, [0.5, 0.75]);
    assert_eq!(r.color, [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(r.width_px, 10.0);
    assert_eq!(r.feather_px, 3.0);
    assert_eq!(r.round_caps, 1.0);
    assert_eq!(scene.painting_size(), Size::new(200, 100));
}

#[test]
fn tape_record_carries_history_fields() {
    let mut p = Painting::new(Size::new(100, 100));
    commit(&mut p, seg(1.0, 1.0, 9.0, 9.0), false);
    commit(&mut p, seg(1.0, 5.0, 90.0, 5.0), true);
    commit(&mut p, seg(1.0, 1.0, 9.0, 1.0), false);
    assert!(p.try_remove_tape(0));

    let mut scene = PackedScene::new();
    scene.upload(&p);
    let t = scene.tapes()[0];
    assert_eq!(t.start_stroke_index, 1);
    assert_eq!(t.affected_stroke_count, 1);
    assert!(t.finished);
    assert!(!t.masks(0));
    assert!(t.masks(1));
    assert!(!t.masks(2));
}

#[test]
fn unfinished_tape_masks_nothing() {
    let record = TapeRecord {
        start_stroke_index: 0,
        affected_stroke_count: 10,
        finished: false,
        ..TapeRecord::default()
    };
    assert!(!record.masks(3));
}

#[test]
fn active_segment_is_appended_after_committed_entries() {
    let mut p = Painting::new(Size::new(100, 100));
    commit(&mut p, seg(1.0, 1.0, 9.0, 9.0), false);
    assert!(p.begin_line(seg(5.0, 5.0, 5.0, 5.0), false));
    p.update_line(Point::new(50.0, 50.0));

    let mut scene = PackedScene::new();
    scene.upload(&p);
    assert_eq!(scene.rendered_stroke_count(), 1);
    assert_eq!(scene.strokes().len(), 2);
    assert!(scene.has_active_stroke());
    assert!(!scene.has_active_tape());
    assert_eq!(scene.strokes()[1].end_uv, [0.5, 0.5]);

    p.end_line().unwrap();
    assert!(p.begin_line(seg(5.0, 5.0, 60.0, 5.0), true));
    scene.upload(&p);
    assert_eq!(scene.rendered_stroke_count(), 2);
    assert!(!scene.has_active_stroke());
    assert!(scene.has_active_tape());
    let active = scene.tapes()[0];
    assert!(!active.finished);
    assert_eq!(active.start_stroke_index, 2);
}

#[test]
fn capacity_is_clamped_and_observable() {
    let mut p = Painting::new(Size::new(64, 64));
    for _ in 0..300 {
        commit(&mut p, seg(1.0, 1.0, 2.0, 2.0), false);
    }
    for _ in 0..130 {
        commit(&mut p, seg(1.0, 1.0, 2.0, 2.0), true);
    }
    assert!(p.begin_line(seg(3.0, 3.0, 3.0, 3.0), false));

    let mut scene = PackedScene::new();
    scene.upload(&p);
    assert_eq!(scene.source_stroke_count(), 300);
    assert_eq!(scene.rendered_stroke_count(), MAX_STROKES);
    assert_eq!(scene.source_tape_count(), 130);
    assert_eq!(scene.rendered_tape_count(), MAX_TAPES);
    // The preview would land past capacity, so it is not drawn either.
    assert!(!scene.has_active_stroke());
    assert_eq!(scene.strokes().len(), MAX_STROKES);
}

#[test]
fn upload_reuses_buffers_and_clear_empties() {
    let mut p = Painting::new(Size::new(100, 100));
    commit(&mut p, seg(1.0, 1.0, 9.0, 9.0), false);
    let mut scene = PackedScene::new();
    scene.upload(&p);
    let cap = scene.strokes.capacity();
    assert!(cap > MAX_STROKES);

    p.clear();
    scene.upload(&p);
    assert!(scene.is_empty());
    assert_eq!(scene.strokes.capacity(), cap);

    scene.clear();
    assert_eq!(scene.painting_size(), Size::new(0, 0));
}

#[test]
fn target_scale_maps_target_pixels_to_painting_pixels() {
    let mut p = Painting::new(Size::new(200, 100));
    commit(&mut p, seg(1.0, 1.0, 9.0, 9.0), false);
    let mut scene = PackedScene::new();
    scene.upload(&p);
    assert_eq!(
        scene.target_to_painting(Size::new(100, 100)),
        Vec2::new(2.0, 1.0)
    );
    assert_eq!(scene.target_to_painting(Size::new(0, 10)), Vec2::ZERO);
}
