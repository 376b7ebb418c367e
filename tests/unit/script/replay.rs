use super::*;

fn script(json: &str) -> Script {
    Script::from_reader(json.as_bytes()).unwrap()
}

#[test]
fn drag_ops_commit_one_stroke_with_brush_defaults() {
    let s = script(
        r#"{"size": [100, 50], "ops": [
            {"begin": {"at": [10, 10]}},
            {"update": {"to": [20, 10]}},
            {"update": {"to": [40, 30]}},
            "end"
        ]}"#,
    );
    let (p, report) = s.replay(&PaintMaskConfig::default()).unwrap();
    assert_eq!(report, ReplayReport { applied: 4, rejected: 0 });
    assert_eq!(p.size(), Size::new(100, 50));
    assert_eq!(p.stroke_count(), 1);
    let seg = p.stroke_segment(0).unwrap();
    assert_eq!(seg.end, Point::new(40.0, 30.0));
    assert_eq!(seg.width, 50.0);
    assert_eq!(seg.color, Rgba::BLACK);
}

#[test]
fn line_op_overrides_pen_fields() {
    let s = script(
        r##"{"ops": [
            {"line": {"at": [1, 1], "to": [5, 5], "tape": true, "color": "#00ff00",
                      "width": 7, "feather": 0, "roundness": 0}}
        ]}"##,
    );
    let (p, _) = s.replay(&PaintMaskConfig::default()).unwrap();
    assert_eq!(p.size(), Size::new(1200, 720));
    assert_eq!(p.tape_count(), 1);
    let seg = p.tape_segment(0).unwrap();
    assert_eq!(seg.color, Rgba::opaque(0.0, 1.0, 0.0));
    assert_eq!(seg.width, 7.0);
    assert_eq!(seg.edge_feather, 0.0);
    assert_eq!(seg.edge_roundness, 0.0);
}

#[test]
fn rejected_ops_are_counted_and_skipped() {
    let s = script(
        r#"{"size": [64, 64], "ops": [
            "end",
            {"update": {"to": [1, 1]}},
            {"begin": {"at": [500, 5]}},
            {"line": {"at": [2, 2], "to": [60, 2], "tape": true}},
            {"remove_tape": {"index": 0}},
            {"remove_tape": {"index": 0}},
            {"remove_tape": {"index": 9}}
        ]}"#,
    );
    let (p, report) = s.replay(&PaintMaskConfig::default()).unwrap();
    assert_eq!(report, ReplayReport { applied: 2, rejected: 5 });
    assert_eq!(p.active_tape_count(), 1);
}

#[test]
fn remove_tape_at_picks_the_tape_under_the_point() {
    let s = script(
        r#"{"size": [100, 100], "ops": [
            {"line": {"at": [10, 10], "to": [90, 10], "tape": true}},
            {"line": {"at": [10, 80], "to": [90, 80], "tape": true}},
            {"remove_tape_at": {"at": [50, 81]}},
            {"remove_tape_at": {"at": [50, 50], "leniency": 2}}
        ]}"#,
    );
    let (p, report) = s.replay(&PaintMaskConfig::default()).unwrap();
    assert_eq!(report.rejected, 1);
    assert!(!p.tape(0).unwrap().is_finished);
    assert!(p.tape(1).unwrap().is_finished);
}

#[test]
fn clear_keeps_size() {
    let s = script(
        r#"{"size": [30, 20], "ops": [
            {"line": {"at": [1, 1], "to": [9, 9]}},
            "clear"
        ]}"#,
    );
    let (p, report) = s.replay(&PaintMaskConfig::default()).unwrap();
    assert_eq!(report.applied, 2);
    assert!(p.is_empty());
    assert_eq!(p.size(), Size::new(30, 20));
}

#[test]
fn malformed_scripts_fail_to_parse() {
    assert!(Script::from_reader(r#"{"ops": [{"paint": {}}]}"#.as_bytes()).is_err());
    assert!(Script::from_reader(r#"{"ops": [], "extra": 1}"#.as_bytes()).is_err());
    let zero = script(r#"{"size": [0, 10]}"#);
    assert!(zero.replay(&PaintMaskConfig::default()).is_err());
}

#[test]
fn missing_script_is_an_io_error() {
    let err = Script::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, PaintMaskError::Other(_)), "{err}");
    assert!(err.to_string().contains("open script JSON"));
}
