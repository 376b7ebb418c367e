use super::*;
use crate::similarity::metric::ErrorMetric;

#[test]
fn empty_object_yields_defaults() {
    let cfg = PaintMaskConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, PaintMaskConfig::default());
    assert_eq!(cfg.painting.size(), Size::new(1200, 720));
    assert_eq!(cfg.brush.width(false), 50.0);
    assert_eq!(cfg.brush.width(true), 10.0);
    assert_eq!(cfg.compositor.background, Rgba::TRANSPARENT);
}

#[test]
fn sections_parse_and_partially_override() {
    let json = r##"{
        "painting": { "width": 320 },
        "brush": { "paint_color": "#ff0000", "tape_color": [0, 0, 1] },
        "compositor": { "background": { "r": 1, "g": 1, "b": 1 }, "parallel": false },
        "compare": { "metric": "channels", "ignore_alpha": false },
        "scoring": { "min_points_to_win": 50 }
    }"##;
    let cfg = PaintMaskConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.painting.size(), Size::new(320, 720));
    assert_eq!(cfg.brush.color(false), Rgba::opaque(1.0, 0.0, 0.0));
    assert_eq!(cfg.brush.color(true), Rgba::opaque(0.0, 0.0, 1.0));
    assert_eq!(cfg.compositor.background, Rgba::WHITE);
    assert!(!cfg.compositor.parallel);
    assert_eq!(cfg.compare.metric, ErrorMetric::Channels);
    assert!(!cfg.compare.ignore_alpha);
    assert_eq!(cfg.scoring.min_points_to_win, 50.0);
    assert_eq!(cfg.scoring.max_tape_points, 20.0);
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let err = PaintMaskConfig::from_reader(r#"{"paintings": {}}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, PaintMaskError::Config(_)));
}

#[test]
fn invalid_values_fail_validation() {
    for json in [
        r#"{"painting": {"width": 0}}"#,
        r#"{"brush": {"paint_width": -1}}"#,
        r#"{"brush": {"edge_roundness": 2}}"#,
        r#"{"compositor": {"tape_overlay_opacity": 3}}"#,
        r#"{"scoring": {"max_tape_points": -5}}"#,
    ] {
        let err = PaintMaskConfig::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, PaintMaskError::Config(_)), "{json}: {err}");
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = PaintMaskConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, PaintMaskError::Other(_)), "{err}");
    assert!(err.to_string().contains("open config JSON"));
}

#[test]
fn non_finite_backdrop_is_rejected() {
    let mut cfg = PaintMaskConfig::default();
    cfg.compare.backdrop = Rgba::new(f32::NAN, 1.0, 1.0, 1.0);
    assert!(matches!(cfg.validate(), Err(PaintMaskError::Config(_))));
}
