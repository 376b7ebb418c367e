use super::*;
use serde_json::json;

#[test]
fn size_contains_is_half_open() {
    let s = Size::new(10, 5);
    assert!(s.contains(Point::new(0.0, 0.0)));
    assert!(s.contains(Point::new(9.99, 4.99)));
    assert!(!s.contains(Point::new(10.0, 2.0)));
    assert!(!s.contains(Point::new(2.0, 5.0)));
    assert!(!s.contains(Point::new(-0.01, 2.0)));
}

#[test]
fn size_non_empty_rejects_zero_area() {
    assert!(Size::non_empty(0, 4).is_err());
    assert!(Size::non_empty(4, 0).is_err());
    assert_eq!(Size::non_empty(4, 3).unwrap().pixel_count(), 12);
}

#[test]
fn size_max_is_element_wise() {
    let a = Size::new(100, 20);
    let b = Size::new(40, 80);
    assert_eq!(a.max(b), Size::new(100, 80));
}

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Rgba = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Rgba::new(1.0, 0.0, 0.0, 1.0));

    let c: Rgba = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert!((c.b - 1.0).abs() < 1e-6);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-6);

    assert!(serde_json::from_value::<Rgba>(json!("#12345")).is_err());
}

#[test]
fn parses_object_and_array() {
    let c: Rgba = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, Rgba::new(0.25, 0.5, 0.75, 1.0));

    let c: Rgba = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.5])).unwrap();
    assert_eq!(c, Rgba::new(0.25, 0.5, 0.75, 0.5));

    assert!(serde_json::from_value::<Rgba>(json!([0.1, 0.2])).is_err());
}

#[test]
fn premul_and_rgba8_conversion() {
    let c = Rgba::new(1.0, 0.5, 0.0, 0.5);
    assert_eq!(c.to_premul(), [0.5, 0.25, 0.0, 0.5]);
    assert_eq!(Rgba::opaque(1.0, 0.0, 0.0).to_rgba8(), [255, 0, 0, 255]);
    assert_eq!(Rgba::new(2.0, -1.0, 0.5, 1.0).to_rgba8(), [255, 0, 128, 255]);
}
