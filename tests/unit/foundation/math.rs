use super::*;

#[test]
fn closest_point_clamps_to_endpoints() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(10.0, 0.0);
    assert_eq!(closest_point_on_segment(Point::new(-5.0, 3.0), a, b), a);
    assert_eq!(closest_point_on_segment(Point::new(15.0, 3.0), a, b), b);
    assert_eq!(
        closest_point_on_segment(Point::new(4.0, 3.0), a, b),
        Point::new(4.0, 0.0)
    );
}

#[test]
fn closest_point_on_degenerate_segment_is_start() {
    let a = Point::new(3.0, 3.0);
    assert_eq!(closest_point_on_segment(Point::new(9.0, 1.0), a, a), a);
}

#[test]
fn direction_is_unit_or_zero() {
    let d = direction(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
    assert!((d.hypot() - 1.0).abs() < 1e-12);
    assert_eq!(direction(Point::new(1.0, 1.0), Point::new(1.0, 1.0)), Vec2::ZERO);
}

#[test]
fn to_uv_normalizes_by_size() {
    let uv = to_uv(Point::new(50.0, 25.0), Size::new(100, 100));
    assert_eq!(uv, [0.5, 0.25]);
    assert_eq!(to_uv(Point::new(50.0, 25.0), Size::new(0, 100)), [0.0, 0.0]);
}
