use crate::foundation::core::{Point, Size, Vec2};

/// Segments shorter than this are treated as a single point.
pub(crate) const DEGENERATE_LEN: f64 = 1e-6;

/// Closest point to `p` on the segment `a..b`.
pub(crate) fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq < DEGENERATE_LEN * DEGENERATE_LEN {
        return a;
    }
    let t = (p - a).dot(ab) / len_sq;
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        a + ab * t
    }
}

/// Unit direction of `a..b`, or zero for a degenerate segment.
pub(crate) fn direction(a: Point, b: Point) -> Vec2 {
    let ab = b - a;
    let len = ab.hypot();
    if len < DEGENERATE_LEN {
        Vec2::ZERO
    } else {
        ab / len
    }
}

/// Unit vector of `v`, or zero when `v` is (near) zero.
pub(crate) fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len < DEGENERATE_LEN { Vec2::ZERO } else { v / len }
}

/// Painting-space point to `[0,1]` UV space. Empty sizes map everything to the origin.
pub(crate) fn to_uv(p: Point, size: Size) -> [f32; 2] {
    if size.is_empty() {
        return [0.0, 0.0];
    }
    [
        (p.x / f64::from(size.width)) as f32,
        (p.y / f64::from(size.height)) as f32,
    ]
}

pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
