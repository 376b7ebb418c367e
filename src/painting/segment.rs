use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::{Point, Rgba, Vec2},
    math::{closest_point_on_segment, direction, normalize_or_zero},
};

/// Geometry shared by strokes and tape: a straight segment with a soft, optionally rounded edge.
///
/// Positions, `width` and `edge_feather` are painting-space pixels. `edge_roundness` selects the
/// cap shape: `0` is a flat (butt) cap, `1` a round cap, values in between blend the two.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    /// Straight-alpha color.
    pub color: Rgba,
    /// Where the drag began, in painting pixels.
    pub start: Point,
    /// Current or final drag point, in painting pixels.
    pub end: Point,
    /// Full width in painting pixels.
    pub width: f64,
    /// Edge softness in painting pixels.
    pub edge_feather: f64,
    /// Cap shape: 0 flat, 1 round.
    pub edge_roundness: f64,
}

impl LineSegment {
    /// Edge softness of [`LineSegment::new`].
    pub const DEFAULT_EDGE_FEATHER: f64 = 3.0;
    /// Cap shape of [`LineSegment::new`]: round.
    pub const DEFAULT_EDGE_ROUNDNESS: f64 = 1.0;

    /// A zero-length segment at `start` with default feather and round caps.
    pub fn new(color: Rgba, start: Point, width: f64) -> Self {
        Self {
            color,
            start,
            end: start,
            width,
            edge_feather: Self::DEFAULT_EDGE_FEATHER,
            edge_roundness: Self::DEFAULT_EDGE_ROUNDNESS,
        }
    }

    /// Set the end point.
    pub fn with_end(mut self, end: Point) -> Self {
        self.end = end;
        self
    }

    /// Set the edge softness.
    pub fn with_edge_feather(mut self, feather: f64) -> Self {
        self.edge_feather = feather;
        self
    }

    /// Set the cap shape.
    pub fn with_edge_roundness(mut self, roundness: f64) -> Self {
        self.edge_roundness = roundness;
        self
    }

    /// `normalize(end - start)`, zero for a degenerate segment.
    pub fn direction(&self) -> Vec2 {
        direction(self.start, self.end)
    }

    /// Distance from start to end.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// Capsule hit test used for picking.
    ///
    /// The segment is extended by `leniency` at both ends and its radius grows by the same
    /// amount. A point whose closest point is one of the extended endpoints must lie on the
    /// inner side of that endpoint, so points past the ends are rejected. Returns the squared
    /// distance to the (extended) axis on a hit.
    pub fn hit_test(&self, p: Point, leniency: f64) -> Option<f64> {
        let radius = self.width * 0.5 + leniency;
        let dir = self.direction();
        let extend = dir * leniency;
        let a = self.start - extend;
        let b = self.end + extend;

        let closest = closest_point_on_segment(p, a, b);
        let dist_sq = (closest - p).hypot2();
        if dist_sq > radius * radius {
            return None;
        }

        let to_p = normalize_or_zero(p - closest);
        if closest == a && dir.dot(to_p) < 0.0 {
            return None;
        }
        if closest == b && (-dir).dot(to_p) < 0.0 {
            return None;
        }
        Some(dist_sq)
    }

    /// Whether `p` lies on this segment's footprint for picking purposes.
    pub fn contains(&self, p: Point, leniency: f64) -> bool {
        self.hit_test(p, leniency).is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/painting/segment.rs"]
mod tests;
