use crate::foundation::math::lerp;

/// Segment geometry in painting pixels, prepared once per composition pass.
///
/// Coverage comes from a signed distance (negative inside): perpendicular distance minus
/// half-width along the body, with the end caps interpolated between a butt cap and a round
/// cap by `roundness`. For paint, `feather` is the total width of a linear ramp centred on the
/// edge; for a peeled tape it is a ramp that starts at the edge and runs outward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Footprint {
    start: [f32; 2],
    dir: [f32; 2],
    len: f32,
    half_width: f32,
    feather: f32,
    roundness: f32,
    min: [f32; 2],
    max: [f32; 2],
}

const DEGENERATE_LEN: f32 = 1e-4;

impl Footprint {
    pub(crate) fn new(
        start: [f32; 2],
        end: [f32; 2],
        width: f32,
        feather: f32,
        roundness: f32,
    ) -> Self {
        let dx = end[0] - start[0];
        let dy = end[1] - start[1];
        let len = (dx * dx + dy * dy).sqrt();
        let dir = if len < DEGENERATE_LEN {
            [0.0, 0.0]
        } else {
            [dx / len, dy / len]
        };
        let half_width = (width * 0.5).max(0.0);
        let feather = feather.max(0.0);
        let reach = half_width + feather + 1.0;
        Self {
            start,
            dir,
            len: if len < DEGENERATE_LEN { 0.0 } else { len },
            half_width,
            feather,
            roundness: roundness.clamp(0.0, 1.0),
            min: [start[0].min(end[0]) - reach, start[1].min(end[1]) - reach],
            max: [start[0].max(end[0]) + reach, start[1].max(end[1]) + reach],
        }
    }

    /// Conservative bounding-box rejection.
    #[inline]
    pub(crate) fn may_cover(&self, p: [f32; 2]) -> bool {
        p[0] >= self.min[0] && p[0] <= self.max[0] && p[1] >= self.min[1] && p[1] <= self.max[1]
    }

    pub(crate) fn signed_distance(&self, p: [f32; 2]) -> f32 {
        let ax = p[0] - self.start[0];
        let ay = p[1] - self.start[1];
        if self.len == 0.0 {
            return (ax * ax + ay * ay).sqrt() - self.half_width;
        }

        let along = ax * self.dir[0] + ay * self.dir[1];
        let perp = (ax * self.dir[1] - ay * self.dir[0]).abs();
        let overshoot = (-along).max(along - self.len);

        let body = perp - self.half_width;
        let flat = body.max(overshoot);
        let round = if overshoot > 0.0 {
            (overshoot * overshoot + perp * perp).sqrt() - self.half_width
        } else {
            body
        };
        lerp(flat, round, self.roundness)
    }

    /// Antialiased coverage in `[0,1]`.
    #[inline]
    pub(crate) fn coverage(&self, p: [f32; 2]) -> f32 {
        if !self.may_cover(p) {
            return 0.0;
        }
        let d = self.signed_distance(p);
        if self.feather <= 0.0 {
            return if d <= 0.0 { 1.0 } else { 0.0 };
        }
        (0.5 - d / self.feather).clamp(0.0, 1.0)
    }

    /// How strongly a peeled tape lifts paint at `p`: 1 anywhere inside the footprint, then
    /// falling to 0 across `feather` outside it.
    #[inline]
    pub(crate) fn suppression(&self, p: [f32; 2]) -> f32 {
        if !self.may_cover(p) {
            return 0.0;
        }
        let d = self.signed_distance(p);
        if d <= 0.0 {
            return 1.0;
        }
        if self.feather <= 0.0 {
            return 0.0;
        }
        (1.0 - d / self.feather).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/footprint.rs"]
mod tests;
