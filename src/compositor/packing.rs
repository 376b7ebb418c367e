use crate::{
    compositor::footprint::Footprint,
    foundation::{
        core::{Size, Vec2},
        math::to_uv,
    },
    painting::{history::Painting, segment::LineSegment},
};

/// Maximum number of committed strokes a compositor draws. Later strokes are ignored.
pub const MAX_STROKES: usize = 256;
/// Maximum number of committed tapes a compositor evaluates. Later tapes are ignored.
pub const MAX_TAPES: usize = 128;

/// Packed stroke. Field order: `start_uv`, `end_uv`, `color` (straight RGBA), `width_px`,
/// `feather_px`, `round_caps`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct StrokeRecord {
    /// Start point, normalized by the painting size.
    pub start_uv: [f32; 2],
    /// End point, normalized by the painting size.
    pub end_uv: [f32; 2],
    /// Straight-alpha RGBA.
    pub color: [f32; 4],
    /// Full width in painting pixels.
    pub width_px: f32,
    /// Edge softness in painting pixels.
    pub feather_px: f32,
    /// 0 for flat caps, 1 for round caps.
    pub round_caps: f32,
}

/// Packed tape. Field order: `start_uv`, `end_uv`, `color` (straight RGBA), `width_px`,
/// `feather_px`, `round_caps`, `start_stroke_index`, `affected_stroke_count`, `finished`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct TapeRecord {
    /// Start point, normalized by the painting size.
    pub start_uv: [f32; 2],
    /// End point, normalized by the painting size.
    pub end_uv: [f32; 2],
    /// Straight-alpha RGBA.
    pub color: [f32; 4],
    /// Full width in painting pixels.
    pub width_px: f32,
    /// Edge softness in painting pixels.
    pub feather_px: f32,
    /// 0 for flat caps, 1 for round caps.
    pub round_caps: f32,
    /// Strokes committed before the tape went down.
    pub start_stroke_index: u32,
    /// Strokes lifted when the tape came off. Only meaningful once `finished`.
    pub affected_stroke_count: u32,
    /// Whether the tape has been removed.
    pub finished: bool,
}

impl StrokeRecord {
    fn pack(segment: &LineSegment, size: Size) -> Self {
        Self {
            start_uv: to_uv(segment.start, size),
            end_uv: to_uv(segment.end, size),
            color: segment.color.to_array(),
            width_px: segment.width as f32,
            feather_px: segment.edge_feather as f32,
            round_caps: segment.edge_roundness as f32,
        }
    }

    pub(crate) fn footprint(&self, size: Size) -> Footprint {
        Footprint::new(
            uv_to_px(self.start_uv, size),
            uv_to_px(self.end_uv, size),
            self.width_px,
            self.feather_px,
            self.round_caps,
        )
    }
}

impl TapeRecord {
    fn pack(segment: &LineSegment, size: Size) -> Self {
        Self {
            start_uv: to_uv(segment.start, size),
            end_uv: to_uv(segment.end, size),
            color: segment.color.to_array(),
            width_px: segment.width as f32,
            feather_px: segment.edge_feather as f32,
            round_caps: segment.edge_roundness as f32,
            start_stroke_index: 0,
            affected_stroke_count: 0,
            finished: false,
        }
    }

    /// Whether stroke `stroke_index` is lifted by this tape.
    #[inline]
    pub fn masks(&self, stroke_index: u32) -> bool {
        self.finished
            && stroke_index >= self.start_stroke_index
            && stroke_index - self.start_stroke_index < self.affected_stroke_count
    }

    pub(crate) fn footprint(&self, size: Size) -> Footprint {
        Footprint::new(
            uv_to_px(self.start_uv, size),
            uv_to_px(self.end_uv, size),
            self.width_px,
            self.feather_px,
            self.round_caps,
        )
    }
}

fn uv_to_px(uv: [f32; 2], size: Size) -> [f32; 2] {
    [uv[0] * size.width as f32, uv[1] * size.height as f32]
}

fn index_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

/// Fixed-capacity snapshot of a painting, ready for the composition pass.
///
/// Buffers are allocated once for `MAX_STROKES + 1` strokes and `MAX_TAPES + 1` tapes (the
/// extra slot holds the active segment) and are reused by every upload.
#[derive(Clone, Debug)]
pub struct PackedScene {
    painting_size: Size,
    strokes: Vec<StrokeRecord>,
    tapes: Vec<TapeRecord>,
    committed_strokes: usize,
    committed_tapes: usize,
    source_strokes: usize,
    source_tapes: usize,
}

impl Default for PackedScene {
    fn default() -> Self {
        Self::new()
    }
}

impl PackedScene {
    /// Empty scene with buffers reserved at full capacity.
    pub fn new() -> Self {
        Self {
            painting_size: Size::new(0, 0),
            strokes: Vec::with_capacity(MAX_STROKES + 1),
            tapes: Vec::with_capacity(MAX_TAPES + 1),
            committed_strokes: 0,
            committed_tapes: 0,
            source_strokes: 0,
            source_tapes: 0,
        }
    }

    /// Drop all records, keeping the allocations.
    pub fn clear(&mut self) {
        self.painting_size = Size::new(0, 0);
        self.strokes.clear();
        self.tapes.clear();
        self.committed_strokes = 0;
        self.committed_tapes = 0;
        self.source_strokes = 0;
        self.source_tapes = 0;
    }

    /// Re-pack `painting` into the buffers.
    ///
    /// Committed entries beyond capacity are dropped. The active segment is appended after
    /// the committed entries when its would-be index is within capacity.
    pub fn upload(&mut self, painting: &Painting) {
        self.clear();
        let size = painting.size();
        self.painting_size = size;
        self.source_strokes = painting.stroke_count();
        self.source_tapes = painting.tape_count();

        if self.source_strokes > MAX_STROKES || self.source_tapes > MAX_TAPES {
            tracing::debug!(
                strokes = self.source_strokes,
                tapes = self.source_tapes,
                max_strokes = MAX_STROKES,
                max_tapes = MAX_TAPES,
                "painting exceeds compositor capacity, excess entries are not drawn"
            );
        }

        for stroke_index in 0..self.source_strokes.min(MAX_STROKES) {
            if let Some(segment) = painting.stroke_segment(stroke_index) {
                self.strokes.push(StrokeRecord::pack(segment, size));
            }
        }
        self.committed_strokes = self.strokes.len();

        for tape_index in 0..self.source_tapes.min(MAX_TAPES) {
            let (Some(tape), Some(segment)) =
                (painting.tape(tape_index), painting.tape_segment(tape_index))
            else {
                continue;
            };
            let mut record = TapeRecord::pack(segment, size);
            record.start_stroke_index = index_u32(tape.start_stroke_index);
            record.affected_stroke_count = index_u32(tape.affected_stroke_count);
            record.finished = tape.is_finished;
            self.tapes.push(record);
        }
        self.committed_tapes = self.tapes.len();

        if let Some(active) = painting.active_segment() {
            if active.is_tape {
                if self.source_tapes < MAX_TAPES {
                    let mut record = TapeRecord::pack(&active.segment, size);
                    record.start_stroke_index = index_u32(self.source_strokes);
                    self.tapes.push(record);
                }
            } else if self.source_strokes < MAX_STROKES {
                self.strokes.push(StrokeRecord::pack(&active.segment, size));
            }
        }
    }

    /// Size of the painting the scene was packed from.
    pub fn painting_size(&self) -> Size {
        self.painting_size
    }

    /// All stroke records, committed first, then the active stroke if any.
    pub fn strokes(&self) -> &[StrokeRecord] {
        &self.strokes
    }

    /// All tape records, committed first, then the active tape if any.
    pub fn tapes(&self) -> &[TapeRecord] {
        &self.tapes
    }

    /// Committed strokes that will be drawn (`min(stroke_count, MAX_STROKES)`).
    pub fn rendered_stroke_count(&self) -> usize {
        self.committed_strokes
    }

    /// Committed tapes that will be evaluated (`min(tape_count, MAX_TAPES)`).
    pub fn rendered_tape_count(&self) -> usize {
        self.committed_tapes
    }

    /// Stroke count of the painting at upload time, before clamping.
    pub fn source_stroke_count(&self) -> usize {
        self.source_strokes
    }

    /// Tape count of the painting at upload time, before clamping.
    pub fn source_tape_count(&self) -> usize {
        self.source_tapes
    }

    /// Whether the last slot of [`PackedScene::strokes`] is the in-progress stroke.
    pub fn has_active_stroke(&self) -> bool {
        self.strokes.len() > self.committed_strokes
    }

    /// Whether the last slot of [`PackedScene::tapes`] is the in-progress tape.
    pub fn has_active_tape(&self) -> bool {
        self.tapes.len() > self.committed_tapes
    }

    /// No strokes and no tapes to draw.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.tapes.is_empty()
    }

    /// Scale from target pixels to painting pixels.
    pub(crate) fn target_to_painting(&self, target: Size) -> Vec2 {
        if target.is_empty() {
            return Vec2::ZERO;
        }
        Vec2::new(
            f64::from(self.painting_size.width) / f64::from(target.width),
            f64::from(self.painting_size.height) / f64::from(target.height),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/packing.rs"]
mod tests;
