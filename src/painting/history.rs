use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    foundation::core::{Point, Size},
    painting::segment::LineSegment,
};

/// A committed paint application, referencing its geometry in the segment log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stroke {
    /// Index of the stroke geometry in the segment log.
    pub line_index: usize,
}

/// A committed tape application.
///
/// `start_stroke_index` is the number of committed strokes when the tape went down. While
/// `is_finished` is `false` the tape is still stuck to the painting and `affected_stroke_count`
/// carries no meaning. Once removed, strokes `start_stroke_index..start_stroke_index +
/// affected_stroke_count` lift off wherever they overlap the tape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tape {
    /// Index of the tape geometry in the segment log.
    pub line_index: usize,
    /// Strokes committed before the tape went down.
    pub start_stroke_index: usize,
    /// Strokes lifted when the tape came off.
    pub affected_stroke_count: usize,
    /// Whether the tape has been removed.
    pub is_finished: bool,
}

/// The segment currently being dragged, not yet committed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveSegment {
    /// Geometry so far.
    pub segment: LineSegment,
    /// Whether the drag lays tape.
    pub is_tape: bool,
}

/// Result of a successful [`Painting::end_line`]: the new stroke or tape index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndLineInfo {
    /// Stroke or tape index, per `is_tape`.
    pub index: usize,
    /// Whether `index` is a tape index.
    pub is_tape: bool,
}

impl EndLineInfo {
    /// The stroke index, if a stroke was committed.
    pub fn stroke_index(self) -> Option<usize> {
        (!self.is_tape).then_some(self.index)
    }

    /// The tape index, if a tape was committed.
    pub fn tape_index(self) -> Option<usize> {
        self.is_tape.then_some(self.index)
    }
}

/// Which stream [`Painting::closest_element_at`] searches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// Committed strokes.
    Stroke,
    /// Committed tapes.
    Tape,
}

/// Notification delivered to the painting's listener after a successful mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintingChange {
    /// A drag started.
    LineBegan,
    /// The active segment's end point moved.
    LineUpdated,
    /// The active segment was committed as stroke or tape `index`.
    LineCommitted {
        /// Stroke or tape index, per `is_tape`.
        index: usize,
        /// Whether a tape was committed.
        is_tape: bool,
    },
    /// Tape `index` was peeled off.
    TapeRemoved {
        /// Index of the removed tape.
        index: usize,
    },
    /// History was wiped by [`Painting::clear`] or [`Painting::reset`].
    Cleared,
}

/// Callback told about every successful mutation.
pub type ChangeListener = Box<dyn FnMut(&PaintingChange) + Send + Sync>;

/// Ownership handle held by whoever drives a round. Compositors and scoring jobs keep `Weak`
/// references to it.
pub type SharedPainting = Arc<RwLock<Painting>>;

/// Append-only painting history: a segment log split into stroke and tape streams, plus at
/// most one in-progress segment.
pub struct Painting {
    size: Size,
    segments: Vec<LineSegment>,
    strokes: Vec<Stroke>,
    tapes: Vec<Tape>,
    active: Option<ActiveSegment>,
    revision: u64,
    listener: Option<ChangeListener>,
}

impl std::fmt::Debug for Painting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Painting")
            .field("size", &self.size)
            .field("segments", &self.segments.len())
            .field("strokes", &self.strokes.len())
            .field("tapes", &self.tapes.len())
            .field("active", &self.active)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Painting {
    /// Empty painting of `size` pixels.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            segments: Vec::new(),
            strokes: Vec::new(),
            tapes: Vec::new(),
            active: None,
            revision: 0,
            listener: None,
        }
    }

    /// Wrap a new painting in the shared ownership handle.
    pub fn new_shared(size: Size) -> SharedPainting {
        Arc::new(RwLock::new(Self::new(size)))
    }

    /// Painting size in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Bumped after every successful mutation. Observers compare it to detect changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Committed segments, strokes and tapes together.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Committed strokes.
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Committed tapes, removed or not.
    pub fn tape_count(&self) -> usize {
        self.tapes.len()
    }

    /// Number of tapes that have been removed (finished).
    pub fn active_tape_count(&self) -> usize {
        self.tapes.iter().filter(|t| t.is_finished).count()
    }

    /// Nothing committed and nothing being dragged.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.active.is_none()
    }

    /// Segment at `line_index` in the log.
    pub fn segment(&self, line_index: usize) -> Option<&LineSegment> {
        self.segments.get(line_index)
    }

    /// Stroke at `stroke_index`.
    pub fn stroke(&self, stroke_index: usize) -> Option<Stroke> {
        self.strokes.get(stroke_index).copied()
    }

    /// Tape at `tape_index`.
    pub fn tape(&self, tape_index: usize) -> Option<Tape> {
        self.tapes.get(tape_index).copied()
    }

    /// Geometry of stroke `stroke_index`.
    pub fn stroke_segment(&self, stroke_index: usize) -> Option<&LineSegment> {
        self.stroke(stroke_index)
            .and_then(|s| self.segments.get(s.line_index))
    }

    /// Geometry of tape `tape_index`.
    pub fn tape_segment(&self, tape_index: usize) -> Option<&LineSegment> {
        self.tape(tape_index)
            .and_then(|t| self.segments.get(t.line_index))
    }

    /// Committed strokes in order.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Committed tapes in order.
    pub fn tapes(&self) -> &[Tape] {
        &self.tapes
    }

    /// The segment being dragged, if any.
    pub fn active_segment(&self) -> Option<&ActiveSegment> {
        self.active.as_ref()
    }

    /// Install the single change listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: ChangeListener) {
        self.listener = Some(listener);
    }

    /// Drop the change listener.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Stage `segment` as the active stroke or tape.
    ///
    /// Fails if a segment is already active or `segment.start` lies outside the painting.
    pub fn begin_line(&mut self, segment: LineSegment, is_tape: bool) -> bool {
        if self.active.is_some() {
            tracing::debug!("begin_line rejected: a segment is already active");
            return false;
        }
        if !self.size.contains(segment.start) {
            tracing::debug!(
                x = segment.start.x,
                y = segment.start.y,
                "begin_line rejected: start outside painting"
            );
            return false;
        }
        self.active = Some(ActiveSegment { segment, is_tape });
        self.changed(PaintingChange::LineBegan);
        true
    }

    /// Move the active segment's end point.
    pub fn update_line(&mut self, point: Point) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        active.segment.end = point;
        self.changed(PaintingChange::LineUpdated);
        true
    }

    /// Commit the active segment to the stroke or tape stream.
    pub fn end_line(&mut self) -> Option<EndLineInfo> {
        let Some(active) = self.active.take() else {
            tracing::debug!("end_line rejected: no active segment");
            return None;
        };
        let line_index = self.segments.len();
        self.segments.push(active.segment);

        let info = if active.is_tape {
            let index = self.tapes.len();
            self.tapes.push(Tape {
                line_index,
                start_stroke_index: self.strokes.len(),
                affected_stroke_count: 0,
                is_finished: false,
            });
            EndLineInfo {
                index,
                is_tape: true,
            }
        } else {
            let index = self.strokes.len();
            self.strokes.push(Stroke { line_index });
            EndLineInfo {
                index,
                is_tape: false,
            }
        };
        self.changed(PaintingChange::LineCommitted {
            index: info.index,
            is_tape: info.is_tape,
        });
        Some(info)
    }

    /// Peel tape `tape_index` off the painting.
    ///
    /// Every stroke committed while the tape was down lifts off with it. Fails for unknown
    /// indices and for tapes that were already removed; a failed call mutates nothing.
    pub fn try_remove_tape(&mut self, tape_index: usize) -> bool {
        let stroke_count = self.strokes.len();
        let Some(tape) = self.tapes.get_mut(tape_index) else {
            tracing::debug!(tape_index, "try_remove_tape rejected: unknown tape");
            return false;
        };
        if tape.is_finished {
            tracing::debug!(tape_index, "try_remove_tape rejected: tape already removed");
            return false;
        }
        tape.affected_stroke_count = stroke_count.saturating_sub(tape.start_stroke_index);
        tape.is_finished = true;
        self.changed(PaintingChange::TapeRemoved { index: tape_index });
        true
    }

    /// Nearest stroke or tape under `point` within `leniency` pixels.
    ///
    /// For tapes, `active_only` skips tapes that have already been removed; it is ignored for
    /// strokes. Ties keep the lower index.
    pub fn closest_element_at(
        &self,
        point: Point,
        leniency: f64,
        kind: ElementKind,
        active_only: bool,
    ) -> Option<usize> {
        let candidates: Box<dyn Iterator<Item = (usize, usize)> + '_> = match kind {
            ElementKind::Stroke => Box::new(
                self.strokes
                    .iter()
                    .enumerate()
                    .map(|(i, s)| (i, s.line_index)),
            ),
            ElementKind::Tape => Box::new(
                self.tapes
                    .iter()
                    .enumerate()
                    .filter(move |(_, t)| !(active_only && t.is_finished))
                    .map(|(i, t)| (i, t.line_index)),
            ),
        };

        let mut best: Option<(usize, f64)> = None;
        for (index, line_index) in candidates {
            let Some(segment) = self.segments.get(line_index) else {
                continue;
            };
            let Some(dist_sq) = segment.hit_test(point, leniency) else {
                continue;
            };
            if best.is_none_or(|(_, d)| dist_sq < d) {
                best = Some((index, dist_sq));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Convenience for the input layer's tape-removal gesture.
    pub fn closest_tape_at(&self, point: Point, leniency: f64) -> Option<usize> {
        self.closest_element_at(point, leniency, ElementKind::Tape, true)
    }

    /// Wipe history and the active segment; the size is kept.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.strokes.clear();
        self.tapes.clear();
        self.active = None;
        self.changed(PaintingChange::Cleared);
    }

    /// Wipe history and adopt a new size, reusing the allocations.
    pub fn reset(&mut self, size: Size) {
        self.size = size;
        self.clear();
    }

    fn changed(&mut self, change: PaintingChange) {
        self.revision = self.revision.wrapping_add(1);
        if let Some(listener) = self.listener.as_mut() {
            listener(&change);
        }
    }
}

/// Read access that survives a writer panicking mid-mutation.
pub fn read_painting(painting: &RwLock<Painting>) -> RwLockReadGuard<'_, Painting> {
    painting.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write access that survives a previous writer panicking.
pub fn write_painting(painting: &RwLock<Painting>) -> RwLockWriteGuard<'_, Painting> {
    painting.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "../../tests/unit/painting/history.rs"]
mod tests;
