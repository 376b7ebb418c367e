//! paintmask turns a tape-masked painting history into pixels and scores two paintings
//! against each other.
//!
//! One party paints with strokes and tape. Peeling a tape off lifts every stroke that was
//! painted while it was stuck down, but only inside the tape's own footprint. A second party
//! reproduces the result and the two renders are compared pixel by pixel.
//!
//! # Pipeline overview
//!
//! 1. **Record**: input events mutate a [`Painting`] (`begin_line`, `update_line`, `end_line`,
//!    `try_remove_tape`).
//! 2. **Pack**: a [`Compositor`] snapshots the painting into a fixed-capacity [`PackedScene`]
//!    ([`MAX_STROKES`] strokes, [`MAX_TAPES`] tapes; the excess is not drawn).
//! 3. **Compose**: one per-pixel pass replays the strokes under the tape-masking rule into a
//!    [`TargetImage`].
//! 4. **Compare**: [`compare_images`] reduces the per-pixel error to a similarity in `[0,1]`,
//!    and [`determine_result`] turns it into a [`RoundOutcome`].
//!
//! Painting history lives for the process only; nothing is persisted.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod compositor;
mod config;
mod foundation;
mod painting;
mod scoring;
mod script;
mod similarity;

pub use compositor::canvas::{Compositor, CompositorSettings};
pub use compositor::packing::{MAX_STROKES, MAX_TAPES, PackedScene, StrokeRecord, TapeRecord};
pub use compositor::target::TargetImage;
pub use config::settings::{BrushConfig, PaintMaskConfig, PaintingConfig};
pub use foundation::core::{Point, Rgba, Size, Vec2};
pub use foundation::error::{PaintMaskError, PaintMaskResult};
pub use painting::history::{
    ActiveSegment, ChangeListener, ElementKind, EndLineInfo, Painting, PaintingChange,
    SharedPainting, Stroke, Tape, read_painting, write_painting,
};
pub use painting::segment::LineSegment;
pub use scoring::pending::{PendingResult, spawn_determine_result};
pub use scoring::policy::{
    RoundOutcome, ScoringSettings, determine_result, forger_score, tape_score,
};
pub use script::replay::{PenOp, ReplayReport, Script, ScriptOp};
pub use similarity::metric::{CompareOpts, ErrorImage, ErrorMetric};
pub use similarity::reduce::ReductionPath;
pub use similarity::scorer::{
    Comparison, SimilarityScorer, compare_images, compare_images_detailed,
};
