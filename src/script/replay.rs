use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    config::settings::{BrushConfig, PaintMaskConfig},
    foundation::{
        core::{Point, Rgba, Size},
        error::{PaintMaskError, PaintMaskResult},
    },
    painting::{history::Painting, segment::LineSegment},
};

/// Pen parameters of a `begin` or `line` op. Missing fields come from the brush config.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PenOp {
    /// Start point.
    pub at: [f64; 2],
    /// End point; the start point when absent.
    #[serde(default)]
    pub to: Option<[f64; 2]>,
    /// Color override.
    #[serde(default)]
    pub color: Option<Rgba>,
    /// Width override.
    #[serde(default)]
    pub width: Option<f64>,
    /// Lay tape instead of paint.
    #[serde(default)]
    pub tape: bool,
    /// Edge softness override.
    #[serde(default)]
    pub feather: Option<f64>,
    /// Cap shape override.
    #[serde(default)]
    pub roundness: Option<f64>,
}

impl PenOp {
    fn segment(&self, brush: &BrushConfig) -> LineSegment {
        let start = point(self.at);
        LineSegment::new(
            self.color.unwrap_or_else(|| brush.color(self.tape)),
            start,
            self.width.unwrap_or_else(|| brush.width(self.tape)),
        )
        .with_end(self.to.map_or(start, point))
        .with_edge_feather(self.feather.unwrap_or(brush.edge_feather))
        .with_edge_roundness(self.roundness.unwrap_or(brush.edge_roundness))
    }
}

/// One recorded input-layer call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ScriptOp {
    /// Start a drag.
    Begin(PenOp),
    /// Move the end of the active drag.
    Update {
        /// New end point.
        to: [f64; 2],
    },
    /// Commit the active drag.
    End,
    /// `begin` + `update` + `end` in one step.
    Line(PenOp),
    /// Peel off tape `index`.
    RemoveTape {
        /// Tape index.
        index: usize,
    },
    /// Remove the closest stuck-down tape under a point.
    RemoveTapeAt {
        /// Pick point.
        at: [f64; 2],
        /// Pick radius; the brush leniency when absent.
        #[serde(default)]
        leniency: Option<f64>,
    },
    /// Wipe the history and keep the size.
    Clear,
}

/// Recorded input for one painting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Painting size; the config's painting size when absent.
    #[serde(default)]
    pub size: Option<[u32; 2]>,
    /// Ops in replay order.
    #[serde(default)]
    pub ops: Vec<ScriptOp>,
}

/// Counts from replaying a script.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Ops that took effect.
    pub applied: usize,
    /// Ops the painting refused.
    pub rejected: usize,
}

fn point(p: [f64; 2]) -> Point {
    Point::new(p[0], p[1])
}

impl Script {
    /// Parse script JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> PaintMaskResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PaintMaskError::validation(format!("parse script JSON: {e}")))
    }

    /// Read script JSON from a file.
    pub fn from_path(path: impl AsRef<Path>) -> PaintMaskResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open script JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Size of the painting this script draws on.
    pub fn painting_size(&self, cfg: &PaintMaskConfig) -> PaintMaskResult<Size> {
        match self.size {
            Some([w, h]) => Size::non_empty(w, h),
            None => Ok(cfg.painting.size()),
        }
    }

    /// Build a fresh painting and replay every op into it.
    pub fn replay(&self, cfg: &PaintMaskConfig) -> PaintMaskResult<(Painting, ReplayReport)> {
        let mut painting = Painting::new(self.painting_size(cfg)?);
        let report = self.apply(&mut painting, &cfg.brush);
        Ok((painting, report))
    }

    /// Replay the ops into `painting`. Rejected ops are logged and skipped.
    #[tracing::instrument(level = "debug", skip_all, fields(ops = self.ops.len()))]
    pub fn apply(&self, painting: &mut Painting, brush: &BrushConfig) -> ReplayReport {
        let mut report = ReplayReport::default();
        for (i, op) in self.ops.iter().enumerate() {
            if apply_op(painting, brush, op) {
                report.applied += 1;
            } else {
                tracing::debug!(op = i, ?op, "script op rejected");
                report.rejected += 1;
            }
        }
        report
    }
}

fn apply_op(painting: &mut Painting, brush: &BrushConfig, op: &ScriptOp) -> bool {
    match *op {
        ScriptOp::Begin(pen) => painting.begin_line(pen.segment(brush), pen.tape),
        ScriptOp::Update { to } => painting.update_line(point(to)),
        ScriptOp::End => painting.end_line().is_some(),
        ScriptOp::Line(pen) => {
            painting.begin_line(pen.segment(brush), pen.tape) && painting.end_line().is_some()
        }
        ScriptOp::RemoveTape { index } => painting.try_remove_tape(index),
        ScriptOp::RemoveTapeAt { at, leniency } => {
            let leniency = leniency.unwrap_or(brush.leniency);
            painting
                .closest_tape_at(point(at), leniency)
                .is_some_and(|index| painting.try_remove_tape(index))
        }
        ScriptOp::Clear => {
            painting.clear();
            true
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/replay.rs"]
mod tests;
