use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    compositor::canvas::CompositorSettings,
    foundation::{
        core::{Rgba, Size},
        error::{PaintMaskError, PaintMaskResult},
    },
    painting::segment::LineSegment,
    scoring::policy::ScoringSettings,
    similarity::metric::CompareOpts,
};

/// Size of new paintings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintingConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for PaintingConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 720,
        }
    }
}

impl PaintingConfig {
    /// Configured painting size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Tool defaults applied when an input event leaves a field out.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Stroke width in painting pixels.
    pub paint_width: f64,
    /// Stroke color.
    pub paint_color: Rgba,
    /// Tape width in painting pixels.
    pub tape_width: f64,
    /// Color of tape while it is stuck down.
    pub tape_color: Rgba,
    /// Edge softness for both tools, in painting pixels.
    pub edge_feather: f64,
    /// Cap shape for both tools: 0 flat, 1 round.
    pub edge_roundness: f64,
    /// Extra pick radius for tape removal, in painting pixels.
    pub leniency: f64,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            paint_width: 50.0,
            paint_color: Rgba::BLACK,
            tape_width: 10.0,
            tape_color: Rgba::new(0.85, 0.78, 0.6, 1.0),
            edge_feather: LineSegment::DEFAULT_EDGE_FEATHER,
            edge_roundness: LineSegment::DEFAULT_EDGE_ROUNDNESS,
            leniency: 1.0,
        }
    }
}

impl BrushConfig {
    /// Default width for the chosen tool.
    pub fn width(&self, is_tape: bool) -> f64 {
        if is_tape {
            self.tape_width
        } else {
            self.paint_width
        }
    }

    /// Default color for the chosen tool.
    pub fn color(&self, is_tape: bool) -> Rgba {
        if is_tape {
            self.tape_color
        } else {
            self.paint_color
        }
    }
}

/// Top-level settings file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaintMaskConfig {
    /// Size of new paintings.
    pub painting: PaintingConfig,
    /// Tool defaults.
    pub brush: BrushConfig,
    /// Compositing options.
    pub compositor: CompositorSettings,
    /// Image comparison options.
    pub compare: CompareOpts,
    /// Round scoring budget.
    pub scoring: ScoringSettings,
}

impl PaintMaskConfig {
    /// Parse settings JSON and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> PaintMaskResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| PaintMaskError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read settings JSON from a file and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> PaintMaskResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open config JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check every section. Failures are [`PaintMaskError::Config`].
    pub fn validate(&self) -> PaintMaskResult<()> {
        Size::non_empty(self.painting.width, self.painting.height)
            .map_err(|e| PaintMaskError::config(format!("painting: {e}")))?;

        let b = &self.brush;
        for (name, value) in [
            ("paint_width", b.paint_width),
            ("tape_width", b.tape_width),
            ("edge_feather", b.edge_feather),
            ("leniency", b.leniency),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PaintMaskError::config(format!(
                    "brush.{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&b.edge_roundness) {
            return Err(PaintMaskError::config(format!(
                "brush.edge_roundness must be in [0,1], got {}",
                b.edge_roundness
            )));
        }
        if !b.paint_color.is_finite() || !b.tape_color.is_finite() {
            return Err(PaintMaskError::config("brush colors must be finite"));
        }

        if !self.compare.backdrop.is_finite() {
            return Err(PaintMaskError::config("compare.backdrop must be finite"));
        }

        self.compositor
            .validate()
            .map_err(|e| PaintMaskError::config(format!("compositor: {e}")))?;
        self.scoring
            .validate()
            .map_err(|e| PaintMaskError::config(format!("scoring: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
