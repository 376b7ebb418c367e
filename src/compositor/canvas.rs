use std::sync::{Arc, RwLock, Weak};

use serde::{Deserialize, Serialize};

use crate::{
    compositor::{
        packing::PackedScene,
        pass::{PassParams, compose},
        target::TargetImage,
    },
    foundation::{
        core::{Rgba, Size},
        error::{PaintMaskError, PaintMaskResult},
    },
    painting::history::{Painting, SharedPainting, read_painting},
};

/// Per-compositor options.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorSettings {
    /// Color of pixels no stroke covers.
    pub background: Rgba,
    /// Opacity multiplier for tapes that are still stuck down.
    pub tape_overlay_opacity: f32,
    /// Compose rows on the rayon pool.
    pub parallel: bool,
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self {
            background: Rgba::TRANSPARENT,
            tape_overlay_opacity: 0.5,
            parallel: true,
        }
    }
}

impl CompositorSettings {
    /// Reject non-finite colors and an overlay opacity outside `[0,1]`.
    pub fn validate(&self) -> PaintMaskResult<()> {
        if !self.background.is_finite() {
            return Err(PaintMaskError::validation(
                "compositor background must be finite",
            ));
        }
        if !self.tape_overlay_opacity.is_finite()
            || !(0.0..=1.0).contains(&self.tape_overlay_opacity)
        {
            return Err(PaintMaskError::validation(format!(
                "tape_overlay_opacity must be in [0,1], got {}",
                self.tape_overlay_opacity
            )));
        }
        Ok(())
    }

    fn pass_params(&self) -> PassParams {
        PassParams {
            background: self.background,
            tape_overlay_opacity: self.tape_overlay_opacity,
            parallel: self.parallel,
        }
    }
}

/// Lazily re-rendered view of one painting.
///
/// The compositor keeps a weak reference to the painting it observes and repacks only when the
/// painting's revision differs from the one it last drew. A painting dropped by its owner
/// renders as flat background.
#[derive(Debug)]
pub struct Compositor {
    painting: Option<Weak<RwLock<Painting>>>,
    settings: CompositorSettings,
    scene: PackedScene,
    target: TargetImage,
    packed_revision: Option<u64>,
    dirty: bool,
}

impl Compositor {
    /// Compositor with a `width` x `height` target and no painting attached.
    pub fn new(width: u32, height: u32, settings: CompositorSettings) -> Self {
        Self {
            painting: None,
            settings,
            scene: PackedScene::new(),
            target: TargetImage::new(width, height),
            packed_revision: None,
            dirty: true,
        }
    }

    /// Observe `painting` without taking ownership.
    pub fn set_painting(&mut self, painting: &SharedPainting) {
        self.painting = Some(Arc::downgrade(painting));
        self.packed_revision = None;
        self.dirty = true;
    }

    /// Detach the painting. The next render draws flat background.
    pub fn clear_painting(&mut self) {
        self.painting = None;
        self.packed_revision = None;
        self.dirty = true;
    }

    /// Whether the observed painting is still alive.
    pub fn has_painting(&self) -> bool {
        self.painting
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Reallocate the target. History is untouched; the next render redraws.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.target.resize(width, height) {
            self.dirty = true;
        }
    }

    /// Change the background color and mark the target dirty.
    pub fn set_background(&mut self, color: Rgba) {
        if self.settings.background != color {
            self.settings.background = color;
            self.dirty = true;
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &CompositorSettings {
        &self.settings
    }

    /// Force the next [`Compositor::render`] to run a pass.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether the next non-forced [`Compositor::render`] would draw.
    pub fn is_dirty(&self) -> bool {
        if self.dirty {
            return true;
        }
        let live = self.painting.as_ref().and_then(Weak::upgrade);
        match live {
            Some(painting) => self.packed_revision != Some(read_painting(&painting).revision()),
            None => self.packed_revision.is_some(),
        }
    }

    /// Redraw the target if the painting changed since the last render, or unconditionally
    /// with `force`. Returns `true` when a composition pass ran.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn render(&mut self, force: bool) -> bool {
        let live = self.painting.as_ref().and_then(Weak::upgrade);
        match live {
            Some(painting) => {
                let painting = read_painting(&painting);
                let revision = painting.revision();
                if !force && !self.dirty && self.packed_revision == Some(revision) {
                    return false;
                }
                self.scene.upload(&painting);
                self.packed_revision = Some(revision);
            }
            None => {
                if !force && !self.dirty && self.packed_revision.is_none() {
                    return false;
                }
                if self.painting.is_some() {
                    tracing::debug!("observed painting was dropped, rendering background");
                }
                self.scene.clear();
                self.packed_revision = None;
            }
        }
        self.draw();
        true
    }

    /// Compose a borrowed painting directly, bypassing the observed one.
    ///
    /// The next [`Compositor::render`] redraws the observed painting.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn render_painting(&mut self, painting: &Painting) {
        self.scene.upload(painting);
        self.draw();
        self.packed_revision = None;
        self.dirty = true;
    }

    fn draw(&mut self) {
        let target = self.target.size();
        compose(
            &self.scene,
            target,
            self.target.pixels_mut(),
            &self.settings.pass_params(),
        );
        self.target.touch();
        self.dirty = false;
    }

    /// The image the last pass wrote.
    pub fn target(&self) -> &TargetImage {
        &self.target
    }

    /// Size of the target image.
    pub fn target_size(&self) -> Size {
        self.target.size()
    }

    /// The scene drawn by the last render.
    pub fn packed(&self) -> &PackedScene {
        &self.scene
    }

    /// Strokes drawn by the last pass, active preview included. At most
    /// [`MAX_STROKES`](crate::MAX_STROKES).
    pub fn rendered_stroke_count(&self) -> usize {
        self.scene.rendered_stroke_count()
    }

    /// Tapes evaluated by the last pass, active preview included. At most
    /// [`MAX_TAPES`](crate::MAX_TAPES).
    pub fn rendered_tape_count(&self) -> usize {
        self.scene.rendered_tape_count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/canvas.rs"]
mod tests;
