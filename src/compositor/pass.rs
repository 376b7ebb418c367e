use rayon::prelude::*;

use crate::{
    compositor::{
        footprint::Footprint,
        packing::{PackedScene, TapeRecord},
    },
    foundation::core::{Rgba, Size},
};

/// Per-pass inputs that do not come from the painting.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PassParams {
    pub(crate) background: Rgba,
    pub(crate) tape_overlay_opacity: f32,
    pub(crate) parallel: bool,
}

struct PreparedStroke {
    footprint: Footprint,
    premul: [f32; 4],
}

struct PreparedMask {
    footprint: Footprint,
    tape: TapeRecord,
}

struct PreparedOverlay {
    footprint: Footprint,
    premul: [f32; 4],
    opacity: f32,
}

struct Prepared {
    strokes: Vec<PreparedStroke>,
    masks: Vec<PreparedMask>,
    overlays: Vec<PreparedOverlay>,
    background: [f32; 4],
    scale: [f32; 2],
}

impl Prepared {
    fn new(scene: &PackedScene, target: Size, params: &PassParams) -> Self {
        let size = scene.painting_size();
        let strokes = scene
            .strokes()
            .iter()
            .map(|s| PreparedStroke {
                footprint: s.footprint(size),
                premul: premul(s.color),
            })
            .collect();

        let mut masks = Vec::new();
        let mut overlays = Vec::new();
        for t in scene.tapes() {
            if t.finished {
                if t.affected_stroke_count > 0 {
                    masks.push(PreparedMask {
                        footprint: t.footprint(size),
                        tape: *t,
                    });
                }
            } else {
                overlays.push(PreparedOverlay {
                    footprint: t.footprint(size),
                    premul: premul(t.color),
                    opacity: params.tape_overlay_opacity.clamp(0.0, 1.0),
                });
            }
        }

        let scale = scene.target_to_painting(target);
        Self {
            strokes,
            masks,
            overlays,
            background: params.background.to_premul(),
            scale: [scale.x as f32, scale.y as f32],
        }
    }

    /// Final premultiplied color at painting-space point `p`.
    fn shade(&self, p: [f32; 2]) -> [f32; 4] {
        let mut acc = self.background;

        for (index, stroke) in self.strokes.iter().enumerate() {
            let mut cov = stroke.footprint.coverage(p);
            if cov <= 0.0 {
                continue;
            }
            let index = index as u32;
            for mask in self.masks.iter().filter(|m| m.tape.masks(index)) {
                cov *= 1.0 - mask.footprint.suppression(p);
                if cov <= 0.0 {
                    break;
                }
            }
            if cov > 0.0 {
                acc = over(acc, stroke.premul, cov);
            }
        }

        for overlay in &self.overlays {
            let cov = overlay.footprint.coverage(p) * overlay.opacity;
            if cov > 0.0 {
                acc = over(acc, overlay.premul, cov);
            }
        }
        acc
    }

    fn shade_row(&self, y: usize, row: &mut [u8]) {
        let py = (y as f32 + 0.5) * self.scale[1];
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let p = [(x as f32 + 0.5) * self.scale[0], py];
            px.copy_from_slice(&unpremul_to_rgba8(self.shade(p)));
        }
    }
}

/// Run the composition pass for `scene` into a straight-alpha RGBA8 buffer of `target` size.
///
/// Strokes are blended in order (later over earlier). A stroke inside the range of a removed
/// tape is gone wherever that tape lay and fades back in across the tape's feather; tapes
/// still stuck down are drawn over everything at `tape_overlay_opacity`.
pub(crate) fn compose(scene: &PackedScene, target: Size, buf: &mut [u8], params: &PassParams) {
    let row_len = target.width as usize * 4;
    if row_len == 0 || buf.is_empty() {
        return;
    }
    debug_assert_eq!(buf.len(), row_len * target.height as usize);

    let prepared = Prepared::new(scene, target, params);
    if params.parallel {
        buf.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| prepared.shade_row(y, row));
    } else {
        buf.chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| prepared.shade_row(y, row));
    }
}

fn premul(c: [f32; 4]) -> [f32; 4] {
    Rgba::new(c[0], c[1], c[2], c[3]).to_premul()
}

/// Premultiplied source-over with `coverage` applied to the source.
#[inline]
pub(crate) fn over(dst: [f32; 4], src: [f32; 4], coverage: f32) -> [f32; 4] {
    let k = coverage.clamp(0.0, 1.0);
    let inv = 1.0 - src[3] * k;
    [
        src[0] * k + dst[0] * inv,
        src[1] * k + dst[1] * inv,
        src[2] * k + dst[2] * inv,
        src[3] * k + dst[3] * inv,
    ]
}

pub(crate) fn unpremul_to_rgba8(c: [f32; 4]) -> [u8; 4] {
    let a = c[3].clamp(0.0, 1.0);
    if a <= 0.0 {
        return [0, 0, 0, 0];
    }
    Rgba::new(c[0] / a, c[1] / a, c[2] / a, a).to_rgba8()
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/pass.rs"]
mod tests;
