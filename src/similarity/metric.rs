use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{foundation::core::Rgba, similarity::reduce::ReductionPath};

/// Per-pixel error between two images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMetric {
    /// Absolute difference of Rec.709 luma.
    #[default]
    Luma,
    /// Mean absolute difference over the color channels.
    Channels,
}

/// How two images are compared.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOpts {
    /// Per-pixel error formula.
    pub metric: ErrorMetric,
    /// Compare only the colors seen over `backdrop`. When `false` the alpha difference also
    /// counts as error on its own.
    pub ignore_alpha: bool,
    /// Opaque color both images are flattened over before their colors are compared, so a
    /// transparent pixel never matches paint of the same RGB.
    pub backdrop: Rgba,
    /// How the error image is averaged.
    pub reduction: ReductionPath,
    /// Keep the per-pixel error image in the detailed result.
    pub keep_difference: bool,
}

impl Default for CompareOpts {
    fn default() -> Self {
        Self {
            metric: ErrorMetric::Luma,
            ignore_alpha: true,
            backdrop: Rgba::WHITE,
            reduction: ReductionPath::Auto,
            keep_difference: false,
        }
    }
}

const LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

fn unit(px: [u8; 4]) -> [f32; 4] {
    px.map(|c| f32::from(c) / 255.0)
}

/// Straight-alpha pixel flattened over an opaque backdrop.
fn flatten(px: [f32; 4], backdrop: Rgba) -> [f32; 3] {
    let bg = backdrop.clamped();
    let a = px[3];
    [
        px[0] * a + bg.r * (1.0 - a),
        px[1] * a + bg.g * (1.0 - a),
        px[2] * a + bg.b * (1.0 - a),
    ]
}

/// Error in `[0,1]` between two straight-alpha pixels.
pub(crate) fn pixel_error(a: [u8; 4], b: [u8; 4], opts: &CompareOpts) -> f32 {
    let (a, b) = (unit(a), unit(b));
    let (fa, fb) = (flatten(a, opts.backdrop), flatten(b, opts.backdrop));
    let alpha = (a[3] - b[3]).abs();
    let err = match opts.metric {
        ErrorMetric::Luma => {
            let ya = fa[0] * LUMA[0] + fa[1] * LUMA[1] + fa[2] * LUMA[2];
            let yb = fb[0] * LUMA[0] + fb[1] * LUMA[1] + fb[2] * LUMA[2];
            let luma = (ya - yb).abs();
            if opts.ignore_alpha {
                luma
            } else {
                luma.max(alpha)
            }
        }
        ErrorMetric::Channels => {
            let sum: f32 = (0..3).map(|i| (fa[i] - fb[i]).abs()).sum();
            if opts.ignore_alpha {
                sum / 3.0
            } else {
                (sum + alpha) / 4.0
            }
        }
    };
    err.clamp(0.0, 1.0)
}

/// Single-channel error image, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorImage {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl ErrorImage {
    pub(crate) fn from_raw(width: u32, height: u32, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Per-pixel error of two images of identical size.
    pub(crate) fn between(a: &image::RgbaImage, b: &image::RgbaImage, opts: &CompareOpts) -> Self {
        debug_assert_eq!(a.dimensions(), b.dimensions());
        let (width, height) = a.dimensions();
        let mut data = vec![0.0f32; width as usize * height as usize];
        let row_len = width as usize;
        if row_len > 0 {
            data.par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| {
                    let y = y as u32;
                    for (x, out) in row.iter_mut().enumerate() {
                        let x = x as u32;
                        *out = pixel_error(a.get_pixel(x, y).0, b.get_pixel(x, y).0, opts);
                    }
                });
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Error at `(x, y)`, `None` outside.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Row-major error values.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Errors scaled to `0..=255` for inspection.
    pub fn to_gray_image(&self) -> image::GrayImage {
        let bytes = self
            .data
            .iter()
            .map(|e| (e.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect();
        image::GrayImage::from_raw(self.width, self.height, bytes)
            .unwrap_or_else(|| image::GrayImage::new(self.width, self.height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/similarity/metric.rs"]
mod tests;
