use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::similarity::metric::ErrorImage;

/// How an error image is collapsed to its mean.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionPath {
    /// Pyramid, falling back to the direct sum if the pyramid result is not finite.
    #[default]
    Auto,
    /// Parallel 2x2 halving until one cell remains.
    Pyramid,
    /// Sequential `f64` sum over every pixel.
    Direct,
}

/// One pyramid cell: the mean of the source pixels it covers and how many there are.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Cell {
    mean: f32,
    weight: u32,
}

impl Cell {
    fn merge(cells: &[Cell]) -> Cell {
        let weight: u32 = cells.iter().map(|c| c.weight).sum();
        if weight == 0 {
            return Cell::default();
        }
        let sum: f32 = cells.iter().map(|c| c.mean * c.weight as f32).sum();
        Cell {
            mean: sum / weight as f32,
            weight,
        }
    }
}

/// Halve `src` (`w` x `h`) once, rounding dimensions up.
fn halve(src: &[Cell], w: usize, h: usize) -> (Vec<Cell>, usize, usize) {
    let nw = w.div_ceil(2).max(1);
    let nh = h.div_ceil(2).max(1);
    let mut out = vec![Cell::default(); nw * nh];
    out.par_chunks_mut(nw).enumerate().for_each(|(oy, row)| {
        let y0 = oy * 2;
        let y1 = (y0 + 1).min(h - 1);
        for (ox, cell) in row.iter_mut().enumerate() {
            let x0 = ox * 2;
            let x1 = (x0 + 1).min(w - 1);
            let mut quad = [Cell::default(); 4];
            quad[0] = src[y0 * w + x0];
            if x1 != x0 {
                quad[1] = src[y0 * w + x1];
            }
            if y1 != y0 {
                quad[2] = src[y1 * w + x0];
                if x1 != x0 {
                    quad[3] = src[y1 * w + x1];
                }
            }
            *cell = Cell::merge(&quad);
        }
    });
    (out, nw, nh)
}

pub(crate) fn reduce_pyramid(image: &ErrorImage) -> f32 {
    if image.is_empty() {
        return 0.0;
    }
    let mut w = image.width() as usize;
    let mut h = image.height() as usize;
    let mut level: Vec<Cell> = image
        .data()
        .iter()
        .map(|&mean| Cell { mean, weight: 1 })
        .collect();

    while w > 1 || h > 1 {
        let (next, nw, nh) = halve(&level, w, h);
        level = next;
        w = nw;
        h = nh;
    }
    level.first().map_or(0.0, |c| c.mean)
}

pub(crate) fn reduce_direct(image: &ErrorImage) -> f32 {
    if image.is_empty() {
        return 0.0;
    }
    let sum: f64 = image.data().iter().map(|&e| f64::from(e)).sum();
    (sum / image.data().len() as f64) as f32
}

/// Mean error of `image` along `path`.
pub(crate) fn mean_error(image: &ErrorImage, path: ReductionPath) -> f32 {
    match path {
        ReductionPath::Pyramid => reduce_pyramid(image),
        ReductionPath::Direct => reduce_direct(image),
        ReductionPath::Auto => {
            let fast = reduce_pyramid(image);
            if fast.is_finite() {
                fast
            } else {
                tracing::debug!("pyramid reduction was not finite, using direct sum");
                reduce_direct(image)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/similarity/reduce.rs"]
mod tests;
