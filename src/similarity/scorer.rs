use std::borrow::Cow;

use image::{RgbaImage, imageops::FilterType};

use crate::{
    compositor::canvas::{Compositor, CompositorSettings},
    foundation::core::Size,
    painting::history::Painting,
    similarity::{
        metric::{CompareOpts, ErrorImage},
        reduce::mean_error,
    },
};

/// Result of comparing two images.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    /// `1 - clamp01(mean_error)`; 1 means identical.
    pub similarity: f32,
    /// Mean per-pixel error.
    pub mean_error: f32,
    /// Width both images were normalized to.
    pub comparison_width: u32,
    /// Height both images were normalized to.
    pub comparison_height: u32,
    /// Per-pixel error, kept when [`CompareOpts::keep_difference`] is set.
    pub difference: Option<ErrorImage>,
}

impl Comparison {
    fn empty(size: Size) -> Self {
        Self {
            similarity: 0.0,
            mean_error: 1.0,
            comparison_width: size.width,
            comparison_height: size.height,
            difference: None,
        }
    }
}

fn image_size(img: &RgbaImage) -> Size {
    Size::new(img.width(), img.height())
}

/// Stretch `img` to `size` unless it is already there.
fn normalized(img: &RgbaImage, size: Size) -> Cow<'_, RgbaImage> {
    if image_size(img) == size {
        Cow::Borrowed(img)
    } else {
        Cow::Owned(image::imageops::resize(
            img,
            size.width,
            size.height,
            FilterType::Triangle,
        ))
    }
}

/// Similarity of two images in `[0,1]`.
pub fn compare_images(a: &RgbaImage, b: &RgbaImage, opts: &CompareOpts) -> f32 {
    compare_images_detailed(a, b, opts).similarity
}

/// Compare at the element-wise maximum of both sizes and reduce the error image to its mean.
///
/// An empty input yields similarity 0.
#[tracing::instrument(level = "debug", skip_all, fields(
    a_width = a.width(),
    a_height = a.height(),
    b_width = b.width(),
    b_height = b.height(),
))]
/// Like [`compare_images`] but also returns the mean error, the comparison size and, on request, the error image.
pub fn compare_images_detailed(a: &RgbaImage, b: &RgbaImage, opts: &CompareOpts) -> Comparison {
    let size = image_size(a).max(image_size(b));
    if image_size(a).is_empty() || image_size(b).is_empty() {
        tracing::debug!("empty comparison input");
        return Comparison::empty(size);
    }

    let a = normalized(a, size);
    let b = normalized(b, size);
    let difference = ErrorImage::between(&a, &b, opts);
    let mean = mean_error(&difference, opts.reduction).clamp(0.0, 1.0);
    let similarity = (1.0 - mean).clamp(0.0, 1.0);
    tracing::debug!(similarity, mean_error = mean, "compared images");

    Comparison {
        similarity,
        mean_error: mean,
        comparison_width: size.width,
        comparison_height: size.height,
        difference: opts.keep_difference.then_some(difference),
    }
}

/// Renders two paintings with owned, reusable compositors and compares the results.
#[derive(Debug)]
pub struct SimilarityScorer {
    reference: Compositor,
    candidate: Compositor,
    opts: CompareOpts,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(CompositorSettings::default(), CompareOpts::default())
    }
}

impl SimilarityScorer {
    /// Scorer whose compositors use `settings`.
    pub fn new(settings: CompositorSettings, opts: CompareOpts) -> Self {
        Self {
            reference: Compositor::new(0, 0, settings),
            candidate: Compositor::new(0, 0, settings),
            opts,
        }
    }

    /// Comparison options.
    pub fn opts(&self) -> &CompareOpts {
        &self.opts
    }

    /// Similarity of two paintings, each rendered at its own size.
    pub fn compare_paintings(&mut self, reference: &Painting, candidate: &Painting) -> f32 {
        self.compare_paintings_detailed(reference, candidate)
            .similarity
    }

    /// Like [`SimilarityScorer::compare_paintings`] with the full [`Comparison`].
    pub fn compare_paintings_detailed(
        &mut self,
        reference: &Painting,
        candidate: &Painting,
    ) -> Comparison {
        render_at_painting_size(&mut self.reference, reference);
        render_at_painting_size(&mut self.candidate, candidate);
        compare_images_detailed(
            self.reference.target().image(),
            self.candidate.target().image(),
            &self.opts,
        )
    }
}

fn render_at_painting_size(compositor: &mut Compositor, painting: &Painting) {
    let size = painting.size();
    compositor.resize(size.width, size.height);
    compositor.render_painting(painting);
}

#[cfg(test)]
#[path = "../../tests/unit/similarity/scorer.rs"]
mod tests;
