use std::path::Path;

use anyhow::Context as _;

use crate::foundation::{
    core::{Rgba, Size},
    error::{PaintMaskError, PaintMaskResult},
};

/// Raster a compositor renders into, repopulated in place.
///
/// Straight-alpha RGBA8. `generation` increases every time the pixels are rewritten, so
/// presentation code can skip re-uploading an unchanged image.
#[derive(Clone, Debug)]
pub struct TargetImage {
    image: image::RgbaImage,
    generation: u64,
}

impl TargetImage {
    /// Fully transparent image of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: image::RgbaImage::new(width, height),
            generation: 0,
        }
    }

    /// Borrow the pixels.
    pub fn image(&self) -> &image::RgbaImage {
        &self.image
    }

    /// Take the pixels.
    pub fn into_image(self) -> image::RgbaImage {
        self.image
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Width and height.
    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    /// Bumped every time the pixels are rewritten or reallocated.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pixel at `(x, y)`, `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.image
            .get_pixel_checked(x, y)
            .map(|px| Rgba::from_rgba8(px.0))
    }

    /// Reallocate for a new size. Returns `false` when the size is unchanged.
    pub(crate) fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.image.width() == width && self.image.height() == height {
            return false;
        }
        self.image = image::RgbaImage::new(width, height);
        self.generation = self.generation.wrapping_add(1);
        true
    }

    /// Mutable pixel bytes. Callers that rewrite them must call [`TargetImage::touch`].
    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    pub(crate) fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Write the image as a PNG, creating missing parent directories.
    pub fn save_png(&self, path: &Path) -> PaintMaskResult<()> {
        if self.size().is_empty() {
            return Err(PaintMaskError::render(format!(
                "cannot write empty {}x{} target to '{}'",
                self.width(),
                self.height(),
                path.display()
            )));
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.image,
            self.image.width(),
            self.image.height(),
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/target.rs"]
mod tests;
