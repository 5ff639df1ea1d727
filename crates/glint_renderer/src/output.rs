//! PNG output for rendered images.

use std::path::Path;

use image::{ImageFormat, Rgba};

use crate::renderer::{ImageBuffer, RenderError, RenderResult};

/// Save an image as a 16-bit RGBA PNG.
pub fn save_png<P: AsRef<Path>>(image: &ImageBuffer, path: P) -> RenderResult<()> {
    let path = path.as_ref();
    let buffer = image::ImageBuffer::<Rgba<u16>, Vec<u16>>::from_raw(image.width, image.height, image.to_rgba16())
        .ok_or(RenderError::BufferSize {
            width: image.width,
            height: image.height,
        })?;

    buffer.save_with_format(path, ImageFormat::Png)?;
    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}
