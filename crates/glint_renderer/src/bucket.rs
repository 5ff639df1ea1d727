//! Band-based parallel rendering.
//!
//! Divides the image into horizontal bands of whole rows. Each band is a
//! contiguous slice of the pixel buffer, so rayon workers can fill their
//! bands in place without any locking.

use std::time::Instant;

use rayon::prelude::*;

use crate::renderer::{render_pixel, ImageBuffer, RenderConfig, RenderResult};
use crate::{Camera, Color, Lighting, Scene};

/// A horizontal strip of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// First image row of the band (row 0 is the top)
    pub y: u32,
    /// Number of rows in the band
    pub height: u32,
    /// Index of this band, top to bottom
    pub index: usize,
}

impl Band {
    /// Create a new band.
    pub fn new(y: u32, height: u32, index: usize) -> Self {
        Self { y, height, index }
    }

    /// Get the total number of pixels in this band.
    pub fn pixel_count(&self, image_width: u32) -> usize {
        self.height as usize * image_width as usize
    }
}

/// Default band height in rows.
pub const DEFAULT_BAND_HEIGHT: u32 = 16;

/// Split an image of `height` rows into bands of `band_height` rows.
///
/// The last band is shorter when the height isn't a multiple.
pub fn generate_bands(height: u32, band_height: u32) -> Vec<Band> {
    let band_height = band_height.max(1);
    let mut bands = Vec::new();

    let mut y = 0;
    while y < height {
        let h = band_height.min(height - y);
        bands.push(Band::new(y, h, bands.len()));
        y += band_height;
    }

    bands
}

/// Render a single band into its slice of the pixel buffer.
///
/// `pixels` holds the band's rows in order, `width` pixels each.
pub fn render_band(
    band: &Band,
    pixels: &mut [Color],
    camera: &Camera,
    scene: &Scene,
    lighting: &Lighting,
    config: &RenderConfig,
) -> RenderResult<()> {
    let width = camera.image_width();
    let height = camera.image_height();

    for local_y in 0..band.height {
        let row = band.y + local_y;
        // Screen j = 0 is the bottom of the scene
        let j = height - 1 - row;
        for i in 0..width {
            let color = render_pixel(camera, scene, lighting, i, j, config)?;
            pixels[(local_y * width + i) as usize] = color;
        }
    }

    log::debug!("Band {} (rows {}..{}) done", band.index, band.y, band.y + band.height);
    Ok(())
}

/// Render the entire scene with rayon, one band per work item.
///
/// Output is bit-identical to [`crate::render`]. If any pixel fails the
/// error is returned and the partially filled buffer is dropped.
pub fn render_parallel(
    camera: &Camera,
    scene: &Scene,
    lighting: &Lighting,
    config: &RenderConfig,
) -> RenderResult<ImageBuffer> {
    let width = camera.image_width();
    let height = camera.image_height();
    let bands = generate_bands(height, config.band_height);
    let mut image = ImageBuffer::new(width, height);

    let start = Instant::now();

    match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
            log::info!(
                "Rendering {}x{} in {} bands on {} threads (max depth {})",
                width,
                height,
                bands.len(),
                pool.current_num_threads(),
                config.max_depth
            );
            pool.install(|| render_bands(&bands, &mut image.pixels, camera, scene, lighting, config))?;
        }
        None => {
            log::info!(
                "Rendering {}x{} in {} bands on {} threads (max depth {})",
                width,
                height,
                bands.len(),
                rayon::current_num_threads(),
                config.max_depth
            );
            render_bands(&bands, &mut image.pixels, camera, scene, lighting, config)?;
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}

fn render_bands(
    bands: &[Band],
    pixels: &mut [Color],
    camera: &Camera,
    scene: &Scene,
    lighting: &Lighting,
    config: &RenderConfig,
) -> RenderResult<()> {
    let Some(first) = bands.first() else {
        return Ok(());
    };
    let chunk_len = first.pixel_count(camera.image_width());
    if chunk_len == 0 {
        return Ok(());
    }

    pixels
        .par_chunks_mut(chunk_len)
        .zip(bands.par_iter())
        .try_for_each(|(chunk, band)| render_band(band, chunk, camera, scene, lighting, config))
}
