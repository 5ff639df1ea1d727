//! Core ray tracing render driver.
//!
//! Implements Whitted-style ray tracing with:
//! - One camera ray per pixel
//! - Shadow rays toward a single point light
//! - Recursive mirror reflection with a bounce budget

use std::time::Instant;

use crate::{Camera, Color, Lighting, Scene};
use glint_core::{RenderSettings, SceneDescription, MAX_DEPTH_LIMIT};
use glint_math::{DomainError, Interval};
use thiserror::Error;

/// Errors that abort a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Degenerate camera: {0}")]
    Camera(#[source] DomainError),

    #[error("Pixel ({x}, {y}): {source}")]
    Pixel {
        x: u32,
        y: u32,
        #[source]
        source: DomainError,
    },

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pixel buffer does not match a {width}x{height} image")]
    BufferSize { width: u32, height: u32 },
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Default number of reflection bounces.
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Maximum reflection bounce depth
    pub max_depth: u32,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Rows per parallel work item
    pub band_height: u32,
    /// Worker threads; `None` uses the global rayon pool
    pub threads: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            background: Color::ZERO,
            band_height: crate::DEFAULT_BAND_HEIGHT,
            threads: None,
        }
    }
}

impl RenderConfig {
    /// Apply the overrides a scene file carries.
    pub fn with_settings(mut self, settings: &RenderSettings) -> Self {
        if let Some(max_depth) = settings.max_depth {
            self = self.with_max_depth(max_depth);
        }
        if let Some(background) = settings.background {
            self.background = background;
        }
        if let Some(band_height) = settings.band_height {
            self.band_height = band_height;
        }
        if settings.threads.is_some() {
            self.threads = settings.threads;
        }
        self
    }

    /// Set the reflection bounce budget, capped at [`MAX_DEPTH_LIMIT`].
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        if max_depth > MAX_DEPTH_LIMIT {
            log::warn!("max depth {} capped at {}", max_depth, MAX_DEPTH_LIMIT);
        }
        self.max_depth = max_depth.min(MAX_DEPTH_LIMIT);
        self
    }

    /// Set the number of rows per parallel work item.
    pub fn with_band_height(mut self, band_height: u32) -> Self {
        self.band_height = band_height.max(1);
        self
    }

    /// Pin the worker count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f64) -> f64 {
    Interval::UNIT.clamp(x)
}

/// Convert a color to 16-bit RGBA with full opacity.
pub fn color_to_rgba16(color: Color) -> [u16; 4] {
    let r = (65535.0 * clamp_01(color.x)) as u16;
    let g = (65535.0 * clamp_01(color.y)) as u16;
    let b = (65535.0 * clamp_01(color.z)) as u16;
    [r, g, b, u16::MAX]
}

/// Compute the color of pixel (i, j), where `j` counts from the bottom.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    lighting: &Lighting,
    i: u32,
    j: u32,
    config: &RenderConfig,
) -> RenderResult<Color> {
    let pixel_error = |source| RenderError::Pixel { x: i, y: j, source };
    let ray = camera.pixel_to_ray(i, j).map_err(pixel_error)?;
    scene
        .get_color(&ray, lighting, config.max_depth)
        .map_err(pixel_error)
}

/// Image buffer for storing render output.
///
/// Row 0 is the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Convert to interleaved 16-bit RGBA samples (for saving).
    pub fn to_rgba16(&self) -> Vec<u16> {
        let mut samples = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            samples.extend_from_slice(&color_to_rgba16(*color));
        }
        samples
    }
}

/// The prepared inputs of a render: camera, surfaces and lighting.
#[derive(Debug)]
pub struct RenderJob {
    pub camera: Camera,
    pub scene: Scene,
    pub lighting: Lighting,
    pub config: RenderConfig,
}

impl RenderJob {
    /// Build everything a render needs from a validated description.
    ///
    /// `config` should already include any overrides from the description.
    pub fn new(desc: &SceneDescription, config: RenderConfig) -> RenderResult<Self> {
        let camera = Camera::new(&desc.camera, desc.screen).map_err(RenderError::Camera)?;
        let scene = Scene::from_description(desc);
        let lighting = Lighting::new(desc.light, desc.ambient, config.background);
        Ok(Self {
            camera,
            scene,
            lighting,
            config,
        })
    }

    /// Render on the calling thread.
    pub fn render(&self) -> RenderResult<ImageBuffer> {
        render(&self.camera, &self.scene, &self.lighting, &self.config)
    }

    /// Render in parallel bands.
    pub fn render_parallel(&self) -> RenderResult<ImageBuffer> {
        crate::render_parallel(&self.camera, &self.scene, &self.lighting, &self.config)
    }
}

/// Render the entire scene to an image buffer.
///
/// This is the single-threaded reference driver; `render_parallel`
/// produces identical output.
pub fn render(
    camera: &Camera,
    scene: &Scene,
    lighting: &Lighting,
    config: &RenderConfig,
) -> RenderResult<ImageBuffer> {
    let width = camera.image_width();
    let height = camera.image_height();
    let mut image = ImageBuffer::new(width, height);

    log::info!("Rendering {}x{} (serial, max depth {})", width, height, config.max_depth);
    let start = Instant::now();

    for i in 0..width {
        for j in 0..height {
            let color = render_pixel(camera, scene, lighting, i, j, config)?;
            // Screen j = 0 is the bottom of the scene
            image.set(i, height - 1 - j, color);
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sphere;
    use glint_core::{CameraSetup, Material, Screen};
    use glint_math::DVec3;

    fn sphere_job(x_res: i64, y_res: i64) -> (Camera, Scene, Lighting) {
        let setup = CameraSetup::new(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, DVec3::Y).unwrap();
        let camera = Camera::new(&setup, Screen::new(4.0, 4.0, x_res, y_res).unwrap()).unwrap();

        let mut scene = Scene::new();
        scene.add(Box::new(Sphere::new(
            DVec3::ZERO,
            1.0,
            Material {
                color: Color::new(1.0, 0.5, 0.25),
                reflectiveness: 0.0,
            },
        )));

        let lighting = Lighting::new(DVec3::new(0.0, 0.0, 1000.0), 0.1, Color::ZERO);
        (camera, scene, lighting)
    }

    #[test]
    fn test_color_to_rgba16() {
        assert_eq!(color_to_rgba16(Color::ZERO), [0, 0, 0, 65535]);
        assert_eq!(color_to_rgba16(Color::ONE), [65535, 65535, 65535, 65535]);
        assert_eq!(color_to_rgba16(Color::new(-1.0, 2.0, 0.5)), [0, 65535, 32767, 65535]);
    }

    #[test]
    fn test_image_buffer() {
        let mut image = ImageBuffer::new(3, 2);
        assert_eq!(image.pixels.len(), 6);

        image.set(2, 1, Color::ONE);
        assert_eq!(image.get(2, 1), Color::ONE);
        assert_eq!(image.pixels[5], Color::ONE);

        let samples = image.to_rgba16();
        assert_eq!(samples.len(), 24);
        assert_eq!(&samples[20..24], &[65535, 65535, 65535, 65535]);
        assert_eq!(&samples[0..4], &[0, 0, 0, 65535]);
    }

    #[test]
    fn test_render_center_and_corner() {
        let (camera, scene, lighting) = sphere_job(5, 5);
        let image = render(&camera, &scene, &lighting, &RenderConfig::default()).unwrap();

        // Centre pixel sees the lit front of the sphere
        let center = image.get(2, 2);
        assert!((center - Color::new(1.0, 0.55, 0.275)).length() < 1e-9);

        // Corners miss the sphere
        assert_eq!(image.get(0, 0), Color::ZERO);
        assert_eq!(image.get(4, 4), Color::ZERO);
    }

    #[test]
    fn test_render_flips_vertically() {
        // Only the bottom half of the screen sees the sphere when it sits low
        let setup = CameraSetup::new(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, DVec3::Y).unwrap();
        let camera = Camera::new(&setup, Screen::new(4.0, 4.0, 1, 2).unwrap()).unwrap();
        let mut scene = Scene::new();
        scene.add(Box::new(Sphere::new(DVec3::new(0.0, -1.0, 0.0), 0.5, Material::default())));
        let lighting = Lighting::new(DVec3::new(0.0, 0.0, 1000.0), 0.1, Color::ZERO);

        let image = render(&camera, &scene, &lighting, &RenderConfig::default()).unwrap();
        assert_eq!(image.get(0, 0), Color::ZERO, "top row is empty sky");
        assert!(image.get(0, 1).length() > 0.0, "bottom row shows the sphere");
    }

    #[test]
    fn test_render_is_deterministic() {
        let (camera, scene, lighting) = sphere_job(9, 7);
        let config = RenderConfig::default();
        let a = render(&camera, &scene, &lighting, &config).unwrap();
        let b = render(&camera, &scene, &lighting, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pixel_error_is_reported() {
        let (camera, scene, _) = sphere_job(3, 3);
        // Light exactly on the point the centre ray hits
        let lighting = Lighting::new(DVec3::new(0.0, 0.0, 1.0), 0.1, Color::ZERO);

        let err = render(&camera, &scene, &lighting, &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, RenderError::Pixel { x: 1, y: 1, .. }), "{}", err);
    }

    #[test]
    fn test_config_with_settings() {
        let settings = RenderSettings {
            max_depth: Some(2),
            background: Some(Color::ONE),
            band_height: None,
            threads: Some(3),
        };
        let config = RenderConfig::default().with_settings(&settings);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.background, Color::ONE);
        assert_eq!(config.band_height, crate::DEFAULT_BAND_HEIGHT);
        assert_eq!(config.threads, Some(3));

        let config = config.with_max_depth(5).with_band_height(0).with_threads(1);
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.band_height, 1);
        assert_eq!(config.threads, Some(1));
    }

    #[test]
    fn test_max_depth_is_capped() {
        let config = RenderConfig::default().with_max_depth(4_000_000_000);
        assert_eq!(config.max_depth, MAX_DEPTH_LIMIT);

        let settings = RenderSettings {
            max_depth: Some(u32::MAX),
            ..Default::default()
        };
        let config = RenderConfig::default().with_settings(&settings);
        assert_eq!(config.max_depth, MAX_DEPTH_LIMIT);
    }

    #[test]
    fn test_facing_mirrors_with_huge_budget_finish() {
        use crate::Plane;
        use glint_math::Axis;

        let setup = CameraSetup::new(DVec3::new(0.0, 0.0, 10.0), DVec3::ZERO, DVec3::Y).unwrap();
        let camera = Camera::new(&setup, Screen::new(1.0, 1.0, 1, 1).unwrap()).unwrap();
        let mirror = Material {
            color: Color::ZERO,
            reflectiveness: 1.0,
        };
        let mut scene = Scene::new();
        scene.add(Box::new(Plane::new(Axis::Z, 0.0, mirror)));
        scene.add(Box::new(Plane::new(Axis::Z, 20.0, mirror)));
        let background = Color::new(0.2, 0.4, 0.6);
        let lighting = Lighting::new(DVec3::new(0.0, 5.0, 10.0), 0.1, background);

        let config = RenderConfig::default().with_max_depth(u32::MAX);
        let image = render(&camera, &scene, &lighting, &config).unwrap();
        assert!((image.get(0, 0) - background).length() < 1e-12);
    }
}
