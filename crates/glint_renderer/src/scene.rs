//! Runtime scene: nearest-hit queries and recursive shading.

use crate::surface::{Hit, Surface};
use crate::{Color, Plane, Ray, Sphere};
use glint_core::{SceneDescription, SurfaceDesc};
use glint_math::{DVec3, DomainError, VectorExt};

/// Everything about the lighting that a color query needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// Point light position
    pub light: DVec3,
    /// Uniform ambient term (0-1)
    pub ambient: f64,
    /// Color returned when a ray escapes the scene
    pub background: Color,
}

impl Lighting {
    /// The background is clamped to [0, 1] like every other color.
    pub fn new(light: DVec3, ambient: f64, background: Color) -> Self {
        Self {
            light,
            ambient,
            background: background.clamp(Color::ZERO, Color::ONE),
        }
    }
}

/// An ordered list of surfaces.
///
/// The order is observable: when two surfaces are hit at exactly the same
/// distance, the one added first wins.
#[derive(Debug, Default)]
pub struct Scene {
    surfaces: Vec<Box<dyn Surface>>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the runtime surfaces for a scene description, keeping file order.
    pub fn from_description(desc: &SceneDescription) -> Self {
        let mut scene = Self::new();
        for surface in &desc.surfaces {
            match *surface {
                SurfaceDesc::Sphere {
                    center,
                    radius,
                    material,
                } => scene.add(Box::new(Sphere::new(center, radius, material))),
                SurfaceDesc::Plane {
                    axis,
                    offset,
                    material,
                } => scene.add(Box::new(Plane::new(axis, offset, material))),
            }
        }
        scene
    }

    /// Add a surface to the end of the list.
    pub fn add(&mut self, surface: Box<dyn Surface>) {
        self.surfaces.push(surface);
    }

    /// Get the number of surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Find the surface with the smallest positive hit distance.
    pub fn find_nearest(&self, ray: &Ray) -> Option<Hit<'_>> {
        let mut nearest: Option<Hit<'_>> = None;

        for surface in &self.surfaces {
            if let Some(t) = surface.intersect(ray) {
                // Strictly closer only, so the first surface keeps a tie
                if nearest.map_or(true, |hit| t < hit.t) {
                    nearest = Some(Hit {
                        surface: surface.as_ref(),
                        t,
                    });
                }
            }
        }

        nearest
    }

    /// Compute the color seen along a ray.
    ///
    /// Shading is the product of a shadow test against the whole scene, a
    /// specular-style term `max(0, R·L)` where `R` is the mirror direction
    /// of the incoming ray, and an ambient term. Reflective surfaces blend
    /// that local color with the color traced along `R`, spending one unit
    /// of `depth` per bounce; when `depth` runs out the reflected color is
    /// the background.
    pub fn get_color(&self, ray: &Ray, lighting: &Lighting, depth: u32) -> Result<Color, DomainError> {
        let Some(hit) = self.find_nearest(ray) else {
            return Ok(lighting.background);
        };

        let surface = hit.surface;
        let point = ray.at(hit.t);
        let normal = surface.unit_normal(point)?;
        let to_light = (lighting.light - point).unit()?;

        let in_shadow = self.find_nearest(&Ray::new(point, to_light)).is_some();

        let incoming = (-ray.direction()).unit()?;
        let reflected_dir = (2.0 * incoming.dot(normal) * normal - incoming).unit()?;

        let scale = if in_shadow {
            0.0
        } else {
            reflected_dir.dot(to_light).max(0.0)
        };

        let color = surface.color_raw();
        let local = (color * scale + color * lighting.ambient).clamp(Color::ZERO, Color::ONE);

        let reflectiveness = surface.reflectiveness();
        if reflectiveness == 0.0 {
            return Ok(local);
        }

        let reflected = if depth > 0 {
            self.get_color(&Ray::new(point, reflected_dir), lighting, depth - 1)?
        } else {
            lighting.background
        };

        Ok(reflected * reflectiveness + local * (1.0 - reflectiveness))
    }
}
