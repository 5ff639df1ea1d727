//! Infinite axis-aligned plane primitive.

use crate::{surface::Surface, Color, Ray};
use glint_core::Material;
use glint_math::{snap_to_zero, Axis, DVec3, DomainError, VectorExt};

/// An infinite plane perpendicular to one coordinate axis.
///
/// The normal is always the positive axis direction, whichever side the
/// ray arrives from.
#[derive(Debug, Clone)]
pub struct Plane {
    axis: Axis,
    offset: f64,
    material: Material,
}

impl Plane {
    /// Create a plane at `offset` along `axis`.
    pub fn new(axis: Axis, offset: f64, material: Material) -> Self {
        Self {
            axis,
            offset,
            material,
        }
    }

    /// Create a horizontal plane at height `offset`.
    pub fn horizontal(offset: f64, material: Material) -> Self {
        Self::new(Axis::Y, offset, material)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}

impl Surface for Plane {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let direction = ray.direction().component(self.axis);

        // Parallel rays miss, even the ones lying in the plane
        if direction == 0.0 {
            return None;
        }

        let t = snap_to_zero((self.offset - ray.origin().component(self.axis)) / direction);
        if t <= 0.0 {
            return None;
        }

        Some(t)
    }

    fn unit_normal(&self, _point: DVec3) -> Result<DVec3, DomainError> {
        Ok(self.axis.unit_vector())
    }

    fn color_raw(&self) -> Color {
        self.material.color
    }

    fn reflectiveness(&self) -> f64 {
        self.material.reflectiveness
    }
}
