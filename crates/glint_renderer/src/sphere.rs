//! Sphere primitive for ray tracing.

use crate::{surface::Surface, Color, Ray};
use glint_core::Material;
use glint_math::{snap_to_zero, DVec3, DomainError, VectorExt};

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: DVec3,
    radius: f64,
    material: Material,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// The radius is expected to be positive; scene loading rejects
    /// anything else before a sphere is built.
    pub fn new(center: DVec3, radius: f64, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Surface for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<f64> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let b = 2.0 * oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let t1 = snap_to_zero((-b + sqrtd) / (2.0 * a));
        let t2 = snap_to_zero((-b - sqrtd) / (2.0 * a));

        // Roots at or behind the origin don't count
        match (t1 > 0.0, t2 > 0.0) {
            (true, true) => Some(t1.min(t2)),
            (true, false) => Some(t1),
            (false, true) => Some(t2),
            (false, false) => None,
        }
    }

    fn unit_normal(&self, point: DVec3) -> Result<DVec3, DomainError> {
        (point - self.center).unit()
    }

    fn color_raw(&self) -> Color {
        self.material.color
    }

    fn reflectiveness(&self) -> f64 {
        self.material.reflectiveness
    }
}
