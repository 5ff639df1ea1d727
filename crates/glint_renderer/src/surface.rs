//! Surface trait and nearest-hit record for ray-object intersection.

use crate::{Color, Ray};
use glint_math::{DVec3, DomainError};
use std::fmt::Debug;

/// Trait for objects that can be placed in a scene.
///
/// Implementors report intersections only through `intersect`, which must
/// already apply the shared epsilon snap so that a ray leaving the surface
/// does not hit it again at `t ≈ 0`.
pub trait Surface: Send + Sync + Debug {
    /// Distance along the ray to the nearest strictly positive hit, if any.
    fn intersect(&self, ray: &Ray) -> Option<f64>;

    /// Unit normal at a point on the surface.
    fn unit_normal(&self, point: DVec3) -> Result<DVec3, DomainError>;

    /// Flat surface color, each channel in [0, 1].
    fn color_raw(&self) -> Color;

    /// Blend factor between local and reflected color, in [0, 1].
    fn reflectiveness(&self) -> f64;
}

/// The nearest surface along a ray and the distance to it.
#[derive(Clone, Copy, Debug)]
pub struct Hit<'a> {
    pub surface: &'a dyn Surface,
    pub t: f64,
}
