//! Camera for ray generation.

use crate::Ray;
use glint_core::{CameraSetup, Screen};
use glint_math::{DVec3, DomainError, VectorExt};

/// Compute the screen-plane basis for a camera.
///
/// `u` points right on the screen and `v` points up. Fails when eye and
/// look_at coincide or when `up` is parallel to the view direction.
pub fn local_basis(eye: DVec3, look_at: DVec3, up: DVec3) -> Result<(DVec3, DVec3), DomainError> {
    let w = (eye - look_at).unit()?;
    let u = up.cross(w).unit()?;
    let v = w.cross(u);
    Ok((u, v))
}

/// Pinhole camera that shoots rays from the eye through a virtual screen
/// centred on the look-at point.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    eye: DVec3,
    look_at: DVec3,
    screen: Screen,

    // Cached basis (computed once in new())
    u: DVec3,
    v: DVec3,
}

impl Camera {
    /// Create a camera and compute its basis.
    pub fn new(setup: &CameraSetup, screen: Screen) -> Result<Self, DomainError> {
        let (u, v) = local_basis(setup.eye, setup.look_at, setup.up)?;
        Ok(Self {
            eye: setup.eye,
            look_at: setup.look_at,
            screen,
            u,
            v,
        })
    }

    /// Image width in pixels.
    pub fn image_width(&self) -> u32 {
        self.screen.x_res
    }

    /// Image height in pixels.
    pub fn image_height(&self) -> u32 {
        self.screen.y_res
    }

    pub fn eye(&self) -> DVec3 {
        self.eye
    }

    /// Screen-plane basis vectors (right, up).
    pub fn basis(&self) -> (DVec3, DVec3) {
        (self.u, self.v)
    }

    /// Generate the ray through the centre of pixel (i, j).
    ///
    /// `j` counts from the bottom of the screen; the render driver flips it
    /// when storing the pixel.
    pub fn pixel_to_ray(&self, i: u32, j: u32) -> Result<Ray, DomainError> {
        let cu = ((2.0 * i as f64 + 1.0) / (2.0 * self.screen.x_res as f64) - 0.5) * self.screen.width;
        let cv = ((2.0 * j as f64 + 1.0) / (2.0 * self.screen.y_res as f64) - 0.5) * self.screen.height;

        let pixel = self.look_at + self.u * cu + self.v * cv;
        Ok(Ray::new(self.eye, (pixel - self.eye).unit()?))
    }
}
