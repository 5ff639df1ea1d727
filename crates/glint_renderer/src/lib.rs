//! Glint Renderer - CPU Ray Tracing
//!
//! A Whitted-style ray tracer for scenes made of spheres and axis-aligned
//! planes, lit by one point light and an ambient term. Surfaces are shaded
//! with a shadow test and a mirror-direction highlight, and reflective
//! surfaces recurse along the mirror ray up to a fixed bounce budget.

mod bucket;
mod camera;
mod output;
mod plane;
mod renderer;
mod scene;
mod sphere;
mod surface;

pub use bucket::{generate_bands, render_band, render_parallel, Band, DEFAULT_BAND_HEIGHT};
pub use camera::{local_basis, Camera};
pub use output::save_png;
pub use plane::Plane;
pub use renderer::{
    clamp_01, color_to_rgba16, render, render_pixel, ImageBuffer, RenderConfig, RenderError,
    RenderJob, RenderResult, DEFAULT_MAX_DEPTH,
};
pub use scene::{Lighting, Scene};
pub use sphere::Sphere;
pub use surface::{Hit, Surface};

/// Re-export math types from glint_math
pub use glint_math::{DVec3, Interval, Ray};

/// RGB color, each channel nominally in [0, 1].
pub type Color = DVec3;
