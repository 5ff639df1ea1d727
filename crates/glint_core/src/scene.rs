//! Scene description types for Glint.
//!
//! This module defines the validated, renderer-agnostic description of a
//! scene: the screen, the camera placement, the light, and the ordered list
//! of surfaces. The renderer builds its own runtime structures from it.

use glint_math::{Axis, DVec3, Interval, VectorExt};
use thiserror::Error;

/// Errors for scene parameters that cannot be rendered.
///
/// Every variant names the offending entity so the user can find it in the
/// scene file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{entity}: radius must be positive, got {radius}")]
    NonPositiveRadius { entity: String, radius: f64 },

    #[error("{entity}: {field} must be within [0, 1], got {value}")]
    OutOfUnitRange {
        entity: String,
        field: &'static str,
        value: f64,
    },

    #[error("{entity}: {field} must be finite")]
    NonFinite { entity: String, field: &'static str },

    #[error("screen: resolution must be positive, got {x_res}x{y_res}")]
    InvalidResolution { x_res: i64, y_res: i64 },

    #[error("screen: size must be positive, got {width}x{height}")]
    InvalidScreenSize { width: f64, height: f64 },

    #[error("camera: {0}")]
    DegenerateCamera(&'static str),

    #[error("{entity}: {field} must be at most {max}, got {value}")]
    OutOfRange {
        entity: String,
        field: &'static str,
        value: u64,
        max: u64,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// The world-space size and pixel resolution of the virtual screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    /// Screen width in world units
    pub width: f64,

    /// Screen height in world units
    pub height: f64,

    /// Horizontal resolution in pixels
    pub x_res: u32,

    /// Vertical resolution in pixels
    pub y_res: u32,
}

impl Screen {
    /// Create a screen, rejecting empty resolutions and non-positive sizes.
    pub fn new(width: f64, height: f64, x_res: i64, y_res: i64) -> ConfigResult<Self> {
        if x_res <= 0 || y_res <= 0 || x_res > u32::MAX as i64 || y_res > u32::MAX as i64 {
            return Err(ConfigError::InvalidResolution { x_res, y_res });
        }
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(ConfigError::InvalidScreenSize { width, height });
        }
        Ok(Self {
            width,
            height,
            x_res: x_res as u32,
            y_res: y_res as u32,
        })
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.x_res as usize * self.y_res as usize
    }
}

/// Where the camera sits and where it looks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSetup {
    pub eye: DVec3,
    pub look_at: DVec3,
    pub up: DVec3,
}

impl CameraSetup {
    /// Create a camera setup, rejecting placements with no defined basis.
    pub fn new(eye: DVec3, look_at: DVec3, up: DVec3) -> ConfigResult<Self> {
        check_finite("camera", "eye", eye)?;
        check_finite("camera", "look_at", look_at)?;
        check_finite("camera", "up", up)?;

        let w = (eye - look_at)
            .unit()
            .map_err(|_| ConfigError::DegenerateCamera("eye and look_at coincide"))?;
        up.cross(w)
            .unit()
            .map_err(|_| ConfigError::DegenerateCamera("up is parallel to the view direction"))?;

        Ok(Self { eye, look_at, up })
    }
}

/// Surface appearance: a flat color and a mirror blend factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Color (RGB, 0-1)
    pub color: DVec3,

    /// How much of the reflected color replaces the local color (0-1)
    pub reflectiveness: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: DVec3::splat(0.5), // Grey default
            reflectiveness: 0.0,
        }
    }
}

impl Material {
    /// Create a material, checking every channel and the blend factor.
    pub fn new(entity: &str, color: DVec3, reflectiveness: f64) -> ConfigResult<Self> {
        check_unit(entity, "red", color.x)?;
        check_unit(entity, "green", color.y)?;
        check_unit(entity, "blue", color.z)?;
        check_unit(entity, "reflectiveness", reflectiveness)?;
        Ok(Self {
            color,
            reflectiveness,
        })
    }
}

/// One analytic surface of the scene.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceDesc {
    Sphere {
        center: DVec3,
        radius: f64,
        material: Material,
    },
    /// An infinite plane perpendicular to `axis` at `offset` along it.
    Plane {
        axis: Axis,
        offset: f64,
        material: Material,
    },
}

impl SurfaceDesc {
    /// Create a sphere description.
    pub fn sphere(entity: &str, center: DVec3, radius: f64, material: Material) -> ConfigResult<Self> {
        check_finite(entity, "center", center)?;
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(ConfigError::NonPositiveRadius {
                entity: entity.to_string(),
                radius,
            });
        }
        Ok(Self::Sphere {
            center,
            radius,
            material,
        })
    }

    /// Create an axis-aligned plane description.
    pub fn plane(entity: &str, axis: Axis, offset: f64, material: Material) -> ConfigResult<Self> {
        if !offset.is_finite() {
            return Err(ConfigError::NonFinite {
                entity: entity.to_string(),
                field: "loc",
            });
        }
        Ok(Self::Plane {
            axis,
            offset,
            material,
        })
    }

    /// Short name of the surface kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::Plane { .. } => "plane",
        }
    }

    pub fn material(&self) -> &Material {
        match self {
            Self::Sphere { material, .. } | Self::Plane { material, .. } => material,
        }
    }
}

/// Largest accepted reflection bounce budget.
///
/// Shading recurses once per bounce, so the budget bounds the stack depth
/// of every render worker.
pub const MAX_DEPTH_LIMIT: u32 = 64;

/// Optional renderer overrides carried by a scene file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderSettings {
    pub max_depth: Option<u32>,
    pub background: Option<DVec3>,
    pub band_height: Option<u32>,
    pub threads: Option<usize>,
}

/// A complete, validated scene description.
#[derive(Clone, Debug)]
pub struct SceneDescription {
    /// Scene name (usually from filename)
    pub name: String,

    pub screen: Screen,

    pub camera: CameraSetup,

    /// Point light position
    pub light: DVec3,

    /// Uniform ambient term (0-1)
    pub ambient: f64,

    /// Surfaces in file order; the order breaks ties between equal hits.
    pub surfaces: Vec<SurfaceDesc>,

    pub render: RenderSettings,
}

impl SceneDescription {
    /// Assemble a scene description from already validated parts.
    pub fn new(
        name: impl Into<String>,
        screen: Screen,
        camera: CameraSetup,
        light: DVec3,
        ambient: f64,
    ) -> ConfigResult<Self> {
        check_finite("light", "position", light)?;
        check_unit("scene", "ambient_light", ambient)?;
        Ok(Self {
            name: name.into(),
            screen,
            camera,
            light,
            ambient,
            surfaces: Vec::new(),
            render: RenderSettings::default(),
        })
    }

    /// Append a surface; insertion order is preserved.
    pub fn add_surface(&mut self, surface: SurfaceDesc) {
        self.surfaces.push(surface);
    }

    /// Get surface count.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Indices of spheres that enclose the light.
    ///
    /// Such a scene is valid, but every point outside those spheres is in
    /// shadow, which is rarely what the author meant.
    pub fn spheres_enclosing_light(&self) -> Vec<usize> {
        self.surfaces
            .iter()
            .enumerate()
            .filter_map(|(i, surface)| match surface {
                SurfaceDesc::Sphere { center, radius, .. }
                    if (self.light - *center).length_squared() < radius * radius =>
                {
                    Some(i)
                }
                _ => None,
            })
            .collect()
    }
}

fn check_unit(entity: &str, field: &'static str, value: f64) -> ConfigResult<()> {
    if Interval::UNIT.contains(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange {
            entity: entity.to_string(),
            field,
            value,
        })
    }
}

fn check_finite(entity: &str, field: &'static str, v: DVec3) -> ConfigResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite {
            entity: entity.to_string(),
            field,
        })
    }
}
