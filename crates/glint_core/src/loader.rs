//! JSON scene loading.
//!
//! The on-disk format mirrors the scene files the renderer has always
//! read: a screen, a camera, one light, an ambient term and a list of
//! tagged surfaces. Declarations are deserialized as-is and then turned
//! into a validated [`SceneDescription`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use glint_math::{Axis, DVec3, Interval};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::{
    CameraSetup, ConfigError, Material, RenderSettings, SceneDescription, Screen, SurfaceDesc,
    MAX_DEPTH_LIMIT,
};

/// Errors that can occur while loading a scene.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
struct VectorDecl {
    x: f64,
    y: f64,
    z: f64,
}

impl From<VectorDecl> for DVec3 {
    fn from(v: VectorDecl) -> Self {
        DVec3::new(v.x, v.y, v.z)
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct ScreenDecl {
    w: f64,
    h: f64,
    // Signed so a negative value reaches validation instead of failing in serde
    xres: i64,
    yres: i64,
}

#[derive(Debug, Deserialize, Serialize)]
struct CameraDecl {
    eye: VectorDecl,
    look_at: VectorDecl,
    up: VectorDecl,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum AxisDecl {
    X,
    Y,
    Z,
}

impl From<AxisDecl> for Axis {
    fn from(axis: AxisDecl) -> Self {
        match axis {
            AxisDecl::X => Axis::X,
            AxisDecl::Y => Axis::Y,
            AxisDecl::Z => Axis::Z,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct SphereDecl {
    center: VectorDecl,
    radius: f64,
    #[serde(default)]
    reflectiveness: f64,
    red: f64,
    green: f64,
    blue: f64,
}

#[derive(Debug, Deserialize, Serialize)]
struct PlaneDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    axis: Option<AxisDecl>,
    loc: f64,
    #[serde(default)]
    reflectiveness: f64,
    red: f64,
    green: f64,
    blue: f64,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", tag = "type")]
enum SurfaceDecl {
    Sphere(SphereDecl),
    #[serde(alias = "yplane")]
    Plane(PlaneDecl),
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RenderDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background: Option<VectorDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    band_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    threads: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize)]
struct SceneDecl {
    screen: ScreenDecl,
    camera: CameraDecl,
    light: VectorDecl,
    #[serde(default)]
    ambient_light: f64,
    #[serde(default)]
    surfaces: Vec<SurfaceDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    render: Option<RenderDecl>,
}

/// Load a JSON scene file and return a validated description.
///
/// # Example
///
/// ```ignore
/// use glint_core::load_scene_file;
///
/// let scene = load_scene_file("scenes/two_spheres.json")?;
/// println!("Loaded {} surfaces", scene.surface_count());
/// ```
pub fn load_scene_file<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");

    let reader = BufReader::new(File::open(path)?);
    let decl: SceneDecl = serde_json::from_reader(reader)?;
    let scene = build_scene(name, decl)?;

    log::info!(
        "Loaded scene '{}' from {}: {} surfaces, {}x{} pixels",
        scene.name,
        path.display(),
        scene.surface_count(),
        scene.screen.x_res,
        scene.screen.y_res
    );
    Ok(scene)
}

/// Load a scene from a JSON string.
pub fn load_scene_str(name: &str, json: &str) -> LoadResult<SceneDescription> {
    let decl: SceneDecl = serde_json::from_str(json)?;
    Ok(build_scene(name, decl)?)
}

fn build_scene(name: &str, decl: SceneDecl) -> Result<SceneDescription, ConfigError> {
    let screen = Screen::new(decl.screen.w, decl.screen.h, decl.screen.xres, decl.screen.yres)?;
    let camera = CameraSetup::new(
        decl.camera.eye.into(),
        decl.camera.look_at.into(),
        decl.camera.up.into(),
    )?;

    let mut scene = SceneDescription::new(name, screen, camera, decl.light.into(), decl.ambient_light)?;

    for (i, surface) in decl.surfaces.into_iter().enumerate() {
        let entity = format!("surfaces[{}]", i);
        let desc = match surface {
            SurfaceDecl::Sphere(s) => {
                let material = Material::new(&entity, DVec3::new(s.red, s.green, s.blue), s.reflectiveness)?;
                SurfaceDesc::sphere(&entity, s.center.into(), s.radius, material)?
            }
            SurfaceDecl::Plane(p) => {
                let material = Material::new(&entity, DVec3::new(p.red, p.green, p.blue), p.reflectiveness)?;
                let axis = p.axis.map(Axis::from).unwrap_or_default();
                SurfaceDesc::plane(&entity, axis, p.loc, material)?
            }
        };
        log::debug!("{}: {}", entity, desc.kind());
        scene.add_surface(desc);
    }

    if let Some(render) = decl.render {
        if let Some(max_depth) = render.max_depth.filter(|&d| d > MAX_DEPTH_LIMIT) {
            return Err(ConfigError::OutOfRange {
                entity: "render".to_string(),
                field: "max_depth",
                value: max_depth.into(),
                max: MAX_DEPTH_LIMIT.into(),
            });
        }
        let background = render.background.map(DVec3::from);
        if let Some(bg) = background {
            if !Interval::UNIT.contains_vector(bg) {
                return Err(ConfigError::OutOfUnitRange {
                    entity: "render".to_string(),
                    field: "background",
                    value: if bg.min_element() < 0.0 { bg.min_element() } else { bg.max_element() },
                });
            }
        }
        scene.render = RenderSettings {
            max_depth: render.max_depth,
            background,
            band_height: render.band_height,
            threads: render.threads,
        };
    }

    if scene.surfaces.is_empty() {
        log::warn!("Scene '{}' has no surfaces; every pixel will be background", scene.name);
    }
    for i in scene.spheres_enclosing_light() {
        log::warn!("Light is inside surfaces[{}]; everything outside it is in shadow", i);
    }

    Ok(scene)
}

/// The classic two-sphere scene as a JSON document.
///
/// A blue sphere above a large green one, lit from the right, with a
/// mirror floor below both.
pub fn default_scene_json() -> serde_json::Result<String> {
    let v = |x, y, z| VectorDecl { x, y, z };
    let decl = SceneDecl {
        screen: ScreenDecl {
            w: 100.0,
            h: 100.0,
            xres: 1000,
            yres: 1000,
        },
        camera: CameraDecl {
            eye: v(0.0, 0.0, 1000.0),
            look_at: v(0.0, 0.0, 0.0),
            up: v(0.0, 1.0, 0.0),
        },
        light: v(1000.0, 0.0, 1000.0),
        ambient_light: 0.1,
        surfaces: vec![
            SurfaceDecl::Sphere(SphereDecl {
                center: v(5.0, 15.0, 0.0),
                radius: 5.0,
                reflectiveness: 0.2,
                red: 0.0,
                green: 0.0,
                blue: 1.0,
            }),
            SurfaceDecl::Sphere(SphereDecl {
                center: v(0.0, 0.0, -15.0),
                radius: 15.0,
                reflectiveness: 0.3,
                red: 0.0,
                green: 1.0,
                blue: 0.0,
            }),
            SurfaceDecl::Plane(PlaneDecl {
                axis: Some(AxisDecl::Y),
                loc: -20.0,
                reflectiveness: 0.5,
                red: 1.0,
                green: 1.0,
                blue: 1.0,
            }),
        ],
        render: None,
    };

    serde_json::to_string_pretty(&decl)
}
