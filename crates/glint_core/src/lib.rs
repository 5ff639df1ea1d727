//! Glint Core - Scene description and loading.
//!
//! This crate provides:
//!
//! - **Scene description types**: `SceneDescription`, `Screen`, `CameraSetup`, `SurfaceDesc`
//! - **Validation**: `ConfigError` for parameters that cannot be rendered
//! - **Loading**: JSON scene files via serde
//!
//! # Example
//!
//! ```ignore
//! use glint_core::load_scene_file;
//!
//! let scene = load_scene_file("scene.json")?;
//! println!("Loaded {} surfaces", scene.surface_count());
//! ```

pub mod loader;
pub mod scene;

// Re-export commonly used types
pub use loader::{default_scene_json, load_scene_file, load_scene_str, LoadError, LoadResult};
pub use scene::{
    CameraSetup, ConfigError, ConfigResult, Material, RenderSettings, SceneDescription, Screen,
    SurfaceDesc, MAX_DEPTH_LIMIT,
};
