//! Lumen Core - scene description, geometry loading and scheduling.
//!
//! This crate provides:
//!
//! - **Scene description**: `SceneDescription`, a serde model of cameras,
//!   materials and placed shapes, loaded from JSON
//! - **Meshes**: `Mesh` and OBJ loading
//! - **Scheduling**: `ThreadPool` with `parallel_for`, built on `SpinLock`
//! - **Reporting**: `ProgressBar` and the `Profile` scope timer
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{SceneDescription, ThreadPool};
//!
//! let description = SceneDescription::from_json_file("scene.json")?;
//! let meshes = description.load_meshes()?;
//!
//! let pool = ThreadPool::new(0);
//! pool.parallel_for(640, 480, |x, y| { /* shade pixel */ }, true);
//! pool.wait();
//! ```

pub mod mesh;
pub mod profile;
pub mod progress;
pub mod scene;
pub mod scheduler;

// Re-export commonly used types
pub use mesh::{Mesh, MeshError, MeshResult, MeshTriangle};
pub use profile::Profile;
pub use progress::ProgressBar;
pub use scene::{
    CameraDesc, FilmDesc, IntegratorKind, MaterialDesc, MaterialKindDesc, ObjectDesc,
    RenderDesc, SceneDescription, SceneError, SceneResult, ShapeDesc,
};
pub use scheduler::{SpinLock, SpinLockGuard, ThreadPool};
