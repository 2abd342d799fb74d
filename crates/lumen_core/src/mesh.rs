//! Triangle mesh geometry and OBJ ingestion.
//!
//! A `Mesh` is plain indexed geometry. The renderer turns it into a
//! triangle BVH; nothing here knows about rays.

use std::path::{Path, PathBuf};

use lumen_math::{Bounds, Vec3};
use thiserror::Error;

/// Errors that can occur while loading mesh files.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("No triangles found in {0}")]
    NoGeometry(PathBuf),
}

/// Result type for mesh loading.
pub type MeshResult<T> = Result<T, MeshError>;

/// A mesh consisting of vertex positions, optional normals, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Per-vertex normals, indexed like `positions`
    pub normals: Option<Vec<Vec3>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box
    pub bounds: Bounds,
}

/// One triangle pulled out of a mesh.
#[derive(Clone, Copy, Debug)]
pub struct MeshTriangle {
    pub positions: [Vec3; 3],
    pub normals: Option<[Vec3; 3]>,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    ///
    /// Normals whose count does not match the positions are dropped.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        let normals = normals.filter(|n| {
            let matches = n.len() == positions.len();
            if !matches {
                log::debug!(
                    "Normals array length ({}) doesn't match vertex count ({}), using face normals",
                    n.len(),
                    positions.len()
                );
            }
            matches
        });

        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            normals,
            indices,
            bounds,
        }
    }

    /// Load every shape of an OBJ file into a single mesh.
    ///
    /// Faces are triangulated on load. Per-vertex normals are kept only
    /// when every shape in the file provides them.
    pub fn load_obj<P: AsRef<Path>>(path: P) -> MeshResult<Self> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )?;

        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut indices = Vec::new();
        let mut all_have_normals = true;

        for model in &models {
            let mesh = &model.mesh;
            let base = positions.len() as u32;

            positions.extend(mesh.positions.chunks_exact(3).map(Vec3::from_slice));
            if mesh.normals.len() == mesh.positions.len() {
                normals.extend(mesh.normals.chunks_exact(3).map(Vec3::from_slice));
            } else {
                all_have_normals = false;
            }
            indices.extend(mesh.indices.iter().map(|i| base + i));
        }

        if indices.is_empty() {
            return Err(MeshError::NoGeometry(path.to_path_buf()));
        }

        let mesh = Self::new(positions, indices, all_have_normals.then_some(normals));
        log::info!(
            "Loaded {}: {} triangles, {} vertices, normals: {}",
            path.display(),
            mesh.triangle_count(),
            mesh.vertex_count(),
            mesh.has_normals()
        );
        Ok(mesh)
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Bounds {
        let mut bounds = Bounds::EMPTY;
        for pos in positions {
            bounds.expand(*pos);
        }
        bounds
    }

    /// Check if the mesh has normals.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Extract triangles with their vertex normals, skipping any that
    /// reference vertices out of range.
    pub fn triangles(&self) -> Vec<MeshTriangle> {
        let mut triangles = Vec::with_capacity(self.triangle_count());
        let vertex_count = self.positions.len();

        for chunk in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [chunk[0] as usize, chunk[1] as usize, chunk[2] as usize];

            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                log::warn!(
                    "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                    i0,
                    i1,
                    i2,
                    vertex_count
                );
                continue;
            }

            triangles.push(MeshTriangle {
                positions: [self.positions[i0], self.positions[i1], self.positions[i2]],
                normals: self
                    .normals
                    .as_ref()
                    .map(|n| [n[i0], n[i1], n[i2]]),
            });
        }

        triangles
    }
}
