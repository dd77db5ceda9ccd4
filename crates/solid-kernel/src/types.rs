use serde::{Deserialize, Serialize};

/// Opaque handle to a solid in the geometry kernel.
/// NEVER persisted. Valid only for the current kernel session.
#[derive(Debug, Clone)]
pub struct KernelSolidHandle(pub(crate) u64);

impl KernelSolidHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }
}

/// Transient identifier for a standalone planar face awaiting extrusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelFaceId(pub u64);

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("tessellation failed: {reason}")]
    TessellationFailed { reason: String },

    #[error("face not found: {id:?}")]
    FaceNotFound { id: KernelFaceId },

    #[error("solid not found")]
    SolidNotFound,

    #[error("degenerate profile: {reason}")]
    DegenerateProfile { reason: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}

/// Tessellated triangle mesh for rendering and snapshot capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderMesh {
    /// Flat array of vertex positions [x0, y0, z0, x1, y1, z1, ...].
    pub vertices: Vec<f32>,
    /// Flat array of vertex normals [nx0, ny0, nz0, nx1, ny1, nz1, ...].
    pub normals: Vec<f32>,
    /// Triangle indices into the vertex array.
    pub indices: Vec<u32>,
}

impl RenderMesh {
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounding box (min, max). None for an empty mesh.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut min = [f64::MAX; 3];
        let mut max = [f64::MIN; 3];
        for chunk in self.vertices.chunks_exact(3) {
            for i in 0..3 {
                let c = chunk[i] as f64;
                min[i] = min[i].min(c);
                max[i] = max[i].max(c);
            }
        }
        Some((min, max))
    }

    /// Lowest Z coordinate of any vertex. None for an empty mesh.
    pub fn min_z(&self) -> Option<f64> {
        self.bounds().map(|(min, _)| min[2])
    }

    /// Highest Z coordinate of any vertex. None for an empty mesh.
    pub fn max_z(&self) -> Option<f64> {
        self.bounds().map(|(_, max)| max[2])
    }
}
