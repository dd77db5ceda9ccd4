use serde::{Deserialize, Serialize};

use charm_types::Rgb;
use solid_kernel::RenderMesh;

/// One extruded logo shape placed in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedLogo {
    pub shape_id: u32,
    pub color: Rgb,
    pub mesh: RenderMesh,
}

/// The composed frame: plate plus logo group.
///
/// Derived, never persisted; rebuilt wholesale whenever an input changes.
/// Logo meshes sit on z = 0 and are shifted by `logo_z_offset` at render
/// time, so depth edits re-align without re-extruding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposedScene {
    pub plate_mesh: RenderMesh,
    /// Reason the plate is a fallback block, when it is.
    pub plate_fallback: Option<String>,
    pub logos: Vec<PlacedLogo>,
    /// Vertical translation applied to every logo mesh.
    pub logo_z_offset: f64,
}

impl ComposedScene {
    pub fn empty() -> Self {
        Self {
            plate_mesh: RenderMesh::empty(),
            plate_fallback: None,
            logos: Vec::new(),
            logo_z_offset: 0.0,
        }
    }

    /// Top of the plate in scene coordinates.
    pub fn plate_top(&self) -> f64 {
        self.plate_mesh.max_z().unwrap_or(0.0)
    }

    /// Lowest point of the logo group before the vertical offset.
    pub fn logo_floor(&self) -> Option<f64> {
        self.logos
            .iter()
            .filter_map(|l| l.mesh.min_z())
            .fold(None, |acc, z| Some(acc.map_or(z, |a: f64| a.min(z))))
    }
}
