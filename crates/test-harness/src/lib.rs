//! Scenario harness: configurator rigs over both kernels, shape-batch
//! builders, and mesh oracles.

use charm_types::{ImportedShape, Rgb, Vec2};
use scene_engine::Studio;
use solid_kernel::{Kernel, MockKernel, RenderMesh, TruckKernel};

/// Unified error type for the harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },
}

/// A studio wired to a kernel, ready to drive scenarios.
pub struct ConfiguratorRig<K: Kernel> {
    pub studio: Studio<K>,
}

impl ConfiguratorRig<MockKernel> {
    pub fn mock() -> Self {
        Self {
            studio: Studio::new(MockKernel::new()),
        }
    }
}

impl ConfiguratorRig<TruckKernel> {
    pub fn truck() -> Self {
        Self {
            studio: Studio::new(TruckKernel::new()),
        }
    }
}

// ── Shape-Batch Builders ────────────────────────────────────────────────────

/// Build an axis-aligned rectangle shape for batch construction.
pub fn rect_shape(id: u32, x: f64, y: f64, w: f64, h: f64) -> ImportedShape {
    ImportedShape {
        id,
        name: format!("Part {}", id),
        fill: Rgb::NEUTRAL,
        current_color: Rgb::NEUTRAL,
        outer: vec![
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ],
        holes: Vec::new(),
    }
}

// ── Mesh Oracles ────────────────────────────────────────────────────────────

/// Absolute volume of a closed triangle mesh via the divergence theorem.
pub fn mesh_volume(mesh: &RenderMesh) -> f64 {
    let mut volume = 0.0;
    for tri in mesh.indices.chunks_exact(3) {
        let p: Vec<[f64; 3]> = tri
            .iter()
            .map(|&i| {
                let b = i as usize * 3;
                [
                    mesh.vertices[b] as f64,
                    mesh.vertices[b + 1] as f64,
                    mesh.vertices[b + 2] as f64,
                ]
            })
            .collect();
        // Scalar triple product of the three position vectors.
        volume += (p[0][0] * (p[1][1] * p[2][2] - p[1][2] * p[2][1])
            - p[0][1] * (p[1][0] * p[2][2] - p[1][2] * p[2][0])
            + p[0][2] * (p[1][0] * p[2][1] - p[1][1] * p[2][0]))
            / 6.0;
    }
    volume.abs()
}

/// Smallest radial distance from `center` among mesh vertices whose Z lies
/// in `[z_min, z_max]`. Infinity when no vertex is in the slab.
pub fn min_radial_distance(mesh: &RenderMesh, center: [f64; 2], z_min: f64, z_max: f64) -> f64 {
    let mut min_dist = f64::INFINITY;
    for chunk in mesh.vertices.chunks_exact(3) {
        let (x, y, z) = (chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
        if z < z_min || z > z_max {
            continue;
        }
        let d = ((x - center[0]).powi(2) + (y - center[1]).powi(2)).sqrt();
        min_dist = min_dist.min(d);
    }
    min_dist
}

/// Check that a through-hole exists around `center`: no material vertex
/// strictly inside the hole radius, and wall vertices present near it
/// through the whole depth range.
pub fn assert_through_hole(
    mesh: &RenderMesh,
    center: [f64; 2],
    hole_radius: f64,
    depth: f64,
) -> Result<(), HarnessError> {
    // Chord midpoints of the tessellated wall dip slightly inside the true
    // radius; 0.15 mm of slack covers that without masking real leftovers.
    let tol = 0.15;

    let nearest = min_radial_distance(mesh, center, 0.0, depth);
    if nearest < hole_radius - tol {
        return Err(HarnessError::OracleFailure {
            oracle: "through-hole".to_string(),
            detail: format!(
                "material at radial distance {:.3} inside hole radius {:.3}",
                nearest, hole_radius
            ),
        });
    }

    // Wall coverage: vertices near the hole radius both at the bottom and
    // the top of the plate.
    for (z_lo, z_hi) in [(0.0, depth * 0.25), (depth * 0.75, depth)] {
        let nearest = min_radial_distance(mesh, center, z_lo, z_hi);
        if nearest > hole_radius + tol {
            return Err(HarnessError::OracleFailure {
                oracle: "through-hole".to_string(),
                detail: format!(
                    "no hole wall between z {:.2} and {:.2} (nearest vertex at {:.3})",
                    z_lo, z_hi, nearest
                ),
            });
        }
    }
    Ok(())
}
