//! Tessellation wrapper around truck-meshalgo.

use crate::types::*;
use truck_meshalgo::prelude::*;
use truck_meshalgo::tessellation::{MeshableShape, MeshedShape};

type TruckSolid = truck_modeling::Solid;

/// Tessellate a truck Solid into a RenderMesh.
///
/// The meshed shells are merged into a single polygon mesh; the configurator
/// renders whole bodies and never picks individual faces.
pub fn tessellate_solid(solid: &TruckSolid, tolerance: f64) -> Result<RenderMesh, KernelError> {
    let meshed = solid.triangulation(tolerance);
    let mesh = meshed.to_polygon();

    let positions = mesh.positions();
    let normals = mesh.normals();
    let tri_faces = mesh.tri_faces();

    if positions.is_empty() || tri_faces.is_empty() {
        return Err(KernelError::TessellationFailed {
            reason: "triangulation produced no geometry".to_string(),
        });
    }

    let mut vertices = Vec::with_capacity(positions.len() * 3);
    let mut norms = Vec::with_capacity(positions.len() * 3);
    let mut indices = Vec::with_capacity(tri_faces.len() * 3);

    for pos in positions {
        vertices.push(pos[0] as f32);
        vertices.push(pos[1] as f32);
        vertices.push(pos[2] as f32);
    }

    if normals.is_empty() {
        for _ in 0..positions.len() {
            norms.push(0.0);
            norms.push(0.0);
            norms.push(1.0);
        }
    } else {
        for norm in normals {
            norms.push(norm[0] as f32);
            norms.push(norm[1] as f32);
            norms.push(norm[2] as f32);
        }
    }

    for tri in tri_faces {
        for v in tri.iter() {
            indices.push(v.pos as u32);
        }
    }

    Ok(RenderMesh {
        vertices,
        normals: norms,
        indices,
    })
}
