//! MockKernel — deterministic test double implementing Kernel.
//!
//! Tracks solids as bounding boxes with analytically computed volumes and
//! produces synthetic box meshes. Used by forge-ops and scene-engine for
//! unit testing without the truck dependency cost.

use std::collections::HashMap;

use crate::traits::Kernel;
use crate::types::*;

/// A pending planar face with its contour geometry.
#[derive(Debug, Clone)]
struct MockFace {
    outer: Vec<[f64; 2]>,
    holes: Vec<Vec<[f64; 2]>>,
    z: f64,
}

/// A synthetic solid: bounding box plus analytic volume.
#[derive(Debug, Clone)]
struct MockSolid {
    min: [f64; 3],
    max: [f64; 3],
    volume: f64,
}

/// Deterministic test double for the geometry kernel.
pub struct MockKernel {
    next_handle: u64,
    next_face_id: u64,
    solids: HashMap<u64, MockSolid>,
    standalone_faces: HashMap<u64, MockFace>,
    /// When set, the next boolean operation fails. Used to exercise the
    /// geometry fallback path deterministically.
    fail_next_boolean: bool,
}

/// Shoelace area of a polygon (absolute value).
fn polygon_area(points: &[[f64; 2]]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        sum += points[i][0] * points[j][1] - points[j][0] * points[i][1];
    }
    sum.abs() / 2.0
}

fn contour_bounds(points: &[[f64; 2]]) -> ([f64; 2], [f64; 2]) {
    let mut min = [f64::MAX; 2];
    let mut max = [f64::MIN; 2];
    for p in points {
        for i in 0..2 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
    (min, max)
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            next_face_id: 1,
            solids: HashMap::new(),
            standalone_faces: HashMap::new(),
            fail_next_boolean: false,
        }
    }

    /// Make the next boolean_union / boolean_subtract call fail.
    pub fn fail_next_boolean(&mut self) {
        self.fail_next_boolean = true;
    }

    fn alloc_handle(&mut self) -> KernelSolidHandle {
        let h = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn store(&mut self, solid: MockSolid) -> KernelSolidHandle {
        let handle = self.alloc_handle();
        self.solids.insert(handle.id(), solid);
        handle
    }

    fn get(&self, handle: &KernelSolidHandle) -> Result<&MockSolid, KernelError> {
        self.solids.get(&handle.id()).ok_or(KernelError::SolidNotFound)
    }

    fn take_boolean_failure(&mut self) -> Result<(), KernelError> {
        if self.fail_next_boolean {
            self.fail_next_boolean = false;
            return Err(KernelError::BooleanFailed {
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    /// Volume of a stored solid (analytic, not mesh-derived).
    pub fn solid_volume(&self, handle: &KernelSolidHandle) -> Option<f64> {
        self.solids.get(&handle.id()).map(|s| s.volume)
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for MockKernel {
    fn make_face(
        &mut self,
        outer: &[[f64; 2]],
        holes: &[Vec<[f64; 2]>],
        z: f64,
    ) -> Result<KernelFaceId, KernelError> {
        if outer.len() < 3 {
            return Err(KernelError::DegenerateProfile {
                reason: format!("contour has {} points, need at least 3", outer.len()),
            });
        }
        let id = KernelFaceId(self.next_face_id);
        self.next_face_id += 1;
        self.standalone_faces.insert(
            id.0,
            MockFace {
                outer: outer.to_vec(),
                holes: holes.to_vec(),
                z,
            },
        );
        Ok(id)
    }

    fn extrude_face(
        &mut self,
        face: KernelFaceId,
        depth: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let face = self
            .standalone_faces
            .remove(&face.0)
            .ok_or(KernelError::FaceNotFound { id: face })?;

        let (min2, max2) = contour_bounds(&face.outer);
        let area = polygon_area(&face.outer)
            - face.holes.iter().map(|h| polygon_area(h)).sum::<f64>();

        Ok(self.store(MockSolid {
            min: [min2[0], min2[1], face.z],
            max: [max2[0], max2[1], face.z + depth],
            volume: area * depth,
        }))
    }

    fn make_cylinder(
        &mut self,
        center: [f64; 2],
        radius: f64,
        z0: f64,
        height: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        if radius <= 0.0 || height <= 0.0 {
            return Err(KernelError::DegenerateProfile {
                reason: format!("cylinder radius {} / height {}", radius, height),
            });
        }
        Ok(self.store(MockSolid {
            min: [center[0] - radius, center[1] - radius, z0],
            max: [center[0] + radius, center[1] + radius, z0 + height],
            volume: std::f64::consts::PI * radius * radius * height,
        }))
    }

    fn make_block(
        &mut self,
        min: [f64; 3],
        size: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        if size.iter().any(|&s| s <= 0.0) {
            return Err(KernelError::DegenerateProfile {
                reason: format!("block size {:?}", size),
            });
        }
        Ok(self.store(MockSolid {
            min,
            max: [min[0] + size[0], min[1] + size[1], min[2] + size[2]],
            volume: size[0] * size[1] * size[2],
        }))
    }

    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.take_boolean_failure()?;
        let sa = self.get(a)?.clone();
        let sb = self.get(b)?.clone();
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for i in 0..3 {
            min[i] = sa.min[i].min(sb.min[i]);
            max[i] = sa.max[i].max(sb.max[i]);
        }
        // Synthetic: assumes disjoint bodies. Good enough for deterministic
        // assertions on bounds and relative volume changes.
        Ok(self.store(MockSolid {
            min,
            max,
            volume: sa.volume + sb.volume,
        }))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.take_boolean_failure()?;
        let sa = self.get(a)?.clone();
        let sb = self.get(b)?.clone();
        Ok(self.store(MockSolid {
            min: sa.min,
            max: sa.max,
            volume: (sa.volume - sb.volume).max(0.0),
        }))
    }

    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        _tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        let s = self.get(solid)?.clone();
        Ok(box_mesh(s.min, s.max))
    }
}

/// Synthetic axis-aligned box mesh: 24 vertices (4 per face, so normals are
/// flat), 12 triangles.
fn box_mesh(min: [f64; 3], max: [f64; 3]) -> RenderMesh {
    let mut vertices: Vec<f32> = Vec::with_capacity(24 * 3);
    let mut normals: Vec<f32> = Vec::with_capacity(24 * 3);
    let mut indices: Vec<u32> = Vec::with_capacity(36);

    // (axis, sign): face on `axis` at min (sign=0) or max (sign=1).
    for (axis, sign) in [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)] {
        let u = (axis + 1) % 3;
        let v = (axis + 2) % 3;
        let plane = if sign == 0 { min[axis] } else { max[axis] };
        let base = (vertices.len() / 3) as u32;

        for (du, dv) in [(0, 0), (1, 0), (1, 1), (0, 1)] {
            let mut p = [0.0; 3];
            p[axis] = plane;
            p[u] = if du == 0 { min[u] } else { max[u] };
            p[v] = if dv == 0 { min[v] } else { max[v] };
            vertices.extend_from_slice(&[p[0] as f32, p[1] as f32, p[2] as f32]);

            let mut n = [0.0f32; 3];
            n[axis] = if sign == 0 { -1.0 } else { 1.0 };
            normals.extend_from_slice(&n);
        }

        if sign == 1 {
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        } else {
            indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        }
    }

    RenderMesh {
        vertices,
        normals,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extrude_square_volume() {
        let mut kernel = MockKernel::new();
        let outer = [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]];
        let face = kernel.make_face(&outer, &[], 0.0).unwrap();
        let handle = kernel.extrude_face(face, 3.0).unwrap();
        assert!((kernel.solid_volume(&handle).unwrap() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn extrude_with_hole_subtracts_area() {
        let mut kernel = MockKernel::new();
        let outer = vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]];
        let hole = vec![[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 2.0]];
        let face = kernel.make_face(&outer, &[hole], 0.0).unwrap();
        let handle = kernel.extrude_face(face, 1.0).unwrap();
        assert!((kernel.solid_volume(&handle).unwrap() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn injected_boolean_failure_fires_once() {
        let mut kernel = MockKernel::new();
        let a = kernel.make_block([0.0; 3], [1.0; 3]).unwrap();
        let b = kernel.make_block([2.0, 0.0, 0.0], [1.0; 3]).unwrap();

        kernel.fail_next_boolean();
        assert!(matches!(
            kernel.boolean_union(&a, &b),
            Err(KernelError::BooleanFailed { .. })
        ));
        assert!(kernel.boolean_union(&a, &b).is_ok());
    }

    #[test]
    fn tessellated_box_matches_bounds() {
        let mut kernel = MockKernel::new();
        let handle = kernel
            .make_block([1.0, 2.0, 3.0], [4.0, 5.0, 6.0])
            .unwrap();
        let mesh = kernel.tessellate(&handle, 0.1).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
        let (min, max) = mesh.bounds().unwrap();
        assert!((min[2] - 3.0).abs() < 1e-6);
        assert!((max[2] - 9.0).abs() < 1e-6);
    }
}
