//! TruckKernel — real geometry kernel wrapping truck's API.

use std::collections::HashMap;

use crate::primitives;
use crate::tessellation;
use crate::traits::Kernel;
use crate::types::*;

// Import truck types selectively to avoid shadowing std::result::Result
use truck_modeling::builder;
use truck_modeling::topology::{Edge, Face, Solid, Wire};
use truck_modeling::{Point3, Vector3};

/// Real geometry kernel backed by the truck BREP library.
pub struct TruckKernel {
    next_handle: u64,
    next_face_id: u64,
    solids: HashMap<u64, Solid>,
    /// Standalone faces created by make_face, awaiting extrude.
    standalone_faces: HashMap<u64, Face>,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            next_face_id: 1,
            solids: HashMap::new(),
            standalone_faces: HashMap::new(),
        }
    }

    fn alloc_handle(&mut self) -> KernelSolidHandle {
        let h = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn alloc_face_id(&mut self) -> KernelFaceId {
        let id = KernelFaceId(self.next_face_id);
        self.next_face_id += 1;
        id
    }

    pub(crate) fn store_solid(&mut self, solid: Solid) -> KernelSolidHandle {
        let handle = self.alloc_handle();
        self.solids.insert(handle.id(), solid);
        handle
    }

    pub(crate) fn get_solid(&self, handle: &KernelSolidHandle) -> Option<&Solid> {
        self.solids.get(&handle.id())
    }

    /// Build a closed wire of line edges through the given points at height z.
    /// Vertices are created once so consecutive edges share endpoints.
    fn polyline_wire(points: &[[f64; 2]], z: f64) -> Result<Wire, KernelError> {
        if points.len() < 3 {
            return Err(KernelError::DegenerateProfile {
                reason: format!("contour has {} points, need at least 3", points.len()),
            });
        }

        let pts_3d: Vec<Point3> = points
            .iter()
            .map(|&[x, y]| Point3::new(x, y, z))
            .collect();

        let n = pts_3d.len();
        let vertices: Vec<_> = pts_3d.iter().map(|&p| builder::vertex(p)).collect();
        let mut wire_edges: Vec<Edge> = Vec::new();
        for i in 0..n {
            let j = (i + 1) % n;
            let edge = Edge::new(
                &vertices[i],
                &vertices[j],
                truck_modeling::geometry::Curve::Line(truck_modeling::geometry::Line(
                    pts_3d[i], pts_3d[j],
                )),
            );
            wire_edges.push(edge);
        }
        Ok(Wire::from_iter(wire_edges))
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for TruckKernel {
    fn make_face(
        &mut self,
        outer: &[[f64; 2]],
        holes: &[Vec<[f64; 2]>],
        z: f64,
    ) -> Result<KernelFaceId, KernelError> {
        let mut wires = vec![Self::polyline_wire(outer, z)?];
        for hole in holes {
            wires.push(Self::polyline_wire(hole, z)?);
        }

        let face = builder::try_attach_plane(&wires).map_err(|e| KernelError::Other {
            message: format!("failed to create planar face: {}", e),
        })?;

        let face_id = self.alloc_face_id();
        self.standalone_faces.insert(face_id.0, face);
        Ok(face_id)
    }

    fn extrude_face(
        &mut self,
        face: KernelFaceId,
        depth: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let truck_face = self
            .standalone_faces
            .remove(&face.0)
            .ok_or(KernelError::FaceNotFound { id: face })?;

        if depth.abs() < 1e-12 {
            return Err(KernelError::DegenerateProfile {
                reason: "extrusion depth is zero".to_string(),
            });
        }

        let solid = builder::tsweep(&truck_face, Vector3::new(0.0, 0.0, depth));
        Ok(self.store_solid(solid))
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
        let solid = primitives::make_cylinder_at(center[0], center[1], z0, radius, height)
            .ok_or_else(|| KernelError::Other {
                message: "failed to create circular face".to_string(),
            })?;
        Ok(self.store_solid(solid))
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
        let solid = primitives::make_box_at(min, size[0], size[1], size[2]);
        Ok(self.store_solid(solid))
    }

    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid_a = self
            .solids
            .get(&a.id())
            .ok_or(KernelError::SolidNotFound)?
            .clone();
        let solid_b = self
            .solids
            .get(&b.id())
            .ok_or(KernelError::SolidNotFound)?
            .clone();

        let result = truck_shapeops::or(&solid_a, &solid_b, 0.05).ok_or_else(|| {
            KernelError::BooleanFailed {
                reason: "truck or() returned None".to_string(),
            }
        })?;
        Ok(self.store_solid(result))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid_a = self
            .solids
            .get(&a.id())
            .ok_or(KernelError::SolidNotFound)?
            .clone();
        let mut solid_b = self
            .solids
            .get(&b.id())
            .ok_or(KernelError::SolidNotFound)?
            .clone();

        // Subtraction = A ∩ ¬B. not() mutates in place.
        solid_b.not();
        let result = truck_shapeops::and(&solid_a, &solid_b, 0.05).ok_or_else(|| {
            KernelError::BooleanFailed {
                reason: "truck and() returned None for subtraction".to_string(),
            }
        })?;
        Ok(self.store_solid(result))
    }

    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        let truck_solid = self
            .solids
            .get(&solid.id())
            .ok_or(KernelError::SolidNotFound)?;

        tessellation::tessellate_solid(truck_solid, tolerance)
    }
}
