use crate::types::*;

/// Core geometry kernel trait. Provides the shape construction operations
/// the configurator needs.
/// Implemented by TruckKernel (wraps real truck) and MockKernel
/// (deterministic test double).
pub trait Kernel {
    /// Create a planar face in the XY plane at height `z` from an outer
    /// contour and optional hole contours. Points are (x, y) pairs in
    /// millimetres; contours must not be self-intersecting.
    fn make_face(
        &mut self,
        outer: &[[f64; 2]],
        holes: &[Vec<[f64; 2]>],
        z: f64,
    ) -> Result<KernelFaceId, KernelError>;

    /// Extrude a planar face along +Z by `depth`. Consumes the face.
    fn extrude_face(
        &mut self,
        face: KernelFaceId,
        depth: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Create a solid cylinder with its base circle centered at
    /// `(center.x, center.y, z0)`, extending along +Z by `height`.
    fn make_cylinder(
        &mut self,
        center: [f64; 2],
        radius: f64,
        z0: f64,
        height: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Create an axis-aligned box solid from `min` with the given extents.
    fn make_block(
        &mut self,
        min: [f64; 3],
        size: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean union of two solids.
    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean subtraction: a minus b.
    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Tessellate a solid to a triangle mesh.
    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError>;
}
