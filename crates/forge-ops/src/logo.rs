//! Logo fitting and extrusion.
//!
//! The fitter computes the one-time auto-scale from the batch bounding box;
//! extrusion re-centers contours about the artwork's own visual center so
//! scale and rotation always pivot there, not on the document origin.

use charm_types::{batch_bounds, ImportedShape, LogoPlacement, Rgb, Vec2};
use solid_kernel::{Kernel, KernelSolidHandle, RenderMesh};

use crate::types::{OpError, TESS_TOLERANCE};

/// One extruded logo shape with its color.
#[derive(Debug)]
pub struct LogoSolid {
    pub shape_id: u32,
    pub color: Rgb,
    pub handle: KernelSolidHandle,
    pub mesh: RenderMesh,
}

/// Result of logo extrusion. Shapes that fail in the kernel are skipped and
/// reported as warnings; one bad contour must not blank the whole logo.
#[derive(Debug)]
pub struct LogoOpResult {
    pub solids: Vec<LogoSolid>,
    pub warnings: Vec<String>,
}

/// Compute the initial placement for a freshly imported batch: the combined
/// bounding box's larger dimension maps exactly onto the target footprint.
///
/// Called once per batch; the returned placement is user-owned afterwards.
pub fn fit_logo(shapes: &[ImportedShape], target_footprint_mm: f64) -> LogoPlacement {
    let scale = match batch_bounds(shapes) {
        Some(b) if b.max_dimension() > 0.0 => target_footprint_mm / b.max_dimension(),
        _ => 1.0,
    };
    LogoPlacement {
        scale,
        ..LogoPlacement::default()
    }
}

/// Combined-center of the batch in document coordinates. Derived data,
/// recomputed from the current batch on every rebuild.
pub fn batch_center(shapes: &[ImportedShape]) -> Vec2 {
    batch_bounds(shapes).map(|b| b.center()).unwrap_or(Vec2::ZERO)
}

/// Extrude every shape of the batch into a solid at its placed position.
/// Solids sit on z = 0; the compositor supplies the vertical offset.
pub fn extrude_logo(
    kernel: &mut dyn Kernel,
    shapes: &[ImportedShape],
    placement: &LogoPlacement,
) -> Result<LogoOpResult, OpError> {
    if shapes.is_empty() {
        return Err(OpError::EmptyBatch);
    }
    if !(placement.scale > 0.0) {
        return Err(OpError::InvalidParameter(
            charm_types::ParamError::NonPositiveScale {
                scale: placement.scale,
            },
        ));
    }
    if !(placement.depth_mm > 0.0) {
        return Err(OpError::InvalidParameter(
            charm_types::ParamError::NonPositiveDepth {
                depth: placement.depth_mm,
            },
        ));
    }

    let center = batch_center(shapes);
    let angle = placement.rotation_deg.to_radians();
    let (sin, cos) = angle.sin_cos();

    // Recenter → flip document Y (vector files are y-down, the plate is
    // y-up) → scale → rotate → user offset.
    let place = |p: &Vec2| -> [f64; 2] {
        let x = (p.x - center.x) * placement.scale;
        let y = -(p.y - center.y) * placement.scale;
        [
            x * cos - y * sin + placement.offset.x,
            x * sin + y * cos + placement.offset.y,
        ]
    };

    let mut solids = Vec::with_capacity(shapes.len());
    let mut warnings = Vec::new();

    for shape in shapes {
        // Outer rings wind counter-clockwise, holes clockwise; source files
        // make no promise either way.
        let outer = oriented(shape.outer.iter().map(&place).collect(), false);
        let holes: Vec<Vec<[f64; 2]>> = shape
            .holes
            .iter()
            .map(|ring| oriented(ring.iter().map(&place).collect(), true))
            .collect();

        let built = kernel
            .make_face(&outer, &holes, 0.0)
            .and_then(|face| kernel.extrude_face(face, placement.depth_mm))
            .and_then(|handle| {
                kernel
                    .tessellate(&handle, TESS_TOLERANCE)
                    .map(|mesh| (handle, mesh))
            });

        match built {
            Ok((handle, mesh)) => solids.push(LogoSolid {
                shape_id: shape.id,
                color: shape.current_color,
                handle,
                mesh,
            }),
            Err(e) => warnings.push(format!("shape '{}' skipped: {}", shape.name, e)),
        }
    }

    Ok(LogoOpResult { solids, warnings })
}

/// Force a ring's winding: counter-clockwise for material, clockwise for
/// holes.
fn oriented(mut ring: Vec<[f64; 2]>, clockwise: bool) -> Vec<[f64; 2]> {
    let mut area = 0.0;
    for i in 0..ring.len() {
        let j = (i + 1) % ring.len();
        area += ring[i][0] * ring[j][1] - ring[j][0] * ring[i][1];
    }
    if (area < 0.0) != clockwise {
        ring.reverse();
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use solid_kernel::MockKernel;

    fn shape(id: u32, pts: &[(f64, f64)]) -> ImportedShape {
        ImportedShape {
            id,
            name: format!("Part {}", id),
            fill: Rgb::NEUTRAL,
            current_color: Rgb::new(10, 20, 30),
            outer: pts.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
            holes: Vec::new(),
        }
    }

    #[test]
    fn fit_maps_larger_dimension_onto_target() {
        // 76 wide × 38 tall, target 38 → scale 0.5 exactly.
        let shapes = vec![shape(1, &[(0.0, 0.0), (76.0, 0.0), (76.0, 38.0), (0.0, 38.0)])];
        let placement = fit_logo(&shapes, 38.0);
        assert_eq!(placement.scale, 0.5);
        assert_eq!(placement.offset, Vec2::ZERO);
        assert_eq!(placement.rotation_deg, 0.0);
    }

    #[test]
    fn fit_uses_height_when_taller_than_wide() {
        let shapes = vec![shape(1, &[(0.0, 0.0), (10.0, 0.0), (10.0, 50.0), (0.0, 50.0)])];
        let placement = fit_logo(&shapes, 25.0);
        assert_eq!(placement.scale, 0.5);
    }

    #[test]
    fn fit_empty_batch_is_identity() {
        assert_eq!(fit_logo(&[], 38.0).scale, 1.0);
    }

    #[test]
    fn extrusion_recenters_on_artwork_center() {
        // A square living far from the document origin must come out
        // centered around (0, 0) after placement.
        let shapes = vec![shape(1, &[(100.0, 100.0), (120.0, 100.0), (120.0, 120.0), (100.0, 120.0)])];
        let placement = LogoPlacement {
            scale: 1.0,
            ..LogoPlacement::default()
        };

        let mut kernel = MockKernel::new();
        let result = extrude_logo(&mut kernel, &shapes, &placement).unwrap();
        assert_eq!(result.solids.len(), 1);
        assert!(result.warnings.is_empty());

        let (min, max) = result.solids[0].mesh.bounds().unwrap();
        assert!((min[0] + 10.0).abs() < 1e-9);
        assert!((max[0] - 10.0).abs() < 1e-9);
        assert!((min[1] + 10.0).abs() < 1e-9);
        assert!((max[1] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn extrusion_applies_offset_and_depth() {
        let shapes = vec![shape(1, &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)])];
        let placement = LogoPlacement {
            scale: 2.0,
            offset: Vec2::new(5.0, -3.0),
            rotation_deg: 0.0,
            depth_mm: 1.5,
        };

        let mut kernel = MockKernel::new();
        let result = extrude_logo(&mut kernel, &shapes, &placement).unwrap();
        let (min, max) = result.solids[0].mesh.bounds().unwrap();

        // 4×4 square scaled ×2 → 8×8, centered at the offset.
        assert!((min[0] - 1.0).abs() < 1e-9);
        assert!((max[0] - 9.0).abs() < 1e-9);
        assert!((min[1] + 7.0).abs() < 1e-9);
        assert!((max[1] - 1.0).abs() < 1e-9);
        assert!((max[2] - min[2] - 1.5).abs() < 1e-9);
    }

    #[test]
    fn rotation_pivots_on_artwork_center() {
        // 90° rotation of a wide rectangle swaps its extents.
        let shapes = vec![shape(1, &[(0.0, 0.0), (8.0, 0.0), (8.0, 2.0), (0.0, 2.0)])];
        let placement = LogoPlacement {
            scale: 1.0,
            offset: Vec2::ZERO,
            rotation_deg: 90.0,
            depth_mm: 1.0,
        };

        let mut kernel = MockKernel::new();
        let result = extrude_logo(&mut kernel, &shapes, &placement).unwrap();
        let (min, max) = result.solids[0].mesh.bounds().unwrap();
        assert!((max[0] - min[0] - 2.0).abs() < 1e-9);
        assert!((max[1] - min[1] - 8.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_shape_is_skipped_with_warning() {
        let shapes = vec![
            shape(1, &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
            shape(2, &[(0.0, 0.0), (1.0, 0.0)]),
        ];
        let mut kernel = MockKernel::new();
        let result = extrude_logo(&mut kernel, &shapes, &LogoPlacement::default()).unwrap();
        assert_eq!(result.solids.len(), 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Part 2"));
    }

    #[test]
    fn empty_batch_is_an_error() {
        let mut kernel = MockKernel::new();
        assert!(matches!(
            extrude_logo(&mut kernel, &[], &LogoPlacement::default()),
            Err(OpError::EmptyBatch)
        ));
    }

    #[test]
    fn non_positive_scale_rejected() {
        let shapes = vec![shape(1, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)])];
        let placement = LogoPlacement {
            scale: 0.0,
            ..LogoPlacement::default()
        };
        let mut kernel = MockKernel::new();
        assert!(matches!(
            extrude_logo(&mut kernel, &shapes, &placement),
            Err(OpError::InvalidParameter(_))
        ));
    }
}
