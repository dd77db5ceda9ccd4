//! Plate synthesis: profile → extruded solid with bevel and attachment loop.

use charm_types::PlateParams;
use solid_kernel::{Kernel, KernelSolidHandle};

use crate::profile::plate_profile;
use crate::types::*;

/// Build the base plate solid for the given parameters.
///
/// Never fails observably. The failure ladder degrades in two steps: a
/// failed bevel union retries as a plain flat extrusion; any further kernel
/// failure substitutes a rectangular block of the nominal footprint and
/// depth, tagged with the reason. An unrenderable preview is worse than a
/// generic block.
pub fn synthesize_plate(kernel: &mut dyn Kernel, params: &PlateParams) -> SynthesizedPlate {
    let mut warnings = Vec::new();
    match try_synthesize(kernel, params, &mut warnings) {
        Ok(handle) => match kernel.tessellate(&handle, TESS_TOLERANCE) {
            Ok(mesh) => SynthesizedPlate {
                handle,
                mesh,
                fallback: None,
                warnings,
            },
            Err(e) => fallback_plate(kernel, params, format!("tessellation failed: {}", e), warnings),
        },
        Err(e) => fallback_plate(kernel, params, e.to_string(), warnings),
    }
}

fn try_synthesize(
    kernel: &mut dyn Kernel,
    params: &PlateParams,
    warnings: &mut Vec<String>,
) -> Result<KernelSolidHandle, OpError> {
    params.validate()?;
    let depth = params.depth_mm;

    let base = if depth > 2.0 * PLATE_BEVEL_MM + 0.1 {
        match build_beveled_base(kernel, params, depth) {
            Ok(handle) => handle,
            Err(e) => {
                // Bevel is cosmetic; a flat-edged plate beats a block.
                tracing::warn!(error = %e, "bevel union failed, using flat extrusion");
                warnings.push(format!("bevel dropped: {}", e));
                build_flat_base(kernel, params, depth)?
            }
        }
    } else {
        // Too thin for a bevel relief.
        build_flat_base(kernel, params, depth)?
    };

    let Some(lp) = &params.attachment_loop else {
        return Ok(base);
    };

    // Loop material first, through-hole second. Union strictly before
    // subtraction; subtracting first would let the union close the hole
    // back up.
    let center = [lp.offset.x, lp.offset.y];
    let ring = kernel.make_cylinder(center, LOOP_OUTER_RADIUS_MM, 0.0, depth)?;
    let with_ring = kernel.boolean_union(&base, &ring)?;

    let hole = kernel.make_cylinder(
        center,
        LOOP_HOLE_RADIUS_MM,
        -HOLE_OVERSHOOT_MM,
        depth + 2.0 * HOLE_OVERSHOOT_MM,
    )?;
    Ok(kernel.boolean_subtract(&with_ring, &hole)?)
}

/// Beveled body: inset full-depth core unioned with a full-footprint mid
/// slab. The slab's faces sit strictly inside the core's height so the
/// boolean never sees coplanar faces.
fn build_beveled_base(
    kernel: &mut dyn Kernel,
    params: &PlateParams,
    depth: f64,
) -> Result<KernelSolidHandle, OpError> {
    let core_profile = plate_profile(params.shape, PLATE_BEVEL_MM);
    let core_face = kernel.make_face(&core_profile, &[], 0.0)?;
    let core = kernel.extrude_face(core_face, depth)?;

    let mid_profile = plate_profile(params.shape, 0.0);
    let mid_face = kernel.make_face(&mid_profile, &[], PLATE_BEVEL_MM)?;
    let mid = kernel.extrude_face(mid_face, depth - 2.0 * PLATE_BEVEL_MM)?;

    Ok(kernel.boolean_union(&core, &mid)?)
}

/// Single extrusion of the full outline, no edge treatment.
fn build_flat_base(
    kernel: &mut dyn Kernel,
    params: &PlateParams,
    depth: f64,
) -> Result<KernelSolidHandle, OpError> {
    let outline = plate_profile(params.shape, 0.0);
    let face = kernel.make_face(&outline, &[], 0.0)?;
    Ok(kernel.extrude_face(face, depth)?)
}

/// The safe default shape: a plain block matching the nominal footprint.
fn fallback_plate(
    kernel: &mut dyn Kernel,
    params: &PlateParams,
    reason: String,
    warnings: Vec<String>,
) -> SynthesizedPlate {
    tracing::warn!(reason = %reason, "plate synthesis fell back to block");

    let (w, h) = params.shape.footprint();
    let depth = if params.depth_mm > 0.0 {
        params.depth_mm
    } else {
        3.0
    };

    let block = kernel
        .make_block([-w / 2.0, -h / 2.0, 0.0], [w, h, depth])
        .expect("fallback block dimensions are always positive");
    let mesh = kernel
        .tessellate(&block, TESS_TOLERANCE)
        .unwrap_or_else(|_| solid_kernel::RenderMesh::empty());

    SynthesizedPlate {
        handle: block,
        mesh,
        fallback: Some(reason),
        warnings,
    }
}
