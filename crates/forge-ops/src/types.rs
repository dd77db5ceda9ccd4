use solid_kernel::{KernelError, KernelSolidHandle, RenderMesh};

/// Bevel height on each flat face of the plate, in millimetres.
pub const PLATE_BEVEL_MM: f64 = 0.4;

/// Outer radius of the attachment loop material.
pub const LOOP_OUTER_RADIUS_MM: f64 = 4.0;

/// Radius of the through-hole inside the loop.
pub const LOOP_HOLE_RADIUS_MM: f64 = 2.0;

/// How far the through-hole cylinder extends beyond each plate face.
/// Keeps the hole's end caps away from the plate faces so the subtraction
/// cuts cleanly through.
pub const HOLE_OVERSHOOT_MM: f64 = 0.5;

/// Tessellation tolerance for render meshes.
pub const TESS_TOLERANCE: f64 = 0.05;

/// Result of plate synthesis. The surface never fails: a boolean or
/// parameter failure substitutes a plain rectangular block and records the
/// reason so telemetry can observe fallback frequency.
#[derive(Debug)]
pub struct SynthesizedPlate {
    pub handle: KernelSolidHandle,
    pub mesh: RenderMesh,
    /// Why the fallback block was substituted, if it was.
    pub fallback: Option<String>,
    /// Non-fatal degradations (e.g. a dropped bevel).
    pub warnings: Vec<String>,
}

impl SynthesizedPlate {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Errors from modeling operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OpError {
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] charm_types::ParamError),

    #[error("no shapes to extrude")]
    EmptyBatch,
}
