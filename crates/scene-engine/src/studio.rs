//! The studio controller: sole writer of the configuration aggregate,
//! dependency-tracked rebuild, per-frame contact correction.

use charm_types::{LoopParams, PlateShape, Vec2};
use forge_ops::{extrude_logo, fit_logo, synthesize_plate};
use solid_kernel::Kernel;
use vector_import::ImportError;

use crate::config::{CharmConfig, ConfigPatch, DirtyFlags};
use crate::scene::{ComposedScene, PlacedLogo};
use crate::snapshot::{self, CaptureError};

/// Target footprint for logo auto-fit, supplied by the product
/// configuration: the logo's larger dimension lands on this many
/// millimetres.
pub const DEFAULT_TARGET_FOOTPRINT_MM: f64 = 22.0;

/// How far the logo group sinks into the plate top. Guarantees visual
/// contact without z-fighting.
pub const CONTACT_CLEARANCE_MM: f64 = 0.05;

/// Smallest accepted plate depth after clamping slider input.
const MIN_PLATE_DEPTH_MM: f64 = 0.4;

/// Smallest accepted logo depth and scale after clamping slider input.
const MIN_LOGO_DEPTH_MM: f64 = 0.2;
const MIN_LOGO_SCALE: f64 = 0.01;

/// The live compositor. Owns the kernel, the configuration, and the
/// composed scene; everything runs on the caller's single event loop.
pub struct Studio<K: Kernel> {
    kernel: K,
    config: CharmConfig,
    scene: ComposedScene,
    dirty: DirtyFlags,
    /// Completed frames since the last geometry-affecting patch. Snapshot
    /// capture is only allowed once this is non-zero.
    frames_since_change: u32,
    /// Non-fatal notes from the last rebuild (skipped shapes etc.).
    pub warnings: Vec<String>,
}

impl<K: Kernel> Studio<K> {
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            config: CharmConfig::default(),
            scene: ComposedScene::empty(),
            dirty: DirtyFlags::all(),
            frames_since_change: 0,
            warnings: Vec::new(),
        }
    }

    pub fn config(&self) -> &CharmConfig {
        &self.config
    }

    pub fn scene(&self) -> &ComposedScene {
        &self.scene
    }

    /// Parse vector markup and replace the batch. Atomic: on error the
    /// existing batch and placement stay untouched. Returns the shape count.
    pub fn import_artwork(&mut self, raw: &str) -> Result<usize, ImportError> {
        let shapes = vector_import::import_vector(raw)?;
        let count = shapes.len();
        self.apply(ConfigPatch::ReplaceArtwork { shapes });
        Ok(count)
    }

    /// Apply one scoped configuration update and mark the geometry it
    /// invalidates. Slider input is clamped here so the aggregate always
    /// satisfies its invariants.
    pub fn apply(&mut self, patch: ConfigPatch) {
        match patch {
            ConfigPatch::SetPlateShape { shape } => {
                self.config.plate.shape = shape;
                // The loop must stay inside the new footprint.
                if let Some(lp) = &mut self.config.plate.attachment_loop {
                    lp.offset = clamp_into_footprint(shape, lp.offset);
                }
                self.dirty.plate = true;
            }
            ConfigPatch::SetPlateDepth { depth_mm } => {
                self.config.plate.depth_mm = depth_mm.max(MIN_PLATE_DEPTH_MM);
                self.dirty.plate = true;
            }
            ConfigPatch::SetAttachmentLoop { attachment_loop } => {
                let shape = self.config.plate.shape;
                self.config.plate.attachment_loop = attachment_loop.map(|lp| LoopParams {
                    offset: clamp_into_footprint(shape, lp.offset),
                });
                self.dirty.plate = true;
            }
            ConfigPatch::SetLogoScale { scale } => {
                self.config.placement.scale = scale.max(MIN_LOGO_SCALE);
                self.dirty.logo = true;
            }
            ConfigPatch::SetLogoOffset { offset } => {
                self.config.placement.offset = offset;
                self.dirty.logo = true;
            }
            ConfigPatch::SetLogoRotation { rotation_deg } => {
                self.config.placement.rotation_deg = rotation_deg;
                self.dirty.logo = true;
            }
            ConfigPatch::SetLogoDepth { depth_mm } => {
                self.config.placement.depth_mm = depth_mm.max(MIN_LOGO_DEPTH_MM);
                self.dirty.logo = true;
            }
            ConfigPatch::SetShapeColor { shape_id, color } => {
                for shape in &mut self.config.batch {
                    if shape.id == shape_id {
                        shape.current_color = color;
                    }
                }
                self.dirty.logo = true;
            }
            ConfigPatch::ReplaceArtwork { shapes } => {
                // Fresh batch, fresh auto-fit. The placement becomes
                // user-owned again the moment this patch lands.
                self.config.placement = fit_logo(&shapes, DEFAULT_TARGET_FOOTPRINT_MM);
                self.config.batch = shapes;
                self.dirty.logo = true;
            }
        }
        self.frames_since_change = 0;
    }

    /// One render step: rebuild whatever is dirty, then pin the logo group
    /// to the plate top. The vertical correction runs unconditionally; it is
    /// cheap arithmetic on cached bounds, so it can never be missed by
    /// dependency tracking.
    pub fn frame(&mut self) -> &ComposedScene {
        if self.dirty.plate {
            self.rebuild_plate();
        }
        if self.dirty.logo {
            self.rebuild_logo();
        }
        self.dirty.clear();

        self.align_logo();
        self.frames_since_change = self.frames_since_change.saturating_add(1);
        &self.scene
    }

    /// Rasterize the current composed frame to an encoded PNG.
    ///
    /// Requires at least one completed frame since the last geometry
    /// change; callers should retry after a frame tick, a bounded number
    /// of times.
    pub fn capture_snapshot(&self) -> Result<Vec<u8>, CaptureError> {
        if self.frames_since_change == 0 {
            return Err(CaptureError::NotReady);
        }
        snapshot::render_scene_png(
            &self.scene,
            snapshot::SNAPSHOT_WIDTH,
            snapshot::SNAPSHOT_HEIGHT,
        )
    }

    fn rebuild_plate(&mut self) {
        tracing::debug!("rebuilding plate");
        let plate = synthesize_plate(&mut self.kernel, &self.config.plate);
        self.warnings.extend(plate.warnings);
        if let Some(reason) = &plate.fallback {
            self.warnings.push(format!("plate fallback: {}", reason));
        }
        self.scene.plate_mesh = plate.mesh;
        self.scene.plate_fallback = plate.fallback;
    }

    fn rebuild_logo(&mut self) {
        tracing::debug!("rebuilding logo group");
        self.scene.logos.clear();
        if self.config.batch.is_empty() {
            return;
        }
        match extrude_logo(&mut self.kernel, &self.config.batch, &self.config.placement) {
            Ok(result) => {
                self.warnings.extend(result.warnings);
                self.scene.logos = result
                    .solids
                    .into_iter()
                    .map(|s| PlacedLogo {
                        shape_id: s.shape_id,
                        color: s.color,
                        mesh: s.mesh,
                    })
                    .collect();
            }
            Err(e) => {
                self.warnings.push(format!("logo rebuild failed: {}", e));
            }
        }
    }

    /// Translate the logo group so its lowest point touches the plate's top
    /// face minus the contact clearance.
    fn align_logo(&mut self) {
        let Some(floor) = self.scene.logo_floor() else {
            self.scene.logo_z_offset = 0.0;
            return;
        };
        self.scene.logo_z_offset = self.scene.plate_top() - CONTACT_CLEARANCE_MM - floor;
    }
}

/// Pull a loop offset back inside the plate footprint.
fn clamp_into_footprint(shape: PlateShape, offset: Vec2) -> Vec2 {
    match shape {
        PlateShape::Circle => {
            let r = shape.footprint().0 / 2.0;
            let len = (offset.x * offset.x + offset.y * offset.y).sqrt();
            if len <= r || len == 0.0 {
                offset
            } else {
                Vec2::new(offset.x * r / len, offset.y * r / len)
            }
        }
        _ => {
            let (w, h) = shape.footprint();
            Vec2::new(
                offset.x.clamp(-w / 2.0, w / 2.0),
                offset.y.clamp(-h / 2.0, h / 2.0),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charm_types::{ImportedShape, Rgb};
    use solid_kernel::MockKernel;

    fn square_shape(id: u32, size: f64) -> ImportedShape {
        ImportedShape {
            id,
            name: format!("Part {}", id),
            fill: Rgb::NEUTRAL,
            current_color: Rgb::new(200, 40, 40),
            outer: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(size, 0.0),
                Vec2::new(size, size),
                Vec2::new(0.0, size),
            ],
            holes: Vec::new(),
        }
    }

    fn studio() -> Studio<MockKernel> {
        Studio::new(MockKernel::new())
    }

    #[test]
    fn first_frame_builds_default_plate() {
        let mut studio = studio();
        let scene = studio.frame();
        assert!(!scene.plate_mesh.vertices.is_empty());
        assert!(scene.plate_fallback.is_none());
        assert!(scene.logos.is_empty());
    }

    #[test]
    fn artwork_replace_fits_scale_once() {
        let mut studio = studio();
        // 44 × 22 artwork, target 22 → scale 0.5.
        let wide = ImportedShape {
            outer: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(44.0, 0.0),
                Vec2::new(44.0, 22.0),
                Vec2::new(0.0, 22.0),
            ],
            ..square_shape(1, 0.0)
        };
        studio.apply(ConfigPatch::ReplaceArtwork { shapes: vec![wide] });
        assert_eq!(studio.config().placement.scale, 0.5);

        // A later plate edit must not overwrite the user-owned placement.
        studio.apply(ConfigPatch::SetLogoScale { scale: 0.75 });
        studio.apply(ConfigPatch::SetPlateDepth { depth_mm: 6.0 });
        studio.frame();
        assert_eq!(studio.config().placement.scale, 0.75);
    }

    #[test]
    fn logo_sits_on_plate_top_with_clearance() {
        let mut studio = studio();
        studio.apply(ConfigPatch::SetPlateDepth { depth_mm: 3.0 });
        studio.apply(ConfigPatch::ReplaceArtwork {
            shapes: vec![square_shape(1, 10.0)],
        });
        let scene = studio.frame();

        // Mock logo solids start at z = 0.
        assert!((scene.logo_z_offset - (3.0 - CONTACT_CLEARANCE_MM)).abs() < 1e-9);
    }

    #[test]
    fn depth_edit_realigns_logo_next_frame() {
        let mut studio = studio();
        studio.apply(ConfigPatch::ReplaceArtwork {
            shapes: vec![square_shape(1, 10.0)],
        });
        studio.apply(ConfigPatch::SetPlateDepth { depth_mm: 3.0 });
        studio.frame();

        studio.apply(ConfigPatch::SetPlateDepth { depth_mm: 5.0 });
        let scene = studio.frame();
        assert!((scene.logo_z_offset - (5.0 - CONTACT_CLEARANCE_MM)).abs() < 1e-9);
    }

    #[test]
    fn frames_are_idempotent_without_changes() {
        let mut studio = studio();
        studio.apply(ConfigPatch::ReplaceArtwork {
            shapes: vec![square_shape(1, 10.0)],
        });
        studio.frame();
        let bounds_a = studio.scene().plate_mesh.bounds();
        let offset_a = studio.scene().logo_z_offset;
        studio.frame();
        assert_eq!(studio.scene().plate_mesh.bounds(), bounds_a);
        assert_eq!(studio.scene().logo_z_offset, offset_a);
    }

    #[test]
    fn snapshot_gated_on_completed_frame() {
        let mut studio = studio();
        assert!(matches!(
            studio.capture_snapshot(),
            Err(CaptureError::NotReady)
        ));

        studio.frame();
        let png = studio.capture_snapshot().unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);

        // Any geometry patch re-arms the gate.
        studio.apply(ConfigPatch::SetPlateDepth { depth_mm: 4.0 });
        assert!(matches!(
            studio.capture_snapshot(),
            Err(CaptureError::NotReady)
        ));
        studio.frame();
        assert!(studio.capture_snapshot().is_ok());
    }

    #[test]
    fn import_error_leaves_config_untouched() {
        let mut studio = studio();
        studio.apply(ConfigPatch::ReplaceArtwork {
            shapes: vec![square_shape(1, 10.0)],
        });
        studio.apply(ConfigPatch::SetLogoScale { scale: 2.0 });
        studio.frame();

        let err = studio.import_artwork("<<< not svg").unwrap_err();
        assert!(matches!(err, ImportError::Parse { .. }));
        assert_eq!(studio.config().batch.len(), 1);
        assert_eq!(studio.config().placement.scale, 2.0);
    }

    #[test]
    fn import_artwork_replaces_batch() {
        let mut studio = studio();
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 40 20">
            <rect x="0" y="0" width="40" height="20" fill="#aa0000"/>
        </svg>"##;
        let count = studio.import_artwork(svg).unwrap();
        assert_eq!(count, 1);
        assert_eq!(studio.config().batch.len(), 1);
        // 40 × 20 → scale fits the 40 onto the target footprint.
        assert!((studio.config().placement.scale - DEFAULT_TARGET_FOOTPRINT_MM / 40.0).abs() < 1e-12);
    }

    #[test]
    fn loop_offset_clamped_into_footprint() {
        let mut studio = studio();
        studio.apply(ConfigPatch::SetPlateShape {
            shape: PlateShape::Circle,
        });
        studio.apply(ConfigPatch::SetAttachmentLoop {
            attachment_loop: Some(LoopParams {
                offset: Vec2::new(100.0, 0.0),
            }),
        });
        let lp = studio.config().plate.attachment_loop.unwrap();
        assert!(studio.config().plate.shape.contains(lp.offset));

        // Clamped parameters synthesize without falling back.
        let scene = studio.frame();
        assert!(scene.plate_fallback.is_none());
    }

    #[test]
    fn shape_color_edit_recolors_logo() {
        let mut studio = studio();
        studio.apply(ConfigPatch::ReplaceArtwork {
            shapes: vec![square_shape(1, 10.0)],
        });
        studio.frame();
        studio.apply(ConfigPatch::SetShapeColor {
            shape_id: 1,
            color: Rgb::new(1, 2, 3),
        });
        let scene = studio.frame();
        assert_eq!(scene.logos[0].color, Rgb::new(1, 2, 3));
    }
}
