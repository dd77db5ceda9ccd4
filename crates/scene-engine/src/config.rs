use serde::{Deserialize, Serialize};

use charm_types::{ImportedShape, LogoPlacement, LoopParams, PlateParams, PlateShape, Rgb, Vec2};

/// The one configuration aggregate for a charm being designed.
///
/// Owned exclusively by [`crate::Studio`]; every control mutates it through
/// a [`ConfigPatch`], never directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharmConfig {
    pub plate: PlateParams,
    pub placement: LogoPlacement,
    pub batch: Vec<ImportedShape>,
}

/// A scoped update to the configuration aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConfigPatch {
    SetPlateShape { shape: PlateShape },
    SetPlateDepth { depth_mm: f64 },
    SetAttachmentLoop { attachment_loop: Option<LoopParams> },
    SetLogoScale { scale: f64 },
    SetLogoOffset { offset: Vec2 },
    SetLogoRotation { rotation_deg: f64 },
    SetLogoDepth { depth_mm: f64 },
    SetShapeColor { shape_id: u32, color: Rgb },
    /// Replace the whole imported batch. The only way shapes enter or leave
    /// the configuration.
    ReplaceArtwork { shapes: Vec<ImportedShape> },
}

/// Which derived geometry a batch of patches invalidated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    pub plate: bool,
    pub logo: bool,
}

impl DirtyFlags {
    pub fn all() -> Self {
        Self {
            plate: true,
            logo: true,
        }
    }

    pub fn any(&self) -> bool {
        self.plate || self.logo
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
