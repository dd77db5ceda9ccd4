use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// The catalog of base plate profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlateShape {
    /// Round tag.
    Circle,
    /// Card-style tag: straight edges joined by quarter-circle corners.
    RoundedRect,
    /// The standard square tag with large corner radius.
    Squircle,
}

impl PlateShape {
    /// Nominal footprint (width, height) in millimetres.
    pub fn footprint(&self) -> (f64, f64) {
        match self {
            PlateShape::Circle => (CIRCLE_DIAMETER_MM, CIRCLE_DIAMETER_MM),
            PlateShape::RoundedRect => (ROUNDED_RECT_WIDTH_MM, ROUNDED_RECT_HEIGHT_MM),
            PlateShape::Squircle => (SQUIRCLE_SIZE_MM, SQUIRCLE_SIZE_MM),
        }
    }

    /// Corner radius for the rectangular profiles. Zero for the circle
    /// (its whole outline is one arc).
    pub fn corner_radius(&self) -> f64 {
        match self {
            PlateShape::Circle => 0.0,
            PlateShape::RoundedRect => ROUNDED_RECT_CORNER_MM,
            PlateShape::Squircle => SQUIRCLE_CORNER_MM,
        }
    }

    /// Whether a point in plate coordinates lies on or inside the footprint.
    pub fn contains(&self, p: Vec2) -> bool {
        match self {
            PlateShape::Circle => {
                let r = CIRCLE_DIAMETER_MM / 2.0;
                p.x * p.x + p.y * p.y <= r * r
            }
            _ => {
                let (w, h) = self.footprint();
                p.x.abs() <= w / 2.0 && p.y.abs() <= h / 2.0
            }
        }
    }
}

impl Default for PlateShape {
    fn default() -> Self {
        PlateShape::Squircle
    }
}

/// Fixed plate footprint constants, in millimetres.
pub const CIRCLE_DIAMETER_MM: f64 = 30.0;
pub const ROUNDED_RECT_WIDTH_MM: f64 = 42.0;
pub const ROUNDED_RECT_HEIGHT_MM: f64 = 26.0;
pub const ROUNDED_RECT_CORNER_MM: f64 = 4.0;
pub const SQUIRCLE_SIZE_MM: f64 = 35.0;
pub const SQUIRCLE_CORNER_MM: f64 = 10.0;

/// Attachment loop placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopParams {
    /// Loop center in plate coordinates.
    pub offset: Vec2,
}

/// Everything the synthesizer needs to build the base plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateParams {
    pub shape: PlateShape,
    pub depth_mm: f64,
    pub attachment_loop: Option<LoopParams>,
}

impl PlateParams {
    /// Check the structural invariants: positive depth, loop center inside
    /// the footprint.
    pub fn validate(&self) -> Result<(), ParamError> {
        if !(self.depth_mm > 0.0) {
            return Err(ParamError::NonPositiveDepth {
                depth: self.depth_mm,
            });
        }
        if let Some(lp) = &self.attachment_loop {
            if !self.shape.contains(lp.offset) {
                return Err(ParamError::LoopOutsideFootprint { offset: lp.offset });
            }
        }
        Ok(())
    }
}

impl Default for PlateParams {
    fn default() -> Self {
        Self {
            shape: PlateShape::default(),
            depth_mm: 3.0,
            attachment_loop: None,
        }
    }
}

/// Invariant violations in user-supplied parameters.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParamError {
    #[error("plate depth must be positive, got {depth}")]
    NonPositiveDepth { depth: f64 },

    #[error("attachment loop center ({}, {}) lies outside the plate footprint", offset.x, offset.y)]
    LoopOutsideFootprint { offset: Vec2 },

    #[error("logo scale must be positive, got {scale}")]
    NonPositiveScale { scale: f64 },
}
