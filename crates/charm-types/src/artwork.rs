use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::geometry::{Bounds2, Vec2};

/// One planar contour extracted from an imported vector file.
///
/// Shapes are created in one batch per import and are immutable afterwards,
/// except for the user-editable `current_color` override. A new import
/// replaces the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedShape {
    /// Unique within the batch.
    pub id: u32,
    /// Embedded element id, or a positional label.
    pub name: String,
    /// Fill color as imported.
    pub fill: Rgb,
    /// User-editable color override. Starts equal to `fill`.
    pub current_color: Rgb,
    /// Outer contour, in document coordinates.
    pub outer: Vec<Vec2>,
    /// Hole contours.
    pub holes: Vec<Vec<Vec2>>,
}

impl ImportedShape {
    /// Bounding box of the outer contour. None for a degenerate shape.
    pub fn bounds(&self) -> Option<Bounds2> {
        Bounds2::from_points(self.outer.iter())
    }
}

/// Combined bounding box of a shape batch.
pub fn batch_bounds(shapes: &[ImportedShape]) -> Option<Bounds2> {
    let mut combined: Option<Bounds2> = None;
    for shape in shapes {
        if let Some(b) = shape.bounds() {
            match &mut combined {
                Some(c) => c.union(&b),
                None => combined = Some(b),
            }
        }
    }
    combined
}

/// Placement of the extruded logo group on the plate.
///
/// `scale` is initialized from the batch bounding box exactly once per
/// imported batch; every field is freely user-adjustable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogoPlacement {
    pub scale: f64,
    pub offset: Vec2,
    pub rotation_deg: f64,
    pub depth_mm: f64,
}

impl Default for LogoPlacement {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            rotation_deg: 0.0,
            depth_mm: DEFAULT_LOGO_DEPTH_MM,
        }
    }
}

/// Default extrusion depth for logo shapes, in millimetres.
pub const DEFAULT_LOGO_DEPTH_MM: f64 = 1.2;

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(id: u32, pts: &[(f64, f64)]) -> ImportedShape {
        ImportedShape {
            id,
            name: format!("Part {}", id),
            fill: Rgb::NEUTRAL,
            current_color: Rgb::NEUTRAL,
            outer: pts.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
            holes: Vec::new(),
        }
    }

    #[test]
    fn batch_bounds_spans_all_shapes() {
        let shapes = vec![
            shape(1, &[(0.0, 0.0), (10.0, 0.0), (10.0, 5.0)]),
            shape(2, &[(20.0, -3.0), (25.0, 8.0), (22.0, 1.0)]),
        ];
        let b = batch_bounds(&shapes).unwrap();
        assert_eq!(b.min, Vec2::new(0.0, -3.0));
        assert_eq!(b.max, Vec2::new(25.0, 8.0));
    }

    #[test]
    fn batch_bounds_empty_batch() {
        assert!(batch_bounds(&[]).is_none());
    }
}
