//! 2D profile builders for the plate catalog.
//!
//! Profiles are closed counter-clockwise polylines centered on the origin,
//! with arcs sampled at a fixed step so rebuilds are deterministic.

use std::f64::consts::PI;

use charm_types::PlateShape;

/// Sample count for a full circle outline.
pub const CIRCLE_SEGMENTS: usize = 64;

/// Sample count per quarter-circle corner arc.
pub const CORNER_ARC_SEGMENTS: usize = 8;

/// Build the outline for a plate shape, optionally inset by `inset`
/// (used for the bevel core). The inset shrinks the footprint uniformly
/// and the corner radius with it.
pub fn plate_profile(shape: PlateShape, inset: f64) -> Vec<[f64; 2]> {
    let (w, h) = shape.footprint();
    match shape {
        PlateShape::Circle => circle_profile(w / 2.0 - inset),
        PlateShape::RoundedRect | PlateShape::Squircle => rounded_rect_profile(
            w - 2.0 * inset,
            h - 2.0 * inset,
            (shape.corner_radius() - inset).max(0.1),
        ),
    }
}

/// Closed circle outline around the origin.
pub fn circle_profile(radius: f64) -> Vec<[f64; 2]> {
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let a = 2.0 * PI * i as f64 / CIRCLE_SEGMENTS as f64;
            [radius * a.cos(), radius * a.sin()]
        })
        .collect()
}

/// Rounded rectangle outline around the origin: four straight edges joined
/// by quarter-circle corner arcs, traversed counter-clockwise.
pub fn rounded_rect_profile(w: f64, h: f64, corner_radius: f64) -> Vec<[f64; 2]> {
    let r = corner_radius.min(w / 2.0).min(h / 2.0);
    let cx = w / 2.0 - r;
    let cy = h / 2.0 - r;

    // (corner center, arc start angle); each arc spans a quarter turn.
    // Straight edges fall out of connecting one arc's end to the next
    // arc's start.
    let corners = [
        ([cx, -cy], -PI / 2.0),  // bottom-right
        ([cx, cy], 0.0),         // top-right
        ([-cx, cy], PI / 2.0),   // top-left
        ([-cx, -cy], PI),        // bottom-left
    ];

    let mut points = Vec::with_capacity(4 * (CORNER_ARC_SEGMENTS + 1));
    for (center, start_angle) in corners {
        for i in 0..=CORNER_ARC_SEGMENTS {
            let a = start_angle + (PI / 2.0) * i as f64 / CORNER_ARC_SEGMENTS as f64;
            points.push([center[0] + r * a.cos(), center[1] + r * a.sin()]);
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use charm_types::{CIRCLE_DIAMETER_MM, SQUIRCLE_SIZE_MM};

    fn bounds(points: &[[f64; 2]]) -> ([f64; 2], [f64; 2]) {
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

    #[test]
    fn circle_profile_spans_diameter() {
        let outline = plate_profile(PlateShape::Circle, 0.0);
        let (min, max) = bounds(&outline);
        assert!((max[0] - min[0] - CIRCLE_DIAMETER_MM).abs() < 1e-9);
        assert!((max[1] - min[1] - CIRCLE_DIAMETER_MM).abs() < 1e-9);
    }

    #[test]
    fn squircle_profile_spans_footprint() {
        let outline = plate_profile(PlateShape::Squircle, 0.0);
        let (min, max) = bounds(&outline);
        assert!((max[0] - min[0] - SQUIRCLE_SIZE_MM).abs() < 1e-9);
        assert!((max[1] - min[1] - SQUIRCLE_SIZE_MM).abs() < 1e-9);
    }

    #[test]
    fn inset_shrinks_profile_uniformly() {
        let outline = plate_profile(PlateShape::Squircle, 1.0);
        let (min, max) = bounds(&outline);
        assert!((max[0] - min[0] - (SQUIRCLE_SIZE_MM - 2.0)).abs() < 1e-9);
    }

    #[test]
    fn rounded_rect_is_counter_clockwise() {
        let outline = rounded_rect_profile(10.0, 6.0, 2.0);
        let mut area = 0.0;
        for i in 0..outline.len() {
            let j = (i + 1) % outline.len();
            area += outline[i][0] * outline[j][1] - outline[j][0] * outline[i][1];
        }
        assert!(area > 0.0, "outline should wind counter-clockwise");
    }

    #[test]
    fn corner_radius_clamped_to_half_extent() {
        // Radius larger than half the short side must not fold the outline.
        let outline = rounded_rect_profile(10.0, 4.0, 5.0);
        let (min, max) = bounds(&outline);
        assert!((max[1] - min[1] - 4.0).abs() < 1e-9);
    }
}
