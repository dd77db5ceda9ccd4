//! Primitive builders on top of truck's sweep API.
//!
//! truck has no built-in box/cylinder — everything is successive sweeps.

use std::f64::consts::PI;
use truck_modeling::builder;
use truck_modeling::topology::Solid;
use truck_modeling::{Point3, Rad, Vector3};

/// Create a box solid via successive translational sweeps.
/// Starts at `min`, extends by `(w, h, d)`.
pub fn make_box_at(min: [f64; 3], w: f64, h: f64, d: f64) -> Solid {
    let v = builder::vertex(Point3::new(min[0], min[1], min[2]));
    let edge = builder::tsweep(&v, Vector3::new(w, 0.0, 0.0));
    let face = builder::tsweep(&edge, Vector3::new(0.0, h, 0.0));
    builder::tsweep(&face, Vector3::new(0.0, 0.0, d))
}

/// Create a cylinder solid: circle wire → face → translational sweep.
/// Base circle centered at `(cx, cy, z0)`, extending along +Z.
pub fn make_cylinder_at(cx: f64, cy: f64, z0: f64, radius: f64, height: f64) -> Option<Solid> {
    let v = builder::vertex(Point3::new(cx + radius, cy, z0));
    let wire = builder::rsweep(
        &v,
        Point3::new(cx, cy, z0),
        Vector3::unit_z(),
        Rad(2.0 * PI),
    );
    let face = builder::try_attach_plane(&[wire]).ok()?;
    Some(builder::tsweep(&face, Vector3::new(0.0, 0.0, height)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_topology() {
        let solid = make_box_at([0.0, 0.0, 0.0], 1.0, 2.0, 3.0);

        let boundaries = solid.boundaries();
        assert_eq!(boundaries.len(), 1, "Box should have 1 shell");

        let shell = &boundaries[0];
        let faces: Vec<_> = shell.face_iter().collect();
        assert_eq!(faces.len(), 6, "Box should have 6 faces");
    }

    #[test]
    fn box_dimensions() {
        let solid = make_box_at([1.0, -2.0, 0.5], 2.0, 3.0, 4.0);
        let boundaries = solid.boundaries();
        let shell = &boundaries[0];

        let mut min = [f64::MAX; 3];
        let mut max = [f64::MIN; 3];
        for v in shell.vertex_iter() {
            let p = v.point();
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        let eps = 1e-10;
        assert!((min[0] - 1.0).abs() < eps);
        assert!((min[1] + 2.0).abs() < eps);
        assert!((max[0] - min[0] - 2.0).abs() < eps, "Width should be 2");
        assert!((max[1] - min[1] - 3.0).abs() < eps, "Height should be 3");
        assert!((max[2] - min[2] - 4.0).abs() < eps, "Depth should be 4");
    }

    #[test]
    fn cylinder_topology() {
        let solid = make_cylinder_at(5.0, -3.0, 1.0, 2.0, 4.0).unwrap();

        let boundaries = solid.boundaries();
        assert_eq!(boundaries.len(), 1, "Cylinder should have 1 shell");

        let shell = &boundaries[0];
        let faces: Vec<_> = shell.face_iter().collect();
        // truck may divide the barrel depending on internal sweep division.
        // At minimum: top + bottom + side(s).
        assert!(faces.len() >= 3, "Cylinder should have at least 3 faces");
    }
}
