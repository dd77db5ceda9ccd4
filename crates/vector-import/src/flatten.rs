//! Path flattening: curved SVG path data → closed polyline rings.

use charm_types::Vec2;
use usvg::tiny_skia_path::{Path, PathSegment, Transform};

/// Subdivision steps per curved segment. Fixed-step keeps the output
/// deterministic across imports of the same file.
const CURVE_STEPS: usize = 16;

/// Rings below this area are degenerate artifacts of the source file.
const MIN_RING_AREA: f64 = 1e-9;

/// Flatten path data into closed rings, applying the element's absolute
/// transform. Each subpath becomes one ring; open subpaths are closed
/// implicitly (fill semantics).
pub fn flatten_path(data: &Path, transform: Transform) -> Vec<Vec<Vec2>> {
    let mut rings: Vec<Vec<Vec2>> = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();

    let map = |x: f32, y: f32| -> Vec2 {
        let (x, y) = (x as f64, y as f64);
        Vec2::new(
            transform.sx as f64 * x + transform.kx as f64 * y + transform.tx as f64,
            transform.ky as f64 * x + transform.sy as f64 * y + transform.ty as f64,
        )
    };

    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                finish_ring(&mut rings, &mut current);
                current.push(map(p.x, p.y));
            }
            PathSegment::LineTo(p) => {
                current.push(map(p.x, p.y));
            }
            PathSegment::QuadTo(c, p) => {
                let start = match current.last() {
                    Some(s) => *s,
                    None => continue,
                };
                let ctrl = map(c.x, c.y);
                let end = map(p.x, p.y);
                for step in 1..=CURVE_STEPS {
                    let t = step as f64 / CURVE_STEPS as f64;
                    current.push(quad_point(start, ctrl, end, t));
                }
            }
            PathSegment::CubicTo(c1, c2, p) => {
                let start = match current.last() {
                    Some(s) => *s,
                    None => continue,
                };
                let ctrl1 = map(c1.x, c1.y);
                let ctrl2 = map(c2.x, c2.y);
                let end = map(p.x, p.y);
                for step in 1..=CURVE_STEPS {
                    let t = step as f64 / CURVE_STEPS as f64;
                    current.push(cubic_point(start, ctrl1, ctrl2, end, t));
                }
            }
            PathSegment::Close => {
                finish_ring(&mut rings, &mut current);
            }
        }
    }
    finish_ring(&mut rings, &mut current);
    rings
}

fn finish_ring(rings: &mut Vec<Vec<Vec2>>, current: &mut Vec<Vec2>) {
    if current.len() >= 3 {
        let mut ring = std::mem::take(current);
        // Drop an explicit closing point duplicating the start.
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if (first.x - last.x).abs() < 1e-9 && (first.y - last.y).abs() < 1e-9 {
                ring.pop();
            }
        }
        if ring.len() >= 3 && ring_area(&ring).abs() > MIN_RING_AREA {
            rings.push(ring);
        }
    } else {
        current.clear();
    }
}

fn quad_point(p0: Vec2, c: Vec2, p1: Vec2, t: f64) -> Vec2 {
    let u = 1.0 - t;
    Vec2::new(
        u * u * p0.x + 2.0 * u * t * c.x + t * t * p1.x,
        u * u * p0.y + 2.0 * u * t * c.y + t * t * p1.y,
    )
}

fn cubic_point(p0: Vec2, c1: Vec2, c2: Vec2, p1: Vec2, t: f64) -> Vec2 {
    let u = 1.0 - t;
    let (uu, tt) = (u * u, t * t);
    Vec2::new(
        uu * u * p0.x + 3.0 * uu * t * c1.x + 3.0 * u * tt * c2.x + tt * t * p1.x,
        uu * u * p0.y + 3.0 * uu * t * c1.y + 3.0 * u * tt * c2.y + tt * t * p1.y,
    )
}

/// Signed shoelace area of a ring.
fn ring_area(ring: &[Vec2]) -> f64 {
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let j = (i + 1) % ring.len();
        sum += ring[i].x * ring[j].y - ring[j].x * ring[i].y;
    }
    sum / 2.0
}

/// Split rings into (outer, holes): the largest ring by area is the outer
/// contour, everything else is a hole. None when no usable ring exists.
pub fn classify_rings(rings: Vec<Vec<Vec2>>) -> Option<(Vec<Vec2>, Vec<Vec<Vec2>>)> {
    if rings.is_empty() {
        return None;
    }
    let outer_index = rings
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            ring_area(a)
                .abs()
                .partial_cmp(&ring_area(b).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)?;

    let mut outer = Vec::new();
    let mut holes = Vec::new();
    for (i, ring) in rings.into_iter().enumerate() {
        if i == outer_index {
            outer = ring;
        } else {
            holes.push(ring);
        }
    }
    Some((outer, holes))
}
