//! Snapshot capture: orthographic rasterization of the composed scene to an
//! encoded PNG.

use charm_types::Rgb;
use solid_kernel::RenderMesh;

use crate::scene::ComposedScene;

pub const SNAPSHOT_WIDTH: u32 = 512;
pub const SNAPSHOT_HEIGHT: u32 = 512;

/// Encoded outputs below this size mean the surface never drew a real
/// frame; callers should retry after a frame tick.
pub const MIN_SNAPSHOT_BYTES: usize = 256;

/// Camera tilt away from straight-down, in radians.
const VIEW_TILT: f64 = std::f64::consts::FRAC_PI_3;

/// Fraction of the viewport left as margin around the model.
const VIEW_MARGIN: f64 = 0.1;

const BACKGROUND: (u8, u8, u8) = (245, 245, 248);
const PLATE_COLOR: Rgb = Rgb {
    r: 0xc8,
    g: 0xc8,
    b: 0xd2,
};

/// Errors from snapshot capture.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CaptureError {
    #[error("no completed frame since the last geometry change")]
    NotReady,

    #[error("snapshot rasterization failed: {reason}")]
    RasterFailed { reason: String },
}

/// One projected triangle ready for painting.
struct ProjectedTri {
    points: [(f64, f64); 3],
    depth: f64,
    color: (u8, u8, u8),
}

/// Rasterize the composed scene with a fixed orthographic camera and
/// painter's-order fill, then PNG-encode the pixmap.
pub fn render_scene_png(
    scene: &ComposedScene,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, CaptureError> {
    let mut tris = Vec::new();
    project_mesh(&scene.plate_mesh, 0.0, PLATE_COLOR, &mut tris);
    for logo in &scene.logos {
        project_mesh(&logo.mesh, scene.logo_z_offset, logo.color, &mut tris);
    }
    if tris.is_empty() {
        return Err(CaptureError::NotReady);
    }

    // Fit the projected footprint into the viewport with a margin.
    let (mut min_u, mut min_v) = (f64::MAX, f64::MAX);
    let (mut max_u, mut max_v) = (f64::MIN, f64::MIN);
    for tri in &tris {
        for &(u, v) in &tri.points {
            min_u = min_u.min(u);
            min_v = min_v.min(v);
            max_u = max_u.max(u);
            max_v = max_v.max(v);
        }
    }
    let span = (max_u - min_u).max(max_v - min_v).max(1e-9);
    let usable = 1.0 - 2.0 * VIEW_MARGIN;
    let scale = usable * width.min(height) as f64 / span;
    let cu = (min_u + max_u) / 2.0;
    let cv = (min_v + max_v) / 2.0;
    let to_screen = |(u, v): (f64, f64)| -> (f32, f32) {
        (
            (width as f64 / 2.0 + (u - cu) * scale) as f32,
            // Screen y grows downward.
            (height as f64 / 2.0 - (v - cv) * scale) as f32,
        )
    };

    // Far triangles first, near triangles last.
    tris.sort_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap_or(std::cmp::Ordering::Equal));

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or_else(|| CaptureError::RasterFailed {
            reason: "pixmap allocation failed".to_string(),
        })?;
    pixmap.fill(tiny_skia::Color::from_rgba8(
        BACKGROUND.0,
        BACKGROUND.1,
        BACKGROUND.2,
        255,
    ));

    let mut paint = tiny_skia::Paint::default();
    paint.anti_alias = true;

    for tri in &tris {
        let mut pb = tiny_skia::PathBuilder::new();
        let (x0, y0) = to_screen(tri.points[0]);
        let (x1, y1) = to_screen(tri.points[1]);
        let (x2, y2) = to_screen(tri.points[2]);
        pb.move_to(x0, y0);
        pb.line_to(x1, y1);
        pb.line_to(x2, y2);
        pb.close();
        let Some(path) = pb.finish() else {
            continue;
        };
        paint.set_color_rgba8(tri.color.0, tri.color.1, tri.color.2, 255);
        pixmap.fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            tiny_skia::Transform::identity(),
            None,
        );
    }

    let bytes = pixmap.encode_png().map_err(|e| CaptureError::RasterFailed {
        reason: e.to_string(),
    })?;
    if bytes.len() < MIN_SNAPSHOT_BYTES {
        return Err(CaptureError::NotReady);
    }
    Ok(bytes)
}

/// Project one mesh into view space: rotate about X by the camera tilt,
/// flat-shade by the rotated normal.
fn project_mesh(mesh: &RenderMesh, z_offset: f64, color: Rgb, out: &mut Vec<ProjectedTri>) {
    let (sin_t, cos_t) = VIEW_TILT.sin_cos();
    // Light direction in view space.
    let light = normalize([0.35, -0.45, 0.82]);

    for tri in mesh.indices.chunks_exact(3) {
        let mut pts = [(0.0, 0.0); 3];
        let mut depth_sum = 0.0;
        let mut world = [[0.0f64; 3]; 3];
        for (i, &idx) in tri.iter().enumerate() {
            let base = idx as usize * 3;
            let x = mesh.vertices[base] as f64;
            let y = mesh.vertices[base + 1] as f64;
            let z = mesh.vertices[base + 2] as f64 + z_offset;
            world[i] = [x, y, z];
            // View rotation about X: u = x, v = y·cosT + z·sinT,
            // depth grows toward the camera.
            pts[i] = (x, y * cos_t + z * sin_t);
            depth_sum += -y * sin_t + z * cos_t;
        }

        // Face normal from the triangle itself; tessellated vertex normals
        // are already consistent but the cross product never disagrees with
        // winding.
        let e1 = sub(world[1], world[0]);
        let e2 = sub(world[2], world[0]);
        let n = normalize(cross(e1, e2));
        let n_view = [
            n[0],
            n[1] * cos_t + n[2] * sin_t,
            -n[1] * sin_t + n[2] * cos_t,
        ];
        let lambert = (n_view[0] * light[0] + n_view[1] * light[1] + n_view[2] * light[2])
            .abs()
            .clamp(0.0, 1.0);
        let shade = 0.45 + 0.55 * lambert;

        out.push(ProjectedTri {
            points: pts,
            depth: depth_sum / 3.0,
            color: (
                (color.r as f64 * shade) as u8,
                (color.g as f64 * shade) as u8,
                (color.b as f64 * shade) as u8,
            ),
        });
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len < 1e-12 {
        return [0.0, 0.0, 1.0];
    }
    [v[0] / len, v[1] / len, v[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PlacedLogo;
    use solid_kernel::{Kernel, MockKernel};

    fn scene_with_block() -> ComposedScene {
        let mut kernel = MockKernel::new();
        let handle = kernel
            .make_block([-10.0, -10.0, 0.0], [20.0, 20.0, 3.0])
            .unwrap();
        let mesh = kernel.tessellate(&handle, 0.1).unwrap();
        ComposedScene {
            plate_mesh: mesh,
            plate_fallback: None,
            logos: Vec::new(),
            logo_z_offset: 0.0,
        }
    }

    #[test]
    fn renders_png_with_signature() {
        let scene = scene_with_block();
        let png = render_scene_png(&scene, SNAPSHOT_WIDTH, SNAPSHOT_HEIGHT).unwrap();
        assert!(png.len() >= MIN_SNAPSHOT_BYTES);
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn empty_scene_is_not_ready() {
        let scene = ComposedScene::empty();
        assert!(matches!(
            render_scene_png(&scene, 64, 64),
            Err(CaptureError::NotReady)
        ));
    }

    #[test]
    fn logo_color_affects_output() {
        let mut kernel = MockKernel::new();
        let handle = kernel.make_block([-2.0, -2.0, 0.0], [4.0, 4.0, 1.0]).unwrap();
        let logo_mesh = kernel.tessellate(&handle, 0.1).unwrap();

        let mut scene = scene_with_block();
        scene.logos.push(PlacedLogo {
            shape_id: 1,
            color: Rgb::new(255, 0, 0),
            mesh: logo_mesh,
        });
        scene.logo_z_offset = 2.95;

        let with_logo = render_scene_png(&scene, 128, 128).unwrap();
        scene.logos[0].color = Rgb::new(0, 0, 255);
        let recolored = render_scene_png(&scene, 128, 128).unwrap();
        assert_ne!(with_logo, recolored);
    }
}
