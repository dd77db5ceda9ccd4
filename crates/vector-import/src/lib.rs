//! Vector Importer: SVG markup → batch of planar shapes.
//!
//! The importer is atomic: it either returns a complete batch or an error,
//! never partial output. Callers replace their previous batch wholesale.

pub mod flatten;

use charm_types::{ImportedShape, Rgb};
use usvg::Node;

/// Errors from vector import.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ImportError {
    #[error("failed to parse vector markup: {message}")]
    Parse { message: String },

    #[error("the file contains no drawable shapes")]
    NoShapes,
}

/// Parse SVG markup into an ordered batch of imported shapes.
///
/// Every visible filled path contributes one shape. Curves are flattened to
/// polylines in document coordinates with the element's absolute transform
/// applied. Shapes without an embedded element id get a positional label.
pub fn import_vector(raw: &str) -> Result<Vec<ImportedShape>, ImportError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(raw, &options).map_err(|e| ImportError::Parse {
        message: e.to_string(),
    })?;

    let mut shapes = Vec::new();
    collect_group(tree.root(), &mut shapes);

    if shapes.is_empty() {
        return Err(ImportError::NoShapes);
    }
    Ok(shapes)
}

fn collect_group(group: &usvg::Group, out: &mut Vec<ImportedShape>) {
    for node in group.children() {
        match node {
            Node::Group(g) => collect_group(g, out),
            Node::Path(path) => {
                if let Some(shape) = shape_from_path(path, out.len()) {
                    out.push(shape);
                }
            }
            // Raster images and text are not extrudable geometry.
            _ => {}
        }
    }
}

fn shape_from_path(path: &usvg::Path, index: usize) -> Option<ImportedShape> {
    if !path.is_visible() {
        return None;
    }
    // Only filled paths produce solid material; bare strokes are skipped.
    let fill = path.fill()?;
    let color = match fill.paint() {
        usvg::Paint::Color(c) => Rgb::new(c.red, c.green, c.blue),
        // Gradients and patterns collapse to the neutral default.
        _ => Rgb::NEUTRAL,
    };

    let rings = flatten::flatten_path(path.data(), path.abs_transform());
    let (outer, holes) = flatten::classify_rings(rings)?;

    let name = if path.id().is_empty() {
        format!("Part {}", index + 1)
    } else {
        path.id().to_string()
    };

    Some(ImportedShape {
        id: index as u32 + 1,
        name,
        fill: color,
        current_color: color,
        outer,
        holes,
    })
}
