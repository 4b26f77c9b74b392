mod connectors;
pub(crate) mod family;
mod radial;
pub(crate) mod types;
mod vertical;

pub use family::{FamilyGraph, infer_families};
pub use types::*;

use connectors::{build_orthogonal_geometry, build_radial_geometry};
use radial::{compute_circular_layout, compute_fan_layout};
use vertical::{compute_packed_layout, transpose};

use crate::config::LayoutConfig;
use crate::ir::Graph;
use std::collections::BTreeMap;

/// Run one full layout computation over an immutable snapshot. Pure: the
/// same graph, mode, and config always produce bit-identical output, and
/// nothing in `graph` is mutated.
pub fn compute_layout(graph: &Graph, mode: LayoutMode, config: &LayoutConfig) -> Layout {
    let families = infer_families(graph);

    let (mut nodes, mut lines) = match mode {
        LayoutMode::Vertical | LayoutMode::Horizontal => {
            let nodes = compute_packed_layout(graph, &families, config);
            let lines = build_orthogonal_geometry(&nodes, &families, config);
            (nodes, lines)
        }
        LayoutMode::Circular => {
            let nodes = compute_circular_layout(graph, &families, config);
            let lines = build_radial_geometry(&nodes, &families, config);
            (nodes, lines)
        }
        LayoutMode::Fan => {
            let nodes = compute_fan_layout(graph, &families, config);
            let lines = build_radial_geometry(&nodes, &families, config);
            (nodes, lines)
        }
    };

    if mode == LayoutMode::Horizontal {
        transpose(&mut nodes, &mut lines);
    }

    let (width, height) = normalize_origin(&mut nodes, &mut lines, config);

    Layout {
        mode,
        nodes,
        lines,
        width,
        height,
    }
}

/// Shift the whole layout so the bounding box starts at the origin and
/// report its extent. The radial modes place around (0, 0), so without this
/// pass half the canvas would sit at negative coordinates.
fn normalize_origin(
    nodes: &mut BTreeMap<String, PersonLayout>,
    lines: &mut [ConnectorLine],
    config: &LayoutConfig,
) -> (f32, f32) {
    if nodes.is_empty() {
        return (0.0, 0.0);
    }

    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for node in nodes.values() {
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
        max_x = max_x.max(node.x + config.card.width);
        max_y = max_y.max(node.y + config.card.height);
    }

    for node in nodes.values_mut() {
        node.x -= min_x;
        node.y -= min_y;
    }
    for line in lines.iter_mut() {
        line.x1 -= min_x;
        line.x2 -= min_x;
        line.y1 -= min_y;
        line.y2 -= min_y;
    }

    ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0))
}
