use std::collections::BTreeMap;

use crate::config::LayoutConfig;

use super::family::FamilyGraph;
use super::types::{ConnectorLine, LineKind, PersonLayout};

fn line(id: String, kind: LineKind, x1: f32, y1: f32, x2: f32, y2: f32) -> ConnectorLine {
    ConnectorLine {
        id,
        x1,
        y1,
        x2,
        y2,
        kind,
    }
}

fn pair_id(kind: &str, a: &str, b: &str) -> String {
    if a <= b {
        format!("{kind}-{a}-{b}")
    } else {
        format!("{kind}-{b}-{a}")
    }
}

/// The orthogonal connector contract for the packed modes: a horizontal
/// partnership tie per couple, then per family a vertical stem, a horizontal
/// bus across the children, and a vertical drop into each child.
pub(super) fn build_orthogonal_geometry(
    nodes: &BTreeMap<String, PersonLayout>,
    families: &FamilyGraph,
    config: &LayoutConfig,
) -> Vec<ConnectorLine> {
    let card_w = config.card.width;
    let card_h = config.card.height;
    let mut lines = Vec::new();

    // One tie per unordered partner pair, childless couples included.
    for (person, partners) in &families.partners {
        for partner in partners {
            if person.as_str() >= partner.as_str() {
                continue;
            }
            let (Some(a), Some(b)) = (nodes.get(person), nodes.get(partner)) else {
                continue;
            };
            let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
            lines.push(line(
                pair_id("partnership", person, partner),
                LineKind::Partnership,
                left.x + card_w,
                left.y + card_h / 2.0,
                right.x,
                right.y + card_h / 2.0,
            ));
        }
    }

    for family in &families.families {
        let key = family.key();
        let parents: Vec<&PersonLayout> = family
            .parents
            .iter()
            .filter_map(|id| nodes.get(id))
            .collect();
        if parents.is_empty() || family.children.is_empty() {
            continue;
        }

        // Stem origin: partnership midpoint for a couple, bottom-center of
        // the card for a single parent.
        let (stem_x, stem_top) = if parents.len() == 2 {
            let (left, right) = if parents[0].x <= parents[1].x {
                (parents[0], parents[1])
            } else {
                (parents[1], parents[0])
            };
            ((left.x + card_w + right.x) / 2.0, left.y + card_h / 2.0)
        } else {
            (parents[0].x + card_w / 2.0, parents[0].y + card_h)
        };
        let bus_y = parents[0].y + card_h + config.packed.stem_length;
        lines.push(line(
            format!("stem-{key}"),
            LineKind::Stem,
            stem_x,
            stem_top,
            stem_x,
            bus_y,
        ));

        let children: Vec<&PersonLayout> = family
            .children
            .iter()
            .filter_map(|id| nodes.get(id))
            .collect();
        if children.len() >= 2 {
            let first = children
                .iter()
                .map(|c| c.x + card_w / 2.0)
                .fold(f32::MAX, f32::min);
            let last = children
                .iter()
                .map(|c| c.x + card_w / 2.0)
                .fold(f32::MIN, f32::max);
            lines.push(line(
                format!("bus-{key}"),
                LineKind::Branch,
                first,
                bus_y,
                last,
                bus_y,
            ));
        }
        for child in &children {
            let center = child.x + card_w / 2.0;
            lines.push(line(
                format!("drop-{key}-{}", child.id),
                LineKind::Branch,
                center,
                bus_y,
                center,
                child.y,
            ));
        }
    }

    lines
}

/// Radial modes keep plain center-to-center links; the stem/bus/drop routing
/// is the signature of the packed modes only.
pub(super) fn build_radial_geometry(
    nodes: &BTreeMap<String, PersonLayout>,
    families: &FamilyGraph,
    config: &LayoutConfig,
) -> Vec<ConnectorLine> {
    let card_w = config.card.width;
    let card_h = config.card.height;
    let center = |node: &PersonLayout| (node.x + card_w / 2.0, node.y + card_h / 2.0);
    let mut lines = Vec::new();

    for (person, partners) in &families.partners {
        for partner in partners {
            if person.as_str() >= partner.as_str() {
                continue;
            }
            let (Some(a), Some(b)) = (nodes.get(person), nodes.get(partner)) else {
                continue;
            };
            let (x1, y1) = center(a);
            let (x2, y2) = center(b);
            lines.push(line(
                pair_id("partnership", person, partner),
                LineKind::Partnership,
                x1,
                y1,
                x2,
                y2,
            ));
        }
    }

    for (parent, children) in &families.children_of {
        let Some(parent_node) = nodes.get(parent) else {
            continue;
        };
        for child in children {
            let Some(child_node) = nodes.get(child) else {
                continue;
            };
            let (x1, y1) = center(parent_node);
            let (x2, y2) = center(child_node);
            lines.push(line(
                format!("branch-{parent}-{child}"),
                LineKind::Branch,
                x1,
                y1,
                x2,
                y2,
            ));
        }
    }

    lines
}
