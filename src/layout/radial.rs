use std::collections::{BTreeMap, HashMap};

use crate::config::LayoutConfig;
use crate::ir::Graph;

use super::family::FamilyGraph;
use super::types::PersonLayout;
use super::vertical::init_nodes;

/// Generation depth per person: first-visit DFS from the roots along
/// parent-child edges. Persons unreachable from any root (cyclic leftovers)
/// stay at depth zero.
pub(super) fn compute_depths(graph: &Graph, families: &FamilyGraph) -> HashMap<String, usize> {
    let mut depths: HashMap<String, usize> = HashMap::new();
    let mut stack: Vec<(String, usize)> = families
        .roots(graph)
        .into_iter()
        .map(|id| (id, 0))
        .collect();
    while let Some((id, depth)) = stack.pop() {
        if depths.contains_key(&id) {
            continue;
        }
        depths.insert(id.clone(), depth);
        if let Some(children) = families.children_of.get(&id) {
            for child in children {
                stack.push((child.clone(), depth + 1));
            }
        }
    }
    depths
}

/// Depth-as-radius, index-as-angle placement around the origin. A decorative
/// view: no packing and no overlap guarantee.
pub(super) fn compute_circular_layout(
    graph: &Graph,
    families: &FamilyGraph,
    config: &LayoutConfig,
) -> BTreeMap<String, PersonLayout> {
    let mut nodes = init_nodes(graph, families);
    let depths = compute_depths(graph, families);
    let ids = graph.person_ids();
    let total = ids.len().max(1) as f32;
    for (index, id) in ids.iter().enumerate() {
        let depth = depths.get(id).copied().unwrap_or(0);
        let radius = config.circular.base_radius + depth as f32 * config.circular.radius_step;
        let angle = index as f32 / total * std::f32::consts::TAU;
        if let Some(node) = nodes.get_mut(id) {
            node.x = angle.cos() * radius;
            node.y = angle.sin() * radius;
            node.generation = depth;
        }
    }
    nodes
}

/// Like circular but bounded to a configured arc, with deeper generations
/// pushed further down so the wedge reads top-to-bottom.
pub(super) fn compute_fan_layout(
    graph: &Graph,
    families: &FamilyGraph,
    config: &LayoutConfig,
) -> BTreeMap<String, PersonLayout> {
    let mut nodes = init_nodes(graph, families);
    let depths = compute_depths(graph, families);
    let ids = graph.person_ids();
    let spread = config.fan.spread;
    let last = (ids.len().saturating_sub(1)).max(1) as f32;
    for (index, id) in ids.iter().enumerate() {
        let depth = depths.get(id).copied().unwrap_or(0);
        let radius = config.fan.base_radius + depth as f32 * config.fan.radius_step;
        let angle = -spread / 2.0 + index as f32 / last * spread;
        if let Some(node) = nodes.get_mut(id) {
            node.x = angle.cos() * radius;
            node.y = angle.sin() * radius + depth as f32 * config.fan.depth_drop;
            node.generation = depth;
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RelationKind;
    use crate::layout::family::infer_families;

    fn chain(len: usize) -> Graph {
        let mut g = Graph::new();
        for i in 0..len {
            g.ensure_person(&format!("p{i}"), None);
        }
        for i in 1..len {
            g.add_relationship(&format!("p{}", i - 1), &format!("p{i}"), RelationKind::ParentChild);
        }
        g
    }

    #[test]
    fn depths_follow_parent_child_edges() {
        let g = chain(4);
        let families = infer_families(&g);
        let depths = compute_depths(&g, &families);
        for i in 0..4 {
            assert_eq!(depths[&format!("p{i}")], i);
        }
    }

    #[test]
    fn circular_radius_grows_with_depth() {
        let g = chain(3);
        let families = infer_families(&g);
        let config = LayoutConfig::default();
        let nodes = compute_circular_layout(&g, &families, &config);
        for i in 0..3usize {
            let node = &nodes[&format!("p{i}")];
            let radius = (node.x * node.x + node.y * node.y).sqrt();
            let expected = config.circular.base_radius + i as f32 * config.circular.radius_step;
            assert!((radius - expected).abs() < 0.01, "depth {i}: {radius} vs {expected}");
        }
    }

    #[test]
    fn fan_angles_stay_inside_the_arc() {
        let g = chain(5);
        let families = infer_families(&g);
        let config = LayoutConfig::default();
        let nodes = compute_fan_layout(&g, &families, &config);
        for (i, node) in nodes.values().enumerate() {
            let depth = node.generation as f32;
            let y = node.y - depth * config.fan.depth_drop;
            let radius = config.fan.base_radius + depth * config.fan.radius_step;
            let angle = (y / radius).asin();
            assert!(
                angle.abs() <= config.fan.spread / 2.0 + 0.01,
                "node {i} outside arc: {angle}"
            );
        }
    }
}
