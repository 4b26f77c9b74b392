use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::ir::Graph;

use super::family::FamilyGraph;
use super::types::{ConnectorLine, PersonLayout};

/// Build the per-person layout shells with family wiring but no positions.
pub(super) fn init_nodes(graph: &Graph, families: &FamilyGraph) -> BTreeMap<String, PersonLayout> {
    let mut nodes = BTreeMap::new();
    for person in graph.persons.values() {
        nodes.insert(
            person.id.clone(),
            PersonLayout {
                id: person.id.clone(),
                display_name: person.display_name.clone(),
                x: 0.0,
                y: 0.0,
                subtree_width: 0.0,
                generation: 0,
                partners: families.partners_of(&person.id).to_vec(),
                children: families
                    .children_of
                    .get(&person.id)
                    .cloned()
                    .unwrap_or_default(),
            },
        );
    }
    nodes
}

/// The strict block-partition layout: every descendant branch is a rigid
/// block of horizontal space, so cousins never interleave with siblings.
pub(super) fn compute_packed_layout(
    graph: &Graph,
    families: &FamilyGraph,
    config: &LayoutConfig,
) -> BTreeMap<String, PersonLayout> {
    let mut nodes = init_nodes(graph, families);
    let mut widths: HashMap<String, f32> = HashMap::new();
    let mut placed: HashSet<String> = HashSet::new();

    let mut cursor = 0.0_f32;
    for root in families.roots(graph) {
        if placed.contains(&root) {
            continue;
        }
        let width = measure_subtree(&root, families, config, &mut widths);
        assign_positions(&root, cursor, 0, families, config, &widths, &mut nodes, &mut placed);
        cursor += width + config.packed.cousin_gap;
    }

    // Degenerate inputs (a parent-child cycle with no root) still get every
    // person onto the canvas as a standalone block.
    for id in graph.person_ids() {
        if placed.contains(&id) {
            continue;
        }
        let width = measure_subtree(&id, families, config, &mut widths);
        assign_positions(&id, cursor, 0, families, config, &widths, &mut nodes, &mut placed);
        cursor += width + config.packed.cousin_gap;
    }

    for (id, width) in &widths {
        if let Some(node) = nodes.get_mut(id) {
            node.subtree_width = *width;
        }
    }

    nodes
}

fn parent_block_width(id: &str, families: &FamilyGraph, config: &LayoutConfig) -> f32 {
    let partner_count = families.partners_of(id).len() as f32;
    config.card.width + partner_count * (config.card.width + config.packed.partner_gap)
}

/// Combined width of all child blocks across this person's family units,
/// with sibling gaps inside each family and between family groups. Reads the
/// memoized width map only.
fn children_span(
    id: &str,
    families: &FamilyGraph,
    config: &LayoutConfig,
    widths: &HashMap<String, f32>,
) -> f32 {
    let mut total = 0.0;
    let mut blocks = 0usize;
    for index in families.block_family_indices(id) {
        let family = &families.families[index];
        let mut block = 0.0;
        let mut count = 0usize;
        for child in &family.children {
            let width = widths.get(child).copied().unwrap_or(0.0);
            if count > 0 {
                block += config.packed.sibling_gap;
            }
            block += width;
            count += 1;
        }
        if count == 0 {
            continue;
        }
        if blocks > 0 {
            total += config.packed.sibling_gap;
        }
        total += block;
        blocks += 1;
    }
    total
}

/// Bottom-up width pass. The width map doubles as the visited guard: a
/// person already present contributes its recorded width and is not
/// descended into again, which truncates cyclic input instead of looping.
fn measure_subtree(
    id: &str,
    families: &FamilyGraph,
    config: &LayoutConfig,
    widths: &mut HashMap<String, f32>,
) -> f32 {
    if let Some(width) = widths.get(id) {
        return *width;
    }
    widths.insert(id.to_string(), 0.0);

    for index in families.block_family_indices(id) {
        for child in &families.families[index].children {
            measure_subtree(child, families, config, widths);
        }
    }

    let own = parent_block_width(id, families, config);
    let children = children_span(id, families, config, widths);
    let width = if children > 0.0 { own.max(children) } else { own };
    widths.insert(id.to_string(), width);
    width
}

/// Top-down placement. The parent block is centered inside the reserved
/// width; children re-center beneath it when their combined span is
/// narrower. First placement wins: a person reached twice (diamond or
/// remarriage topologies) keeps its original coordinates.
#[allow(clippy::too_many_arguments)]
fn assign_positions(
    id: &str,
    start_x: f32,
    generation: usize,
    families: &FamilyGraph,
    config: &LayoutConfig,
    widths: &HashMap<String, f32>,
    nodes: &mut BTreeMap<String, PersonLayout>,
    placed: &mut HashSet<String>,
) {
    if !placed.insert(id.to_string()) {
        return;
    }

    let reserved = widths.get(id).copied().unwrap_or(config.card.width);
    let card = config.card.width;
    let block = parent_block_width(id, families, config);
    let x = start_x + ((reserved - block) / 2.0).max(0.0);
    let y = generation as f32 * config.packed.generation_gap;

    if let Some(node) = nodes.get_mut(id) {
        node.x = x;
        node.y = y;
        node.generation = generation;
    }

    let partners: Vec<String> = families.partners_of(id).to_vec();
    for (slot, partner) in partners.iter().enumerate() {
        if !placed.insert(partner.clone()) {
            continue;
        }
        if let Some(node) = nodes.get_mut(partner) {
            node.x = x + (slot as f32 + 1.0) * (card + config.packed.partner_gap);
            node.y = y;
            node.generation = generation;
        }
    }

    let span = children_span(id, families, config, widths);
    if span <= 0.0 {
        return;
    }
    let mut cursor = start_x + ((reserved - span) / 2.0).max(0.0);
    let mut blocks = 0usize;
    for index in families.block_family_indices(id) {
        let family = &families.families[index];
        if family.children.is_empty() {
            continue;
        }
        if blocks > 0 {
            cursor += config.packed.sibling_gap;
        }
        for (slot, child) in family.children.iter().enumerate() {
            if slot > 0 {
                cursor += config.packed.sibling_gap;
            }
            let child_width = widths.get(child).copied().unwrap_or(config.card.width);
            assign_positions(
                child,
                cursor,
                generation + 1,
                families,
                config,
                widths,
                nodes,
                placed,
            );
            cursor += child_width;
        }
        blocks += 1;
    }
}

/// Horizontal mode is the vertical computation with the axes swapped
/// afterwards; connector anchors rotate with it.
pub(super) fn transpose(nodes: &mut BTreeMap<String, PersonLayout>, lines: &mut [ConnectorLine]) {
    for node in nodes.values_mut() {
        std::mem::swap(&mut node.x, &mut node.y);
    }
    for line in lines.iter_mut() {
        std::mem::swap(&mut line.x1, &mut line.y1);
        std::mem::swap(&mut line.x2, &mut line.y2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RelationKind;
    use crate::layout::family::infer_families;

    fn graph(people: &[&str], parent_child: &[(&str, &str)], partners: &[(&str, &str)]) -> Graph {
        let mut g = Graph::new();
        for id in people {
            g.ensure_person(id, None);
        }
        for (parent, child) in parent_child {
            g.add_relationship(parent, child, RelationKind::ParentChild);
        }
        for (a, b) in partners {
            g.add_relationship(a, b, RelationKind::Partnership);
        }
        g
    }

    fn packed(graph: &Graph) -> BTreeMap<String, PersonLayout> {
        let families = infer_families(graph);
        compute_packed_layout(graph, &families, &LayoutConfig::default())
    }

    #[test]
    fn leaf_width_is_one_card() {
        let g = graph(&["a"], &[], &[]);
        let nodes = packed(&g);
        assert_eq!(nodes["a"].subtree_width, 260.0);
    }

    #[test]
    fn partner_pair_reserves_its_own_footprint() {
        let g = graph(&["a", "b"], &[], &[("a", "b")]);
        let nodes = packed(&g);
        // One card plus one partner extension on both sides of the link.
        assert_eq!(nodes["a"].subtree_width, 260.0 + 260.0 + 24.0);
        assert_eq!(nodes["b"].x, nodes["a"].x + 260.0 + 24.0);
        assert_eq!(nodes["b"].y, nodes["a"].y);
    }

    #[test]
    fn width_covers_children_plus_gaps() {
        let g = graph(&["p", "c1", "c2"], &[("p", "c1"), ("p", "c2")], &[]);
        let nodes = packed(&g);
        assert_eq!(nodes["p"].subtree_width, 260.0 + 50.0 + 260.0);
    }

    #[test]
    fn couple_centers_child_under_partnership_midpoint() {
        let g = graph(
            &["alice", "bob", "carol"],
            &[("alice", "carol"), ("bob", "carol")],
            &[],
        );
        let nodes = packed(&g);
        let alice = &nodes["alice"];
        let bob = &nodes["bob"];
        let carol = &nodes["carol"];
        assert_eq!(alice.generation, 0);
        assert_eq!(bob.generation, 0);
        assert_eq!(carol.generation, 1);
        let midpoint = (alice.x + 260.0 + bob.x) / 2.0;
        let carol_center = carol.x + 130.0;
        assert!((midpoint - carol_center).abs() < 0.01);
    }

    #[test]
    fn unrelated_roots_separated_by_cousin_gap() {
        let g = graph(&["a", "b"], &[], &[]);
        let nodes = packed(&g);
        assert_eq!(nodes["a"].x, 0.0);
        assert_eq!(nodes["b"].x, 260.0 + 300.0);
        assert_eq!(nodes["a"].y, nodes["b"].y);
    }

    #[test]
    fn generations_share_a_row() {
        let g = graph(
            &["r", "a", "b", "a1", "b1"],
            &[("r", "a"), ("r", "b"), ("a", "a1"), ("b", "b1")],
            &[],
        );
        let nodes = packed(&g);
        assert_eq!(nodes["a"].y, nodes["b"].y);
        assert_eq!(nodes["a1"].y, nodes["b1"].y);
        assert_eq!(nodes["a1"].y, 2.0 * 250.0);
    }

    #[test]
    fn sibling_blocks_never_overlap() {
        // Binary tree, four generations.
        let mut people = vec!["n1".to_string()];
        let mut edges = Vec::new();
        for i in 1..8usize {
            let parent = format!("n{}", i);
            let left = format!("n{}", i * 2);
            let right = format!("n{}", i * 2 + 1);
            people.push(left.clone());
            people.push(right.clone());
            edges.push((parent.clone(), left));
            edges.push((parent, right));
        }
        let refs: Vec<&str> = people.iter().map(String::as_str).collect();
        let edge_refs: Vec<(&str, &str)> = edges
            .iter()
            .map(|(a, b)| (a.as_str(), b.as_str()))
            .collect();
        let g = graph(&refs, &edge_refs, &[]);
        let nodes = packed(&g);

        // No two cards share both coordinates.
        let mut seen = HashSet::new();
        for node in nodes.values() {
            let key = (node.x.to_bits(), node.y.to_bits());
            assert!(seen.insert(key), "cards collide at {:?}", key);
        }

        // Root centered over the whole tree.
        let min_x = nodes.values().map(|n| n.x).fold(f32::MAX, f32::min);
        let max_x = nodes.values().map(|n| n.x + 260.0).fold(f32::MIN, f32::max);
        let root_center = nodes["n1"].x + 130.0;
        assert!((root_center - (min_x + max_x) / 2.0).abs() < 1.0);
    }

    #[test]
    fn cyclic_input_terminates_and_places_everyone() {
        let g = graph(&["a", "b"], &[("a", "b"), ("b", "a")], &[]);
        let nodes = packed(&g);
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn transpose_swaps_axes() {
        let g = graph(&["p", "c"], &[("p", "c")], &[]);
        let families = infer_families(&g);
        let mut nodes = compute_packed_layout(&g, &families, &LayoutConfig::default());
        let before_y = nodes["c"].y;
        let mut lines = Vec::new();
        transpose(&mut nodes, &mut lines);
        assert_eq!(nodes["c"].x, before_y);
    }
}
