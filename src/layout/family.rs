use std::collections::{BTreeMap, HashSet};

use crate::ir::{Graph, RelationKind};

use super::types::FamilyUnit;

/// Nuclear-family structure derived from the flat edge list. All maps are
/// keyed by person id; vectors keep edge discovery order so a fixed snapshot
/// always produces the same layout.
#[derive(Debug, Default)]
pub struct FamilyGraph {
    pub families: Vec<FamilyUnit>,
    /// Family indices per parent, covering both parent slots.
    pub families_of: BTreeMap<String, Vec<usize>>,
    /// Symmetric partner links: explicit partnership edges plus co-parents.
    pub partners: BTreeMap<String, Vec<String>>,
    pub children_of: BTreeMap<String, Vec<String>>,
    pub parents_of: BTreeMap<String, Vec<String>>,
}

impl FamilyGraph {
    pub fn family_indices(&self, id: &str) -> &[usize] {
        self.families_of.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn partners_of(&self, id: &str) -> &[String] {
        self.partners.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Family units belonging to this person's household block: their own
    /// plus those of every partner placed beside them. Partners are laid out
    /// inside the block and are never recursed into, so their families must
    /// ride along or their children would fall off the canvas.
    pub fn block_family_indices(&self, id: &str) -> Vec<usize> {
        let mut indices: Vec<usize> = Vec::new();
        let mut extend = |list: &[usize]| {
            for &index in list {
                if !indices.contains(&index) {
                    indices.push(index);
                }
            }
        };
        extend(self.family_indices(id));
        for partner in self.partners_of(id) {
            extend(self.family_indices(partner));
        }
        indices
    }

    /// Persons with no incoming parent-child edge, in snapshot order. A
    /// person absent from every edge is its own root.
    pub fn roots(&self, graph: &Graph) -> Vec<String> {
        graph
            .person_ids()
            .into_iter()
            .filter(|id| self.parents_of.get(id).map_or(true, Vec::is_empty))
            .collect()
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

fn link_partners(partners: &mut BTreeMap<String, Vec<String>>, a: &str, b: &str) {
    push_unique(partners.entry(a.to_string()).or_default(), b);
    push_unique(partners.entry(b.to_string()).or_default(), a);
}

/// Derive nuclear-family units, partner links, and child/parent maps from
/// the snapshot. Edges whose endpoints are not both present, or that loop
/// back onto themselves, are skipped silently; this function never fails.
pub fn infer_families(graph: &Graph) -> FamilyGraph {
    let mut out = FamilyGraph::default();

    // Resolvable parent-child edges in snapshot order. The co-parent scan
    // below walks this list, so "first co-parent discovered" is edge order.
    let mut parent_child: Vec<(String, String)> = Vec::new();
    for edge in &graph.relationships {
        if !graph.persons.contains_key(&edge.source)
            || !graph.persons.contains_key(&edge.target)
            || edge.source == edge.target
        {
            continue;
        }
        match edge.kind {
            RelationKind::ParentChild => {
                parent_child.push((edge.source.clone(), edge.target.clone()));
            }
            RelationKind::Partnership => {
                link_partners(&mut out.partners, &edge.source, &edge.target);
            }
        }
    }

    for (parent, child) in &parent_child {
        push_unique(out.children_of.entry(parent.clone()).or_default(), child);
        push_unique(out.parents_of.entry(child.clone()).or_default(), parent);
    }

    // Parents in order of first appearance as an edge source.
    let mut parent_order: Vec<String> = Vec::new();
    for (parent, _) in &parent_child {
        push_unique(&mut parent_order, parent);
    }

    let mut claimed: HashSet<String> = HashSet::new();
    for person in &parent_order {
        // Group this person's children by co-parent, keeping discovery order.
        let mut groups: Vec<(Option<String>, Vec<String>)> = Vec::new();
        let children = out
            .children_of
            .get(person)
            .cloned()
            .unwrap_or_default();
        for child in &children {
            if claimed.contains(child) {
                continue;
            }
            let co_parent = parent_child
                .iter()
                .find(|(source, target)| target == child && source != person)
                .map(|(source, _)| source.clone());
            match groups.iter_mut().find(|(key, _)| *key == co_parent) {
                Some((_, members)) => members.push(child.clone()),
                None => groups.push((co_parent, vec![child.clone()])),
            }
        }

        for (co_parent, children) in groups {
            match co_parent {
                Some(other) => {
                    // The couple is emitted once, from the lexicographically
                    // smaller parent's perspective.
                    if person.as_str() > other.as_str() {
                        continue;
                    }
                    for child in &children {
                        claimed.insert(child.clone());
                    }
                    link_partners(&mut out.partners, person, &other);
                    let index = out.families.len();
                    out.families.push(FamilyUnit {
                        parents: vec![person.clone(), other.clone()],
                        children,
                    });
                    out.families_of.entry(person.clone()).or_default().push(index);
                    out.families_of.entry(other.clone()).or_default().push(index);
                }
                None => {
                    for child in &children {
                        claimed.insert(child.clone());
                    }
                    let index = out.families.len();
                    out.families.push(FamilyUnit {
                        parents: vec![person.clone()],
                        children,
                    });
                    out.families_of.entry(person.clone()).or_default().push(index);
                }
            }
        }
    }

    out
}
