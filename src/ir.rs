use std::collections::{BTreeMap, HashMap};

/// Classification of a relationship edge. Parent-child edges are directed
/// (source = parent, target = child); partnership edges are undirected in
/// meaning even though they are stored with a source and a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    ParentChild,
    Partnership,
}

impl RelationKind {
    /// Tolerant classification of the edge-kind tokens storage layers emit.
    /// Anything that is not an explicit partnership marker is a parent-child
    /// edge, including an absent or empty token.
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "partner" | "partnership" | "spouse" | "marriage" => Self::Partnership,
            _ => Self::ParentChild,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Person {
    pub id: String,
    pub display_name: String,
    /// Opaque display data carried through untouched; layout never reads it.
    pub attributes: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct Relationship {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: RelationKind,
}

/// Normalized in-memory snapshot of people and relationships. Persons keep
/// their snapshot insertion order in `person_order` so a fixed input always
/// walks in the same order.
#[derive(Debug, Clone)]
pub struct Graph {
    pub persons: BTreeMap<String, Person>,
    pub person_order: HashMap<String, usize>,
    pub relationships: Vec<Relationship>,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            persons: BTreeMap::new(),
            person_order: HashMap::new(),
            relationships: Vec::new(),
        }
    }

    pub fn ensure_person(&mut self, id: &str, display_name: Option<String>) {
        if !self.person_order.contains_key(id) {
            self.person_order
                .insert(id.to_string(), self.person_order.len());
        }
        let entry = self.persons.entry(id.to_string()).or_insert(Person {
            id: id.to_string(),
            display_name: id.to_string(),
            attributes: BTreeMap::new(),
        });
        if let Some(name) = display_name {
            entry.display_name = name;
        }
    }

    pub fn add_relationship(&mut self, source: &str, target: &str, kind: RelationKind) {
        let id = format!("{source}->{target}");
        self.relationships.push(Relationship {
            id,
            source: source.to_string(),
            target: target.to_string(),
            kind,
        });
    }

    /// Person ids in snapshot insertion order.
    pub fn person_ids(&self) -> Vec<String> {
        let mut ids: Vec<&String> = self.persons.keys().collect();
        ids.sort_by_key(|id| self.person_order.get(*id).copied().unwrap_or(usize::MAX));
        ids.into_iter().cloned().collect()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
