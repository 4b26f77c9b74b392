use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ir::{Graph, RelationKind};
use crate::layout::{ConnectorLine, Layout, LayoutMode};

/// Keys a storage layer may have used for a person's display name, in
/// preference order.
const NAME_KEYS: [&str; 7] = [
    "full_name",
    "fullName",
    "display_name",
    "displayName",
    "name",
    "title",
    "label",
];

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Parse(String),
}

/// One person as it arrives over the wire: an id plus arbitrary display
/// data. Callers strip non-serializable fields before sending; everything
/// that survives is carried through opaquely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(flatten)]
    pub data: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeData {
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeSpec {
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default, rename = "type")]
    pub edge_type: Option<String>,
    #[serde(default)]
    pub data: Option<EdgeData>,
}

impl EdgeSpec {
    /// kind, then type, then data.kind; absent means parent-child.
    pub fn kind_token(&self) -> &str {
        self.kind
            .as_deref()
            .or(self.edge_type.as_deref())
            .or_else(|| self.data.as_ref().and_then(|d| d.kind.as_deref()))
            .unwrap_or("")
    }
}

/// A full computation request as posted to the layout worker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComputeRequest {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    #[serde(default)]
    pub mode: Option<String>,
}

impl ComputeRequest {
    pub fn mode(&self) -> LayoutMode {
        self.mode
            .as_deref()
            .map(LayoutMode::from_token)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedNode {
    pub id: String,
    pub position: Position,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComputeResult {
    pub nodes: Vec<PlacedNode>,
    pub geometry: Vec<ConnectorLine>,
}

impl ComputeResult {
    pub fn from_layout(layout: &Layout) -> Self {
        Self {
            nodes: layout
                .nodes
                .values()
                .map(|node| PlacedNode {
                    id: node.id.clone(),
                    position: Position {
                        x: node.x,
                        y: node.y,
                    },
                })
                .collect(),
            geometry: layout.lines.clone(),
        }
    }
}

/// Parse a snapshot request. Strict JSON first; json5 as the tolerant
/// fallback for hand-edited files with comments or trailing commas.
pub fn parse_request(input: &str) -> Result<ComputeRequest, SnapshotError> {
    match serde_json::from_str::<ComputeRequest>(input) {
        Ok(request) => Ok(request),
        Err(strict_err) => json5::from_str::<ComputeRequest>(input)
            .map_err(|_| SnapshotError::Parse(strict_err.to_string())),
    }
}

/// Resolve a display name from the opaque data map: the first non-empty
/// conventional key, then first + last name, then a truncated id.
pub fn display_name(id: &str, data: &BTreeMap<String, serde_json::Value>) -> String {
    let pick = |key: &str| -> Option<String> {
        data.get(key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    for key in NAME_KEYS {
        if let Some(name) = pick(key) {
            return name;
        }
    }
    let first = pick("first_name").or_else(|| pick("firstName"));
    let last = pick("last_name").or_else(|| pick("lastName"));
    let joined = [first, last]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    if !joined.is_empty() {
        return joined;
    }
    let short: String = id.chars().take(6).collect();
    format!("Person {short}")
}

/// Build the normalized graph from wire nodes and edges. Edge kinds are
/// classified tolerantly; dangling references stay in the relationship list
/// and are ignored downstream.
pub fn build_graph(nodes: &[NodeSpec], edges: &[EdgeSpec]) -> Graph {
    let mut graph = Graph::new();
    for node in nodes {
        graph.ensure_person(&node.id, Some(display_name(&node.id, &node.data)));
        if let Some(person) = graph.persons.get_mut(&node.id) {
            person.attributes = node.data.clone();
        }
    }
    for edge in edges {
        let kind = RelationKind::from_token(edge.kind_token());
        graph.add_relationship(&edge.source, &edge.target, kind);
        if let (Some(id), Some(rel)) = (&edge.id, graph.relationships.last_mut()) {
            rel.id = id.clone();
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strict_json() {
        let request = parse_request(
            r#"{"nodes":[{"id":"a","name":"Ada"}],"edges":[{"source":"a","target":"b"}],"mode":"fan"}"#,
        )
        .unwrap();
        assert_eq!(request.nodes.len(), 1);
        assert_eq!(request.mode(), LayoutMode::Fan);
    }

    #[test]
    fn falls_back_to_json5() {
        let request = parse_request(
            "{ nodes: [{id: 'a'}], edges: [], /* hand-edited */ mode: 'circular', }",
        )
        .unwrap();
        assert_eq!(request.mode(), LayoutMode::Circular);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_request("not a snapshot").is_err());
    }

    #[test]
    fn unknown_mode_defaults_to_vertical() {
        let request = parse_request(r#"{"nodes":[],"edges":[],"mode":"spiral"}"#).unwrap();
        assert_eq!(request.mode(), LayoutMode::Vertical);
        let request = parse_request(r#"{"nodes":[],"edges":[]}"#).unwrap();
        assert_eq!(request.mode(), LayoutMode::Vertical);
    }

    #[test]
    fn partnership_tokens_classify_tolerantly() {
        for token in ["partner", "Spouse", "MARRIAGE"] {
            assert_eq!(
                RelationKind::from_token(token),
                RelationKind::Partnership,
                "{token}"
            );
        }
        for token in ["", "parent", "whatever"] {
            assert_eq!(RelationKind::from_token(token), RelationKind::ParentChild);
        }
    }

    #[test]
    fn edge_kind_token_prefers_kind_then_type_then_data() {
        let edge: EdgeSpec = serde_json::from_str(
            r#"{"source":"a","target":"b","type":"spouse","data":{"kind":"parent"}}"#,
        )
        .unwrap();
        assert_eq!(edge.kind_token(), "spouse");
        let edge: EdgeSpec =
            serde_json::from_str(r#"{"source":"a","target":"b","data":{"kind":"marriage"}}"#)
                .unwrap();
        assert_eq!(edge.kind_token(), "marriage");
    }

    #[test]
    fn display_name_resolution_order() {
        let mut data = BTreeMap::new();
        data.insert("label".to_string(), serde_json::json!("Fallback"));
        data.insert("name".to_string(), serde_json::json!("Ada Lovelace"));
        assert_eq!(display_name("x", &data), "Ada Lovelace");

        let mut data = BTreeMap::new();
        data.insert("first_name".to_string(), serde_json::json!("Ada"));
        data.insert("last_name".to_string(), serde_json::json!("Lovelace"));
        assert_eq!(display_name("x", &data), "Ada Lovelace");

        let data = BTreeMap::new();
        assert_eq!(display_name("abcdef123", &data), "Person abcdef");
    }

    #[test]
    fn result_round_trips_through_json() {
        let request = parse_request(
            r#"{"nodes":[{"id":"p"},{"id":"c"}],"edges":[{"source":"p","target":"c"}]}"#,
        )
        .unwrap();
        let graph = build_graph(&request.nodes, &request.edges);
        let layout = crate::layout::compute_layout(
            &graph,
            request.mode(),
            &crate::config::LayoutConfig::default(),
        );
        let result = ComputeResult::from_layout(&layout);
        let encoded = serde_json::to_string(&result).unwrap();
        assert!(encoded.contains("\"position\""));
        assert!(encoded.contains("\"type\":\"stem\""));
        let decoded: ComputeResult = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.nodes.len(), 2);
        assert_eq!(decoded.geometry.len(), result.geometry.len());
    }
}
