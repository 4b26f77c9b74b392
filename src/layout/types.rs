use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Strategy selector. Unrecognized tokens fall back to `Vertical` so the
/// canvas always has something to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    #[default]
    Vertical,
    Horizontal,
    Circular,
    Fan,
}

impl LayoutMode {
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "horizontal" => Self::Horizontal,
            "circular" => Self::Circular,
            "fan" => Self::Fan,
            _ => Self::Vertical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::Circular => "circular",
            Self::Fan => "fan",
        }
    }
}

/// One or two parents plus the children they share. Derived per computation,
/// never stored. Two-parent families keep the lexicographically smaller
/// parent in slot 0.
#[derive(Debug, Clone)]
pub struct FamilyUnit {
    pub parents: Vec<String>,
    pub children: Vec<String>,
}

impl FamilyUnit {
    /// Stable identifier for connector line ids.
    pub fn key(&self) -> String {
        self.parents.join("+")
    }
}

/// Per-person layout state, rebuilt from scratch on every computation.
#[derive(Debug, Clone)]
pub struct PersonLayout {
    pub id: String,
    pub display_name: String,
    pub x: f32,
    pub y: f32,
    pub subtree_width: f32,
    pub generation: usize,
    pub partners: Vec<String>,
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Partnership,
    Stem,
    Branch,
}

/// A renderable connector segment in layout coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorLine {
    pub id: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(rename = "type")]
    pub kind: LineKind,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub mode: LayoutMode,
    pub nodes: BTreeMap<String, PersonLayout>,
    pub lines: Vec<ConnectorLine>,
    pub width: f32,
    pub height: f32,
}
