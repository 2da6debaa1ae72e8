use std::collections::HashMap;

use eframe::egui::{Color32, Vec2, vec2};

use crate::util::stable_pair;

mod edges;
mod geometry;
mod highlight;

pub use edges::{EdgeBuild, build_interop_edges, build_usage_edges};
pub use geometry::{Connector, RectEntity, Side, resolve_connector};
pub use highlight::{HopLimit, Neighborhood, expand_neighborhood};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Company,
    Tool,
    Other(String),
}

impl NodeKind {
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case("company") {
            Self::Company
        } else if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("tool") {
            Self::Tool
        } else {
            Self::Other(trimmed.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Company => "company",
            Self::Tool => "tool",
            Self::Other(label) => label,
        }
    }

    pub fn is_company(&self) -> bool {
        matches!(self, Self::Company)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeMode {
    Usage,
    Interoperability,
}

impl EdgeMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Usage => "usage",
            Self::Interoperability => "interoperability",
        }
    }
}

/// A rendered entity: a company, a tool, or a user-defined category.
/// `id` equals the source record name for data-derived nodes and a generated
/// token for user-added ones; `kind` is fixed at creation.
#[derive(Clone, Debug)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub pos: Vec2,
    pub size: u32,
    pub color: Color32,
    pub editable: bool,
    /// Explicit usage override; when non-empty it wins over the dataset
    /// mapping for this node.
    pub tools: Vec<String>,
    /// Render-measured half extents in world units. `None` until the first
    /// layout pass has measured the node's label.
    pub half_extents: Option<Vec2>,
}

impl GraphNode {
    pub fn new(id: String, label: String, kind: NodeKind, color: Color32) -> Self {
        let (jx, jy) = stable_pair(&id);
        Self {
            id,
            label,
            kind,
            pos: vec2(jx, jy) * 420.0,
            size: 1,
            color,
            editable: false,
            tools: Vec::new(),
            half_extents: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub mode: EdgeMode,
}

/// Canonical undirected edge id: the endpoint pair sorted lexicographically,
/// so (A,B) and (B,A) collapse to the same key regardless of call order.
pub fn edge_id(a: &str, b: &str) -> String {
    if a <= b {
        format!("e-{a}-{b}")
    } else {
        format!("e-{b}-{a}")
    }
}

/// Raw incidence count per node over an edge set: both endpoints of every
/// edge are incremented, nothing else. Log damping for sizing happens at
/// render time.
pub fn degree_counts(edges: &[GraphEdge]) -> HashMap<String, usize> {
    let mut degree = HashMap::new();
    for edge in edges {
        *degree.entry(edge.source.clone()).or_insert(0) += 1;
        *degree.entry(edge.target.clone()).or_insert(0) += 1;
    }
    degree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(a: &str, b: &str) -> GraphEdge {
        GraphEdge {
            id: edge_id(a, b),
            source: a.to_string(),
            target: b.to_string(),
            mode: EdgeMode::Usage,
        }
    }

    #[test]
    fn edge_id_is_direction_independent() {
        assert_eq!(edge_id("Acme", "Figma"), "e-Acme-Figma");
        assert_eq!(edge_id("Figma", "Acme"), "e-Acme-Figma");
    }

    #[test]
    fn degree_sum_is_twice_edge_count() {
        let edges = vec![edge("A", "B"), edge("B", "C"), edge("A", "C")];
        let degree = degree_counts(&edges);

        assert_eq!(degree.values().sum::<usize>(), 2 * edges.len());
        assert_eq!(degree["A"], 2);
        assert_eq!(degree["B"], 2);
        assert_eq!(degree["C"], 2);
        assert_eq!(degree.get("D"), None);
    }

    #[test]
    fn node_kind_mapping_from_type_label() {
        assert_eq!(NodeKind::from_label("Company"), NodeKind::Company);
        assert_eq!(NodeKind::from_label("tool"), NodeKind::Tool);
        assert_eq!(NodeKind::from_label(""), NodeKind::Tool);
        assert_eq!(
            NodeKind::from_label(" Renderer "),
            NodeKind::Other("Renderer".to_string())
        );
        assert!(!NodeKind::from_label("Renderer").is_company());
    }
}
