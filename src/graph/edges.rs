use std::collections::{HashMap, HashSet};

use crate::data::Dataset;

use super::{EdgeMode, GraphEdge, GraphNode, degree_counts, edge_id};

/// Result of an edge derivation pass: the active edge set plus the degree
/// map computed over it. Ids absent from `degree` have implicit degree 0.
pub struct EdgeBuild {
    pub edges: Vec<GraphEdge>,
    pub degree: HashMap<String, usize>,
}

/// Derives company→tool usage edges. Only company nodes originate edges;
/// each resolves its tool list from its own override when non-empty, else
/// from the dataset usage mapping keyed by the company's name. Unknown and
/// self-referential tools are dropped, and the canonical sorted-pair id
/// collapses repeated pairs to a single edge.
pub fn build_usage_edges(nodes: &[GraphNode], dataset: &Dataset) -> EdgeBuild {
    let known = nodes
        .iter()
        .map(|node| node.id.as_str())
        .collect::<HashSet<_>>();
    let usage = dataset.usage_map();

    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for node in nodes.iter().filter(|node| node.kind.is_company()) {
        let tools: Vec<&str> = if node.tools.is_empty() {
            usage.get(node.label.as_str()).cloned().unwrap_or_default()
        } else {
            node.tools.iter().map(String::as_str).collect()
        };

        collect_pair_edges(&node.id, &tools, EdgeMode::Usage, &known, &mut seen, &mut edges);
    }

    let degree = degree_counts(&edges);
    EdgeBuild { edges, degree }
}

/// Derives tool↔tool interoperability edges. Company nodes are excluded
/// entirely; every other node resolves its token list from the dataset's
/// per-record cache. Skip and dedup rules match the usage builder.
pub fn build_interop_edges(nodes: &[GraphNode], dataset: &Dataset) -> EdgeBuild {
    let known = nodes
        .iter()
        .map(|node| node.id.as_str())
        .collect::<HashSet<_>>();

    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for node in nodes.iter().filter(|node| !node.kind.is_company()) {
        let Some(tokens) = dataset.interop_tokens(node.label.as_str()) else {
            continue;
        };
        let tokens = tokens.iter().map(String::as_str).collect::<Vec<_>>();

        collect_pair_edges(
            &node.id,
            &tokens,
            EdgeMode::Interoperability,
            &known,
            &mut seen,
            &mut edges,
        );
    }

    let degree = degree_counts(&edges);
    EdgeBuild { edges, degree }
}

fn collect_pair_edges(
    origin: &str,
    partners: &[&str],
    mode: EdgeMode,
    known: &HashSet<&str>,
    seen: &mut HashSet<String>,
    edges: &mut Vec<GraphEdge>,
) {
    for &partner in partners {
        if partner == origin || !known.contains(partner) {
            continue;
        }

        let id = edge_id(origin, partner);
        if !seen.insert(id.clone()) {
            continue;
        }

        edges.push(GraphEdge {
            id,
            source: origin.to_string(),
            target: partner.to_string(),
            mode,
        });
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;

    use crate::data::{Dataset, DatasetRecord};
    use crate::graph::NodeKind;

    use super::*;

    fn node(id: &str, kind: NodeKind) -> GraphNode {
        GraphNode::new(id.to_string(), id.to_string(), kind, Color32::WHITE)
    }

    fn record(name: &str, kind: &str, designtechs: &[&str], interop: &str) -> DatasetRecord {
        DatasetRecord {
            name: name.to_string(),
            kind: kind.to_string(),
            designtechs: designtechs.iter().map(|tool| tool.to_string()).collect(),
            interoperability: interop.to_string(),
            description: String::new(),
            website: String::new(),
        }
    }

    #[test]
    fn usage_dedups_and_drops_unknown_tools() {
        let nodes = vec![node("Acme", NodeKind::Company), node("Figma", NodeKind::Tool)];
        let dataset = Dataset::new(vec![record(
            "Acme",
            "Company",
            &["Figma", "Figma", "Ghost"],
            "",
        )]);

        let build = build_usage_edges(&nodes, &dataset);
        assert_eq!(build.edges.len(), 1);
        assert_eq!(build.edges[0].id, "e-Acme-Figma");
        assert_eq!(build.edges[0].mode, EdgeMode::Usage);
        assert_eq!(build.degree["Acme"], 1);
        assert_eq!(build.degree["Figma"], 1);
    }

    #[test]
    fn usage_skips_self_references() {
        let nodes = vec![node("Acme", NodeKind::Company), node("Figma", NodeKind::Tool)];
        let dataset = Dataset::new(vec![record("Acme", "Company", &["Acme", "Figma"], "")]);

        let build = build_usage_edges(&nodes, &dataset);
        assert_eq!(build.edges.len(), 1);
        assert_eq!(build.edges[0].id, "e-Acme-Figma");
    }

    #[test]
    fn usage_prefers_node_override_list() {
        let mut acme = node("Acme", NodeKind::Company);
        acme.tools = vec!["Blender".to_string()];
        let nodes = vec![
            acme,
            node("Figma", NodeKind::Tool),
            node("Blender", NodeKind::Tool),
        ];
        let dataset = Dataset::new(vec![record("Acme", "Company", &["Figma"], "")]);

        let build = build_usage_edges(&nodes, &dataset);
        assert_eq!(build.edges.len(), 1);
        assert_eq!(build.edges[0].id, "e-Acme-Blender");
    }

    #[test]
    fn usage_only_companies_originate() {
        let nodes = vec![node("Figma", NodeKind::Tool), node("Sketch", NodeKind::Tool)];
        let dataset = Dataset::new(vec![record("Figma", "Tool", &["Sketch"], "")]);

        let build = build_usage_edges(&nodes, &dataset);
        assert!(build.edges.is_empty());
        assert!(build.degree.is_empty());
    }

    #[test]
    fn interop_dedups_tokens_and_self_references() {
        let nodes = vec![node("Figma", NodeKind::Tool), node("Sketch", NodeKind::Tool)];
        let dataset = Dataset::new(vec![record("Figma", "Tool", &[], "Sketch, Figma, Sketch")]);

        let build = build_interop_edges(&nodes, &dataset);
        assert_eq!(build.edges.len(), 1);
        assert_eq!(build.edges[0].id, "e-Figma-Sketch");
        assert_eq!(build.edges[0].mode, EdgeMode::Interoperability);
    }

    #[test]
    fn interop_collapses_mutual_mentions_to_one_edge() {
        let nodes = vec![node("Figma", NodeKind::Tool), node("Sketch", NodeKind::Tool)];
        let dataset = Dataset::new(vec![
            record("Figma", "Tool", &[], "Sketch"),
            record("Sketch", "Tool", &[], "Figma"),
        ]);

        let build = build_interop_edges(&nodes, &dataset);
        assert_eq!(build.edges.len(), 1);
        assert_eq!(build.edges[0].id, "e-Figma-Sketch");
        assert_eq!(build.degree.values().sum::<usize>(), 2);
    }

    #[test]
    fn interop_excludes_company_nodes() {
        let nodes = vec![
            node("Acme", NodeKind::Company),
            node("Figma", NodeKind::Tool),
            node("Render9", NodeKind::Other("Renderer".to_string())),
        ];
        let dataset = Dataset::new(vec![
            record("Acme", "Company", &[], "Figma"),
            record("Render9", "Renderer", &[], "Figma, Acme"),
        ]);

        let build = build_interop_edges(&nodes, &dataset);
        // Acme never originates, and Render9's mention of Acme still links
        // them; non-company nodes of any category participate.
        assert_eq!(build.edges.len(), 2);
        let ids = build.edges.iter().map(|edge| edge.id.as_str()).collect::<Vec<_>>();
        assert!(ids.contains(&"e-Figma-Render9"));
        assert!(ids.contains(&"e-Acme-Render9"));
    }

    #[test]
    fn degree_is_consistent_over_larger_builds() {
        let nodes = vec![
            node("Acme", NodeKind::Company),
            node("Orbit", NodeKind::Company),
            node("Figma", NodeKind::Tool),
            node("Sketch", NodeKind::Tool),
        ];
        let dataset = Dataset::new(vec![
            record("Acme", "Company", &["Figma", "Sketch"], ""),
            record("Orbit", "Company", &["Figma"], ""),
        ]);

        let build = build_usage_edges(&nodes, &dataset);
        assert_eq!(build.edges.len(), 3);
        assert_eq!(build.degree.values().sum::<usize>(), 2 * build.edges.len());
        assert_eq!(build.degree["Figma"], 2);
    }
}
