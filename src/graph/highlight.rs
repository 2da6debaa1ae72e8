use std::collections::HashSet;

use super::GraphEdge;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HopLimit {
    One,
    Two,
}

/// Membership sets driving highlight/dimming. `first_*` covers the selected
/// node and everything directly adjacent; `second_*` covers what is reachable
/// through exactly one first-hop intermediate. Rebuilt from scratch on every
/// selection or edge-set change.
#[derive(Clone, Debug, Default)]
pub struct Neighborhood {
    pub first_nodes: HashSet<String>,
    pub first_edges: HashSet<String>,
    pub second_nodes: HashSet<String>,
    pub second_edges: HashSet<String>,
}

impl Neighborhood {
    pub fn is_empty(&self) -> bool {
        self.first_nodes.is_empty() && self.second_nodes.is_empty()
    }
}

/// Expands the neighborhood of `selected` over an edge set. A selected id
/// with no incident edge (including ids not present in the graph at all)
/// yields empty sets; that is not an error.
pub fn expand_neighborhood(selected: &str, edges: &[GraphEdge], hops: HopLimit) -> Neighborhood {
    let mut out = Neighborhood::default();

    for edge in edges {
        if edge.source == selected || edge.target == selected {
            out.first_edges.insert(edge.id.clone());
            out.first_nodes.insert(edge.source.clone());
            out.first_nodes.insert(edge.target.clone());
        }
    }

    if hops == HopLimit::Two && !out.first_nodes.is_empty() {
        for edge in edges {
            if out.first_edges.contains(&edge.id) {
                continue;
            }

            let source_first = out.first_nodes.contains(&edge.source);
            let target_first = out.first_nodes.contains(&edge.target);
            if !source_first && !target_first {
                continue;
            }

            out.second_edges.insert(edge.id.clone());
            // First-hop endpoints are never demoted to second hop.
            if !source_first {
                out.second_nodes.insert(edge.source.clone());
            }
            if !target_first {
                out.second_nodes.insert(edge.target.clone());
            }
        }
    }

    out
}
