use std::collections::HashMap;

use eframe::egui::vec2;

use crate::graph::GraphNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum ArrangeCriterion {
    Name,
    Kind,
    Connections,
}

impl ArrangeCriterion {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Kind => "kind",
            Self::Connections => "connections",
        }
    }
}

const CELL_WIDTH: f32 = 190.0;
const CELL_HEIGHT: f32 = 120.0;

/// Places nodes on a centered grid in criterion order. Meant for the idle
/// state; starting the layout afterwards resyncs the solver from these
/// positions.
pub(in crate::app) fn arrange_grid(
    nodes: &mut [GraphNode],
    degree: &HashMap<String, usize>,
    criterion: ArrangeCriterion,
) {
    if nodes.is_empty() {
        return;
    }

    let mut order = (0..nodes.len()).collect::<Vec<_>>();
    match criterion {
        ArrangeCriterion::Name => {
            order.sort_by(|&a, &b| {
                nodes[a]
                    .label
                    .to_lowercase()
                    .cmp(&nodes[b].label.to_lowercase())
            });
        }
        ArrangeCriterion::Kind => {
            order.sort_by(|&a, &b| {
                nodes[a]
                    .kind
                    .label()
                    .cmp(nodes[b].kind.label())
                    .then_with(|| nodes[a].label.cmp(&nodes[b].label))
            });
        }
        ArrangeCriterion::Connections => {
            order.sort_by(|&a, &b| {
                let degree_a = degree.get(&nodes[a].id).copied().unwrap_or(0);
                let degree_b = degree.get(&nodes[b].id).copied().unwrap_or(0);
                degree_b
                    .cmp(&degree_a)
                    .then_with(|| nodes[a].label.cmp(&nodes[b].label))
            });
        }
    }

    let columns = (nodes.len() as f32).sqrt().ceil().max(1.0) as usize;
    let rows = nodes.len().div_ceil(columns);
    let origin = vec2(
        -((columns.saturating_sub(1)) as f32) * CELL_WIDTH * 0.5,
        -((rows.saturating_sub(1)) as f32) * CELL_HEIGHT * 0.5,
    );

    for (slot, &index) in order.iter().enumerate() {
        let column = slot % columns;
        let row = slot / columns;
        nodes[index].pos =
            origin + vec2(column as f32 * CELL_WIDTH, row as f32 * CELL_HEIGHT);
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;

    use crate::graph::NodeKind;

    use super::*;

    fn node(id: &str, kind: NodeKind) -> GraphNode {
        GraphNode::new(id.to_string(), id.to_string(), kind, Color32::WHITE)
    }

    #[test]
    fn name_order_is_row_major() {
        let mut nodes = vec![
            node("Delta", NodeKind::Tool),
            node("Alpha", NodeKind::Tool),
            node("Charlie", NodeKind::Tool),
            node("Bravo", NodeKind::Tool),
        ];

        arrange_grid(&mut nodes, &HashMap::new(), ArrangeCriterion::Name);

        let by_id = |id: &str| nodes.iter().find(|node| node.id == id).unwrap().pos;
        let alpha = by_id("Alpha");
        let bravo = by_id("Bravo");
        let charlie = by_id("Charlie");
        let delta = by_id("Delta");

        // 2x2 grid: Alpha Bravo / Charlie Delta.
        assert_eq!(alpha.y, bravo.y);
        assert!(alpha.x < bravo.x);
        assert_eq!(charlie.y, delta.y);
        assert!(alpha.y < charlie.y);
    }

    #[test]
    fn connections_order_puts_best_connected_first() {
        let mut nodes = vec![node("A", NodeKind::Tool), node("B", NodeKind::Tool)];
        let degree = HashMap::from([("B".to_string(), 3usize)]);

        arrange_grid(&mut nodes, &degree, ArrangeCriterion::Connections);

        let a = nodes.iter().find(|node| node.id == "A").unwrap().pos;
        let b = nodes.iter().find(|node| node.id == "B").unwrap().pos;
        assert!(b.x < a.x);
    }

    #[test]
    fn positions_are_distinct() {
        let mut nodes = (0..7)
            .map(|index| node(&format!("N{index}"), NodeKind::Tool))
            .collect::<Vec<_>>();

        arrange_grid(&mut nodes, &HashMap::new(), ArrangeCriterion::Kind);

        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                assert_ne!(nodes[i].pos, nodes[j].pos);
            }
        }
    }
}
