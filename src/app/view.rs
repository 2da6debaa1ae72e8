use std::collections::{HashMap, HashSet};

use eframe::egui::{
    self, Align2, Color32, FontId, Rect, Sense, Stroke, StrokeKind, Ui, vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::{
    EdgeMode, Neighborhood, RectEntity, Side, expand_neighborhood, resolve_connector,
};

use super::ViewModel;
use super::render_utils::{
    blend_color, dim_color, draw_background, edge_visible, rect_visible, screen_to_world,
    size_scale, world_to_screen,
};

const LABEL_FONT_SIZE: f32 = 13.0;

/// Outward normal of an attachment side; connectors start a hair off the
/// node border so they never overlap the border stroke.
fn side_normal(side: Side) -> egui::Vec2 {
    match side {
        Side::Left => vec2(-1.0, 0.0),
        Side::Right => vec2(1.0, 0.0),
        Side::Top => vec2(0.0, -1.0),
        Side::Bottom => vec2(0.0, 1.0),
    }
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Presentation weight for one node, derived fresh each frame from the
/// current selection/search. Precedence: selected and first hop, then
/// second hop, then everything else.
fn node_weight(
    hood: Option<&Neighborhood>,
    matches: Option<&HashSet<usize>>,
    selected: Option<&str>,
    index: usize,
    id: &str,
) -> f32 {
    if let Some(hood) = hood {
        if selected == Some(id) || hood.first_nodes.contains(id) {
            1.0
        } else if hood.second_nodes.contains(id) {
            0.55
        } else {
            0.16
        }
    } else if let Some(matches) = matches {
        if matches.contains(&index) { 1.0 } else { 0.25 }
    } else {
        1.0
    }
}

impl ViewModel {
    /// Re-measures every node from its label and degree. Half extents are
    /// what unlocks the layout driver's initialization gate.
    fn measure_nodes(&mut self, painter: &egui::Painter) {
        for node in &mut self.nodes {
            let galley = painter.layout_no_wrap(
                node.label.clone(),
                FontId::proportional(LABEL_FONT_SIZE),
                Color32::WHITE,
            );
            let scale = size_scale(node.size);
            node.half_extents = Some(vec2(
                (galley.size().x * 0.5 + 10.0) * scale,
                (galley.size().y * 0.5 + 7.0) * scale,
            ));
        }
    }

    /// Screen-space rect per node; hidden kinds and unmeasured nodes map to
    /// `None` and drop out of hit-testing and drawing.
    fn screen_rects(&self, rect: Rect) -> Vec<Option<Rect>> {
        self.nodes
            .iter()
            .map(|node| {
                if self.hidden_kinds.contains(&node.kind) {
                    return None;
                }
                let half = node.half_extents?;
                let center = world_to_screen(rect, self.pan, self.zoom, node.pos);
                Some(Rect::from_center_size(center, half * 2.0 * self.zoom))
            })
            .collect()
    }

    fn search_matches(&self) -> Option<HashSet<usize>> {
        if self.selected.is_some() {
            return None;
        }
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let matcher = SkimMatcherV2::default();
        Some(
            self.nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| {
                    fuzzy_match_score(&matcher, &node.label, query).map(|_score| index)
                })
                .collect(),
        )
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        if self.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Dataset contains no nodes",
                FontId::proportional(15.0),
                Color32::from_gray(180),
            );
            return;
        }

        self.measure_nodes(&painter);

        let dt = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let moving = self.layout.tick(&mut self.nodes, rect.size(), dt);

        let hit_rects = self.screen_rects(rect);
        let hovered = Self::hovered_node(response.hover_pos(), &hit_rects);

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            let picked = hovered.and_then(|index| self.nodes.get(index).map(|node| node.id.clone()));
            self.set_selected(picked);
        }

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(index) = hovered
        {
            self.dragged = self.nodes.get(index).map(|node| node.id.clone());
        }
        if let Some(id) = self.dragged.clone() {
            if response.dragged_by(egui::PointerButton::Primary)
                && let Some(pointer) = response.interact_pointer_pos()
            {
                let world = screen_to_world(rect, self.pan, self.zoom, pointer);
                if let Some(node) = self.nodes.iter_mut().find(|node| node.id == id) {
                    node.pos = world;
                }
                if self.layout.is_running() {
                    self.layout.pin(&id, world);
                }
            }
            if response.drag_stopped() {
                self.layout.release(&id);
                self.dragged = None;
            }
        }

        if moving || self.dragged.is_some() {
            ui.ctx().request_repaint();
        }

        // Positions may have changed above; draw from fresh rects.
        let screen_rects = self.screen_rects(rect);

        // Empty sets (stale or isolated selection) mean no dimming at all.
        let hood = self
            .selected
            .as_deref()
            .map(|id| expand_neighborhood(id, &self.edges, self.hops))
            .filter(|hood| !hood.is_empty());
        let matches = self.search_matches();
        let selected = self.selected.as_deref();

        let index_by_id = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.as_str(), index))
            .collect::<HashMap<_, _>>();

        let base_edge_color = match self.mode {
            EdgeMode::Usage => Color32::from_rgb(128, 150, 178),
            EdgeMode::Interoperability => Color32::from_rgb(66, 189, 178),
        };

        let mut visible_edge_count = 0usize;
        for edge in &self.edges {
            let (Some(&a), Some(&b)) = (
                index_by_id.get(edge.source.as_str()),
                index_by_id.get(edge.target.as_str()),
            ) else {
                continue;
            };
            let (Some(a_rect), Some(b_rect)) = (screen_rects[a], screen_rects[b]) else {
                continue;
            };

            let connector = resolve_connector(
                &RectEntity {
                    center: a_rect.center(),
                    half: a_rect.size() * 0.5,
                },
                &RectEntity {
                    center: b_rect.center(),
                    half: b_rect.size() * 0.5,
                },
            );
            let a_point = connector.a_point + side_normal(connector.a_side) * 1.5;
            let b_point = connector.b_point + side_normal(connector.b_side) * 1.5;
            if !edge_visible(rect, a_point, b_point, 2.5) {
                continue;
            }
            visible_edge_count += 1;

            let (color, width) = if let Some(hood) = &hood {
                if hood.first_edges.contains(&edge.id) {
                    (blend_color(base_edge_color, Color32::WHITE, 0.55), 2.2)
                } else if hood.second_edges.contains(&edge.id) {
                    (base_edge_color, 1.6)
                } else {
                    (dim_color(base_edge_color, 0.16), 1.0)
                }
            } else {
                (dim_color(base_edge_color, 0.85), 1.2)
            };
            painter.line_segment([a_point, b_point], Stroke::new(width, color));
        }
        self.visible_edge_count = visible_edge_count;

        let mut visible_node_count = 0usize;
        for (index, node) in self.nodes.iter().enumerate() {
            let Some(node_rect) = screen_rects[index] else {
                continue;
            };
            if !rect_visible(rect, node_rect) {
                continue;
            }
            visible_node_count += 1;

            let weight = node_weight(hood.as_ref(), matches.as_ref(), selected, index, &node.id);
            let is_selected = selected == Some(node.id.as_str());

            painter.rect_filled(node_rect, 6, dim_color(node.color, 0.35 + weight * 0.65));
            if is_selected {
                painter.rect_stroke(
                    node_rect,
                    6,
                    Stroke::new(2.0, Color32::WHITE),
                    StrokeKind::Outside,
                );
            } else if hovered == Some(index) {
                painter.rect_stroke(
                    node_rect,
                    6,
                    Stroke::new(1.4, Color32::from_gray(200)),
                    StrokeKind::Outside,
                );
            }

            if weight > 0.3 || is_selected {
                painter.text(
                    node_rect.center(),
                    Align2::CENTER_CENTER,
                    &node.label,
                    FontId::proportional(LABEL_FONT_SIZE * self.zoom.clamp(0.7, 1.6)),
                    dim_color(Color32::from_gray(235), weight.max(0.5)),
                );
            }
        }
        self.visible_node_count = visible_node_count;
    }
}
