use eframe::egui::{self, Ui};

use super::super::ViewModel;

enum DetailsAction {
    Close,
    Select(String),
    Remove(String),
}

pub(in crate::app) fn show(model: &mut ViewModel, ui: &mut Ui) {
    let Some(selected_id) = model.selected.clone() else {
        return;
    };
    let Some(node) = model.nodes.iter().find(|node| node.id == selected_id) else {
        model.selected = None;
        return;
    };

    let label = node.label.clone();
    let kind_label = node.kind.label().to_string();
    let editable = node.editable;
    let degree = model.degree.get(&selected_id).copied().unwrap_or(0);
    let record = model.dataset.record(&label);
    let description = record
        .map(|record| record.description.clone())
        .unwrap_or_default();
    let website = record
        .map(|record| record.website.clone())
        .unwrap_or_default();

    // Direct connections under the active edge set.
    let mut connections = Vec::new();
    for edge in &model.edges {
        let other = if edge.source == selected_id {
            &edge.target
        } else if edge.target == selected_id {
            &edge.source
        } else {
            continue;
        };
        if let Some(other_node) = model.nodes.iter().find(|node| &node.id == other) {
            connections.push((other_node.id.clone(), other_node.label.clone()));
        }
    }
    connections.sort_by(|a, b| a.1.cmp(&b.1));

    let mut action = None;

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.heading(&label);
        if ui.small_button("x").clicked() {
            action = Some(DetailsAction::Close);
        }
    });
    ui.label(egui::RichText::new(&kind_label).small().weak());
    if editable {
        ui.label(egui::RichText::new("user-added").small().weak());
    }

    ui.separator();
    ui.label(format!("{degree} connection{}", if degree == 1 { "" } else { "s" }));

    if !description.is_empty() {
        ui.add_space(4.0);
        ui.label(&description);
    }
    if !website.is_empty() {
        ui.add_space(4.0);
        ui.hyperlink_to(&website, website.clone());
    }

    if !connections.is_empty() {
        ui.separator();
        ui.label("Connected to");
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (other_id, other_label) in &connections {
                if ui.button(other_label).clicked() {
                    action = Some(DetailsAction::Select(other_id.clone()));
                }
            }
        });
    }

    if editable {
        ui.separator();
        if ui.button("Remove node").clicked() {
            action = Some(DetailsAction::Remove(selected_id.clone()));
        }
    }

    match action {
        Some(DetailsAction::Close) => model.set_selected(None),
        Some(DetailsAction::Select(id)) => model.set_selected(Some(id)),
        Some(DetailsAction::Remove(id)) => model.remove_node(&id),
        None => {}
    }
}
