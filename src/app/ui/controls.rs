use eframe::egui::{self, Ui};

use crate::graph::{EdgeMode, HopLimit};

use super::super::ViewModel;
use super::super::arrange::ArrangeCriterion;

pub(in crate::app) fn show(
    model: &mut ViewModel,
    ui: &mut Ui,
    dataset_path: &str,
    reload_requested: &mut bool,
    is_reloading: bool,
) {
    ui.add_space(6.0);
    ui.heading("design-graph");
    ui.label(egui::RichText::new(dataset_path).small().weak());
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        if ui
            .add_enabled(!is_reloading, egui::Button::new("Reload dataset"))
            .clicked()
        {
            *reload_requested = true;
        }
        if is_reloading {
            ui.spinner();
        }
    });

    ui.separator();
    ui.label("Edges");
    let mut mode = model.mode;
    ui.horizontal(|ui| {
        ui.selectable_value(&mut mode, EdgeMode::Usage, "Usage");
        ui.selectable_value(&mut mode, EdgeMode::Interoperability, "Interop");
    });
    if mode != model.mode {
        model.set_mode(mode);
    }

    ui.add_space(4.0);
    ui.label("Highlight depth");
    ui.horizontal(|ui| {
        ui.selectable_value(&mut model.hops, HopLimit::One, "1 hop");
        ui.selectable_value(&mut model.hops, HopLimit::Two, "2 hops");
    });

    ui.separator();
    ui.label("Layout");
    let layout_label = if model.layout.is_running() {
        "Stop layout"
    } else {
        "Start layout"
    };
    if ui.button(layout_label).clicked() {
        model.toggle_layout();
    }

    ui.add_space(4.0);
    egui::ComboBox::from_label("Arrange by")
        .selected_text(model.arrange_criterion.label())
        .show_ui(ui, |ui| {
            for criterion in [
                ArrangeCriterion::Name,
                ArrangeCriterion::Kind,
                ArrangeCriterion::Connections,
            ] {
                ui.selectable_value(&mut model.arrange_criterion, criterion, criterion.label());
            }
        });
    if ui.button("Arrange").clicked() {
        model.apply_arrange();
    }

    ui.separator();
    ui.label("Visible kinds");
    for kind in model.present_kinds() {
        let mut visible = !model.hidden_kinds.contains(&kind);
        if ui.checkbox(&mut visible, kind.label()).changed() {
            model.toggle_kind_visibility(kind);
        }
    }

    ui.separator();
    ui.label("Search");
    ui.text_edit_singleline(&mut model.search);

    ui.separator();
    egui::CollapsingHeader::new("Add node")
        .default_open(false)
        .show(ui, |ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut model.add_name);
            ui.label("Kind");
            ui.text_edit_singleline(&mut model.add_kind);
            ui.label("Uses tools (comma separated)");
            ui.text_edit_singleline(&mut model.add_tools);
            let can_add = !model.add_name.trim().is_empty();
            if ui.add_enabled(can_add, egui::Button::new("Add")).clicked() {
                model.add_user_node();
            }
        });

    ui.separator();
    ui.label(format!(
        "{} / {} nodes visible",
        model.visible_node_count,
        model.nodes.len()
    ));
    ui.label(format!(
        "{} / {} {} edges visible",
        model.visible_edge_count,
        model.edges.len(),
        model.mode.label()
    ));
}
