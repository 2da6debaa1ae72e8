use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use eframe::egui::{self, Context, Vec2};
use log::info;

use crate::data::{Dataset, load_dataset, split_tokens};
use crate::graph::{
    EdgeMode, GraphEdge, GraphNode, HopLimit, NodeKind, build_interop_edges, build_usage_edges,
};
use crate::util::user_node_id;

mod arrange;
mod interaction;
mod layout;
mod render_utils;
mod ui;
mod view;

use arrange::{ArrangeCriterion, arrange_grid};
use layout::LayoutDriver;
use render_utils::kind_color;

pub struct DesignGraphApp {
    dataset_path: String,
    state: AppState,
    reload_rx: Option<Receiver<Result<Dataset, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Dataset, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// Session state for a loaded dataset. Owns the node/edge collections;
/// everything else (layout driver, render pass) borrows them.
struct ViewModel {
    dataset: Dataset,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    degree: HashMap<String, usize>,
    mode: EdgeMode,
    hops: HopLimit,
    selected: Option<String>,
    hidden_kinds: HashSet<NodeKind>,
    search: String,
    pan: Vec2,
    zoom: f32,
    layout: LayoutDriver,
    dragged: Option<String>,
    arrange_criterion: ArrangeCriterion,
    add_name: String,
    add_kind: String,
    add_tools: String,
    user_node_counter: u64,
    visible_node_count: usize,
    visible_edge_count: usize,
}

impl ViewModel {
    fn new(dataset: Dataset) -> Self {
        let mut nodes = Vec::new();
        let mut seen = HashSet::new();
        for record in &dataset.records {
            if !seen.insert(record.name.clone()) {
                continue;
            }
            let kind = NodeKind::from_label(&record.kind);
            let color = kind_color(&kind);
            nodes.push(GraphNode::new(
                record.name.clone(),
                record.name.clone(),
                kind,
                color,
            ));
        }

        let mut model = Self {
            dataset,
            nodes,
            edges: Vec::new(),
            degree: HashMap::new(),
            mode: EdgeMode::Usage,
            hops: HopLimit::One,
            selected: None,
            hidden_kinds: HashSet::new(),
            search: String::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            layout: LayoutDriver::new(),
            dragged: None,
            arrange_criterion: ArrangeCriterion::Name,
            add_name: String::new(),
            add_kind: "company".to_string(),
            add_tools: String::new(),
            user_node_counter: 0,
            visible_node_count: 0,
            visible_edge_count: 0,
        };
        model.rebuild_edges();
        model
    }

    /// Regenerates the active edge set wholesale for the current mode. The
    /// previous set is discarded first; usage and interoperability edges
    /// are never mixed.
    fn rebuild_edges(&mut self) {
        self.edges = Vec::new();
        self.degree = HashMap::new();

        let build = match self.mode {
            EdgeMode::Usage => build_usage_edges(&self.nodes, &self.dataset),
            EdgeMode::Interoperability => build_interop_edges(&self.nodes, &self.dataset),
        };
        self.edges = build.edges;
        self.degree = build.degree;

        for node in &mut self.nodes {
            node.size = self.degree.get(&node.id).copied().unwrap_or(0).max(1) as u32;
        }

        if self.layout.is_running() {
            self.layout.resync(&self.nodes, &self.edges);
        }
    }

    fn set_mode(&mut self, mode: EdgeMode) {
        if self.mode != mode {
            self.mode = mode;
            self.rebuild_edges();
        }
    }

    fn set_selected(&mut self, selected: Option<String>) {
        self.selected = selected;
    }

    fn toggle_layout(&mut self) {
        self.layout.toggle(&self.nodes, &self.edges);
    }

    fn apply_arrange(&mut self) {
        arrange_grid(&mut self.nodes, &self.degree, self.arrange_criterion);
        if self.layout.is_running() {
            self.layout.resync(&self.nodes, &self.edges);
        }
    }

    fn toggle_kind_visibility(&mut self, kind: NodeKind) {
        if !self.hidden_kinds.remove(&kind) {
            self.hidden_kinds.insert(kind);
        }
    }

    /// Distinct kinds present in the session, companies first.
    fn present_kinds(&self) -> Vec<NodeKind> {
        let mut kinds = Vec::new();
        for node in &self.nodes {
            if !kinds.contains(&node.kind) {
                kinds.push(node.kind.clone());
            }
        }
        kinds.sort_by(|a, b| {
            b.is_company()
                .cmp(&a.is_company())
                .then_with(|| a.label().cmp(b.label()))
        });
        kinds
    }

    fn add_user_node(&mut self) {
        let label = self.add_name.trim().to_string();
        if label.is_empty() {
            return;
        }

        self.user_node_counter += 1;
        let id = user_node_id(self.user_node_counter);
        let kind = NodeKind::from_label(&self.add_kind);
        let color = kind_color(&kind);

        let mut node = GraphNode::new(id, label, kind, color);
        node.editable = true;
        node.tools = split_tokens(&self.add_tools);
        self.nodes.push(node);

        self.add_name.clear();
        self.add_tools.clear();
        self.rebuild_edges();
    }

    fn remove_node(&mut self, id: &str) {
        let Some(index) = self.nodes.iter().position(|node| node.id == id) else {
            return;
        };
        if !self.nodes[index].editable {
            return;
        }

        self.layout.release(id);
        if self.dragged.as_deref() == Some(id) {
            self.dragged = None;
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.nodes.remove(index);
        self.rebuild_edges();
    }

    fn show(
        &mut self,
        ctx: &Context,
        dataset_path: &str,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(270.0)
            .show(ctx, |ui| {
                ui::controls::show(self, ui, dataset_path, reload_requested, is_reloading);
            });

        if self.selected.is_some() {
            egui::SidePanel::right("details")
                .resizable(false)
                .default_width(300.0)
                .show(ctx, |ui| {
                    ui::details::show(self, ui);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_graph(ui);
        });
    }
}

impl DesignGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dataset_path: String) -> Self {
        let state = Self::start_load(dataset_path.clone());
        Self {
            dataset_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(dataset_path: String) -> Receiver<Result<Dataset, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_dataset(&dataset_path).map_err(|error| error.to_string());
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(dataset_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(dataset_path),
        }
    }
}

impl eframe::App for DesignGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(dataset) => {
                            info!("dataset ready, building session");
                            AppState::Ready(Box::new(ViewModel::new(dataset)))
                        }
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading design-technology dataset...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                // Keep polling the worker channel even without input events.
                ctx.request_repaint_after(Duration::from_millis(100));
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.dataset_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.dataset_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.dataset_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(dataset) => AppState::Ready(Box::new(ViewModel::new(dataset))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint_after(Duration::from_millis(100));
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
