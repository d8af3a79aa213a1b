use std::collections::VecDeque;
use std::time::Duration;

use eframe::egui::{self, Align, Context, Layout};

use crate::config::AppConfig;
use crate::tags::TagGraph;

use super::super::highlight::HighlightState;
use super::super::interaction::InteractionState;
use super::super::physics::Simulation;
use super::super::render::{RenderFrame, Throttle};
use super::super::{LoadOutcome, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(graph: TagGraph, outcome: LoadOutcome, config: &AppConfig) -> Self {
        let simulation = Simulation::new(&graph, config.layout);
        let interaction = InteractionState::new(&graph, config.view.link_filter);
        let snapshot = simulation.snapshot();

        Self {
            outcome,
            view_config: config.view,
            simulation,
            interaction,
            highlight: HighlightState::default(),
            throttle: Throttle::new(Duration::from_millis(config.view.render_interval_ms)),
            snapshot,
            frame: RenderFrame::default(),
            frame_dirty: true,
            pointer_over: None,
            search: String::new(),
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
            drawn_link_count: 0,
            graph,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("status_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("tagweave");
                    ui.separator();
                    ui.label(format!("tags: {}", self.graph.node_count()));
                    ui.label(format!("links: {}", self.graph.link_count()));
                    ui.label(format!(
                        "visible links: {} ({} on screen)",
                        self.interaction.visible_link_count(),
                        self.drawn_link_count
                    ));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                        ui.label(format!("zoom {:.2}x", self.interaction.transform.zoom));
                        ui.label(self.layout_status_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }

    fn layout_status_text(&self) -> String {
        if self.simulation.is_running() {
            format!("layout alpha {:.3}", self.simulation.alpha())
        } else {
            "layout settled".to_owned()
        }
    }
}
