use std::time::Instant;

use eframe::egui::{Sense, Ui};

use super::super::ViewModel;
use super::super::render::paint_frame;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.graph.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.heading("No tags to show");
                if let Some(notice) = &self.outcome.notice {
                    ui.label(notice.as_str());
                }
            });
            return;
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_drag(ui, rect, &response);
        self.handle_graph_pan(&response);
        self.handle_graph_hover(rect, &response);
        self.handle_graph_click(rect, &response);

        let running = self.advance_layout(Instant::now());
        if running || response.dragged() {
            ui.ctx().request_repaint();
        }

        self.recompose_frame();
        self.drawn_link_count = paint_frame(&painter, rect, &self.frame);
    }
}
