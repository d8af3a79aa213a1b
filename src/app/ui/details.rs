use eframe::egui::{self, RichText, Ui};

use crate::util::short_label;

use super::super::ViewModel;
use super::super::highlight::ranked_neighbors;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Tag Details");
        ui.add_space(6.0);

        self.draw_focus_details(ui);

        ui.separator();
        self.draw_load_outcome(ui);
    }

    fn draw_focus_details(&mut self, ui: &mut Ui) {
        let Some(focus) = self.interaction.focus() else {
            ui.label("Hover a tag, or click one to pin it.");
            return;
        };
        let Some(node) = self.graph.nodes.get(focus) else {
            return;
        };

        let pinned = self.interaction.pinned() == Some(focus);
        ui.label(RichText::new(node.id.as_str()).strong());
        if pinned {
            ui.small("pinned");
        } else if self.interaction.hovered() == Some(focus) {
            ui.small("hovered");
        }
        if self.simulation.is_fixed(focus) {
            ui.small("held in place while dragged");
        }
        ui.add_space(6.0);
        ui.label(format!("Files tagged: {}", node.count));
        ui.label(format!("Radius: {:.1}", node.radius()));
        ui.label(format!("Co-occurring tags: {}", self.graph.degree(focus)));

        let mut unpin = false;
        if pinned && ui.button("Unpin").clicked() {
            unpin = true;
        }

        ui.separator();
        ui.label(RichText::new("Strongest co-occurrences").strong());
        let ranked = ranked_neighbors(&self.graph, focus);
        let mut chosen = None;
        if ranked.is_empty() {
            ui.label("This tag never appears alongside another.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("neighbor_rows_scroll")
                .max_height(320.0)
                .auto_shrink([false, false])
                .show_rows(ui, 20.0, ranked.len(), |ui, row_range| {
                    for (neighbor, count) in ranked[row_range].iter().copied() {
                        let id = self.graph.nodes[neighbor].id.as_str();
                        let label = format!("{}  x{count}", short_label(id, 32));
                        if ui.link(label).on_hover_text(id).clicked() {
                            chosen = Some(neighbor);
                        }
                    }
                });
        }

        if unpin {
            self.unpin_tag();
        } else if let Some(index) = chosen {
            self.pin_tag(index);
        }
    }

    fn draw_load_outcome(&self, ui: &mut Ui) {
        ui.label(RichText::new("Last load").strong());
        ui.label(format!("Files read: {}", self.outcome.files_read));

        if let Some(notice) = &self.outcome.notice {
            let warn = ui.visuals().warn_fg_color;
            ui.colored_label(warn, notice.as_str());
        }

        if !self.outcome.failures.is_empty() {
            ui.label(format!("Failed reads: {}", self.outcome.failures.len()));
            for failure in &self.outcome.failures {
                ui.small(failure.as_str());
            }
        }

        if !self.outcome.ignored.is_empty() {
            ui.label(format!("Ignored (not .txt): {}", self.outcome.ignored.len()));
            for name in &self.outcome.ignored {
                ui.small(name.as_str());
            }
        }
    }
}
