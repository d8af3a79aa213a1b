use std::path::PathBuf;

use eframe::egui::{self, Ui};

use super::super::TagGraphApp;

/// One path per non-blank line.
pub(in crate::app) fn parse_path_list(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

impl TagGraphApp {
    /// Returns the selection when the user asked for a load.
    pub(in crate::app) fn draw_file_panel(
        &mut self,
        ui: &mut Ui,
        is_loading: bool,
    ) -> Option<Vec<PathBuf>> {
        ui.heading("Tag Files");
        ui.separator();
        ui.label("One path per line, or drop files onto the window. Only .txt files are read.");
        ui.add_space(4.0);

        egui::ScrollArea::vertical()
            .id_salt("path_list_scroll")
            .max_height(240.0)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.path_list)
                        .desired_rows(8)
                        .desired_width(f32::INFINITY)
                        .hint_text("/path/to/photo-tags.txt"),
                );
            });

        let paths = parse_path_list(&self.path_list);
        let mut requested = None;
        ui.horizontal(|ui| {
            let load = ui.add_enabled(!paths.is_empty(), egui::Button::new("Load"));
            if load.clicked() {
                requested = Some(paths.clone());
            }
            if ui.button("Clear").clicked() {
                self.path_list.clear();
            }
            if is_loading {
                ui.spinner();
            }
        });
        ui.small(format!("{} item(s) selected", paths.len()));

        requested
    }
}
