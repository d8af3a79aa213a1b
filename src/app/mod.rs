use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{info, warn};

use crate::config::{AppConfig, ViewConfig};
use crate::tags::{FileSource, LoadError, LoadReport, TagGraph, collect_tag_graph};

mod graph;
mod highlight;
mod interaction;
mod physics;
mod render;
mod ui;

use highlight::HighlightState;
use interaction::InteractionState;
use physics::{LayoutSnapshot, Simulation};
use render::{RenderFrame, Throttle};

type LoadResult = Result<LoadReport, LoadError>;

pub struct TagGraphApp {
    config: AppConfig,
    path_list: String,
    state: AppState,
}

enum AppState {
    Idle,
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

/// What the last load produced besides the graph itself.
#[derive(Clone, Debug, Default)]
struct LoadOutcome {
    files_read: usize,
    failures: Vec<String>,
    ignored: Vec<String>,
    notice: Option<String>,
}

impl LoadOutcome {
    fn from_report(report: &LoadReport) -> Self {
        Self {
            files_read: report.files_read,
            failures: report.failures.iter().map(ToString::to_string).collect(),
            ignored: report.ignored.clone(),
            notice: None,
        }
    }

    /// A load that read nothing still gets a view; only `EmptyInput` qualifies.
    fn from_error(error: &LoadError) -> Option<Self> {
        match error {
            LoadError::EmptyInput {
                attempted,
                failures,
                ignored,
            } => Some(Self {
                files_read: attempted.saturating_sub(failures.len()),
                failures: failures.iter().map(ToString::to_string).collect(),
                ignored: ignored.clone(),
                notice: Some(error.to_string()),
            }),
            LoadError::NoValidFiles { .. } => None,
        }
    }
}

/// Everything that lives exactly as long as one loaded graph.
struct ViewModel {
    graph: TagGraph,
    outcome: LoadOutcome,
    view_config: ViewConfig,
    simulation: Simulation,
    interaction: InteractionState,
    highlight: HighlightState,
    throttle: Throttle,
    snapshot: LayoutSnapshot,
    frame: RenderFrame,
    frame_dirty: bool,
    pointer_over: Option<usize>,
    search: String,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
    drawn_link_count: usize,
}

impl TagGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, paths: Vec<PathBuf>) -> Self {
        let path_list = paths
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");

        let mut app = Self {
            config,
            path_list,
            state: AppState::Idle,
        };
        if !paths.is_empty() {
            app.start_load(paths);
        }
        app
    }

    fn spawn_load(paths: Vec<PathBuf>, config: &AppConfig) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();
        let options = config.ingest.build_options();

        thread::spawn(move || {
            let sources = paths.into_iter().map(FileSource::new).collect::<Vec<_>>();
            let result = collect_tag_graph(&sources, options);
            // The receiver is gone when a newer load replaced this one.
            let _ = tx.send(result);
        });

        rx
    }

    /// Drops the current view model and starts ingesting `paths`.
    fn start_load(&mut self, paths: Vec<PathBuf>) {
        info!(items = paths.len(), "loading tag files");
        let rx = Self::spawn_load(paths, &self.config);
        self.state = AppState::Loading { rx };
    }

    fn finish_load(&self, result: LoadResult) -> AppState {
        match result {
            Ok(report) => {
                let outcome = LoadOutcome::from_report(&report);
                AppState::Ready(Box::new(ViewModel::new(report.graph, outcome, &self.config)))
            }
            Err(error) => {
                let message = error.to_string();
                warn!(%message, "load produced no graph");
                match LoadOutcome::from_error(&error) {
                    Some(outcome) => AppState::Ready(Box::new(ViewModel::new(
                        TagGraph::default(),
                        outcome,
                        &self.config,
                    ))),
                    None => AppState::Error(message),
                }
            }
        }
    }

    fn accept_dropped_files(&mut self, ctx: &Context) {
        let dropped = ctx.input(|input| input.raw.dropped_files.clone());
        for path in dropped.into_iter().filter_map(|file| file.path) {
            if !self.path_list.is_empty() && !self.path_list.ends_with('\n') {
                self.path_list.push('\n');
            }
            self.path_list.push_str(&path.display().to_string());
        }
    }
}

impl eframe::App for TagGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.accept_dropped_files(ctx);

        let is_loading = matches!(self.state, AppState::Loading { .. });
        let mut load_requested = None;
        egui::SidePanel::left("files")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                load_requested = self.draw_file_panel(ui, is_loading);
            });
        if let Some(paths) = load_requested {
            self.start_load(paths);
        }

        let mut finished = None;
        let mut transition = None;
        match &mut self.state {
            AppState::Idle => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Add .txt tag files and press Load");
                    });
                });
            }
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => finished = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Reading tag files...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load tag files");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(result) = finished {
            transition = Some(self.finish_load(result));
        }
        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use crate::tags::FileReadError;

    use super::*;

    #[test]
    fn empty_input_outcome_keeps_ignored_items() {
        let error = LoadError::EmptyInput {
            attempted: 2,
            failures: vec![FileReadError {
                name: "locked.txt".to_owned(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            }],
            ignored: vec!["cover.jpg".to_owned()],
        };

        let outcome = LoadOutcome::from_error(&error).expect("empty input still opens a view");
        assert_eq!(outcome.files_read, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].contains("locked.txt"));
        assert_eq!(outcome.ignored, vec!["cover.jpg".to_owned()]);
        assert_eq!(outcome.notice, Some(error.to_string()));
    }

    #[test]
    fn no_valid_files_has_no_outcome() {
        let error = LoadError::NoValidFiles { selected: 3 };
        assert!(LoadOutcome::from_error(&error).is_none());
    }
}
