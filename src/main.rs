mod app;
mod config;
mod tags;
mod util;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Tag files to load on startup; only `.txt` files are read.
    paths: Vec<PathBuf>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial link filter position, 0 hides every link and 100 shows all.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    link_filter: Option<u8>,

    /// Count each tag once per file.
    #[arg(long)]
    dedup_within_file: bool,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log filter {log_level:?}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow!("failed to install log subscriber: {error}"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(link_filter) = args.link_filter {
        config.view.link_filter = link_filter;
    }
    if args.dedup_within_file {
        config.ingest.dedup_within_file = true;
    }
    config.validate().context("invalid configuration")?;
    info!(
        paths = args.paths.len(),
        link_filter = config.view.link_filter,
        dedup_within_file = config.ingest.dedup_within_file,
        "starting tagweave"
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 920.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let paths = args.paths;
    eframe::run_native(
        "tagweave",
        options,
        Box::new(move |cc| Ok(Box::new(app::TagGraphApp::new(cc, config, paths)))),
    )
    .map_err(|error| anyhow!("failed to start the viewer: {error}"))
}
