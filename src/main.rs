mod app;
mod color;
mod config;
mod coordinator;
mod data;
mod scale;
mod state;
mod ui;
mod view;

use std::path::PathBuf;

use anyhow::Context as _;
use app::DashboardApp;
use config::{DashboardConfig, DEFAULT_DATA_FILE};
use eframe::egui;
use state::DashboardState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

    let dataset = match data::loader::load_shared(&path) {
        Ok(ds) => ds,
        Err(e) => {
            log::error!("Failed to load {}: {e}", path.display());
            return Err(e).with_context(|| format!("cannot start without {}", path.display()));
        }
    };

    let config = DashboardConfig::default();
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Cars – Linked Views",
        options,
        Box::new(move |cc| {
            let now = cc.egui_ctx.input(|i| i.time);
            let state = DashboardState::new(source, dataset, config, now);
            Ok(Box::new(DashboardApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
