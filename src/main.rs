mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use anyhow::Context;
use app::DashboardApp;
use config::DashboardConfig;
use data::cache::DatasetCache;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();

    // A missing or malformed source aborts the run before any window opens.
    let mut state = AppState::new(DatasetCache::new(&config.data_path), &config);
    state
        .load()
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config::PAGE_TITLE)
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        config::PAGE_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state, &config)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
