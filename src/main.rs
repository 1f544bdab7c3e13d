use std::path::Path;

use capex_dashboard::app::CapexDashboardApp;
use capex_dashboard::config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "CapEx 2026 Executive Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(CapexDashboardApp::new(config)))),
    )
}
