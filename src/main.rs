mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::FundBenchApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match AppConfig::discover() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration, using defaults: {e:#}");
            AppConfig::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Fund Performance Benchmarking",
        options,
        Box::new(|cc| {
            // Install image loaders so the sidebar logo can be rendered.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(FundBenchApp::new(config)))
        }),
    )
}
