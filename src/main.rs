mod api;
mod app;
mod color;
mod config;
mod data;
mod error;
mod render;
mod session;
mod state;
mod ui;
mod worker;

use std::sync::Arc;

use api::http::HttpBackend;
use app::SpectraStudioApp;
use config::ClientConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ClientConfig::from_env();
    log::info!("Using processing server at {}", config.server_url);

    let backend = match HttpBackend::new(&config) {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            log::error!("Failed to set up HTTP client: {e}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Spectra Studio – Spectral Processing",
        options,
        Box::new(move |_cc| Ok(Box::new(SpectraStudioApp::new(backend, config.confirm_plots)))),
    )
}
