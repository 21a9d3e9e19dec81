//! Main application entry point.

use stickerpad_app::{AppConfig, StickerpadApp};

fn main() -> eframe::Result {
    env_logger::init();
    log::info!("Starting Stickerpad");

    let config = AppConfig::load();
    let window_edge = config.canvas_size as f32 + 48.0;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.title.clone())
            .with_inner_size([window_edge.max(480.0), window_edge + 140.0]),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| {
            let app = StickerpadApp::new(config)?;
            Ok(Box::new(app))
        }),
    )
}
