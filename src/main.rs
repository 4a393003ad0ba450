#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use vision_metrics::{MetricsSettings, VisionMetricsApp};

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let window_size = MetricsSettings::default().window_size;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Vision Metrics")
            .with_inner_size(window_size)
            .with_min_inner_size([800.0, 500.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Vision Metrics",
        native_options,
        Box::new(|cc| Ok(Box::new(VisionMetricsApp::new(cc)))),
    )
}
