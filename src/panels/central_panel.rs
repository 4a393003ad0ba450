use egui::{Color32, Sense};

use crate::app::VisionMetricsApp;

/// The measuring canvas
pub fn central_panel(app: &mut VisionMetricsApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(Color32::from_gray(32)))
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
            app.handle_canvas_input(ctx, &response);
            app.paint_canvas(ctx, &painter, response.rect);
        });
}

/// Mode, zoom, cursor, scale and the last message along the bottom edge
pub fn status_bar(app: &VisionMetricsApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let engine = app.engine();
            ui.label(format!("Mode: {}", engine.mode().label()));
            ui.separator();
            ui.label(format!("Zoom: {:.0}%", engine.view().zoom() * 100.0));
            ui.separator();
            match engine.cursor() {
                Some(cursor) => ui.label(format!("x: {:.1}  y: {:.1}", cursor.x, cursor.y)),
                None => ui.label("x: -  y: -"),
            };
            ui.separator();
            let calibration = engine.calibration();
            match calibration.scale_factor() {
                Some(scale) => ui.label(format!("Scale: {:.4} {}/px", scale, calibration.unit())),
                None => ui.label("Scale: uncalibrated"),
            };

            if let Some(status) = app.status() {
                ui.separator();
                if status.is_error {
                    ui.colored_label(Color32::LIGHT_RED, &status.text);
                } else {
                    ui.label(&status.text);
                }
            }
        });
    });
}
