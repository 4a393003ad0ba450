use egui::Button;

use crate::app::VisionMetricsApp;
use crate::color::{ColorTarget, OverlayColor};
use crate::measurement::MeasureMode;

const COLOR_PICKERS: [(&str, ColorTarget); 3] = [
    ("Line colour", ColorTarget::Line),
    ("Text colour", ColorTarget::Text),
    ("Point colour", ColorTarget::Point),
];

pub fn tools_panel(app: &mut VisionMetricsApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Vision Metrics");
            ui.separator();

            ui.vertical_centered_justified(|ui| {
                if ui.button("Load Image").clicked() {
                    app.open_image_dialog();
                }
                let has_image = app.has_image();
                if ui.add_enabled(has_image, Button::new("Save Image")).clicked() {
                    app.save_image_dialog();
                }
                if ui.add_enabled(has_image, Button::new("Clear Measurements")).clicked() {
                    app.clear_measurements();
                }
                let can_undo = app.engine().can_undo();
                if ui.add_enabled(can_undo, Button::new("Undo")).clicked() {
                    app.undo();
                }
            });
            ui.separator();

            ui.strong("Mode");
            let current = app.engine().mode();
            for mode in MeasureMode::ALL {
                if ui.selectable_label(current == mode, mode.label()).clicked() {
                    log::info!("Mode selected from UI: {}", mode);
                    app.set_mode(mode);
                }
            }
            ui.separator();

            ui.strong("Colours");
            for (label, target) in COLOR_PICKERS {
                ui.horizontal(|ui| {
                    let mut rgb = app.engine().colors().get(target).to_array();
                    if ui.color_edit_button_srgb(&mut rgb).changed() {
                        app.set_color(target, OverlayColor::from_array(rgb));
                    }
                    ui.label(label);
                });
            }
            ui.separator();

            ui.strong("Scale");
            let calibration = app.engine().calibration();
            match calibration.scale_factor() {
                Some(scale) => ui.label(format!("{:.4} {}/px", scale, calibration.unit())),
                None => ui.weak("Not calibrated"),
            };
            ui.separator();

            ui.strong("Measurements");
            egui::ScrollArea::vertical()
                .id_salt("measurement_list")
                .max_height(200.0)
                .show(ui, |ui| {
                    egui::Grid::new("measurement_grid")
                        .num_columns(2)
                        .striped(true)
                        .show(ui, |ui| {
                            for (i, line) in app.engine().store().lines().iter().enumerate() {
                                ui.label(format!("Line {}", i + 1));
                                ui.label(
                                    line.label()
                                        .unwrap_or_else(|| format!("{:.1} px", line.pixel_distance)),
                                );
                                ui.end_row();
                            }
                            for (i, angle) in app.engine().store().angles().iter().enumerate() {
                                ui.label(format!("Angle {}", i + 1));
                                ui.label(angle.label());
                                ui.end_row();
                            }
                        });
                });
            ui.separator();

            let history = app.engine().history();
            ui.strong(format!("History ({})", history.len()));
            egui::ScrollArea::vertical()
                .id_salt("history_list")
                .show(ui, |ui| {
                    for action in history.actions().iter().rev() {
                        ui.label(action.name());
                    }
                });
        });
}
