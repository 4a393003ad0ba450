use egui::{Align2, Button, Color32, Key, TextEdit};

use crate::app::VisionMetricsApp;
use crate::calibration::{CALIBRATION_UNITS, DEFAULT_UNIT};

/// Text and unit being entered in the calibration prompt
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationPrompt {
    pub distance_input: String,
    selected_unit_index: usize,
    pub error: Option<String>,
}

impl Default for CalibrationPrompt {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT)
    }
}

impl CalibrationPrompt {
    /// Start with `unit` selected, falling back to the first unit if unknown
    pub fn new(unit: &str) -> Self {
        Self {
            distance_input: String::new(),
            selected_unit_index: unit_index(unit).unwrap_or(0),
            error: None,
        }
    }

    pub fn selected_unit(&self) -> &'static str {
        CALIBRATION_UNITS[self.selected_unit_index]
    }

    pub fn cycle_unit(&mut self) {
        self.selected_unit_index = (self.selected_unit_index + 1) % CALIBRATION_UNITS.len();
    }

    /// Forget typed text and errors, keeping the chosen unit
    pub fn clear_input(&mut self) {
        self.distance_input.clear();
        self.error = None;
    }
}

fn unit_index(unit: &str) -> Option<usize> {
    CALIBRATION_UNITS.iter().position(|&u| u == unit)
}

enum PromptAction {
    Submit,
    Cancel,
}

/// Modal asking for the real distance between the two calibration points.
///
/// Only shown while the engine has an open calibration request.
pub fn calibration_dialog(app: &mut VisionMetricsApp, ctx: &egui::Context) {
    let Some(request) = app.engine().calibration_request().copied() else {
        return;
    };

    let mut action = None;
    let prompt = app.calibration_prompt_mut();

    egui::Window::new("Calibrate Scale")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Pixel distance: {:.2} px", request.pixel_distance));
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label("Known distance:");
                let response = ui.add(
                    TextEdit::singleline(&mut prompt.distance_input)
                        .desired_width(80.0)
                        .hint_text("0.0"),
                );
                response.request_focus();
                if response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
                    action = Some(PromptAction::Submit);
                }

                if ui.button(prompt.selected_unit()).clicked() {
                    prompt.cycle_unit();
                }
            });

            if let Some(error) = &prompt.error {
                ui.colored_label(Color32::LIGHT_RED, error);
            }

            ui.add_space(12.0);

            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    action = Some(PromptAction::Cancel);
                }
                let has_input = !prompt.distance_input.trim().is_empty();
                if ui.add_enabled(has_input, Button::new("OK")).clicked() {
                    action = Some(PromptAction::Submit);
                }
            });
        });

    if ctx.input(|input| input.key_pressed(Key::Escape)) {
        action = Some(PromptAction::Cancel);
    }

    match action {
        Some(PromptAction::Submit) => app.submit_calibration(),
        Some(PromptAction::Cancel) => app.cancel_calibration(),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_units() {
        let mut prompt = CalibrationPrompt::new("in");
        assert_eq!(prompt.selected_unit(), "in");
        prompt.cycle_unit();
        assert_eq!(prompt.selected_unit(), "ft");
        prompt.cycle_unit();
        prompt.cycle_unit();
        assert_eq!(prompt.selected_unit(), "mm");

        assert_eq!(CalibrationPrompt::new("furlong").selected_unit(), "mm");
    }

    #[test]
    fn test_clear_input_keeps_unit() {
        let mut prompt = CalibrationPrompt::new("cm");
        prompt.distance_input = "12".to_owned();
        prompt.error = Some("bad".to_owned());
        prompt.clear_input();
        assert!(prompt.distance_input.is_empty());
        assert!(prompt.error.is_none());
        assert_eq!(prompt.selected_unit(), "cm");
    }
}
