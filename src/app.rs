use std::fmt::Display;
use std::path::Path;

use egui::{Painter, Rect, Response};

use crate::color::{ColorTarget, OverlayColor};
use crate::command::UndoResult;
use crate::document::LoadedImage;
use crate::engine::{EngineOutcome, MeasurementEngine};
use crate::export::{self, ExportError, ExportStyle, LabelFont};
use crate::file_handler;
use crate::input::InputHandler;
use crate::measurement::MeasureMode;
use crate::panels::{self, CalibrationPrompt};
use crate::renderer::{CanvasStyle, Renderer};
use crate::settings::MetricsSettings;

/// Last message shown in the status bar
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

pub struct VisionMetricsApp {
    engine: MeasurementEngine,
    image: Option<LoadedImage>,
    settings: MetricsSettings,
    renderer: Renderer,
    input_handler: InputHandler,
    calibration_prompt: CalibrationPrompt,
    // Parsed on first export
    label_font: Option<LabelFont>,
    status: Option<StatusMessage>,
}

impl Default for VisionMetricsApp {
    fn default() -> Self {
        Self::with_settings(MetricsSettings::default())
    }
}

impl VisionMetricsApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings: MetricsSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_settings(settings.sanitized())
    }

    pub fn with_settings(settings: MetricsSettings) -> Self {
        Self {
            engine: MeasurementEngine::with_colors(settings.colors),
            image: None,
            renderer: Renderer::new(CanvasStyle::new(&settings)),
            input_handler: InputHandler::default(),
            calibration_prompt: CalibrationPrompt::new(&settings.default_unit),
            label_font: None,
            status: None,
            settings,
        }
    }

    pub fn engine(&self) -> &MeasurementEngine {
        &self.engine
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn calibration_prompt_mut(&mut self) -> &mut CalibrationPrompt {
        &mut self.calibration_prompt
    }

    fn report_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    fn report_error(&mut self, err: impl Display) {
        log::warn!("{}", err);
        self.status = Some(StatusMessage {
            text: err.to_string(),
            is_error: true,
        });
    }

    /// Replace the current image and start a fresh session on it
    pub fn set_image(&mut self, image: LoadedImage) {
        self.engine.load_image(image.size());
        self.calibration_prompt.clear_input();
        self.report_info(format!("Loaded {}", image.display_name()));
        self.image = Some(image);
    }

    pub fn load_image_from(&mut self, path: &Path) {
        match file_handler::load_from_path(path) {
            Ok(image) => self.set_image(image),
            Err(err) => self.report_error(err),
        }
    }

    pub fn open_image_dialog(&mut self) {
        if let Some(path) = file_handler::pick_image_path() {
            self.load_image_from(&path);
        }
    }

    fn check_for_dropped_image(&mut self, ctx: &egui::Context) {
        match file_handler::take_dropped_image(ctx) {
            Some(Ok(image)) => {
                self.set_image(image);
                ctx.request_repaint();
            }
            Some(Err(err)) => self.report_error(err),
            None => {}
        }
    }

    pub fn save_image_dialog(&mut self) {
        let Some(image) = &self.image else {
            self.report_error(ExportError::NoImage);
            return;
        };
        let suggested = file_handler::export_file_name(image.source());
        let Some(path) = file_handler::pick_save_path(&suggested) else {
            return;
        };
        match self.export_to(&path) {
            Ok(()) => self.report_info(format!("Saved {}", path.display())),
            Err(err) => self.report_error(err),
        }
    }

    /// Write the annotated image to `path`
    pub fn export_to(&mut self, path: &Path) -> Result<(), ExportError> {
        let Some(image) = &self.image else {
            return Err(ExportError::NoImage);
        };
        let font = match self.label_font.take() {
            Some(font) => font,
            None => LabelFont::from_egui_defaults()?,
        };
        let style = ExportStyle::new(&self.settings, self.engine.colors());
        let store = self.engine.store();
        let result = export::save_annotated(path, image.pixels(), store.lines(), store.angles(), &style, &font);
        self.label_font = Some(font);
        result
    }

    pub fn set_mode(&mut self, mode: MeasureMode) {
        self.engine.set_mode(mode);
    }

    pub fn set_color(&mut self, target: ColorTarget, color: OverlayColor) {
        self.engine.set_color(target, color);
    }

    pub fn undo(&mut self) {
        match self.engine.undo() {
            Ok(result) => self.report_undo(&result),
            Err(err) => self.report_error(err),
        }
    }

    fn report_undo(&mut self, result: &UndoResult) {
        let text = match result {
            UndoResult::RemovedPoint { .. } => "Undid point".to_owned(),
            UndoResult::RemovedLine(_) => "Undid line".to_owned(),
            UndoResult::RemovedAngle(_) => "Undid angle".to_owned(),
            UndoResult::RestoredCalibration(setting) => match setting.scale_factor {
                Some(scale) => format!("Scale restored to {:.4} {}/px", scale, setting.unit),
                None => "Calibration removed".to_owned(),
            },
            UndoResult::DiscardedCalibration { .. } => {
                self.calibration_prompt.clear_input();
                "Calibration points discarded".to_owned()
            }
        };
        self.report_info(text);
    }

    pub fn clear_measurements(&mut self) {
        self.engine.clear_measurements();
        self.calibration_prompt.clear_input();
        self.report_info("Measurements cleared");
    }

    pub fn submit_calibration(&mut self) {
        let unit = self.calibration_prompt.selected_unit();
        match self
            .engine
            .submit_calibration_input(&self.calibration_prompt.distance_input, unit)
        {
            Ok(scale) => {
                self.calibration_prompt.clear_input();
                self.report_info(format!("Scale set to {:.4} {}/px", scale, unit));
            }
            Err(err) => {
                log::warn!("Calibration input rejected: {}", err);
                self.calibration_prompt.error = Some(err.to_string());
            }
        }
    }

    pub fn cancel_calibration(&mut self) {
        self.engine.cancel_calibration();
        self.calibration_prompt.clear_input();
        self.report_info("Calibration cancelled");
    }

    /// Feed this frame's canvas input to the engine
    pub fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &Response) {
        self.input_handler.set_canvas_rect(response.rect);
        for event in self.input_handler.process_input(ctx, response) {
            match self.engine.handle_input(event) {
                Ok(EngineOutcome::LineAdded(line)) => {
                    let text = line
                        .label()
                        .unwrap_or_else(|| format!("{:.1} px (uncalibrated)", line.pixel_distance));
                    self.report_info(format!("Line: {}", text));
                }
                Ok(EngineOutcome::AngleAdded(angle)) => {
                    self.report_info(format!("Angle: {}", angle.label()));
                }
                Ok(EngineOutcome::CalibrationRequested(request)) => {
                    self.calibration_prompt.clear_input();
                    self.report_info(format!(
                        "Enter the real distance for {:.1} px",
                        request.pixel_distance
                    ));
                }
                Ok(EngineOutcome::Undone(result)) => self.report_undo(&result),
                Ok(_) => {}
                Err(err) => self.report_error(err),
            }
        }
    }

    pub fn paint_canvas(&mut self, ctx: &egui::Context, painter: &Painter, canvas_rect: Rect) {
        let image = self
            .image
            .as_mut()
            .map(|image| (image.texture(ctx).id(), image.size_vec2()));
        self.renderer
            .render(painter, canvas_rect, image, &self.engine.overlay());
    }
}

impl eframe::App for VisionMetricsApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings.colors = self.engine.colors();
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_for_dropped_image(ctx);

        panels::tools_panel(self, ctx);
        panels::status_bar(self, ctx);
        panels::central_panel(self, ctx);
        panels::calibration_dialog(self, ctx);

        file_handler::preview_files_being_dropped(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_set_image_resets_session() {
        let mut app = VisionMetricsApp::default();
        assert!(!app.has_image());

        app.set_image(LoadedImage::new(RgbaImage::new(8, 6), None));
        assert!(app.has_image());
        assert_eq!(app.engine().image_size(), Some([8, 6]));
        assert_eq!(
            app.status().map(|status| status.text.as_str()),
            Some("Loaded untitled")
        );
    }

    #[test]
    fn test_undo_with_empty_history_reports_error() {
        let mut app = VisionMetricsApp::default();
        app.undo();
        let status = app.status().unwrap();
        assert!(status.is_error);
        assert_eq!(status.text, "Nothing to undo");
    }

    #[test]
    fn test_export_without_image() {
        let mut app = VisionMetricsApp::default();
        let result = app.export_to(Path::new("/tmp/never-written.png"));
        assert!(matches!(result, Err(ExportError::NoImage)));
    }
}
