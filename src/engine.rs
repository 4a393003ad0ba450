//! The measurement engine ties the view, calibration, store and history
//! together and is the only thing the UI talks to.
//!
//! Everything runs synchronously on the UI thread. A click that completes a
//! measurement stores it and records its undo action before returning, so
//! there is never a window where one exists without the other.

use egui::Pos2;

use crate::calibration::{Calibration, CalibrationRequest, ScaleSetting};
use crate::color::{ColorTarget, OverlayColor, OverlayColors};
use crate::command::{Action, ActionHistory, UndoContext, UndoResult};
use crate::error::{MeasureError, MeasureResult};
use crate::input::InputEvent;
use crate::measurement::{
    AngleMeasurement, LineMeasurement, MeasureMode, MeasurementStore, PendingKind, StoreEvent,
};
use crate::view::{ViewState, ZoomDirection};

/// Where the engine is in its click-collecting cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No image loaded; clicks are ignored
    Idle,
    AwaitingCalibrationPoints,
    AwaitingLinePoints,
    AwaitingAnglePoints,
}

/// What handling an event changed, so the UI knows how to react
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    Nothing,
    PointAdded(Pos2),
    LineAdded(LineMeasurement),
    AngleAdded(AngleMeasurement),
    /// Two calibration points were picked; prompt for their real distance
    CalibrationRequested(CalibrationRequest),
    ViewChanged,
    CursorMoved(Option<Pos2>),
    Undone(UndoResult),
}

/// Everything the presentation layer needs to draw one frame.
///
/// Points are in image space; map them through `view` on every redraw.
#[derive(Debug, Clone, Copy)]
pub struct OverlaySnapshot<'a> {
    pub lines: &'a [LineMeasurement],
    pub angles: &'a [AngleMeasurement],
    pub pending_points: &'a [Pos2],
    pub calibration_pending_points: &'a [Pos2],
    pub calibration_request: Option<&'a CalibrationRequest>,
    pub view: ViewState,
    pub colors: OverlayColors,
}

#[derive(Debug, Default)]
pub struct MeasurementEngine {
    view: ViewState,
    calibration: Calibration,
    store: MeasurementStore,
    history: ActionHistory,
    mode: MeasureMode,
    image_size: Option<[usize; 2]>,
    calibration_request: Option<CalibrationRequest>,
    colors: OverlayColors,
    cursor: Option<Pos2>,
}

impl MeasurementEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_colors(colors: OverlayColors) -> Self {
        Self {
            colors,
            ..Self::default()
        }
    }

    /// Start a fresh session for a newly loaded image of `size` pixels.
    ///
    /// View, calibration, measurements and history are all reset.
    pub fn load_image(&mut self, size: [usize; 2]) {
        log::info!("Image loaded: {}x{}", size[0], size[1]);
        self.image_size = Some(size);
        self.view.reset();
        self.calibration.reset();
        self.store.clear_all();
        self.history.clear();
        self.calibration_request = None;
        self.cursor = None;
    }

    pub fn image_size(&self) -> Option<[usize; 2]> {
        self.image_size
    }

    pub fn has_image(&self) -> bool {
        self.image_size.is_some()
    }

    pub fn state(&self) -> EngineState {
        if self.image_size.is_none() {
            return EngineState::Idle;
        }
        match self.mode {
            MeasureMode::Line => EngineState::AwaitingLinePoints,
            MeasureMode::Angle => EngineState::AwaitingAnglePoints,
            MeasureMode::Calibrate => EngineState::AwaitingCalibrationPoints,
        }
    }

    pub fn mode(&self) -> MeasureMode {
        self.mode
    }

    /// Switch measurement mode, dropping any unfinished work.
    ///
    /// Discarded points are not undoable.
    pub fn set_mode(&mut self, mode: MeasureMode) {
        if mode == self.mode {
            return;
        }
        let dropped = self.store.discard_pending();
        self.history.forget_all_pending();
        if self.calibration_request.take().is_some() {
            log::debug!("Pending calibration cancelled by mode switch");
        }
        log::info!("Mode changed: {} -> {} ({} pending points dropped)", self.mode, mode, dropped);
        self.mode = mode;
    }

    /// Switch mode by its token (`line`, `angle`, `calibrate`)
    pub fn set_mode_by_name(&mut self, name: &str) -> MeasureResult<()> {
        let mode = name.parse()?;
        self.set_mode(mode);
        Ok(())
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn store(&self) -> &MeasurementStore {
        &self.store
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn colors(&self) -> OverlayColors {
        self.colors
    }

    pub fn set_color(&mut self, target: ColorTarget, color: OverlayColor) {
        self.colors.set(target, color);
    }

    /// Set a colour from user text, rejecting anything unparseable
    pub fn set_color_str(&mut self, target: ColorTarget, input: &str) -> MeasureResult<()> {
        let color = OverlayColor::parse(input)?;
        self.set_color(target, color);
        Ok(())
    }

    /// Cursor position in image space, if the pointer is over the canvas
    pub fn cursor(&self) -> Option<Pos2> {
        self.cursor
    }

    pub fn calibration_request(&self) -> Option<&CalibrationRequest> {
        self.calibration_request.as_ref()
    }

    /// Dispatch one input event
    pub fn handle_input(&mut self, event: InputEvent) -> MeasureResult<EngineOutcome> {
        match event {
            InputEvent::Click { position } => self.click(position),
            InputEvent::Pan { delta } => {
                self.pan(delta.x, delta.y);
                Ok(EngineOutcome::ViewChanged)
            }
            InputEvent::Zoom { direction } => {
                self.zoom(direction);
                Ok(EngineOutcome::ViewChanged)
            }
            InputEvent::PointerMove { position } => {
                self.cursor = position.map(|pos| self.view.to_image_space(pos));
                Ok(EngineOutcome::CursorMoved(self.cursor))
            }
            InputEvent::Undo => self.undo().map(EngineOutcome::Undone),
        }
    }

    pub fn zoom(&mut self, direction: ZoomDirection) {
        self.view.apply_zoom_delta(direction);
        log::debug!("Zoom: {:.3}", self.view.zoom());
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.view.apply_pan_delta(dx, dy);
    }

    /// Handle a primary click at a canvas-local screen position
    pub fn click(&mut self, screen: Pos2) -> MeasureResult<EngineOutcome> {
        if self.state() == EngineState::Idle {
            log::debug!("Click ignored: no image loaded");
            return Ok(EngineOutcome::Nothing);
        }
        if self.calibration_request.is_some() {
            log::debug!("Click ignored: waiting for calibration distance");
            return Ok(EngineOutcome::Nothing);
        }

        let point = self.view.to_image_space(screen);
        match self.store.submit_point(self.mode, point, &self.calibration) {
            StoreEvent::PointAdded { kind, point } => {
                self.history.record(Action::AddPoint { kind, point });
                Ok(EngineOutcome::PointAdded(point))
            }
            StoreEvent::LineAdded(line) => {
                self.history.forget_pending(PendingKind::Measurement);
                self.history.record(Action::AddLine(line.clone()));
                Ok(EngineOutcome::LineAdded(line))
            }
            StoreEvent::AngleAdded(angle) => {
                self.history.forget_pending(PendingKind::Measurement);
                self.history.record(Action::AddAngle(angle.clone()));
                Ok(EngineOutcome::AngleAdded(angle))
            }
            StoreEvent::CalibrationReady { p1, p2 } => {
                self.history.forget_pending(PendingKind::Calibration);
                let request = CalibrationRequest::new(p1, p2).inspect_err(|err| {
                    log::warn!("Calibration rejected: {}", err);
                })?;
                self.calibration_request = Some(request);
                Ok(EngineOutcome::CalibrationRequested(request))
            }
            StoreEvent::Ignored => Ok(EngineOutcome::Nothing),
        }
    }

    /// Complete the pending calibration with the known distance in `unit`.
    ///
    /// On an invalid distance the request stays open so the user can retry.
    /// Without an open request there is no point pair to scale, which is
    /// reported as `DegenerateCalibration`.
    pub fn submit_calibration(&mut self, known_real_distance: f32, unit: &str) -> MeasureResult<f32> {
        let request = self.calibration_request.ok_or(MeasureError::DegenerateCalibration)?;
        let scale = request.resolve(known_real_distance)?;

        let applied = ScaleSetting {
            scale_factor: Some(scale),
            unit: unit.to_owned(),
        };
        let previous = self.calibration.apply(applied.clone());
        self.history.record(Action::SetCalibration { previous, applied });
        self.calibration_request = None;

        log::info!("Scale factor set to {:.4} {}/pixel", scale, unit);
        Ok(scale)
    }

    /// Parse the prompt text and complete the pending calibration
    pub fn submit_calibration_input(&mut self, input: &str, unit: &str) -> MeasureResult<f32> {
        let known = crate::calibration::parse_magnitude(input)?;
        self.submit_calibration(known, unit)
    }

    /// Dismiss the calibration prompt, discarding its two points
    pub fn cancel_calibration(&mut self) {
        if self.calibration_request.take().is_some() {
            log::info!("Calibration cancelled");
        }
    }

    /// Whether there is a step `undo` can take back
    pub fn can_undo(&self) -> bool {
        self.calibration_request.is_some() || self.history.can_undo()
    }

    /// Undo the most recent user step.
    ///
    /// While the calibration prompt is open the latest step is picking its
    /// two points, so those are discarded and the history is left alone.
    pub fn undo(&mut self) -> MeasureResult<UndoResult> {
        if let Some(request) = self.calibration_request.take() {
            log::info!("Calibration cancelled by undo");
            return Ok(UndoResult::DiscardedCalibration {
                p1: request.p1,
                p2: request.p2,
            });
        }
        let mut ctx = UndoContext::new(&mut self.store, &mut self.calibration);
        self.history.undo(&mut ctx).inspect_err(|err| {
            log::warn!("Undo failed: {}", err);
        })
    }

    /// Remove all measurements and pending points.
    ///
    /// View and calibration are untouched, and calibration changes stay
    /// undoable.
    pub fn clear_measurements(&mut self) {
        self.store.clear_all();
        self.history.retain_calibration();
        self.calibration_request = None;
        log::info!("Measurements cleared");
    }

    /// Read-only view of the current model for drawing
    pub fn overlay(&self) -> OverlaySnapshot<'_> {
        OverlaySnapshot {
            lines: self.store.lines(),
            angles: self.store.angles(),
            pending_points: self.store.pending_points(),
            calibration_pending_points: self.store.calibration_pending_points(),
            calibration_request: self.calibration_request.as_ref(),
            view: self.view,
            colors: self.colors,
        }
    }
}
