//! Measurement storage.
//!
//! All points are in image space. Completed lines and angles are immutable;
//! the only way to remove one is to undo it or clear the whole store.

use std::fmt;
use std::str::FromStr;

use egui::Pos2;

use crate::calibration::Calibration;
use crate::error::{MeasureError, MeasureResult};
use crate::geometry;

/// Unique identifier for a completed measurement
pub type MeasurementId = uuid::Uuid;

/// What a click on the image does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MeasureMode {
    #[default]
    Line,
    Angle,
    Calibrate,
}

impl MeasureMode {
    pub const ALL: [MeasureMode; 3] = [MeasureMode::Line, MeasureMode::Angle, MeasureMode::Calibrate];

    /// Number of clicks that complete one measurement in this mode
    pub fn required_points(self) -> usize {
        match self {
            MeasureMode::Line => 2,
            MeasureMode::Angle => 3,
            MeasureMode::Calibrate => 2,
        }
    }

    /// Which pending list clicks in this mode go to
    pub fn pending_kind(self) -> PendingKind {
        match self {
            MeasureMode::Calibrate => PendingKind::Calibration,
            MeasureMode::Line | MeasureMode::Angle => PendingKind::Measurement,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MeasureMode::Line => "line",
            MeasureMode::Angle => "angle",
            MeasureMode::Calibrate => "calibrate",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MeasureMode::Line => "Line",
            MeasureMode::Angle => "Angle",
            MeasureMode::Calibrate => "Calibrate",
        }
    }
}

impl fmt::Display for MeasureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MeasureMode {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        MeasureMode::ALL
            .into_iter()
            .find(|mode| mode.name() == token)
            .ok_or_else(|| MeasureError::InvalidMode(s.to_owned()))
    }
}

/// The two independent lists of in-progress points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingKind {
    Measurement,
    Calibration,
}

/// A straight-line distance measurement.
///
/// The real distance is computed from the scale in effect when the line was
/// completed and is not updated if the calibration changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMeasurement {
    pub id: MeasurementId,
    pub a: Pos2,
    pub b: Pos2,
    pub pixel_distance: f32,
    /// `None` iff the image was uncalibrated when the line was made
    pub distance_real_units: Option<f32>,
    pub unit: String,
}

impl LineMeasurement {
    pub fn new(a: Pos2, b: Pos2, calibration: &Calibration) -> Self {
        let pixel_distance = geometry::distance(a, b);
        Self {
            id: MeasurementId::new_v4(),
            a,
            b,
            pixel_distance,
            distance_real_units: calibration.to_real_units(pixel_distance),
            unit: calibration.unit().to_owned(),
        }
    }

    /// Label drawn at the midpoint, e.g. `12.50 mm`. `None` when uncalibrated.
    pub fn label(&self) -> Option<String> {
        self.distance_real_units
            .map(|distance| format!("{:.2} {}", distance, self.unit))
    }

    pub fn midpoint(&self) -> Pos2 {
        geometry::midpoint(self.a, self.b)
    }
}

/// An angle measured at `vertex` between rays towards `a` and `c`
#[derive(Debug, Clone, PartialEq)]
pub struct AngleMeasurement {
    pub id: MeasurementId,
    pub a: Pos2,
    pub vertex: Pos2,
    pub c: Pos2,
    /// Always within `[0, 180]`
    pub angle_degrees: f32,
}

impl AngleMeasurement {
    pub fn new(a: Pos2, vertex: Pos2, c: Pos2) -> Self {
        Self {
            id: MeasurementId::new_v4(),
            a,
            vertex,
            c,
            angle_degrees: geometry::angle_between(a, vertex, c),
        }
    }

    pub fn label(&self) -> String {
        format!("{:.2}°", self.angle_degrees)
    }
}

/// Outcome of submitting a point to the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The point was appended to a pending list
    PointAdded { kind: PendingKind, point: Pos2 },
    /// Two calibration points are ready; the pending list has been emptied
    CalibrationReady { p1: Pos2, p2: Pos2 },
    LineAdded(LineMeasurement),
    AngleAdded(AngleMeasurement),
    /// The pending list was already full and the point was dropped
    Ignored,
}

/// Authoritative collection of points and completed measurements
#[derive(Debug, Default, Clone)]
pub struct MeasurementStore {
    calibration_pending: Vec<Pos2>,
    pending: Vec<Pos2>,
    lines: Vec<LineMeasurement>,
    angles: Vec<AngleMeasurement>,
}

impl MeasurementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[LineMeasurement] {
        &self.lines
    }

    pub fn angles(&self) -> &[AngleMeasurement] {
        &self.angles
    }

    pub fn pending_points(&self) -> &[Pos2] {
        &self.pending
    }

    pub fn calibration_pending_points(&self) -> &[Pos2] {
        &self.calibration_pending
    }

    pub fn pending(&self, kind: PendingKind) -> &[Pos2] {
        match kind {
            PendingKind::Measurement => &self.pending,
            PendingKind::Calibration => &self.calibration_pending,
        }
    }

    fn pending_mut(&mut self, kind: PendingKind) -> &mut Vec<Pos2> {
        match kind {
            PendingKind::Measurement => &mut self.pending,
            PendingKind::Calibration => &mut self.calibration_pending,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
            && self.angles.is_empty()
            && self.pending.is_empty()
            && self.calibration_pending.is_empty()
    }

    /// Add a clicked image point under `mode`.
    ///
    /// When the point completes a measurement, the measurement is stored and
    /// the pending list is emptied in the same call.
    pub fn submit_point(&mut self, mode: MeasureMode, point: Pos2, calibration: &Calibration) -> StoreEvent {
        let kind = mode.pending_kind();
        let required = mode.required_points();

        let pending = self.pending_mut(kind);
        if pending.len() >= required {
            log::warn!("Dropping point {:?}: {} points already pending for {}", point, pending.len(), mode);
            return StoreEvent::Ignored;
        }
        pending.push(point);
        if pending.len() < required {
            return StoreEvent::PointAdded { kind, point };
        }

        let points = std::mem::take(pending);
        match mode {
            MeasureMode::Calibrate => StoreEvent::CalibrationReady {
                p1: points[0],
                p2: points[1],
            },
            MeasureMode::Line => {
                let line = LineMeasurement::new(points[0], points[1], calibration);
                log::debug!("Line added: {:.2} px", line.pixel_distance);
                self.lines.push(line.clone());
                StoreEvent::LineAdded(line)
            }
            MeasureMode::Angle => {
                let angle = AngleMeasurement::new(points[0], points[1], points[2]);
                log::debug!("Angle added: {:.2}°", angle.angle_degrees);
                self.angles.push(angle.clone());
                StoreEvent::AngleAdded(angle)
            }
        }
    }

    /// Remove the most recent pending point of `kind`, which must be `expected`
    pub fn pop_pending(&mut self, kind: PendingKind, expected: Pos2) -> MeasureResult<Pos2> {
        let pending = self.pending_mut(kind);
        if pending.last() != Some(&expected) {
            return Err(MeasureError::StaleAction("pending point"));
        }
        Ok(pending.pop().unwrap_or(expected))
    }

    /// Remove the most recently added line, which must have id `id`
    pub fn pop_line(&mut self, id: MeasurementId) -> MeasureResult<LineMeasurement> {
        match self.lines.last() {
            Some(line) if line.id == id => {}
            _ => return Err(MeasureError::StaleAction("line")),
        }
        self.lines.pop().ok_or(MeasureError::StaleAction("line"))
    }

    /// Remove the most recently added angle, which must have id `id`
    pub fn pop_angle(&mut self, id: MeasurementId) -> MeasureResult<AngleMeasurement> {
        match self.angles.last() {
            Some(angle) if angle.id == id => {}
            _ => return Err(MeasureError::StaleAction("angle")),
        }
        self.angles.pop().ok_or(MeasureError::StaleAction("angle"))
    }

    /// Whether the given record could be reverted right now
    pub(crate) fn last_pending_is(&self, kind: PendingKind, point: Pos2) -> bool {
        self.pending(kind).last() == Some(&point)
    }

    pub(crate) fn last_line_is(&self, id: MeasurementId) -> bool {
        self.lines.last().is_some_and(|line| line.id == id)
    }

    pub(crate) fn last_angle_is(&self, id: MeasurementId) -> bool {
        self.angles.last().is_some_and(|angle| angle.id == id)
    }

    /// Drop both pending lists, returning how many points were discarded
    pub fn discard_pending(&mut self) -> usize {
        let count = self.pending.len() + self.calibration_pending.len();
        self.pending.clear();
        self.calibration_pending.clear();
        count
    }

    /// Empty every collection
    pub fn clear_all(&mut self) {
        self.calibration_pending.clear();
        self.pending.clear();
        self.lines.clear();
        self.angles.clear();
    }
}
