use egui::Pos2;

use super::UndoContext;
use crate::calibration::ScaleSetting;
use crate::error::{MeasureError, MeasureResult};
use crate::measurement::{AngleMeasurement, LineMeasurement, PendingKind};

/// A reversible change to the measurement session.
///
/// Each variant carries everything needed to undo it, so one pop from the
/// history always reverses exactly one user-visible step.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A point was appended to an unfinished measurement or calibration
    AddPoint { kind: PendingKind, point: Pos2 },
    /// A line was completed
    AddLine(LineMeasurement),
    /// An angle was completed
    AddAngle(AngleMeasurement),
    /// The scale was changed from `previous` to `applied`
    SetCalibration {
        previous: ScaleSetting,
        applied: ScaleSetting,
    },
}

/// What an undo actually removed or restored
#[derive(Debug, Clone, PartialEq)]
pub enum UndoResult {
    RemovedPoint { kind: PendingKind, point: Pos2 },
    RemovedLine(LineMeasurement),
    RemovedAngle(AngleMeasurement),
    RestoredCalibration(ScaleSetting),
    /// Two picked calibration points were dropped before a distance was entered
    DiscardedCalibration { p1: Pos2, p2: Pos2 },
}

impl Action {
    /// Short human-readable name, used in the history list
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddPoint {
                kind: PendingKind::Measurement,
                ..
            } => "Add Point",
            Action::AddPoint {
                kind: PendingKind::Calibration,
                ..
            } => "Add Calibration Point",
            Action::AddLine(_) => "Add Line",
            Action::AddAngle(_) => "Add Angle",
            Action::SetCalibration { .. } => "Set Calibration",
        }
    }

    /// Check that the action is still the latest change of its kind.
    ///
    /// Nothing is mutated; `revert` is only called after this succeeds.
    pub fn check(&self, ctx: &UndoContext<'_>) -> MeasureResult<()> {
        let ok = match self {
            Action::AddPoint { kind, point } => ctx.store.last_pending_is(*kind, *point),
            Action::AddLine(line) => ctx.store.last_line_is(line.id),
            Action::AddAngle(angle) => ctx.store.last_angle_is(angle.id),
            Action::SetCalibration { applied, .. } => ctx.calibration.setting() == *applied,
        };
        if ok {
            Ok(())
        } else {
            Err(MeasureError::StaleAction(self.name()))
        }
    }

    /// Reverse the action's effect on the store or calibration
    pub fn revert(&self, ctx: &mut UndoContext<'_>) -> MeasureResult<UndoResult> {
        match self {
            Action::AddPoint { kind, point } => {
                let point = ctx.store.pop_pending(*kind, *point)?;
                Ok(UndoResult::RemovedPoint { kind: *kind, point })
            }
            Action::AddLine(line) => ctx.store.pop_line(line.id).map(UndoResult::RemovedLine),
            Action::AddAngle(angle) => ctx.store.pop_angle(angle.id).map(UndoResult::RemovedAngle),
            Action::SetCalibration { previous, .. } => {
                ctx.calibration.apply(previous.clone());
                Ok(UndoResult::RestoredCalibration(previous.clone()))
            }
        }
    }
}
