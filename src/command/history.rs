use super::{Action, UndoContext, UndoResult};
use crate::error::{MeasureError, MeasureResult};
use crate::measurement::PendingKind;

/// Stack of reversible actions, most recent last
#[derive(Debug, Default, Clone)]
pub struct ActionHistory {
    undo_stack: Vec<Action>,
}

impl ActionHistory {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an action that has already been applied
    pub fn record(&mut self, action: Action) {
        log::debug!("Recorded action: {}", action.name());
        self.undo_stack.push(action);
    }

    /// Undo the most recent action.
    ///
    /// The action is validated against the current state before anything is
    /// popped or mutated, so a failed undo leaves both history and state as
    /// they were.
    pub fn undo(&mut self, ctx: &mut UndoContext<'_>) -> MeasureResult<UndoResult> {
        let Some(action) = self.undo_stack.last() else {
            return Err(MeasureError::NothingToUndo);
        };
        action.check(ctx)?;

        let action = self.undo_stack.pop().ok_or(MeasureError::NothingToUndo)?;
        let result = action.revert(ctx)?;
        log::info!("Undid {}", action.name());
        Ok(result)
    }

    /// Drop the point records of a pending list that has just been consumed
    /// or discarded. Returns the number of records removed.
    pub fn forget_pending(&mut self, kind: PendingKind) -> usize {
        let before = self.undo_stack.len();
        self.undo_stack
            .retain(|action| !matches!(action, Action::AddPoint { kind: k, .. } if *k == kind));
        before - self.undo_stack.len()
    }

    /// Drop point records of every pending list
    pub fn forget_all_pending(&mut self) -> usize {
        self.forget_pending(PendingKind::Measurement) + self.forget_pending(PendingKind::Calibration)
    }

    /// Keep only calibration changes; used when measurements are cleared
    pub fn retain_calibration(&mut self) {
        self.undo_stack
            .retain(|action| matches!(action, Action::SetCalibration { .. }));
    }

    /// Returns true if there are actions that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Oldest first
    pub fn actions(&self) -> &[Action] {
        &self.undo_stack
    }

    /// Clear the history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
    }
}
