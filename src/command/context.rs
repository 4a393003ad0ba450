use crate::calibration::Calibration;
use crate::measurement::MeasurementStore;

/// Mutable access to the state that actions know how to reverse.
///
/// View state is not included: pan and zoom are not undoable.
#[derive(Debug)]
pub struct UndoContext<'a> {
    pub store: &'a mut MeasurementStore,
    pub calibration: &'a mut Calibration,
}

impl<'a> UndoContext<'a> {
    pub fn new(store: &'a mut MeasurementStore, calibration: &'a mut Calibration) -> Self {
        Self { store, calibration }
    }
}
