use thiserror::Error;

/// Errors raised by measurement operations.
///
/// All of them are recoverable: the session state is left exactly as it was
/// before the rejected operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// The two calibration points coincide, so no scale can be derived
    #[error("Calibration points must not overlap")]
    DegenerateCalibration,

    /// The known distance was not a positive number
    #[error("Invalid calibration distance: {0}")]
    InvalidMagnitude(String),

    /// The mode token does not name a measurement mode
    #[error("Unknown measurement mode: {0}")]
    InvalidMode(String),

    /// The action history is empty
    #[error("Nothing to undo")]
    NothingToUndo,

    /// A colour string could not be parsed
    #[error("Invalid colour: {0}")]
    InvalidColor(String),

    /// The most recent action no longer matches the stored measurements
    #[error("Undo record is out of sync: {0}")]
    StaleAction(&'static str),
}

/// Result type for measurement operations
pub type MeasureResult<T> = Result<T, MeasureError>;
