#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod calibration;
pub mod color;
pub mod command;
pub mod document;
pub mod engine;
pub mod error;
pub mod export;
pub mod file_handler;
pub mod geometry;
pub mod input;
pub mod measurement;
pub mod panels;
pub mod renderer;
pub mod settings;
pub mod view;

pub use app::VisionMetricsApp;
pub use calibration::{Calibration, CalibrationRequest};
pub use color::{OverlayColor, OverlayColors};
pub use command::{Action, ActionHistory, UndoResult};
pub use engine::{EngineOutcome, EngineState, MeasurementEngine, OverlaySnapshot};
pub use error::{MeasureError, MeasureResult};
pub use input::{InputEvent, InputHandler};
pub use measurement::{AngleMeasurement, LineMeasurement, MeasureMode, MeasurementStore};
pub use settings::MetricsSettings;
pub use view::{ViewState, ZoomDirection};
