use egui::Pos2;

use crate::error::{MeasureError, MeasureResult};
use crate::geometry;

/// Units offered when entering a known distance
pub const CALIBRATION_UNITS: [&str; 6] = ["mm", "cm", "m", "in", "ft", "yd"];

pub const DEFAULT_UNIT: &str = "mm";

/// Real-world scale of the loaded image.
///
/// `scale_factor` is in units per image pixel. When it is `None` distances
/// are only known in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    scale_factor: Option<f32>,
    unit: String,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            scale_factor: None,
            unit: DEFAULT_UNIT.to_owned(),
        }
    }
}

/// A scale value together with its unit, as captured by undo records
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSetting {
    pub scale_factor: Option<f32>,
    pub unit: String,
}

impl Calibration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale_factor(&self) -> Option<f32> {
        self.scale_factor
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn is_calibrated(&self) -> bool {
        self.scale_factor.is_some()
    }

    /// Convert a pixel distance to real units, if calibrated
    pub fn to_real_units(&self, pixel_distance: f32) -> Option<f32> {
        self.scale_factor.map(|scale| pixel_distance * scale)
    }

    /// Snapshot the current scale for later restoration
    pub fn setting(&self) -> ScaleSetting {
        ScaleSetting {
            scale_factor: self.scale_factor,
            unit: self.unit.clone(),
        }
    }

    /// Replace the current scale, returning the previous one
    pub fn apply(&mut self, setting: ScaleSetting) -> ScaleSetting {
        let previous = self.setting();
        self.scale_factor = setting.scale_factor;
        self.unit = setting.unit;
        previous
    }

    /// Forget the scale; used when a new image is loaded
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Derive units-per-pixel from two image points a known distance apart.
pub fn compute_scale(p1: Pos2, p2: Pos2, known_real_distance: f32) -> MeasureResult<f32> {
    let pixel_distance = geometry::distance(p1, p2);
    if pixel_distance == 0.0 {
        return Err(MeasureError::DegenerateCalibration);
    }
    validate_magnitude(known_real_distance)?;
    Ok(known_real_distance / pixel_distance)
}

fn validate_magnitude(value: f32) -> MeasureResult<f32> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MeasureError::InvalidMagnitude(value.to_string()));
    }
    Ok(value)
}

/// Parse the text typed into the calibration prompt.
///
/// Only finite, strictly positive numbers are accepted.
pub fn parse_magnitude(input: &str) -> MeasureResult<f32> {
    let trimmed = input.trim();
    let value: f32 = trimmed
        .parse()
        .map_err(|_| MeasureError::InvalidMagnitude(trimmed.to_owned()))?;
    validate_magnitude(value)
}

/// Two calibration points waiting for the user to enter their real distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationRequest {
    pub p1: Pos2,
    pub p2: Pos2,
    pub pixel_distance: f32,
}

impl CalibrationRequest {
    /// Fails with `DegenerateCalibration` if the points coincide
    pub fn new(p1: Pos2, p2: Pos2) -> MeasureResult<Self> {
        let pixel_distance = geometry::distance(p1, p2);
        if pixel_distance == 0.0 {
            return Err(MeasureError::DegenerateCalibration);
        }
        Ok(Self {
            p1,
            p2,
            pixel_distance,
        })
    }

    pub fn resolve(&self, known_real_distance: f32) -> MeasureResult<f32> {
        compute_scale(self.p1, self.p2, known_real_distance)
    }
}
