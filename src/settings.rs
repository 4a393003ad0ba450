use serde::{Deserialize, Serialize};

use crate::calibration::{CALIBRATION_UNITS, DEFAULT_UNIT};
use crate::color::OverlayColors;

/// User preferences, persisted across restarts through eframe storage.
///
/// Older saved state missing newer fields falls back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub colors: OverlayColors,
    /// Unit preselected in the calibration prompt
    pub default_unit: String,
    /// Radius of angle arcs on the canvas, in screen pixels
    pub canvas_arc_radius: f32,
    /// Radius of exported angle arcs as a fraction of the shorter ray
    pub export_arc_ratio: f32,
    pub arc_segments: usize,
    pub label_font_size: f32,
    pub marker_radius: f32,
    pub stroke_width: f32,
    pub window_size: [f32; 2],
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            colors: OverlayColors::default(),
            default_unit: DEFAULT_UNIT.to_owned(),
            canvas_arc_radius: 50.0,
            export_arc_ratio: 0.2,
            arc_segments: 200,
            label_font_size: 18.0,
            marker_radius: 3.0,
            stroke_width: 2.0,
            window_size: [1700.0, 900.0],
        }
    }
}

impl MetricsSettings {
    /// Replace values that cannot be drawn with their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !CALIBRATION_UNITS.contains(&self.default_unit.as_str()) {
            log::warn!("Unknown default unit {:?}, using {}", self.default_unit, defaults.default_unit);
            self.default_unit = defaults.default_unit;
        }
        if !is_positive(self.canvas_arc_radius) {
            self.canvas_arc_radius = defaults.canvas_arc_radius;
        }
        if !is_positive(self.export_arc_ratio) {
            self.export_arc_ratio = defaults.export_arc_ratio;
        }
        self.arc_segments = self.arc_segments.max(2);
        if !is_positive(self.label_font_size) {
            self.label_font_size = defaults.label_font_size;
        }
        if !is_positive(self.marker_radius) {
            self.marker_radius = defaults.marker_radius;
        }
        if !is_positive(self.stroke_width) {
            self.stroke_width = defaults.stroke_width;
        }
        if !self.window_size.iter().all(|side| is_positive(*side)) {
            self.window_size = defaults.window_size;
        }
        self
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::OverlayColor;

    #[test]
    fn test_defaults() {
        let settings = MetricsSettings::default();
        assert_eq!(settings.colors.line, OverlayColor::BLUE);
        assert_eq!(settings.colors.text, OverlayColor::YELLOW);
        assert_eq!(settings.colors.point, OverlayColor::RED);
        assert_eq!(settings.default_unit, "mm");
        assert_eq!(settings.arc_segments, 200);
    }

    #[test]
    fn test_sanitized_replaces_bad_values() {
        let settings = MetricsSettings {
            default_unit: "parsec".to_owned(),
            canvas_arc_radius: -1.0,
            export_arc_ratio: f32::NAN,
            arc_segments: 0,
            marker_radius: 0.0,
            window_size: [0.0, 900.0],
            ..MetricsSettings::default()
        }
        .sanitized();

        let defaults = MetricsSettings::default();
        assert_eq!(settings.default_unit, defaults.default_unit);
        assert_eq!(settings.canvas_arc_radius, defaults.canvas_arc_radius);
        assert_eq!(settings.export_arc_ratio, defaults.export_arc_ratio);
        assert_eq!(settings.arc_segments, 2);
        assert_eq!(settings.marker_radius, defaults.marker_radius);
        assert_eq!(settings.window_size, defaults.window_size);
    }

    #[test]
    fn test_sanitized_keeps_good_values() {
        let settings = MetricsSettings {
            default_unit: "in".to_owned(),
            stroke_width: 4.0,
            ..MetricsSettings::default()
        };
        assert_eq!(settings.clone().sanitized(), settings);
    }
}
