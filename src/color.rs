use std::fmt;
use std::str::FromStr;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::MeasureError;

/// An opaque RGB colour for overlays.
///
/// Colours come in from pickers or settings as text; they are parsed once at
/// that boundary so nothing downstream has to deal with malformed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OverlayColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
];

impl OverlayColor {
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `#RGB`, or one of a handful of colour names
    pub fn parse(input: &str) -> Result<Self, MeasureError> {
        let trimmed = input.trim();
        let invalid = || MeasureError::InvalidColor(input.to_owned());

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            return match hex.len() {
                6 => {
                    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
                    Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
                }
                3 => {
                    // #abc expands to #aabbcc
                    let channel = |i: usize| {
                        u8::from_str_radix(&hex[i..i + 1], 16)
                            .map(|v| v * 17)
                            .map_err(|_| invalid())
                    };
                    Ok(Self::rgb(channel(0)?, channel(1)?, channel(2)?))
                }
                _ => Err(invalid()),
            };
        }

        let lower = trimmed.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, [r, g, b])| Self::rgb(*r, *g, *b))
            .ok_or_else(invalid)
    }

    /// `#rrggbb` form
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_color32(&self) -> Color32 {
        Color32::from_rgb(self.r, self.g, self.b)
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

impl fmt::Display for OverlayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for OverlayColor {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OverlayColor {
    type Error = MeasureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OverlayColor> for String {
    fn from(color: OverlayColor) -> Self {
        color.to_hex()
    }
}

/// Colours used to draw measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayColors {
    pub line: OverlayColor,
    pub text: OverlayColor,
    pub point: OverlayColor,
}

impl Default for OverlayColors {
    fn default() -> Self {
        Self {
            line: OverlayColor::BLUE,
            text: OverlayColor::YELLOW,
            point: OverlayColor::RED,
        }
    }
}

/// Which overlay colour a picker edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Line,
    Text,
    Point,
}

impl OverlayColors {
    pub fn get(&self, target: ColorTarget) -> OverlayColor {
        match target {
            ColorTarget::Line => self.line,
            ColorTarget::Text => self.text,
            ColorTarget::Point => self.point,
        }
    }

    pub fn set(&mut self, target: ColorTarget, color: OverlayColor) {
        match target {
            ColorTarget::Line => self.line = color,
            ColorTarget::Text => self.text = color,
            ColorTarget::Point => self.point = color,
        }
    }
}
