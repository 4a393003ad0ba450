//! Burns measurements into a copy of the image and writes it out as PNG.
//!
//! Strokes are rasterised with tiny-skia; labels are drawn with rusttype
//! using the same proportional font egui shows on screen.

use std::path::Path;

use egui::{FontDefinitions, FontFamily, Pos2, Vec2};
use image::{ImageFormat, Rgba, RgbaImage};
use rusttype::{Font, Scale, point};
use thiserror::Error;
use tiny_skia::{ColorU8, LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::color::{OverlayColor, OverlayColors};
use crate::geometry;
use crate::measurement::{AngleMeasurement, LineMeasurement};
use crate::settings::MetricsSettings;

/// Offset of an angle label from its vertex, in image pixels
const ANGLE_LABEL_OFFSET: Vec2 = Vec2::new(20.0, -20.0);

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Load an image before saving")]
    NoImage,

    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Cannot export a {width}x{height} image")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("No font available for labels")]
    FontUnavailable,
}

/// Font used for exported labels
pub struct LabelFont {
    font: Font<'static>,
}

impl LabelFont {
    /// Use egui's built-in proportional font
    pub fn from_egui_defaults() -> Result<Self, ExportError> {
        let definitions = FontDefinitions::default();
        let data = definitions
            .families
            .get(&FontFamily::Proportional)
            .and_then(|names| names.first())
            .and_then(|name| definitions.font_data.get(name))
            .ok_or(ExportError::FontUnavailable)?;
        Self::from_bytes(data.font.to_vec())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ExportError> {
        Font::try_from_vec(bytes)
            .map(|font| Self { font })
            .ok_or(ExportError::FontUnavailable)
    }

    /// Advance width of `text` at `size` pixels
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let scale = Scale::uniform(size);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    /// Draw `text` with its baseline starting at `origin`, blending into `image`
    fn draw(&self, image: &mut RgbaImage, text: &str, origin: Pos2, size: f32, color: OverlayColor) {
        let scale = Scale::uniform(size);
        let [r, g, b] = color.to_array();
        let (width, height) = image.dimensions();

        for glyph in self.font.layout(text, scale, point(origin.x, origin.y)) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                    return;
                }
                let pixel = image.get_pixel_mut(px as u32, py as u32);
                *pixel = blend(*pixel, [r, g, b], coverage);
            });
        }
    }
}

fn blend(dst: Rgba<u8>, src: [u8; 3], coverage: f32) -> Rgba<u8> {
    let coverage = coverage.clamp(0.0, 1.0);
    let mix = |s: u8, d: u8| (s as f32 * coverage + d as f32 * (1.0 - coverage)).round() as u8;
    let alpha = dst[3].max((coverage * 255.0).round() as u8);
    Rgba([mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), alpha])
}

/// How overlays look in the exported image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportStyle {
    pub line_color: OverlayColor,
    pub text_color: OverlayColor,
    pub stroke_width: f32,
    /// Arc radius as a fraction of the shorter ray
    pub arc_ratio: f32,
    pub arc_segments: usize,
    pub font_size: f32,
}

impl ExportStyle {
    pub fn new(settings: &MetricsSettings, colors: OverlayColors) -> Self {
        Self {
            line_color: colors.line,
            text_color: colors.text,
            stroke_width: settings.stroke_width,
            arc_ratio: settings.export_arc_ratio,
            arc_segments: settings.arc_segments,
            font_size: settings.label_font_size,
        }
    }
}

impl Default for ExportStyle {
    fn default() -> Self {
        Self::new(&MetricsSettings::default(), OverlayColors::default())
    }
}

fn to_pixmap(base: &RgbaImage) -> Result<Pixmap, ExportError> {
    let (width, height) = base.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::InvalidDimensions { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(base.pixels()) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Ok(pixmap)
}

fn from_pixmap(pixmap: &Pixmap) -> Result<RgbaImage, ExportError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let raw = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    RgbaImage::from_raw(width, height, raw).ok_or(ExportError::InvalidDimensions { width, height })
}

fn stroke_polyline(pixmap: &mut Pixmap, points: impl IntoIterator<Item = Pos2>, paint: &Paint<'_>, stroke: &Stroke) {
    let mut builder = PathBuilder::new();
    for (i, p) in points.into_iter().enumerate() {
        if i == 0 {
            builder.move_to(p.x, p.y);
        } else {
            builder.line_to(p.x, p.y);
        }
    }
    // Fewer than two points gives no path
    if let Some(path) = builder.finish() {
        pixmap.stroke_path(&path, paint, stroke, Transform::identity(), None);
    }
}

/// Render lines and angles on top of a copy of `base`.
///
/// Coordinates are image pixels; the view transform plays no part here.
pub fn render_annotated(
    base: &RgbaImage,
    lines: &[LineMeasurement],
    angles: &[AngleMeasurement],
    style: &ExportStyle,
    font: &LabelFont,
) -> Result<RgbaImage, ExportError> {
    let mut pixmap = to_pixmap(base)?;

    let [r, g, b] = style.line_color.to_array();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = true;
    let stroke = Stroke {
        width: style.stroke_width,
        line_cap: LineCap::Round,
        ..Stroke::default()
    };

    for line in lines {
        stroke_polyline(&mut pixmap, [line.a, line.b], &paint, &stroke);
    }

    for angle in angles {
        stroke_polyline(&mut pixmap, [angle.vertex, angle.a], &paint, &stroke);
        stroke_polyline(&mut pixmap, [angle.vertex, angle.c], &paint, &stroke);

        let radius = geometry::arc_radius_for(angle.vertex, angle.a, angle.c, style.arc_ratio);
        if radius > 0.0 {
            let span = geometry::minor_arc_span(angle.vertex, angle.a, angle.c);
            let arc = geometry::sample_arc(
                angle.vertex,
                span.start_angle,
                span.end_angle,
                radius,
                style.arc_segments,
            );
            stroke_polyline(&mut pixmap, arc, &paint, &stroke);
        }
    }

    let mut image = from_pixmap(&pixmap)?;

    for line in lines {
        if let Some(label) = line.label() {
            let width = font.text_width(&label, style.font_size);
            let mid = line.midpoint();
            let origin = Pos2::new(mid.x - width / 2.0, mid.y + style.font_size / 3.0);
            font.draw(&mut image, &label, origin, style.font_size, style.text_color);
        }
    }

    for angle in angles {
        font.draw(
            &mut image,
            &angle.label(),
            angle.vertex + ANGLE_LABEL_OFFSET,
            style.font_size,
            style.text_color,
        );
    }

    Ok(image)
}

/// Render and write the annotated image as PNG
pub fn save_annotated(
    path: &Path,
    base: &RgbaImage,
    lines: &[LineMeasurement],
    angles: &[AngleMeasurement],
    style: &ExportStyle,
    font: &LabelFont,
) -> Result<(), ExportError> {
    let image = render_annotated(base, lines, angles, style, font)?;
    image.save_with_format(path, ImageFormat::Png)?;
    log::info!(
        "Saved annotated image with {} lines and {} angles to {}",
        lines.len(),
        angles.len(),
        path.display()
    );
    Ok(())
}
