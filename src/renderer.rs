use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, TextureId, Vec2};

use crate::engine::OverlaySnapshot;
use crate::geometry;
use crate::settings::MetricsSettings;

/// Distance of an angle label above its vertex, in screen pixels
const ANGLE_LABEL_LIFT: f32 = 20.0;

/// Sizes used when drawing on the live canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasStyle {
    pub stroke_width: f32,
    pub marker_radius: f32,
    /// Angle arc radius in screen pixels, independent of zoom
    pub arc_radius: f32,
    pub arc_segments: usize,
    pub font_size: f32,
}

impl CanvasStyle {
    pub fn new(settings: &MetricsSettings) -> Self {
        Self {
            stroke_width: settings.stroke_width,
            marker_radius: settings.marker_radius,
            arc_radius: settings.canvas_arc_radius,
            arc_segments: settings.arc_segments,
            font_size: settings.label_font_size,
        }
    }
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self::new(&MetricsSettings::default())
    }
}

/// A piece of text to place on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasLabel {
    pub pos: Pos2,
    pub text: String,
}

/// Draws the image and measurement overlays.
///
/// Holds no geometry of its own: every frame starts from an `OverlaySnapshot`
/// and maps image coordinates through its view, so nothing drawn can go
/// stale after an undo or a zoom.
#[derive(Debug, Default)]
pub struct Renderer {
    style: CanvasStyle,
}

impl Renderer {
    pub fn new(style: CanvasStyle) -> Self {
        Self { style }
    }

    /// Strokes and markers for the overlay. `origin` is the canvas' top-left
    /// corner in window coordinates.
    pub fn overlay_shapes(&self, overlay: &OverlaySnapshot<'_>, origin: Vec2) -> Vec<Shape> {
        let to_screen = |p: Pos2| overlay.view.to_screen_space(p) + origin;
        let line_stroke = Stroke::new(self.style.stroke_width, overlay.colors.line.to_color32());
        let point_color = overlay.colors.point.to_color32();
        let mut shapes = Vec::new();

        for line in overlay.lines {
            shapes.push(Shape::line_segment([to_screen(line.a), to_screen(line.b)], line_stroke));
        }

        for angle in overlay.angles {
            let vertex = to_screen(angle.vertex);
            let a = to_screen(angle.a);
            let c = to_screen(angle.c);
            shapes.push(Shape::line_segment([vertex, a], line_stroke));
            shapes.push(Shape::line_segment([vertex, c], line_stroke));

            let span = geometry::minor_arc_span(vertex, a, c);
            let arc: Vec<Pos2> = geometry::sample_arc(
                vertex,
                span.start_angle,
                span.end_angle,
                self.style.arc_radius,
                self.style.arc_segments,
            )
            .collect();
            if arc.len() > 1 {
                shapes.push(Shape::line(arc, line_stroke));
            }
        }

        // The segment being calibrated stays visible while the prompt is open
        if let Some(request) = overlay.calibration_request {
            shapes.push(Shape::line_segment(
                [to_screen(request.p1), to_screen(request.p2)],
                Stroke::new(self.style.stroke_width, point_color),
            ));
            for p in [request.p1, request.p2] {
                shapes.push(Shape::circle_filled(to_screen(p), self.style.marker_radius, point_color));
            }
        }

        for &p in overlay.pending_points.iter().chain(overlay.calibration_pending_points) {
            shapes.push(Shape::circle_filled(to_screen(p), self.style.marker_radius, point_color));
        }

        shapes
    }

    /// Text labels for completed measurements
    pub fn overlay_labels(&self, overlay: &OverlaySnapshot<'_>, origin: Vec2) -> Vec<CanvasLabel> {
        let to_screen = |p: Pos2| overlay.view.to_screen_space(p) + origin;
        let mut labels = Vec::new();

        for line in overlay.lines {
            if let Some(text) = line.label() {
                labels.push(CanvasLabel {
                    pos: to_screen(line.midpoint()),
                    text,
                });
            }
        }
        for angle in overlay.angles {
            labels.push(CanvasLabel {
                pos: to_screen(angle.vertex) - Vec2::new(0.0, ANGLE_LABEL_LIFT),
                text: angle.label(),
            });
        }

        labels
    }

    /// Paint one frame into `canvas_rect`
    pub fn render(
        &self,
        painter: &Painter,
        canvas_rect: Rect,
        image: Option<(TextureId, Vec2)>,
        overlay: &OverlaySnapshot<'_>,
    ) {
        let painter = painter.with_clip_rect(canvas_rect);
        let origin = canvas_rect.min.to_vec2();

        let Some((texture_id, size)) = image else {
            painter.text(
                canvas_rect.center(),
                Align2::CENTER_CENTER,
                "Load or drop an image to start measuring",
                FontId::proportional(self.style.font_size),
                Color32::GRAY,
            );
            return;
        };

        let image_rect = Rect::from_min_max(
            overlay.view.to_screen_space(Pos2::ZERO) + origin,
            overlay.view.to_screen_space(size.to_pos2()) + origin,
        );
        painter.image(
            texture_id,
            image_rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );

        painter.extend(self.overlay_shapes(overlay, origin));

        let text_color = overlay.colors.text.to_color32();
        for label in self.overlay_labels(overlay, origin) {
            painter.text(
                label.pos,
                Align2::CENTER_CENTER,
                label.text,
                FontId::proportional(self.style.font_size),
                text_color,
            );
        }
    }
}
