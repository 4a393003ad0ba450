//! Pure geometry helpers for measurements.
//!
//! Every function here works in image space and has no side effects. The
//! arc helpers exist because the presentation layer has no native arc
//! primitive: an angle is visualised as a polyline sampled along the minor
//! arc between its two rays.

use std::f32::consts::{PI, TAU};

use egui::Pos2;

/// Euclidean distance between two points.
pub fn distance(a: Pos2, b: Pos2) -> f32 {
    (b - a).length()
}

/// Midpoint of the segment `a`-`b`, used to place line labels.
pub fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    a.lerp(b, 0.5)
}

/// Unsigned interior angle at `vertex`, in degrees.
///
/// The result is always in `[0, 180]` and does not depend on the order of
/// `a` and `c`.
pub fn angle_between(a: Pos2, vertex: Pos2, c: Pos2) -> f32 {
    let v1 = a - vertex;
    let v2 = c - vertex;

    let raw = v2.y.atan2(v2.x) - v1.y.atan2(v1.x);
    let deg = raw.to_degrees().abs();
    if deg > 180.0 { 360.0 - deg } else { deg }
}

/// Angular extent of an arc, in radians.
///
/// `start_angle` is in `[0, 2π)` and `end_angle - start_angle` is in `[0, π]`.
/// `end_angle` may exceed `2π` when the arc crosses the positive x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    pub start_angle: f32,
    pub end_angle: f32,
}

impl ArcSpan {
    /// Angular width of the arc in radians
    pub fn sweep(&self) -> f32 {
        self.end_angle - self.start_angle
    }
}

fn normalized_angle(center: Pos2, p: Pos2) -> f32 {
    let angle = (p.y - center.y).atan2(p.x - center.x);
    if angle < 0.0 { angle + TAU } else { angle }
}

/// Compute the span of the minor (at most 180°) arc from `start` to `end`
/// around `center`.
///
/// If going from `start` to `end` counter-clockwise would trace more than a
/// half turn, the endpoints are swapped so the short way round is returned.
pub fn minor_arc_span(center: Pos2, start: Pos2, end: Pos2) -> ArcSpan {
    let start_angle = normalized_angle(center, start);
    let end_angle = normalized_angle(center, end);

    let mut sweep = end_angle - start_angle;
    if sweep < 0.0 {
        sweep += TAU;
    }

    if sweep <= PI {
        ArcSpan {
            start_angle,
            end_angle: start_angle + sweep,
        }
    } else {
        ArcSpan {
            start_angle: end_angle,
            end_angle: end_angle + (TAU - sweep),
        }
    }
}

/// Points along a circular arc, produced lazily.
///
/// The sequence is finite and cheap to clone, so a renderer can walk it more
/// than once (e.g. once for the outline and once for a hit test).
#[derive(Debug, Clone)]
pub struct ArcPoints {
    center: Pos2,
    radius: f32,
    start_angle: f32,
    step: f32,
    index: usize,
    count: usize,
}

impl Iterator for ArcPoints {
    type Item = Pos2;

    fn next(&mut self) -> Option<Pos2> {
        if self.index >= self.count {
            return None;
        }
        let angle = self.start_angle + self.step * self.index as f32;
        self.index += 1;
        Some(Pos2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ArcPoints {}

/// Sample `segment_count` evenly spaced points on the arc of `radius` around
/// `center`, from `start_angle` to `end_angle` inclusive.
///
/// A single sample sits at `start_angle`; zero samples yields an empty sequence.
pub fn sample_arc(
    center: Pos2,
    start_angle: f32,
    end_angle: f32,
    radius: f32,
    segment_count: usize,
) -> ArcPoints {
    let step = if segment_count > 1 {
        (end_angle - start_angle) / (segment_count - 1) as f32
    } else {
        0.0
    };

    ArcPoints {
        center,
        radius,
        start_angle,
        step,
        index: 0,
        count: segment_count,
    }
}

/// Arc radius proportional to the shorter of the two rays leaving `center`.
pub fn arc_radius_for(center: Pos2, start: Pos2, end: Pos2, fraction: f32) -> f32 {
    distance(center, start).min(distance(center, end)) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_distance() {
        assert!(approx(distance(Pos2::new(0.0, 0.0), Pos2::new(3.0, 4.0)), 5.0));
        assert_eq!(distance(Pos2::new(2.0, 2.0), Pos2::new(2.0, 2.0)), 0.0);
    }

    #[test]
    fn test_angle_straight_and_right() {
        let v = Pos2::new(0.0, 0.0);
        assert!(approx(angle_between(Pos2::new(1.0, 0.0), v, Pos2::new(-1.0, 0.0)), 180.0));
        assert!(approx(angle_between(Pos2::new(1.0, 0.0), v, Pos2::new(0.0, 1.0)), 90.0));
    }

    #[test]
    fn test_angle_wraps_past_half_turn() {
        // rays at 170° and -170°: the raw difference is 340°, the interior angle 20°
        let v = Pos2::new(0.0, 0.0);
        let a = Pos2::new(170f32.to_radians().cos(), 170f32.to_radians().sin());
        let c = Pos2::new((-170f32).to_radians().cos(), (-170f32).to_radians().sin());
        assert!(approx(angle_between(a, v, c), 20.0));
        assert!(approx(angle_between(c, v, a), 20.0));
    }

    #[test]
    fn test_minor_arc_swaps_reflex_span() {
        let center = Pos2::new(0.0, 0.0);
        // start at 0°, end at 270°: the short way is 270° -> 360°
        let span = minor_arc_span(center, Pos2::new(1.0, 0.0), Pos2::new(0.0, -1.0));
        assert!(approx(span.start_angle, 1.5 * PI));
        assert!(approx(span.end_angle, TAU));
        assert!(approx(span.sweep(), 0.5 * PI));
    }

    #[test]
    fn test_minor_arc_handles_end_before_start() {
        let center = Pos2::new(0.0, 0.0);
        let start = Pos2::new(300f32.to_radians().cos(), 300f32.to_radians().sin());
        let end = Pos2::new(10f32.to_radians().cos(), 10f32.to_radians().sin());
        let span = minor_arc_span(center, start, end);
        assert!(approx(span.sweep().to_degrees(), 70.0));
        assert!(span.sweep() >= 0.0 && span.sweep() <= PI);
    }

    #[test]
    fn test_sample_arc_endpoints() {
        let center = Pos2::new(10.0, 10.0);
        let points: Vec<Pos2> = sample_arc(center, 0.0, 0.5 * PI, 2.0, 5).collect();
        assert_eq!(points.len(), 5);
        assert!(approx(points[0].x, 12.0) && approx(points[0].y, 10.0));
        assert!(approx(points[4].x, 10.0) && approx(points[4].y, 12.0));
    }

    #[test]
    fn test_sample_arc_is_restartable() {
        let arc = sample_arc(Pos2::ZERO, 0.0, PI, 1.0, 8);
        assert_eq!(arc.len(), 8);
        let first: Vec<Pos2> = arc.clone().collect();
        let second: Vec<Pos2> = arc.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sample_arc_degenerate_counts() {
        assert_eq!(sample_arc(Pos2::ZERO, 0.0, PI, 1.0, 0).count(), 0);
        let single: Vec<Pos2> = sample_arc(Pos2::ZERO, 0.0, PI, 1.0, 1).collect();
        assert_eq!(single.len(), 1);
        assert!(approx(single[0].x, 1.0));
    }

    #[test]
    fn test_arc_radius_uses_shorter_ray() {
        let r = arc_radius_for(
            Pos2::ZERO,
            Pos2::new(10.0, 0.0),
            Pos2::new(0.0, 40.0),
            0.2,
        );
        assert!(approx(r, 2.0));
    }
}
