use std::f32::consts::PI;

use egui::{Pos2, Vec2};
use vision_metrics::calibration::compute_scale;
use vision_metrics::geometry::{angle_between, distance, minor_arc_span, sample_arc};
use vision_metrics::view::{MAX_ZOOM, MIN_ZOOM};
use vision_metrics::{MeasureError, ViewState, ZoomDirection};

fn sample_points() -> Vec<Pos2> {
    let mut points = Vec::new();
    for i in -4..=4 {
        for j in -4..=4 {
            points.push(Pos2::new(i as f32 * 37.5, j as f32 * -21.25));
        }
    }
    points
}

#[test]
fn test_view_round_trip() {
    let zooms = [MIN_ZOOM, 0.37, 1.0, 2.5, 7.3, MAX_ZOOM];
    let pans = [Vec2::ZERO, Vec2::new(120.0, -45.5), Vec2::new(-300.0, 800.0)];

    for &zoom in &zooms {
        for &pan in &pans {
            let view = ViewState::new(zoom, pan);
            for p in sample_points() {
                let back = view.to_image_space(view.to_screen_space(p));
                assert!(
                    (back.x - p.x).abs() < 5e-3 && (back.y - p.y).abs() < 5e-3,
                    "{p:?} came back as {back:?} at zoom {zoom}, pan {pan:?}"
                );
            }
        }
    }
}

#[test]
fn test_zoom_saturates() {
    let mut view = ViewState::default();
    for _ in 0..50 {
        view.apply_zoom_delta(ZoomDirection::In);
        assert!(view.zoom() <= MAX_ZOOM);
    }
    assert_eq!(view.zoom(), 10.0);

    for _ in 0..100 {
        view.apply_zoom_delta(ZoomDirection::Out);
        assert!(view.zoom() >= MIN_ZOOM);
    }
    assert_eq!(view.zoom(), MIN_ZOOM);
}

#[test]
fn test_pan_is_not_scaled_by_zoom() {
    let mut view = ViewState::new(4.0, Vec2::ZERO);
    view.apply_pan_delta(10.0, -6.0);
    assert_eq!(view.pan(), Vec2::new(10.0, -6.0));
    assert_eq!(view.to_screen_space(Pos2::new(1.0, 1.0)), Pos2::new(14.0, -2.0));
}

#[test]
fn test_angle_examples() {
    let vertex = Pos2::new(0.0, 0.0);
    assert!((angle_between(Pos2::new(1.0, 0.0), vertex, Pos2::new(-1.0, 0.0)) - 180.0).abs() < 1e-4);
    assert!((angle_between(Pos2::new(1.0, 0.0), vertex, Pos2::new(0.0, 1.0)) - 90.0).abs() < 1e-4);
}

#[test]
fn test_angle_symmetric_and_bounded() {
    let points = sample_points();
    let vertex = Pos2::new(3.0, -2.0);
    for &a in points.iter().step_by(5) {
        for &c in points.iter().step_by(7) {
            let forward = angle_between(a, vertex, c);
            let backward = angle_between(c, vertex, a);
            assert!((forward - backward).abs() < 1e-3, "{a:?} {c:?}: {forward} vs {backward}");
            assert!((0.0..=180.0).contains(&forward), "{a:?} {c:?}: {forward}");
        }
    }
}

#[test]
fn test_compute_scale_examples() {
    let scale = compute_scale(Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0), 50.0).unwrap();
    assert!((scale - 0.5).abs() < 1e-6);
    assert_eq!(
        compute_scale(Pos2::new(0.0, 0.0), Pos2::new(0.0, 0.0), 50.0),
        Err(MeasureError::DegenerateCalibration)
    );
}

#[test]
fn test_minor_arc_never_reflex() {
    let center = Pos2::new(0.0, 0.0);
    let directions: Vec<Pos2> = (0..24)
        .map(|i| {
            let angle = i as f32 * PI / 12.0 + 0.01;
            Pos2::new(angle.cos() * 10.0, angle.sin() * 10.0)
        })
        .collect();

    for &start in &directions {
        for &end in &directions {
            let span = minor_arc_span(center, start, end);
            assert!(span.sweep() >= 0.0);
            assert!(span.sweep() <= PI + 1e-4, "{start:?} -> {end:?}: {span:?}");
        }
    }
}

#[test]
fn test_sampled_arc_matches_angle() {
    let vertex = Pos2::new(5.0, 5.0);
    let a = Pos2::new(5.0, -15.0);
    let c = Pos2::new(25.0, 5.0);
    let span = minor_arc_span(vertex, a, c);
    assert!((span.sweep().to_degrees() - angle_between(a, vertex, c)).abs() < 1e-3);

    let arc = sample_arc(vertex, span.start_angle, span.end_angle, 8.0, 200);
    assert_eq!(arc.len(), 200);
    // Restartable: a clone walks the same points
    assert_eq!(arc.clone().count(), 200);
    for p in arc {
        assert!((distance(p, vertex) - 8.0).abs() < 1e-3);
    }
}
