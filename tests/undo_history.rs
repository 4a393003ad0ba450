use egui::Pos2;
use vision_metrics::calibration::ScaleSetting;
use vision_metrics::{Action, MeasureError, MeasureMode, MeasurementEngine, UndoResult};

fn engine() -> MeasurementEngine {
    let mut engine = MeasurementEngine::new();
    engine.load_image([200, 200]);
    engine
}

fn add_line(engine: &mut MeasurementEngine, a: Pos2, b: Pos2) {
    engine.click(a).unwrap();
    engine.click(b).unwrap();
}

#[test]
fn test_undo_line_then_nothing_to_undo() {
    let mut engine = engine();
    add_line(&mut engine, Pos2::new(0.0, 0.0), Pos2::new(3.0, 4.0));
    assert_eq!(engine.store().lines().len(), 1);
    assert_eq!(engine.history().len(), 1);

    let undone = engine.undo().unwrap();
    assert!(matches!(undone, UndoResult::RemovedLine(_)));
    assert!(engine.store().lines().is_empty());

    assert_eq!(engine.undo(), Err(MeasureError::NothingToUndo));
    assert!(engine.store().is_empty());
    assert!(engine.history().is_empty());
}

#[test]
fn test_completed_line_is_one_undo_step() {
    let mut engine = engine();
    add_line(&mut engine, Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0));
    add_line(&mut engine, Pos2::new(0.0, 5.0), Pos2::new(10.0, 5.0));

    let names: Vec<_> = engine.history().actions().iter().map(Action::name).collect();
    assert_eq!(names, ["Add Line", "Add Line"]);

    engine.undo().unwrap();
    assert_eq!(engine.store().lines().len(), 1);
    assert_eq!(engine.store().lines()[0].a, Pos2::new(0.0, 0.0));
}

#[test]
fn test_undo_pending_point() {
    let mut engine = engine();
    engine.set_mode(MeasureMode::Angle);
    engine.click(Pos2::new(1.0, 1.0)).unwrap();
    engine.click(Pos2::new(2.0, 2.0)).unwrap();

    assert_eq!(
        engine.undo(),
        Ok(UndoResult::RemovedPoint {
            kind: vision_metrics::measurement::PendingKind::Measurement,
            point: Pos2::new(2.0, 2.0),
        })
    );
    assert_eq!(engine.store().pending_points(), &[Pos2::new(1.0, 1.0)]);

    // The angle now needs two more clicks
    engine.click(Pos2::new(5.0, 1.0)).unwrap();
    assert!(engine.store().angles().is_empty());
    engine.click(Pos2::new(1.0, 5.0)).unwrap();
    assert_eq!(engine.store().angles().len(), 1);
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn test_undo_calibration_restores_previous_scale() {
    let mut engine = engine();
    engine.set_mode(MeasureMode::Calibrate);
    engine.click(Pos2::new(0.0, 0.0)).unwrap();
    engine.click(Pos2::new(100.0, 0.0)).unwrap();
    engine.submit_calibration(50.0, "mm").unwrap();

    engine.click(Pos2::new(0.0, 0.0)).unwrap();
    engine.click(Pos2::new(10.0, 0.0)).unwrap();
    engine.submit_calibration(1.0, "in").unwrap();
    assert_eq!(engine.calibration().unit(), "in");

    assert_eq!(
        engine.undo(),
        Ok(UndoResult::RestoredCalibration(ScaleSetting {
            scale_factor: Some(0.5),
            unit: "mm".to_owned(),
        }))
    );
    assert_eq!(engine.calibration().scale_factor(), Some(0.5));

    engine.undo().unwrap();
    assert!(!engine.calibration().is_calibrated());
    assert!(!engine.history().can_undo());
}

#[test]
fn test_interleaved_undo_across_modes() {
    let mut engine = engine();
    add_line(&mut engine, Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0));

    engine.set_mode(MeasureMode::Angle);
    for p in [Pos2::new(10.0, 0.0), Pos2::new(0.0, 0.0), Pos2::new(0.0, 10.0)] {
        engine.click(p).unwrap();
    }

    // Unfinished points are dropped with the mode switch
    engine.set_mode(MeasureMode::Line);
    engine.click(Pos2::new(50.0, 50.0)).unwrap();
    engine.set_mode(MeasureMode::Angle);

    assert!(matches!(engine.undo(), Ok(UndoResult::RemovedAngle(_))));
    assert!(matches!(engine.undo(), Ok(UndoResult::RemovedLine(_))));
    assert_eq!(engine.undo(), Err(MeasureError::NothingToUndo));
    assert!(engine.store().is_empty());
}

#[test]
fn test_clear_keeps_calibration_undoable() {
    let mut engine = engine();
    engine.set_mode(MeasureMode::Calibrate);
    engine.click(Pos2::new(0.0, 0.0)).unwrap();
    engine.click(Pos2::new(20.0, 0.0)).unwrap();
    engine.submit_calibration(10.0, "mm").unwrap();

    engine.set_mode(MeasureMode::Line);
    add_line(&mut engine, Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0));
    engine.click(Pos2::new(3.0, 3.0)).unwrap();

    engine.clear_measurements();
    assert_eq!(engine.history().len(), 1);

    assert!(matches!(
        engine.undo(),
        Ok(UndoResult::RestoredCalibration(_))
    ));
    assert!(!engine.calibration().is_calibrated());
}

#[test]
fn test_degenerate_calibration_leaves_nothing_to_undo() {
    let mut engine = engine();
    engine.set_mode(MeasureMode::Calibrate);
    engine.click(Pos2::new(7.0, 7.0)).unwrap();
    assert_eq!(engine.history().len(), 1);
    assert_eq!(
        engine.click(Pos2::new(7.0, 7.0)),
        Err(MeasureError::DegenerateCalibration)
    );
    assert!(engine.history().is_empty());
    assert_eq!(engine.undo(), Err(MeasureError::NothingToUndo));
}

#[test]
fn test_undo_while_prompt_open_keeps_current_scale() {
    let mut engine = engine();
    engine.set_mode(MeasureMode::Calibrate);
    engine.click(Pos2::new(0.0, 0.0)).unwrap();
    engine.click(Pos2::new(100.0, 0.0)).unwrap();
    engine.submit_calibration(50.0, "mm").unwrap();

    engine.click(Pos2::new(0.0, 0.0)).unwrap();
    engine.click(Pos2::new(0.0, 10.0)).unwrap();
    assert!(engine.calibration_request().is_some());

    assert_eq!(
        engine.undo(),
        Ok(UndoResult::DiscardedCalibration {
            p1: Pos2::new(0.0, 0.0),
            p2: Pos2::new(0.0, 10.0),
        })
    );
    assert!(engine.calibration_request().is_none());
    assert_eq!(engine.calibration().scale_factor(), Some(0.5));
    assert_eq!(engine.history().len(), 1);
    assert_eq!(
        engine.submit_calibration(5.0, "mm"),
        Err(MeasureError::DegenerateCalibration)
    );

    engine.undo().unwrap();
    assert!(!engine.calibration().is_calibrated());
    assert!(!engine.can_undo());
}
