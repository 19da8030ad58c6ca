//! Running scripts end to end.

use stagehand::headless::HeadlessScene;
use stagehand::*;

#[test]
fn test_script_sets_state() {
    let mut engine = Engine::headless();
    engine
        .eval(
            r"
            ; a typical setup block
            (clip 1 500)
            (fog (vector 0 0 1) 0.01 1 100)
            (draw-buffer 'back-right)
            (set-colour-mask #(#t #f #f #t))
            (clear-colour #(0.1 0.2 0.3))
            (show-axis 1)
            ",
        )
        .unwrap();

    let state = engine.state();
    assert_eq!(state.clip(), (1.0, 500.0));
    assert_eq!(state.fog.colour, Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(state.fog.density, 0.01);
    assert_eq!(state.draw_buffer, BufferTarget::BackRight);
    assert_eq!(state.colour_mask, [true, false, false, true]);
    assert_eq!(state.bg_colour, Vec3::new(0.1, 0.2, 0.3));
    assert!(state.axis_display);
}

#[test]
fn test_script_returns_last_value() {
    let mut engine = Engine::headless();
    assert_eq!(engine.eval("").unwrap(), Value::Void);
    assert_eq!(
        engine.eval("(set-stereo-mode 'colour) (get-stereo-mode)").unwrap(),
        Value::symbol("colour")
    );
    assert_eq!(
        engine.eval("(set-stereo-mode 'crystal-eyes)").unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn test_nested_calls_feed_arguments() {
    let mut engine = Engine::headless();
    let id = engine
        .scene_mut::<HeadlessScene>()
        .unwrap()
        .add_primitive(Mat4::from_translation(Vec3::Y));
    engine
        .scene_mut::<HeadlessScene>()
        .unwrap()
        .place(id, 10, 10, 0.5);

    engine.eval("(lock-camera (select 10 10 4))").unwrap();
    assert_eq!(engine.camera().locked(), Some(id));

    // picking nothing yields 0, which unlocks
    engine.eval("(lock-camera (select 500 500 4))").unwrap();
    assert_eq!(engine.camera().locked(), None);

    engine.eval("(set-camera (get-camera))").unwrap();
}

#[test]
fn test_parse_error_runs_nothing() {
    let mut engine = Engine::headless();
    let err = engine.eval("(show-fps 1) (clip 1 10").unwrap_err();
    assert!(matches!(err, StagehandError::Parse { .. }));
    assert!(!engine.state().fps_display);
}

#[test]
fn test_runtime_error_stops_at_failing_call() {
    let mut engine = Engine::headless();
    let err = engine
        .eval("(show-fps 1) (desiredfps 0) (show-axis 1)")
        .unwrap_err();
    assert!(err.is_argument_error());
    assert!(engine.state().fps_display);
    assert!(!engine.state().axis_display);
}
