//! Demo showing basic stagehand usage.
//!
//! Runs a script against a headless engine and prints the resulting camera
//! and projection. Pass a script file to run it instead of the built-in one:
//!
//! ```text
//! cargo run --example demo -- setup.scm
//! ```

use stagehand::headless::HeadlessScene;
use stagehand::*;

const SCRIPT: &str = r"
; orbit a cube at a distance
(clip 1 500)
(frustum -1 1 -0.75 0.75)
(fog (vector 0.1 0.1 0.2) 0.02 10 200)
(clear-colour (vector 0.1 0.1 0.2))
(camera-lag 0.1)
(lock-camera (select 360 288 10))
(show-fps 1)
";

fn main() -> Result<()> {
    init_logging();

    let mut engine = Engine::headless();

    // Put one primitive in the middle of the screen for the script to pick
    let scene = engine
        .scene_mut::<HeadlessScene>()
        .ok_or_else(|| StagehandError::ResourceUnavailable("headless scene".into()))?;
    let cube = scene.add_primitive(Mat4::from_translation(Vec3::new(0.0, 0.0, -20.0)));
    scene.place(cube, 360, 288, 0.5);

    let source = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => SCRIPT.to_string(),
    };
    engine.eval(&source)?;

    println!("locked to: {:?}", engine.camera().locked());
    for frame in 0..3 {
        let locked = engine.call("get-locked-matrix", &[])?;
        println!("frame {frame}: {locked}");
    }
    println!("projection: {}", engine.call("get-projection-transform", &[])?);
    println!("screen: {}", engine.call("get-screen-size", &[])?);

    Ok(())
}
