//! The operation table behind [`Engine::call`].
//!
//! Each entry pairs a script-visible name with its argument signature and a
//! handler. Handlers only run after the arguments passed signature checking,
//! and decode symbol tokens into typed enums before touching any state.

use stagehand_core::{
    AccumOp, BufferTarget, Frustum, ProjectionMode, Result, StagehandError, StereoMode,
};

use crate::engine::Engine;
use crate::signature::ArgKind::{BoolQuad, Colour, Float, Int, Matrix, Size, Str, Symbol};
use crate::signature::{ArgKind, Args};
use crate::value::Value;

/// Handler signature shared by every operation.
pub type Handler = fn(&mut Engine, &Args<'_>) -> Result<Value>;

/// One script-callable operation.
pub struct Operation {
    pub name: &'static str,
    pub signature: &'static [ArgKind],
    /// One-line description shown by tooling.
    pub doc: &'static str,
    pub handler: Handler,
}

macro_rules! op {
    ($name:literal, [$($kind:ident),*], $doc:literal, $handler:path) => {
        Operation {
            name: $name,
            signature: &[$($kind),*],
            doc: $doc,
            handler: $handler,
        }
    };
}

/// Every operation, in registration order.
pub static OPERATIONS: &[Operation] = &[
    op!("clear-engine", [], "Clears the scene, physics, lights, grab stack and procedural functions.", clear_engine),
    op!("blur", [Float], "Sets the full screen motion blur amount; 0 turns blur off.", blur),
    op!("fog", [Colour, Float, Float, Float], "Sets fog colour, density, begin and end.", fog),
    op!("show-axis", [Int], "Shows or hides the origin axes.", show_axis),
    op!("show-fps", [Int], "Shows or hides the frame rate.", show_fps),
    op!("lock-camera", [Int], "Locks the camera to a primitive; 0 unlocks.", lock_camera),
    op!("camera-lag", [Float], "Sets how slowly a locked camera follows its primitive.", camera_lag),
    op!("load-texture", [Str], "Loads a texture, returning the cached handle on repeat loads.", load_texture),
    op!("force-load-texture", [Str], "Reloads a texture from disk, refreshing the cache.", force_load_texture),
    op!("clear-texture-cache", [], "Forgets every cached texture.", clear_texture_cache),
    op!("frustum", [Float, Float, Float, Float], "Sets the frustum left, right, bottom and top.", frustum),
    op!("clip", [Float, Float], "Sets the near and far clipping planes.", clip),
    op!("ortho", [], "Switches to orthographic projection.", ortho),
    op!("persp", [], "Switches to perspective projection.", persp),
    op!("set-ortho-zoom", [Float], "Sets the orthographic zoom.", set_ortho_zoom),
    op!("backfacecull", [Int], "Turns backface culling on or off.", backfacecull),
    op!("clear-colour", [Colour], "Sets the background colour.", clear_colour),
    op!("clear-frame", [Int], "Sets whether the frame is cleared each frame.", clear_frame),
    op!("clear-zbuffer", [Int], "Sets whether the depth buffer is cleared each frame.", clear_zbuffer),
    op!("clear-accum", [Int], "Sets whether the accumulation buffer is cleared each frame.", clear_accum),
    op!("get-locked-matrix", [], "Returns the locked camera matrix.", get_locked_matrix),
    op!("get-camera", [], "Returns the world-to-camera matrix.", get_camera),
    op!("set-camera", [Matrix], "Sets the camera-to-world matrix.", set_camera),
    op!("get-projection-transform", [], "Returns the projection matrix.", get_projection_transform),
    op!("get-screen-size", [], "Returns the window width and height.", get_screen_size),
    op!("set-screen-size", [Size], "Resizes the window.", set_screen_size),
    op!("select", [Int, Int, Int], "Returns the primitive under a screen region, or 0.", select),
    op!("desiredfps", [Float], "Sets the target frame rate.", desired_fps),
    op!("draw-buffer", [Symbol], "Selects the buffer to draw into.", draw_buffer),
    op!("read-buffer", [Symbol], "Selects the buffer to read from.", read_buffer),
    op!("set-stereo-mode", [Symbol], "Switches stereo mode; returns #f if unsupported.", set_stereo_mode),
    op!("get-stereo-mode", [], "Returns the current stereo mode.", get_stereo_mode),
    op!("set-colour-mask", [BoolQuad], "Sets which RGBA channels are written.", set_colour_mask),
    op!("shadow-light", [Int], "Selects the shadow-casting light; 0 disables shadows.", shadow_light),
    op!("shadow-length", [Float], "Sets the shadow volume length.", shadow_length),
    op!("shadow-debug", [Int], "Draws shadow volumes for debugging.", shadow_debug),
    op!("accum", [Symbol, Float], "Queues an accumulation buffer operation.", accum),
];

/// Finds an operation by its script name.
pub fn find(name: &str) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.name == name)
}

fn to_u32(operation: &'static str, what: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        StagehandError::invalid(operation, format!("{what} must be in 0..={}, got {value}", u32::MAX))
    })
}

fn to_i32(operation: &'static str, what: &str, value: i64) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| StagehandError::invalid(operation, format!("{what} out of range: {value}")))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn to_pixels(operation: &'static str, value: f32) -> Result<u32> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < 1.0 || rounded > u32::MAX as f32 {
        return Err(StagehandError::invalid(
            operation,
            format!("pixel size must be at least 1, got {value}"),
        ));
    }
    Ok(rounded as u32)
}

fn void(_: ()) -> Value {
    Value::Void
}

fn clear_engine(engine: &mut Engine, _: &Args<'_>) -> Result<Value> {
    engine.clear_engine().map(void)
}

fn blur(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_motion_blur(args.float(0)?).map(void)
}

fn fog(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    let colour = args.colour(0)?;
    let (density, begin, end) = (args.float(1)?, args.float(2)?, args.float(3)?);
    engine.state_mut().set_fog(colour, density, begin, end).map(void)
}

fn show_axis(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_axis_display(args.flag(0)?);
    Ok(Value::Void)
}

fn show_fps(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_fps_display(args.flag(0)?);
    Ok(Value::Void)
}

fn lock_camera(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    let id = to_u32("lock-camera", "primitive id", args.int(0)?)?;
    engine.lock_camera(Some(id)).map(void)
}

fn camera_lag(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.camera_mut().set_lag(args.float(0)?).map(void)
}

fn texture_handle(id: stagehand_render::TextureId) -> Value {
    Value::Int(i64::from(id.get()))
}

fn load_texture(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.load_texture(args.str(0)?).map(texture_handle)
}

fn force_load_texture(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.force_load_texture(args.str(0)?).map(texture_handle)
}

fn clear_texture_cache(engine: &mut Engine, _: &Args<'_>) -> Result<Value> {
    engine.clear_texture_cache();
    Ok(Value::Void)
}

fn frustum(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    let frustum = Frustum {
        left: args.float(0)?,
        right: args.float(1)?,
        bottom: args.float(2)?,
        top: args.float(3)?,
    };
    engine.state_mut().set_frustum(frustum).map(void)
}

fn clip(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine
        .state_mut()
        .set_clip(args.float(0)?, args.float(1)?)
        .map(void)
}

fn ortho(engine: &mut Engine, _: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_projection_mode(ProjectionMode::Orthographic);
    Ok(Value::Void)
}

fn persp(engine: &mut Engine, _: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_projection_mode(ProjectionMode::Perspective);
    Ok(Value::Void)
}

fn set_ortho_zoom(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_ortho_zoom(args.float(0)?).map(void)
}

fn backfacecull(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_backface_cull(args.flag(0)?);
    Ok(Value::Void)
}

fn clear_colour(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_bg_colour(args.colour(0)?).map(void)
}

fn clear_frame(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_clear_frame(args.flag(0)?);
    Ok(Value::Void)
}

fn clear_zbuffer(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_clear_zbuffer(args.flag(0)?);
    Ok(Value::Void)
}

fn clear_accum(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_clear_accum(args.flag(0)?);
    Ok(Value::Void)
}

fn get_locked_matrix(engine: &mut Engine, _: &Args<'_>) -> Result<Value> {
    Ok(Value::matrix(engine.locked_matrix()))
}

fn get_camera(engine: &mut Engine, _: &Args<'_>) -> Result<Value> {
    Ok(Value::matrix(engine.camera().matrix()))
}

fn set_camera(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.camera_mut().set_matrix(args.matrix(0)?).map(void)
}

fn get_projection_transform(engine: &mut Engine, _: &Args<'_>) -> Result<Value> {
    Ok(Value::matrix(engine.state().projection_matrix()))
}

#[allow(clippy::cast_precision_loss)]
fn get_screen_size(engine: &mut Engine, _: &Args<'_>) -> Result<Value> {
    let (width, height) = engine.screen_size();
    Ok(Value::floats([width as f32, height as f32]))
}

fn set_screen_size(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    let (width, height) = args.size(0)?;
    let width = to_pixels("set-screen-size", width)?;
    let height = to_pixels("set-screen-size", height)?;
    engine.set_screen_size(width, height).map(void)
}

fn select(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    let x = to_i32("select", "x", args.int(0)?)?;
    let y = to_i32("select", "y", args.int(1)?)?;
    let size = to_u32("select", "region size", args.int(2)?)?;
    let picked = engine.select(x, y, size).unwrap_or(0);
    Ok(Value::Int(i64::from(picked)))
}

fn desired_fps(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_desired_fps(args.float(0)?).map(void)
}

fn draw_buffer(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    let target: BufferTarget = args.symbol(0)?.parse()?;
    engine.state_mut().set_draw_buffer(target);
    Ok(Value::Void)
}

fn read_buffer(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    let target: BufferTarget = args.symbol(0)?.parse()?;
    engine.state_mut().set_read_buffer(target);
    Ok(Value::Void)
}

fn set_stereo_mode(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    let mode: StereoMode = args.symbol(0)?.parse()?;
    Ok(Value::Bool(engine.set_stereo_mode(mode)))
}

fn get_stereo_mode(engine: &mut Engine, _: &Args<'_>) -> Result<Value> {
    Ok(Value::symbol(engine.state().stereo_mode().token()))
}

fn set_colour_mask(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_colour_mask(args.bool_quad(0)?);
    Ok(Value::Void)
}

fn shadow_light(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    let light = to_u32("shadow-light", "light", args.int(0)?)?;
    engine.state_mut().set_shadow_light(light);
    Ok(Value::Void)
}

fn shadow_length(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_shadow_length(args.float(0)?).map(void)
}

fn shadow_debug(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    engine.state_mut().set_shadow_debug(args.flag(0)?);
    Ok(Value::Void)
}

fn accum(engine: &mut Engine, args: &Args<'_>) -> Result<Value> {
    let op: AccumOp = args.symbol(0)?.parse()?;
    engine.state_mut().accum(op, args.float(1)?).map(void)
}
