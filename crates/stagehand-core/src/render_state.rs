//! Global render state: everything that affects all primitives or the frame
//! as a whole.
//!
//! Setters validate their arguments before touching any field, so a rejected
//! call never leaves the state half-updated.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StagehandError};
use crate::scene::Display;
use crate::tokens::{AccumOp, BufferTarget, ProjectionMode, StereoMode};

/// Side planes of the view volume at the near clip distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            left: -1.0,
            right: 1.0,
            bottom: -0.75,
            top: 0.75,
        }
    }
}

/// Near and far clipping distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub near: f32,
    pub far: f32,
}

impl Default for Clip {
    fn default() -> Self {
        Self {
            near: 1.0,
            far: 10000.0,
        }
    }
}

/// Projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    pub mode: ProjectionMode,
    pub ortho_zoom: f32,
    pub frustum: Frustum,
    pub clip: Clip,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::Perspective,
            ortho_zoom: 1.0,
            frustum: Frustum::default(),
            clip: Clip::default(),
        }
    }
}

impl Projection {
    /// Returns the projection matrix for the current mode.
    ///
    /// Perspective follows `glFrustum`; orthographic follows `glOrtho` with the
    /// frustum bounds scaled by the zoom.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        let Frustum {
            left: l,
            right: r,
            bottom: b,
            top: t,
        } = self.frustum;
        let Clip { near: n, far: f } = self.clip;

        match self.mode {
            ProjectionMode::Perspective => Mat4::from_cols(
                Vec4::new(2.0 * n / (r - l), 0.0, 0.0, 0.0),
                Vec4::new(0.0, 2.0 * n / (t - b), 0.0, 0.0),
                Vec4::new(
                    (r + l) / (r - l),
                    (t + b) / (t - b),
                    -(f + n) / (f - n),
                    -1.0,
                ),
                Vec4::new(0.0, 0.0, -2.0 * f * n / (f - n), 0.0),
            ),
            ProjectionMode::Orthographic => {
                let z = self.ortho_zoom;
                Mat4::orthographic_rh_gl(l * z, r * z, b * z, t * z, n, f)
            }
        }
    }
}

/// Depth cue fog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub colour: Vec3,
    pub density: f32,
    pub begin: f32,
    pub end: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            colour: Vec3::ZERO,
            density: 0.0,
            begin: 1.0,
            end: 100.0,
        }
    }
}

/// Which buffers are cleared at the start of each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearFlags {
    pub frame: bool,
    pub zbuffer: bool,
    pub accum: bool,
}

impl Default for ClearFlags {
    fn default() -> Self {
        Self {
            frame: true,
            zbuffer: true,
            accum: false,
        }
    }
}

/// Shadow volume parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// Light casting shadows; 0 disables shadow rendering.
    pub light: u32,
    pub length: f32,
    pub debug: bool,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            light: 0,
            length: 10.0,
            debug: false,
        }
    }
}

/// Full screen motion blur.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionBlur {
    pub enabled: bool,
    pub amount: f32,
}

impl Default for MotionBlur {
    fn default() -> Self {
        Self {
            enabled: false,
            amount: 0.02,
        }
    }
}

/// Most accumulation operations held before the renderer drains them.
pub const MAX_PENDING_ACCUM_OPS: usize = 1024;

/// The renderer's global state for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderState {
    pub projection: Projection,
    pub fog: Fog,
    pub backface_cull: bool,
    pub bg_colour: Vec3,
    pub clear_flags: ClearFlags,
    /// Writable channels, in RGBA order.
    pub colour_mask: [bool; 4],
    pub draw_buffer: BufferTarget,
    pub read_buffer: BufferTarget,
    pub stereo_mode: StereoMode,
    pub shadow: Shadow,
    pub desired_fps: f32,
    pub motion_blur: MotionBlur,
    pub fps_display: bool,
    pub axis_display: bool,

    /// Accumulation buffer commands waiting for the next frame.
    #[serde(skip)]
    accum_queue: Vec<(AccumOp, f32)>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            projection: Projection::default(),
            fog: Fog::default(),
            backface_cull: true,
            bg_colour: Vec3::ZERO,
            clear_flags: ClearFlags::default(),
            colour_mask: [true; 4],
            draw_buffer: BufferTarget::Back,
            read_buffer: BufferTarget::Back,
            stereo_mode: StereoMode::None,
            shadow: Shadow::default(),
            desired_fps: 50.0,
            motion_blur: MotionBlur::default(),
            fps_display: false,
            axis_display: false,
            accum_queue: Vec::new(),
        }
    }
}

fn check_finite(operation: &'static str, name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(StagehandError::invalid(
            operation,
            format!("{name} must be finite, got {value}"),
        ))
    }
}

fn check_colour(operation: &'static str, colour: Vec3) -> Result<()> {
    if colour.is_finite() && colour.cmpge(Vec3::ZERO).all() && colour.cmple(Vec3::ONE).all() {
        Ok(())
    } else {
        Err(StagehandError::invalid(
            operation,
            format!("colour channels must be in [0, 1], got {colour}"),
        ))
    }
}

impl RenderState {
    /// Creates a render state with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks every ranged field against the rules its setter enforces.
    ///
    /// Deserialized states bypass the setters, so run this before installing
    /// one loaded from configuration.
    pub fn validate(&self) -> Result<()> {
        let mut scratch = Self::default();
        scratch.set_ortho_zoom(self.projection.ortho_zoom)?;
        scratch.set_frustum(self.projection.frustum)?;
        scratch.set_clip(self.projection.clip.near, self.projection.clip.far)?;
        let Fog {
            colour,
            density,
            begin,
            end,
        } = self.fog;
        scratch.set_fog(colour, density, begin, end)?;
        scratch.set_bg_colour(self.bg_colour)?;
        scratch.set_shadow_length(self.shadow.length)?;
        scratch.set_desired_fps(self.desired_fps)?;
        scratch.set_motion_blur(self.motion_blur.amount)
    }

    /// Switches between perspective and orthographic projection.
    pub fn set_projection_mode(&mut self, mode: ProjectionMode) {
        log::debug!("projection mode -> {mode:?}");
        self.projection.mode = mode;
    }

    /// Sets the orthographic zoom level.
    pub fn set_ortho_zoom(&mut self, zoom: f32) -> Result<()> {
        check_finite("set-ortho-zoom", "zoom", zoom)?;
        if zoom <= 0.0 {
            return Err(StagehandError::invalid(
                "set-ortho-zoom",
                format!("zoom must be positive, got {zoom}"),
            ));
        }
        self.projection.ortho_zoom = zoom;
        Ok(())
    }

    /// Sets the frustum side planes.
    pub fn set_frustum(&mut self, frustum: Frustum) -> Result<()> {
        let Frustum {
            left,
            right,
            bottom,
            top,
        } = frustum;
        for (name, value) in [("left", left), ("right", right), ("bottom", bottom), ("top", top)] {
            check_finite("frustum", name, value)?;
        }
        if left >= right || bottom >= top {
            return Err(StagehandError::invalid(
                "frustum",
                format!("degenerate frustum l={left} r={right} b={bottom} t={top}"),
            ));
        }
        log::debug!("frustum -> {frustum:?}");
        self.projection.frustum = frustum;
        Ok(())
    }

    /// Returns the frustum side planes.
    #[must_use]
    pub fn frustum(&self) -> Frustum {
        self.projection.frustum
    }

    /// Sets the near and far clipping distances.
    pub fn set_clip(&mut self, near: f32, far: f32) -> Result<()> {
        check_finite("clip", "near", near)?;
        check_finite("clip", "far", far)?;
        if near <= 0.0 || near >= far {
            return Err(StagehandError::invalid(
                "clip",
                format!("need 0 < near < far, got near={near} far={far}"),
            ));
        }
        log::debug!("clip -> ({near}, {far})");
        self.projection.clip = Clip { near, far };
        Ok(())
    }

    /// Returns the `(near, far)` clipping distances.
    #[must_use]
    pub fn clip(&self) -> (f32, f32) {
        (self.projection.clip.near, self.projection.clip.far)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    /// Sets the fog parameters. A density of 0 turns fog off.
    pub fn set_fog(&mut self, colour: Vec3, density: f32, begin: f32, end: f32) -> Result<()> {
        check_colour("fog", colour)?;
        check_finite("fog", "density", density)?;
        check_finite("fog", "begin", begin)?;
        check_finite("fog", "end", end)?;
        if density < 0.0 {
            return Err(StagehandError::invalid(
                "fog",
                format!("density must not be negative, got {density}"),
            ));
        }
        if begin >= end {
            return Err(StagehandError::invalid(
                "fog",
                format!("begin must be before end, got begin={begin} end={end}"),
            ));
        }
        self.fog = Fog {
            colour,
            density,
            begin,
            end,
        };
        Ok(())
    }

    /// Turns backface culling on or off.
    pub fn set_backface_cull(&mut self, enabled: bool) {
        self.backface_cull = enabled;
    }

    /// Sets the colour the frame is cleared to.
    pub fn set_bg_colour(&mut self, colour: Vec3) -> Result<()> {
        check_colour("clear-colour", colour)?;
        self.bg_colour = colour;
        Ok(())
    }

    pub fn set_clear_frame(&mut self, enabled: bool) {
        self.clear_flags.frame = enabled;
    }

    pub fn set_clear_zbuffer(&mut self, enabled: bool) {
        self.clear_flags.zbuffer = enabled;
    }

    pub fn set_clear_accum(&mut self, enabled: bool) {
        self.clear_flags.accum = enabled;
    }

    /// Sets which RGBA channels are written.
    pub fn set_colour_mask(&mut self, mask: [bool; 4]) {
        self.colour_mask = mask;
    }

    pub fn set_draw_buffer(&mut self, target: BufferTarget) {
        log::debug!("draw buffer -> {target}");
        self.draw_buffer = target;
    }

    pub fn set_read_buffer(&mut self, target: BufferTarget) {
        log::debug!("read buffer -> {target}");
        self.read_buffer = target;
    }

    /// Switches stereo mode.
    ///
    /// Crystal-eyes needs a quad-buffered display; without one this returns
    /// [`StagehandError::ResourceUnavailable`] and the mode is unchanged.
    pub fn set_stereo_mode(&mut self, mode: StereoMode, display: &dyn Display) -> Result<()> {
        if mode == StereoMode::CrystalEyes && !display.stereo_capable() {
            return Err(StagehandError::ResourceUnavailable(
                "display has no stereo-capable output".into(),
            ));
        }
        log::debug!("stereo mode -> {mode}");
        self.stereo_mode = mode;
        Ok(())
    }

    #[must_use]
    pub fn stereo_mode(&self) -> StereoMode {
        self.stereo_mode
    }

    /// Selects the light used for shadows; 0 disables shadows.
    pub fn set_shadow_light(&mut self, light: u32) {
        self.shadow.light = light;
    }

    pub fn set_shadow_length(&mut self, length: f32) -> Result<()> {
        check_finite("shadow-length", "length", length)?;
        if length < 0.0 {
            return Err(StagehandError::invalid(
                "shadow-length",
                format!("length must not be negative, got {length}"),
            ));
        }
        self.shadow.length = length;
        Ok(())
    }

    pub fn set_shadow_debug(&mut self, enabled: bool) {
        self.shadow.debug = enabled;
    }

    /// Sets the frame rate the renderer throttles to.
    pub fn set_desired_fps(&mut self, fps: f32) -> Result<()> {
        check_finite("desiredfps", "fps", fps)?;
        if fps <= 0.0 {
            return Err(StagehandError::invalid(
                "desiredfps",
                format!("fps must be positive, got {fps}"),
            ));
        }
        self.desired_fps = fps;
        Ok(())
    }

    /// Sets the motion blur amount. An amount of 0 disables blur.
    pub fn set_motion_blur(&mut self, amount: f32) -> Result<()> {
        check_finite("blur", "amount", amount)?;
        if !(0.0..=1.0).contains(&amount) {
            return Err(StagehandError::invalid(
                "blur",
                format!("amount must be in [0, 1], got {amount}"),
            ));
        }
        if amount == 0.0 {
            self.disable_motion_blur();
        } else {
            self.motion_blur = MotionBlur {
                enabled: true,
                amount,
            };
        }
        Ok(())
    }

    pub fn disable_motion_blur(&mut self) {
        self.motion_blur.enabled = false;
    }

    pub fn set_fps_display(&mut self, enabled: bool) {
        self.fps_display = enabled;
    }

    pub fn set_axis_display(&mut self, enabled: bool) {
        self.axis_display = enabled;
    }

    /// Queues an accumulation buffer operation for the next frame.
    ///
    /// The renderer drains the queue once per frame with
    /// [`take_accum_ops`](Self::take_accum_ops). Once
    /// [`MAX_PENDING_ACCUM_OPS`] are waiting, further operations fail with
    /// [`StagehandError::ResourceUnavailable`].
    pub fn accum(&mut self, op: AccumOp, value: f32) -> Result<()> {
        check_finite("accum", "value", value)?;
        if self.accum_queue.len() >= MAX_PENDING_ACCUM_OPS {
            log::warn!("accumulation queue full, dropping {op} {value}");
            return Err(StagehandError::ResourceUnavailable(format!(
                "accumulation queue holds {MAX_PENDING_ACCUM_OPS} undrained operations"
            )));
        }
        self.accum_queue.push((op, value));
        Ok(())
    }

    /// Accumulation operations queued since the last call to
    /// [`take_accum_ops`](Self::take_accum_ops).
    #[must_use]
    pub fn pending_accum_ops(&self) -> &[(AccumOp, f32)] {
        &self.accum_queue
    }

    /// Drains the queued accumulation operations, in call order.
    pub fn take_accum_ops(&mut self) -> Vec<(AccumOp, f32)> {
        std::mem::take(&mut self.accum_queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Mono;

    impl Display for Mono {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
        fn stereo_capable(&self) -> bool {
            false
        }
        fn resolution(&self) -> (u32, u32) {
            (720, 576)
        }
        fn resize(&mut self, _width: u32, _height: u32) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_defaults() {
        let state = RenderState::default();
        assert!(state.backface_cull);
        assert_eq!(state.colour_mask, [true; 4]);
        assert_eq!(state.clip(), (1.0, 10000.0));
        assert_eq!(state.draw_buffer, BufferTarget::Back);
        assert_eq!(state.stereo_mode(), StereoMode::None);
        assert!(state.clear_flags.frame && state.clear_flags.zbuffer);
        assert!(!state.clear_flags.accum);
    }

    #[test]
    fn test_clip_rejects_inverted_planes() {
        let mut state = RenderState::default();
        let err = state.set_clip(10.0, 1.0).unwrap_err();
        assert!(err.is_argument_error());
        assert!(state.set_clip(0.0, 1.0).is_err());
        assert_eq!(state.clip(), (1.0, 10000.0));
    }

    #[test]
    fn test_frustum_rejects_degenerate_bounds() {
        let mut state = RenderState::default();
        let flat = Frustum {
            left: 1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
        };
        assert!(state.set_frustum(flat).is_err());
        assert_eq!(state.frustum(), Frustum::default());
    }

    #[test]
    fn test_default_perspective_matrix() {
        let state = RenderState::default();
        let m = state.projection_matrix();
        // l=-1 r=1 b=-0.75 t=0.75 n=1 f=10000
        assert!((m.x_axis.x - 1.0).abs() < 1e-6);
        assert!((m.y_axis.y - 2.0 / 1.5).abs() < 1e-6);
        assert!((m.z_axis.z + 10001.0 / 9999.0).abs() < 1e-6);
        assert_eq!(m.z_axis.w, -1.0);
        assert!((m.w_axis.z + 20000.0 / 9999.0).abs() < 1e-4);
        assert_eq!(m.w_axis.w, 0.0);
    }

    #[test]
    fn test_orthographic_matrix_uses_zoom() {
        let mut state = RenderState::default();
        state.set_projection_mode(ProjectionMode::Orthographic);
        state.set_ortho_zoom(2.0).unwrap();
        let m = state.projection_matrix();
        // width = (1 - -1) * 2
        assert!((m.x_axis.x - 0.5).abs() < 1e-6);
        assert_eq!(m.w_axis.w, 1.0);
        assert!(state.set_ortho_zoom(0.0).is_err());
    }

    #[test]
    fn test_fog_validation() {
        let mut state = RenderState::default();
        assert!(state
            .set_fog(Vec3::new(0.0, 0.0, 1.0), 0.01, 1.0, 100.0)
            .is_ok());
        assert_eq!(state.fog.density, 0.01);
        assert!(state.set_fog(Vec3::ZERO, -1.0, 1.0, 100.0).is_err());
        assert!(state.set_fog(Vec3::ZERO, 0.1, 100.0, 1.0).is_err());
        assert!(state.set_fog(Vec3::splat(2.0), 0.1, 1.0, 100.0).is_err());
        assert_eq!(state.fog.colour, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_motion_blur_zero_disables() {
        let mut state = RenderState::default();
        state.set_motion_blur(0.1).unwrap();
        assert!(state.motion_blur.enabled);

        let mut via_zero = state.clone();
        via_zero.set_motion_blur(0.0).unwrap();
        let mut via_disable = state.clone();
        via_disable.disable_motion_blur();
        assert_eq!(via_zero, via_disable);
        assert!(!via_zero.motion_blur.enabled);

        assert!(state.set_motion_blur(-0.5).is_err());
        assert!(state.set_motion_blur(1.5).is_err());
    }

    #[test]
    fn test_desired_fps_rejects_non_positive() {
        let mut state = RenderState::default();
        assert!(state.set_desired_fps(0.0).unwrap_err().is_argument_error());
        assert!(state.set_desired_fps(-30.0).is_err());
        state.set_desired_fps(100_000.0).unwrap();
        assert_eq!(state.desired_fps, 100_000.0);
    }

    #[test]
    fn test_crystal_eyes_without_stereo_display() {
        let mut state = RenderState::default();
        state
            .set_stereo_mode(StereoMode::ColourStereo, &Mono)
            .unwrap();
        let err = state
            .set_stereo_mode(StereoMode::CrystalEyes, &Mono)
            .unwrap_err();
        assert!(matches!(err, StagehandError::ResourceUnavailable(_)));
        assert_eq!(state.stereo_mode(), StereoMode::ColourStereo);
    }

    #[test]
    fn test_accum_queue_drains_in_order() {
        let mut state = RenderState::default();
        state.accum(AccumOp::Load, 1.0).unwrap();
        state.accum(AccumOp::Mult, 0.5).unwrap();
        assert_eq!(state.pending_accum_ops().len(), 2);
        assert_eq!(
            state.take_accum_ops(),
            vec![(AccumOp::Load, 1.0), (AccumOp::Mult, 0.5)]
        );
        assert!(state.pending_accum_ops().is_empty());
    }

    #[test]
    fn test_accum_queue_is_bounded() {
        let mut state = RenderState::default();
        for _ in 0..MAX_PENDING_ACCUM_OPS {
            state.accum(AccumOp::Accum, 0.1).unwrap();
        }
        let err = state.accum(AccumOp::Return, 1.0).unwrap_err();
        assert!(matches!(err, StagehandError::ResourceUnavailable(_)));
        assert_eq!(state.pending_accum_ops().len(), MAX_PENDING_ACCUM_OPS);

        assert_eq!(state.take_accum_ops().len(), MAX_PENDING_ACCUM_OPS);
        state.accum(AccumOp::Return, 1.0).unwrap();
    }

    #[test]
    fn test_validate_rejects_out_of_range_fields() {
        assert!(RenderState::default().validate().is_ok());

        let mut state = RenderState::default();
        state.projection.clip = Clip {
            near: 50.0,
            far: -3.0,
        };
        assert!(state.validate().unwrap_err().is_argument_error());

        let mut state = RenderState::default();
        state.projection.ortho_zoom = -2.0;
        assert!(state.validate().is_err());

        let mut state = RenderState::default();
        state.desired_fps = f32::NAN;
        assert!(state.validate().is_err());

        let mut state = RenderState::default();
        state.motion_blur = MotionBlur {
            enabled: true,
            amount: 7.0,
        };
        assert!(state.validate().is_err());

        let mut state = RenderState::default();
        state.fog.begin = 200.0;
        assert!(state.validate().is_err());

        let mut state = RenderState::default();
        state.shadow.length = -1.0;
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_backface_cull_idempotent() {
        let mut once = RenderState::default();
        once.set_backface_cull(true);
        let mut twice = RenderState::default();
        twice.set_backface_cull(true);
        twice.set_backface_cull(true);
        assert_eq!(once, twice);
    }

    proptest! {
        #[test]
        fn prop_clip_round_trip(near in 1e-4f32..1e4, span in 1e-2f32..1e5) {
            let far = near + span;
            prop_assume!(near < far);
            let mut state = RenderState::default();
            state.set_clip(near, far).unwrap();
            prop_assert_eq!(state.clip(), (near, far));
        }
    }
}
