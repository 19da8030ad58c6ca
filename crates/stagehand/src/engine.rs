//! The engine context every command runs against.

use std::path::Path;

use glam::Mat4;
use stagehand_core::{
    CameraController, Collaborators, Display, Options, PrimitiveId, RenderState, Result, Scene,
    StagehandError, StereoMode,
};
use stagehand_render::{Primitive, PrimitiveFormat, PrimitiveIo, TextureCache, TextureId, TextureStore};

use crate::ops;
use crate::script;
use crate::signature::{self, Args};
use crate::value::Value;

/// Owns the render state, camera, texture cache and the collaborators the
/// scripting surface drives.
///
/// Every operation takes the engine by `&mut`; there is no global instance.
pub struct Engine {
    state: RenderState,
    camera: CameraController,
    store: TextureStore,
    textures: TextureCache,
    formats: PrimitiveIo,
    collab: Collaborators,
    trace_commands: bool,
}

impl Engine {
    /// Creates an engine with default state wired to `collab`.
    pub fn new(collab: Collaborators) -> Self {
        Self {
            state: RenderState::default(),
            camera: CameraController::new(),
            store: TextureStore::new(),
            textures: TextureCache::new(),
            formats: PrimitiveIo::new(),
            collab,
            trace_commands: false,
        }
    }

    /// Creates an engine from startup options.
    ///
    /// The render state is validated before anything is applied, and the
    /// display is resized to the configured screen size.
    pub fn with_options(options: Options, collab: Collaborators) -> Result<Self> {
        options.render.validate()?;
        let mut engine = Self::new(collab);
        engine.camera.set_lag(options.camera_lag)?;
        let (width, height) = options.screen_size;
        engine.set_screen_size(width, height)?;
        engine.state = options.render;
        engine.trace_commands = options.trace_commands;
        log::info!(
            "engine configured: {width}x{height}, camera lag {}",
            options.camera_lag
        );
        Ok(engine)
    }

    /// Creates an engine backed by in-memory collaborators.
    pub fn headless() -> Self {
        Self::new(crate::headless::collaborators())
    }

    /// Looks up `name` in the operation table, validates `args` against its
    /// signature and runs it.
    ///
    /// Validation covers the whole argument list before the handler runs, so
    /// a rejected call leaves every piece of state untouched.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        let op = ops::find(name).ok_or_else(|| {
            log::warn!("unknown operation '{name}'");
            StagehandError::UnknownOperation(name.to_string())
        })?;
        signature::check(op.name, op.signature, args)?;
        if self.trace_commands {
            log::debug!("({name}{})", args.iter().map(|a| format!(" {a}")).collect::<String>());
        }
        (op.handler)(self, &Args::new(op.name, args)).map_err(|e| {
            log::warn!("{name}: {e}");
            e
        })
    }

    /// Parses `source` as a sequence of calls and runs them in order.
    ///
    /// Returns the value of the last call, or void for empty input. The whole
    /// source is parsed before anything runs.
    pub fn eval(&mut self, source: &str) -> Result<Value> {
        let program = script::parse(source)?;
        let mut last = Value::Void;
        for expr in &program {
            last = script::evaluate(self, expr)?;
        }
        Ok(last)
    }

    #[must_use]
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RenderState {
        &mut self.state
    }

    #[must_use]
    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraController {
        &mut self.camera
    }

    #[must_use]
    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    #[must_use]
    pub fn texture_store(&self) -> &TextureStore {
        &self.store
    }

    #[must_use]
    pub fn collaborators(&self) -> &Collaborators {
        &self.collab
    }

    pub fn collaborators_mut(&mut self) -> &mut Collaborators {
        &mut self.collab
    }

    /// Returns the scene downcast to its concrete type.
    pub fn scene_mut<T: Scene>(&mut self) -> Option<&mut T> {
        self.collab.scene.as_any_mut().downcast_mut::<T>()
    }

    /// Returns the display downcast to its concrete type.
    pub fn display_mut<T: Display>(&mut self) -> Option<&mut T> {
        self.collab.display.as_any_mut().downcast_mut::<T>()
    }

    /// Registers a primitive format for a file extension.
    pub fn register_format(&mut self, ext: &str, format: Box<dyn PrimitiveFormat>) {
        self.formats.register(ext, format);
    }

    /// Returns the texture for `path`, loading it on the first request.
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<TextureId> {
        Ok(self.textures.load(path, &mut self.store)?)
    }

    /// Reloads `path` from disk and refreshes its cache entry.
    pub fn force_load_texture(&mut self, path: impl AsRef<Path>) -> Result<TextureId> {
        Ok(self.textures.force_load(path, &mut self.store)?)
    }

    /// Empties the texture cache and releases every texture it held.
    pub fn clear_texture_cache(&mut self) {
        self.textures.clear(&mut self.store);
    }

    /// Reads a primitive with the format registered for the path's extension.
    pub fn read_primitive(&mut self, path: impl AsRef<Path>) -> Result<Box<dyn Primitive>> {
        self.formats.read(path, &mut self.store)
    }

    /// Writes a primitive with the format registered for the path's extension.
    pub fn write_primitive(&self, path: impl AsRef<Path>, primitive: &dyn Primitive) -> Result<()> {
        self.formats.write(path, primitive)
    }

    /// Locks the camera onto a primitive; `None` unlocks it.
    pub fn lock_camera(&mut self, id: Option<PrimitiveId>) -> Result<()> {
        self.camera.lock(id, self.collab.scene.as_ref())
    }

    /// Advances the camera lock blend by one frame.
    pub fn locked_matrix(&mut self) -> Mat4 {
        self.camera.locked_matrix(self.collab.scene.as_ref())
    }

    /// Switches stereo mode, returning false if the display cannot support it.
    pub fn set_stereo_mode(&mut self, mode: StereoMode) -> bool {
        match self.state.set_stereo_mode(mode, self.collab.display.as_ref()) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("stereo mode {mode} refused: {e}");
                false
            }
        }
    }

    /// Picks the nearest primitive inside a square screen region.
    pub fn select(&mut self, x: i32, y: i32, size: u32) -> Option<PrimitiveId> {
        self.collab.scene.select(x, y, size)
    }

    #[must_use]
    pub fn screen_size(&self) -> (u32, u32) {
        self.collab.display.resolution()
    }

    pub fn set_screen_size(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(StagehandError::invalid(
                "set-screen-size",
                format!("size must be positive, got {width}x{height}"),
            ));
        }
        self.collab.display.resize(width, height)
    }

    /// Resets the scene and every subsystem attached to it.
    ///
    /// All six steps run in order even if earlier ones fail; failures are
    /// reported together afterwards.
    pub fn clear_engine(&mut self) -> Result<()> {
        let c = &mut self.collab;
        let steps = [
            ("scene", c.scene.clear()),
            ("physics", c.physics.clear()),
            ("lighting", c.lighting.clear_lights()),
            ("grab stack", c.grab_stack.clear()),
            ("ungrab", c.scene.ungrab()),
            ("functions", c.functions.clear()),
        ];

        let mut failed = Vec::new();
        for (step, result) in steps {
            if let Err(e) = result {
                log::warn!("clear-engine: {step} failed: {e}");
                failed.push(step.to_string());
            }
        }
        if failed.is_empty() {
            log::info!("engine cleared");
            Ok(())
        } else {
            Err(StagehandError::ResetIncomplete(failed))
        }
    }
}
