//! Collaborator traits for the renderer subsystems this crate drives.
//!
//! The scene graph, physics, lighting, grab stack, procedural-function
//! container, and output window all live outside stagehand. The engine talks
//! to them only through these traits.

use std::any::Any;

use glam::Mat4;

use crate::error::Result;

/// Identifier of a primitive in the scene graph. Zero is never a valid id.
pub type PrimitiveId = u32;

/// The renderer's scene graph.
pub trait Scene: Any {
    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to self as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the world transform of a primitive, or `None` if it does not exist.
    fn primitive_transform(&self, id: PrimitiveId) -> Option<Mat4>;

    /// Returns the primitive closest to the camera inside the square screen
    /// region centred on `(x, y)`, if any.
    fn select(&mut self, x: i32, y: i32, size: u32) -> Option<PrimitiveId>;

    /// Removes every primitive.
    fn clear(&mut self) -> Result<()>;

    /// Pops any primitive currently grabbed for editing.
    fn ungrab(&mut self) -> Result<()>;
}

/// The physics subsystem.
pub trait Physics {
    /// Removes every physics object and joint.
    fn clear(&mut self) -> Result<()>;
}

/// The lighting subsystem.
pub trait Lighting {
    /// Removes every light.
    fn clear_lights(&mut self) -> Result<()>;
}

/// The stack of drawing contexts pushed by `grab`.
pub trait GrabStack {
    /// Empties the stack.
    fn clear(&mut self) -> Result<()>;
}

/// Container of procedural functions attached to primitives.
pub trait FunctionContainer {
    /// Removes every procedural function.
    fn clear(&mut self) -> Result<()>;
}

/// The output surface the renderer draws into.
pub trait Display: Any {
    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to self as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Whether the surface was created with quad-buffered stereo.
    fn stereo_capable(&self) -> bool;

    /// Current width and height in pixels.
    fn resolution(&self) -> (u32, u32);

    /// Requests a new window size.
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;
}

/// The set of external subsystems an engine is wired to.
pub struct Collaborators {
    pub scene: Box<dyn Scene>,
    pub physics: Box<dyn Physics>,
    pub lighting: Box<dyn Lighting>,
    pub grab_stack: Box<dyn GrabStack>,
    pub functions: Box<dyn FunctionContainer>,
    pub display: Box<dyn Display>,
}
