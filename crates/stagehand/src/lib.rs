//! stagehand: script-facing control of a real-time renderer's global state.
//!
//! An [`Engine`] owns the render state, the camera, the texture cache and the
//! renderer subsystems it drives. Scripts reach it through a table of named
//! operations, each with a declared argument signature that is checked before
//! anything changes.
//!
//! # Quick Start
//!
//! ```no_run
//! use stagehand::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!     let mut engine = Engine::headless();
//!
//!     engine.call("clip", &[Value::Float(1.0), Value::Float(500.0)])?;
//!     engine.eval("(fog (vector 0 0 1) 0.01 1 100) (draw-buffer 'back)")?;
//!
//!     let camera = engine.call("get-camera", &[])?;
//!     println!("{camera}");
//!     Ok(())
//! }
//! ```
//!
//! # Layout
//!
//! - [`value`] - dynamically typed values crossing the script boundary
//! - [`signature`] - argument kinds and validation
//! - [`ops`] - the operation table
//! - [`script`] - an s-expression reader
//! - [`headless`] - in-memory collaborators

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

mod engine;
pub mod headless;
mod init;
pub mod ops;
pub mod script;
pub mod signature;
pub mod value;

pub use engine::Engine;
pub use init::init_logging;
pub use signature::{ArgKind, Args};
pub use value::Value;

// Re-export core types
pub use stagehand_core::{
    AccumOp, BufferTarget, CameraController, Collaborators, Display, FunctionContainer, GrabStack,
    Lighting, Options, Physics, PrimitiveId, ProjectionMode, RenderState, Result, Scene,
    StagehandError, StereoMode,
};

// Re-export render types
pub use stagehand_render::{
    Channels, PixelPrimitive, PixelPrimitiveIo, Primitive, PrimitiveFormat, PrimitiveIo,
    TextureCache, TextureId, TextureStore,
};

pub use glam::{Mat4, Vec3, Vec4};
