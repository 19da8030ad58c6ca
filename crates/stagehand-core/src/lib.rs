//! Core abstractions for stagehand.
//!
//! This crate holds the renderer-independent half of the scripting surface:
//! - [`RenderState`], the global per-frame rendering configuration
//! - [`CameraController`], camera transform and lock-to-primitive smoothing
//! - Closed token vocabularies for buffers, stereo modes and accumulation ops
//! - Collaborator traits for the scene, physics, lighting and display
//! - Configuration options and the error taxonomy

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Render state legitimately has many boolean flags
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]

pub mod camera;
pub mod error;
pub mod options;
pub mod render_state;
pub mod scene;
pub mod tokens;

pub use camera::CameraController;
pub use error::{Result, StagehandError};
pub use options::Options;
pub use render_state::{
    ClearFlags, Clip, Fog, Frustum, MotionBlur, Projection, RenderState, Shadow,
    MAX_PENDING_ACCUM_OPS,
};
pub use scene::{
    Collaborators, Display, FunctionContainer, GrabStack, Lighting, Physics, PrimitiveId, Scene,
};
pub use tokens::{AccumOp, BufferTarget, ProjectionMode, StereoMode};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec3, Vec4};
