//! Rendering-side resources for stagehand.
//!
//! This crate provides:
//! - [`PixelPrimitive`], a CPU-side RGBA image that uploads to a texture
//! - [`PixelPrimitiveIo`] and the extension-keyed [`PrimitiveIo`] registry
//! - [`TextureStore`] and the path-keyed [`TextureCache`]

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]

pub mod error;
pub mod formats;
pub mod pixel_io;
pub mod pixels;
pub mod primitive;
pub mod textures;

pub use error::PixelError;
pub use formats::{PrimitiveFormat, PrimitiveIo};
pub use pixel_io::PixelPrimitiveIo;
pub use pixels::{Channels, PixelPrimitive};
pub use primitive::Primitive;
pub use textures::{Texture, TextureCache, TextureId, TextureStore};
